//! Quiz data model
//!
//! Questions are presentation data consumed by whatever UI runs the quiz;
//! the core only cares about the answer records and the derived correct
//! count. A retry discards the previous attempt entirely.

use serde::{Deserialize, Serialize};

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Question text shown to the trainee
    pub prompt: String,
    /// Answer choices
    pub answers: Vec<String>,
    /// Index into `answers` of the correct choice
    pub correct_index: usize,
}

impl Question {
    /// Check whether a selected answer index is the correct one
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }
}

/// An ordered set of quiz questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSet {
    pub questions: Vec<Question>,
}

impl QuizSet {
    /// The reference three-question safety quiz
    pub fn reference() -> Self {
        Self {
            questions: vec![
                Question {
                    prompt: "What should you do before lifting a heavy box?".to_string(),
                    answers: vec![
                        "Lift with your back".to_string(),
                        "Bend your knees and keep your back straight".to_string(),
                        "Ask someone to watch".to_string(),
                    ],
                    correct_index: 1,
                },
                Question {
                    prompt: "Which item must be worn at all times in the warehouse?".to_string(),
                    answers: vec![
                        "Safety vest".to_string(),
                        "Tool belt".to_string(),
                        "Headphones".to_string(),
                    ],
                    correct_index: 0,
                },
                Question {
                    prompt: "Where should a box cutter be stored after use?".to_string(),
                    answers: vec![
                        "In your pocket".to_string(),
                        "On the nearest shelf".to_string(),
                        "Retracted, in its holder".to_string(),
                    ],
                    correct_index: 2,
                },
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// One answered question within a quiz attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_index: u32,
    pub selected_answer: u32,
    pub correct: bool,
}

/// The current quiz attempt
///
/// Answers append in the order given. `finalize` derives and latches the
/// correct count exactly once per attempt; `reset` discards everything for
/// a retry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizOutcome {
    answers: Vec<AnswerRecord>,
    correct_count: Option<u32>,
}

impl QuizOutcome {
    /// Record an answer. Always appends; duplicate question indices are the
    /// caller's responsibility to avoid within one attempt.
    pub fn record(&mut self, question_index: u32, selected_answer: u32, correct: bool) {
        self.answers.push(AnswerRecord {
            question_index,
            selected_answer,
            correct,
        });
    }

    /// Derive and latch the correct count for this attempt
    pub fn finalize(&mut self) -> u32 {
        let count = self.answers.iter().filter(|a| a.correct).count() as u32;
        self.correct_count = Some(count);
        count
    }

    /// Discard this attempt for a retry
    pub fn reset(&mut self) {
        self.answers.clear();
        self.correct_count = None;
    }

    /// Latched correct count, or 0 while the attempt is unfinished
    pub fn correct_count(&self) -> u32 {
        self.correct_count.unwrap_or(0)
    }

    /// Whether this attempt has been finalized
    pub fn is_finalized(&self) -> bool {
        self.correct_count.is_some()
    }

    /// Answers recorded so far, in order
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }
}
