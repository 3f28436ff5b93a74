//! Event ledger
//!
//! EventLedger is the in-memory record of what the trainee has actually
//! done. Marking is idempotent set insertion; the caller learns from the
//! return value whether the fact was new and only then fires downstream
//! signals. The ledger itself never fails.

use std::collections::HashSet;

use crate::quiz::QuizOutcome;

/// Idempotent record of trainee actions
///
/// Inspection and collection are disjoint concerns with identical
/// semantics: a set that only grows, where re-marking is a no-op. Item IDs
/// are not validated against any schema here; unknown IDs are recorded
/// as-is and callers filter against the required set where it matters.
#[derive(Debug, Default, Clone)]
pub struct EventLedger {
    inspected: HashSet<String>,
    collected: HashSet<String>,
    quiz: QuizOutcome,
}

impl EventLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an item inspected. Returns true if this is a new fact.
    pub fn mark_inspected(&mut self, item_id: &str) -> bool {
        self.inspected.insert(item_id.to_string())
    }

    /// Mark an item collected. Returns true if this is a new fact.
    pub fn mark_collected(&mut self, item_id: &str) -> bool {
        self.collected.insert(item_id.to_string())
    }

    /// Record a quiz answer. Always appends.
    pub fn record_quiz_answer(&mut self, question_index: u32, selected_answer: u32, correct: bool) {
        self.quiz.record(question_index, selected_answer, correct);
    }

    /// Finalize the current quiz attempt, returning its correct count
    pub fn finalize_quiz(&mut self) -> u32 {
        self.quiz.finalize()
    }

    /// Discard the current quiz attempt for a retry
    pub fn reset_quiz(&mut self) {
        self.quiz.reset();
    }

    pub fn is_inspected(&self, item_id: &str) -> bool {
        self.inspected.contains(item_id)
    }

    pub fn is_collected(&self, item_id: &str) -> bool {
        self.collected.contains(item_id)
    }

    /// Count of distinct inspected items, known or not
    pub fn inspected_count(&self) -> usize {
        self.inspected.len()
    }

    /// Count of distinct collected items, known or not
    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }

    /// The current quiz attempt
    pub fn quiz(&self) -> &QuizOutcome {
        &self.quiz
    }

    /// Distinct inspected IDs (unordered)
    pub fn inspected_items(&self) -> impl Iterator<Item = &str> {
        self.inspected.iter().map(String::as_str)
    }

    /// Distinct collected IDs (unordered)
    pub fn collected_items(&self) -> impl Iterator<Item = &str> {
        self.collected.iter().map(String::as_str)
    }
}
