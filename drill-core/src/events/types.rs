//! Event type definitions

use serde::{Deserialize, Serialize};

/// Events published by the session driver
///
/// One event per ledger mutation or gate transition, published
/// synchronously at the mutation site. Presentation layers subscribe
/// instead of polling ledger state every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrainingEvent {
    /// Session constructed and reporting initialized
    SessionStarted { session_id: String },

    /// A new item was inspected (idempotent duplicates never reach here)
    ItemInspected {
        item_id: String,
        inspected_count: usize,
    },

    /// A new item was collected
    ItemCollected {
        item_id: String,
        collected_count: usize,
    },

    /// Completion score recomputed after a mutation
    ProgressUpdated { score: f32 },

    /// Minimum inspections reached; warehouse unlocked
    InspectionGateOpened,

    /// Warehouse entered; countdown running
    CollectionStarted { timer_secs: u64 },

    /// All required items collected
    CollectionCompleted,

    /// Countdown crossed a warning threshold
    TimerWarning { remaining_secs: u64 },

    /// Countdown reached zero
    TimeExpired,

    /// Quiz started; `forced` when the deadline expired first
    QuizStarted { forced: bool },

    /// An answer was recorded
    QuizAnswerRecorded {
        question_index: u32,
        selected_answer: u32,
        correct: bool,
    },

    /// Quiz attempt finalized
    QuizFinished { correct_count: u32, passed: bool },

    /// Failed attempt discarded for a retry
    QuizRetried,

    /// Course complete
    Certified { correct_count: u32 },

    /// Session torn down; reporting terminated
    SessionEnded { session_id: String },
}
