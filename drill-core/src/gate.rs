//! Gate state machine
//!
//! GateController owns the session phase and fires one-shot transition
//! signals when thresholds are crossed. Once a latch fires it is never
//! re-evaluated, even if the triggering condition fluctuates afterwards.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::GateError;

/// Phase of a training session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Classroom: inspecting safety items
    AwaitingInspection,
    /// Enough inspections done; warehouse unlocked
    InspectionGateOpen,
    /// Warehouse: collecting items under the countdown
    AwaitingCollection,
    /// Every required item collected
    CollectionComplete,
    /// Quiz running
    QuizInProgress,
    /// Quiz finished at or above the passing score
    QuizPassed,
    /// Quiz finished below the passing score; retry permitted
    QuizFailed,
    /// Completion reported; terminal
    Certified,
}

impl Phase {
    /// Stable string form used in events and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingInspection => "awaiting_inspection",
            Self::InspectionGateOpen => "inspection_gate_open",
            Self::AwaitingCollection => "awaiting_collection",
            Self::CollectionComplete => "collection_complete",
            Self::QuizInProgress => "quiz_in_progress",
            Self::QuizPassed => "quiz_passed",
            Self::QuizFailed => "quiz_failed",
            Self::Certified => "certified",
        }
    }
}

/// A one-shot transition fired by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSignal {
    /// Minimum inspections reached; warehouse unlocked
    InspectionGateOpened,
    /// All required items collected
    CollectionCompleted,
    /// Quiz has started; `forced` when the deadline expired first
    QuizStarted { forced: bool },
    /// Quiz finished at or above the passing score
    QuizPassed { correct_count: u32 },
    /// Quiz finished below the passing score
    QuizFailed { correct_count: u32 },
    /// Course complete
    Certified,
}

/// One-shot threshold-driven phase controller
///
/// Per session, not resumable. The session driver is the only caller; it
/// feeds in counts after each ledger mutation and applies the returned
/// signals.
#[derive(Debug)]
pub struct GateController {
    phase: Phase,
    inspection_gate_opened: bool,
    collection_completed: bool,
}

impl GateController {
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingInspection,
            inspection_gate_opened: false,
            collection_completed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Evaluate the inspection threshold after a ledger mutation
    ///
    /// Fires once when `inspected_count` reaches the configured minimum
    /// (partial unlock); later inspections never re-fire it. The minimum is
    /// capped at the required-set size, so an empty or undersized set
    /// degrades to a gate that opens immediately instead of deadlocking.
    pub fn on_inspection(
        &mut self,
        inspected_count: usize,
        config: &SessionConfig,
    ) -> Option<GateSignal> {
        if self.inspection_gate_opened {
            return None;
        }
        let minimum = config
            .minimum_inspections_required
            .min(config.required_total());
        if inspected_count >= minimum {
            self.inspection_gate_opened = true;
            if self.phase == Phase::AwaitingInspection {
                self.phase = Phase::InspectionGateOpen;
            }
            return Some(GateSignal::InspectionGateOpened);
        }
        None
    }

    /// Enter the warehouse collection phase
    pub fn begin_collection(&mut self) -> Result<(), GateError> {
        match self.phase {
            Phase::InspectionGateOpen => {
                self.phase = Phase::AwaitingCollection;
                Ok(())
            }
            _ => Err(self.invalid("begin collection")),
        }
    }

    /// Evaluate the collection threshold after a ledger mutation
    ///
    /// Unlike inspection, this requires the full required set.
    pub fn on_collection(
        &mut self,
        collected_count: usize,
        config: &SessionConfig,
    ) -> Option<GateSignal> {
        if self.collection_completed || self.phase != Phase::AwaitingCollection {
            return None;
        }
        if collected_count >= config.required_total() {
            self.collection_completed = true;
            self.phase = Phase::CollectionComplete;
            return Some(GateSignal::CollectionCompleted);
        }
        None
    }

    /// Start the quiz
    ///
    /// Normally follows collection completion; `forced` starts it from the
    /// collection phase when the deadline expires, regardless of how many
    /// items were collected.
    pub fn start_quiz(&mut self, forced: bool) -> Result<GateSignal, GateError> {
        match (self.phase, forced) {
            (Phase::CollectionComplete, _) | (Phase::AwaitingCollection, true) => {
                self.phase = Phase::QuizInProgress;
                Ok(GateSignal::QuizStarted { forced })
            }
            _ => Err(self.invalid("start quiz")),
        }
    }

    /// Finish the quiz with a latched correct count
    pub fn finish_quiz(
        &mut self,
        correct_count: u32,
        config: &SessionConfig,
    ) -> Result<GateSignal, GateError> {
        if self.phase != Phase::QuizInProgress {
            return Err(self.invalid("finish quiz"));
        }
        if correct_count >= config.passing_score {
            self.phase = Phase::QuizPassed;
            Ok(GateSignal::QuizPassed { correct_count })
        } else {
            self.phase = Phase::QuizFailed;
            Ok(GateSignal::QuizFailed { correct_count })
        }
    }

    /// Retry a failed quiz with a fresh attempt
    pub fn retry_quiz(&mut self) -> Result<(), GateError> {
        match self.phase {
            Phase::QuizFailed => {
                self.phase = Phase::QuizInProgress;
                Ok(())
            }
            _ => Err(self.invalid("retry quiz")),
        }
    }

    /// Move from a passed quiz to the terminal certified phase
    pub fn certify(&mut self) -> Result<GateSignal, GateError> {
        match self.phase {
            Phase::QuizPassed => {
                self.phase = Phase::Certified;
                Ok(GateSignal::Certified)
            }
            _ => Err(self.invalid("certify")),
        }
    }

    fn invalid(&self, action: &'static str) -> GateError {
        GateError::InvalidTransition {
            from: self.phase.as_str().to_string(),
            action,
        }
    }
}

impl Default for GateController {
    fn default() -> Self {
        Self::new()
    }
}
