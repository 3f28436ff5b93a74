//! Session reporter
//!
//! SessionReporter observes the session's event stream and bridges it to
//! an [`LmsClient`]: every ledger mutation appends a timestamped fact to
//! the session blob, pushes the blob as suspend data, and pushes the
//! recomputed progress. Completion is reported exactly once. If the LMS
//! fails to initialize the reporter degrades to local-only mode; the blob
//! keeps growing but nothing is pushed, and no error ever escapes.

use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::{debug, warn};

use drill_core::events::TrainingEvent;
use drill_core::session::SessionObserver;

use crate::blob::SessionBlob;
use crate::client::LmsClient;

/// Bridges session state to an LMS client
pub struct SessionReporter {
    client: Box<dyn LmsClient>,
    blob: SessionBlob,
    active: bool,
    completion_reported: bool,
    terminated: bool,
    last_quiz: Option<(u32, bool)>,
    total_questions: u32,
}

impl SessionReporter {
    /// Create a reporter and open the LMS session
    ///
    /// A client that fails to initialize downgrades the reporter to
    /// local-only mode; the session proceeds regardless.
    pub fn new(mut client: Box<dyn LmsClient>, total_questions: u32) -> Self {
        client.initialize();
        let active = client.is_initialized();
        if active {
            debug!(learner = %client.learner_name(), "LMS reporting active");
            client.report_progress(0.0);
        } else {
            warn!("LMS unavailable, reporting downgraded to local-only");
        }
        Self {
            client,
            blob: SessionBlob::new(),
            active,
            completion_reported: false,
            terminated: false,
            last_quiz: None,
            total_questions,
        }
    }

    /// The local audit trail
    pub fn blob(&self) -> &SessionBlob {
        &self.blob
    }

    /// Serialized suspend data as last pushed
    pub fn suspend_data(&self) -> String {
        self.blob.serialize()
    }

    /// Whether reports actually reach the LMS
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Learner name from the LMS host (or the configured fallback)
    pub fn learner_name(&self) -> &str {
        self.client.learner_name()
    }

    fn append_and_push(&mut self, key: &str, value: &str) {
        self.blob.append(key, value);
        if self.active {
            self.client.set_suspend_data(&self.blob.serialize());
        }
    }

    fn report_completion_once(&mut self, passed: bool, correct: u32) {
        if self.completion_reported {
            return;
        }
        self.completion_reported = true;
        if self.active {
            self.client
                .report_completion(passed, correct, self.total_questions);
        }
    }

    fn finish(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;

        // Report an unredeemed failure before closing the session
        if let Some((correct, false)) = self.last_quiz {
            self.report_completion_once(false, correct);
        }
        if self.active {
            self.client.terminate();
            self.active = false;
        }
    }
}

// A reporter dropped without seeing SessionEnded still owes the host a
// terminate; finish() is idempotent so the normal path is unaffected.
impl Drop for SessionReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

impl SessionObserver for SessionReporter {
    fn on_event(&mut self, event: &TrainingEvent, score: f32) {
        if self.terminated {
            return;
        }
        let ts = timestamp();
        match event {
            TrainingEvent::SessionStarted { .. } => {
                self.append_and_push("session_start", &ts);
            }
            TrainingEvent::ItemInspected { item_id, .. } => {
                self.append_and_push(&format!("inspected_{item_id}"), &ts);
            }
            TrainingEvent::ItemCollected { item_id, .. } => {
                self.append_and_push(&format!("collected_{item_id}"), &ts);
            }
            TrainingEvent::ProgressUpdated { .. } => {
                if self.active {
                    self.client.report_progress(score);
                }
            }
            TrainingEvent::InspectionGateOpened => {
                self.append_and_push("inspection_gate_open", &ts);
            }
            TrainingEvent::CollectionStarted { .. } => {
                self.append_and_push("collection_start", &ts);
            }
            TrainingEvent::CollectionCompleted => {
                self.append_and_push("collection_complete", &ts);
            }
            TrainingEvent::TimerWarning { remaining_secs } => {
                self.append_and_push(&format!("timer_warning_{remaining_secs}"), &ts);
            }
            TrainingEvent::TimeExpired => {
                self.append_and_push("time_expired", &ts);
            }
            TrainingEvent::QuizStarted { forced } => {
                self.append_and_push("quiz_start", &ts);
                if *forced {
                    self.append_and_push("quiz_forced", "true");
                }
            }
            TrainingEvent::QuizAnswerRecorded {
                question_index,
                correct,
                ..
            } => {
                self.append_and_push(&format!("q{question_index}_correct"), &correct.to_string());
            }
            TrainingEvent::QuizFinished {
                correct_count,
                passed,
            } => {
                self.last_quiz = Some((*correct_count, *passed));
                self.append_and_push("quiz_score", &correct_count.to_string());
            }
            TrainingEvent::QuizRetried => {
                self.last_quiz = None;
                self.append_and_push("quiz_retry", &ts);
            }
            TrainingEvent::Certified { correct_count } => {
                self.append_and_push("certified", &ts);
                self.report_completion_once(true, *correct_count);
            }
            TrainingEvent::SessionEnded { .. } => {
                self.append_and_push("session_end", &ts);
                self.finish();
            }
        }
    }
}

/// Cloneable observer handle over a shared reporter
///
/// Lets the composition root keep reading the reporter (blob, suspend
/// data) after registering it with the session driver.
#[derive(Clone)]
pub struct SharedReporter(Arc<Mutex<SessionReporter>>);

impl SharedReporter {
    pub fn new(reporter: SessionReporter) -> Self {
        Self(Arc::new(Mutex::new(reporter)))
    }

    /// Run a closure against the underlying reporter
    pub fn with<R>(&self, f: impl FnOnce(&SessionReporter) -> R) -> Option<R> {
        self.0.lock().ok().map(|reporter| f(&reporter))
    }
}

impl SessionObserver for SharedReporter {
    fn on_event(&mut self, event: &TrainingEvent, score: f32) {
        if let Ok(mut reporter) = self.0.lock() {
            reporter.on_event(event, score);
        }
    }
}

// Wall-clock session time, local to the trainee's machine
fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{LmsCall, RecordingLmsClient};

    fn reporter_with_mock() -> (SessionReporter, Arc<Mutex<Vec<LmsCall>>>) {
        let client = RecordingLmsClient::new();
        let calls = client.calls();
        let reporter = SessionReporter::new(Box::new(client), 3);
        (reporter, calls)
    }

    fn ls(calls: &Arc<Mutex<Vec<LmsCall>>>) -> Vec<LmsCall> {
        calls.lock().unwrap().clone()
    }

    #[test]
    fn construction_initializes_and_pushes_zero_progress() {
        let (_reporter, calls) = reporter_with_mock();
        assert_eq!(
            ls(&calls),
            vec![LmsCall::Initialize, LmsCall::Progress(0.0)]
        );
    }

    #[test]
    fn inspection_appends_fact_and_pushes_suspend_data() {
        let (mut reporter, calls) = reporter_with_mock();

        reporter.on_event(
            &TrainingEvent::ItemInspected {
                item_id: "tape_gun".to_string(),
                inspected_count: 1,
            },
            0.1,
        );

        assert!(reporter.blob().contains_key("inspected_tape_gun"));
        let calls = ls(&calls);
        assert!(matches!(
            calls.last(),
            Some(LmsCall::SuspendData(data)) if data.contains("inspected_tape_gun=")
        ));
    }

    #[test]
    fn progress_update_pushes_score() {
        let (mut reporter, calls) = reporter_with_mock();

        reporter.on_event(&TrainingEvent::ProgressUpdated { score: 0.2 }, 0.2);

        assert_eq!(ls(&calls).last(), Some(&LmsCall::Progress(0.2)));
    }

    #[test]
    fn quiz_answers_land_in_the_blob() {
        let (mut reporter, _calls) = reporter_with_mock();

        reporter.on_event(
            &TrainingEvent::QuizAnswerRecorded {
                question_index: 0,
                selected_answer: 1,
                correct: true,
            },
            0.0,
        );

        assert_eq!(reporter.blob().get("q0_correct"), Some("true"));
    }

    #[test]
    fn certified_reports_completion_once() {
        let (mut reporter, calls) = reporter_with_mock();

        reporter.on_event(&TrainingEvent::QuizFinished { correct_count: 2, passed: true }, 0.93);
        reporter.on_event(&TrainingEvent::Certified { correct_count: 2 }, 0.93);
        // A stray duplicate must not re-report
        reporter.on_event(&TrainingEvent::Certified { correct_count: 2 }, 0.93);

        let completions = ls(&calls)
            .iter()
            .filter(|c| matches!(c, LmsCall::Completion { .. }))
            .count();
        assert_eq!(completions, 1);
        assert!(ls(&calls).contains(&LmsCall::Completion {
            passed: true,
            correct: 2,
            total: 3
        }));
    }

    #[test]
    fn session_end_terminates_once_with_final_fact() {
        let (mut reporter, calls) = reporter_with_mock();

        reporter.on_event(
            &TrainingEvent::SessionEnded {
                session_id: "s1".to_string(),
            },
            0.0,
        );
        reporter.on_event(
            &TrainingEvent::SessionEnded {
                session_id: "s1".to_string(),
            },
            0.0,
        );

        assert!(reporter.blob().contains_key("session_end"));
        let terminates = ls(&calls)
            .iter()
            .filter(|c| matches!(c, LmsCall::Terminate))
            .count();
        assert_eq!(terminates, 1);
    }

    #[test]
    fn unredeemed_failure_reports_failed_completion_at_end() {
        let (mut reporter, calls) = reporter_with_mock();

        reporter.on_event(&TrainingEvent::QuizFinished { correct_count: 1, passed: false }, 0.5);
        reporter.on_event(
            &TrainingEvent::SessionEnded {
                session_id: "s1".to_string(),
            },
            0.5,
        );

        assert!(ls(&calls).contains(&LmsCall::Completion {
            passed: false,
            correct: 1,
            total: 3
        }));
    }

    #[test]
    fn retry_clears_the_pending_failure() {
        let (mut reporter, calls) = reporter_with_mock();

        reporter.on_event(&TrainingEvent::QuizFinished { correct_count: 1, passed: false }, 0.5);
        reporter.on_event(&TrainingEvent::QuizRetried, 0.4);
        reporter.on_event(
            &TrainingEvent::SessionEnded {
                session_id: "s1".to_string(),
            },
            0.4,
        );

        let completions = ls(&calls)
            .iter()
            .filter(|c| matches!(c, LmsCall::Completion { .. }))
            .count();
        assert_eq!(completions, 0);
        assert!(reporter.blob().contains_key("quiz_retry"));
    }

    #[test]
    fn dropping_an_unfinished_reporter_terminates() {
        let (reporter, calls) = reporter_with_mock();
        drop(reporter);

        let terminates = ls(&calls)
            .iter()
            .filter(|c| matches!(c, LmsCall::Terminate))
            .count();
        assert_eq!(terminates, 1);
    }

    #[test]
    fn session_end_then_drop_terminates_only_once() {
        let (mut reporter, calls) = reporter_with_mock();

        reporter.on_event(
            &TrainingEvent::SessionEnded {
                session_id: "s1".to_string(),
            },
            0.0,
        );
        drop(reporter);

        let terminates = ls(&calls)
            .iter()
            .filter(|c| matches!(c, LmsCall::Terminate))
            .count();
        assert_eq!(terminates, 1);
    }

    #[test]
    fn failed_lms_degrades_to_local_only() {
        let client = RecordingLmsClient::failing();
        let calls = client.calls();
        let mut reporter = SessionReporter::new(Box::new(client), 3);

        assert!(!reporter.is_active());

        reporter.on_event(
            &TrainingEvent::ItemInspected {
                item_id: "tape_gun".to_string(),
                inspected_count: 1,
            },
            0.1,
        );
        reporter.on_event(&TrainingEvent::ProgressUpdated { score: 0.1 }, 0.1);

        // The blob keeps growing locally
        assert!(reporter.blob().contains_key("inspected_tape_gun"));

        // But nothing was pushed after the failed initialize
        assert_eq!(ls(&calls), vec![LmsCall::Initialize]);
    }

    #[test]
    fn timestamps_are_clock_formatted() {
        let ts = timestamp();
        assert_eq!(ts.len(), 8, "timestamp was {ts}");
        assert_eq!(ts.as_bytes()[2], b':');
        assert_eq!(ts.as_bytes()[5], b':');
    }

    #[test]
    fn suspend_data_round_trips_through_blob_parse() {
        let (mut reporter, _calls) = reporter_with_mock();

        reporter.on_event(
            &TrainingEvent::SessionStarted {
                session_id: "s1".to_string(),
            },
            0.0,
        );
        reporter.on_event(
            &TrainingEvent::ItemInspected {
                item_id: "tape_gun".to_string(),
                inspected_count: 1,
            },
            0.1,
        );

        let parsed = SessionBlob::parse(&reporter.suspend_data()).unwrap();
        assert_eq!(parsed.entries(), reporter.blob().entries());
    }

    #[test]
    fn shared_reporter_exposes_blob_after_registration() {
        let (reporter, _calls) = reporter_with_mock();
        let shared = SharedReporter::new(reporter);
        let mut observer = shared.clone();

        observer.on_event(
            &TrainingEvent::SessionStarted {
                session_id: "s1".to_string(),
            },
            0.0,
        );

        let len = shared.with(|r| r.blob().len()).unwrap();
        assert_eq!(len, 1);
    }
}
