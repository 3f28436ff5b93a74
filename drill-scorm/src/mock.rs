//! Recording mock client for reporter tests
//!
//! Records every call so tests can assert on the exact report sequence.
//! Calls are shared through an Arc so they remain inspectable after the
//! client moves into a reporter.

use std::sync::{Arc, Mutex};

use crate::client::LmsClient;

/// One recorded LMS call
#[derive(Debug, Clone, PartialEq)]
pub enum LmsCall {
    Initialize,
    Progress(f32),
    Completion { passed: bool, correct: u32, total: u32 },
    LearnerName(String),
    SuspendData(String),
    Terminate,
}

/// Mock implementation of LmsClient that records its calls
pub struct RecordingLmsClient {
    calls: Arc<Mutex<Vec<LmsCall>>>,
    fail_initialize: bool,
    initialized: bool,
    learner_name: String,
}

impl RecordingLmsClient {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_initialize: false,
            initialized: false,
            learner_name: "Trainee".to_string(),
        }
    }

    /// Client whose initialize call fails, for degraded-mode tests
    pub fn failing() -> Self {
        let mut client = Self::new();
        client.fail_initialize = true;
        client
    }

    /// Shared handle to the recorded calls
    pub fn calls(&self) -> Arc<Mutex<Vec<LmsCall>>> {
        self.calls.clone()
    }

    fn record(&self, call: LmsCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Default for RecordingLmsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LmsClient for RecordingLmsClient {
    fn initialize(&mut self) {
        self.record(LmsCall::Initialize);
        self.initialized = !self.fail_initialize;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn learner_name(&self) -> &str {
        &self.learner_name
    }

    fn set_learner_name(&mut self, name: &str) {
        self.learner_name = name.to_string();
        self.record(LmsCall::LearnerName(name.to_string()));
    }

    fn report_progress(&mut self, progress: f32) {
        self.record(LmsCall::Progress(progress));
    }

    fn report_completion(&mut self, passed: bool, correct: u32, total: u32) {
        self.record(LmsCall::Completion {
            passed,
            correct,
            total,
        });
    }

    fn set_suspend_data(&mut self, data: &str) {
        self.record(LmsCall::SuspendData(data.to_string()));
    }

    fn terminate(&mut self) {
        self.record(LmsCall::Terminate);
        self.initialized = false;
    }
}
