//! Simulation LMS client
//!
//! Desktop/standalone mode: no LMS host exists, so every report is just a
//! log line. Useful for local runs and demos.

use tracing::info;

use crate::client::LmsClient;

/// No-op client that logs instead of reporting
pub struct SimulationLmsClient {
    initialized: bool,
    learner_name: String,
}

impl SimulationLmsClient {
    pub fn new(learner_name: &str) -> Self {
        Self {
            initialized: false,
            learner_name: learner_name.to_string(),
        }
    }
}

impl LmsClient for SimulationLmsClient {
    fn initialize(&mut self) {
        self.initialized = true;
        info!(learner = %self.learner_name, "simulation LMS initialized");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn learner_name(&self) -> &str {
        &self.learner_name
    }

    fn set_learner_name(&mut self, name: &str) {
        self.learner_name = name.to_string();
    }

    fn report_progress(&mut self, progress: f32) {
        let percent = (progress * 100.0).round() as i32;
        info!(percent, "progress");
    }

    fn report_completion(&mut self, passed: bool, correct: u32, total: u32) {
        let status = if passed { "PASSED" } else { "FAILED" };
        info!(status, correct, total, "completion");
    }

    fn set_suspend_data(&mut self, _data: &str) {}

    fn terminate(&mut self) {
        self.initialized = false;
        info!("simulation LMS terminated");
    }
}
