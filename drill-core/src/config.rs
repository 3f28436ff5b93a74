//! Session configuration
//!
//! SessionConfig fixes the required-items set, gating thresholds, and timer
//! settings for the lifetime of a session. Loaded from TOML with serde
//! defaults; every field falls back to the reference training values.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_minimum_inspections() -> usize {
    1
}

fn default_total_questions() -> u32 {
    3
}

fn default_passing_score() -> u32 {
    2
}

fn default_timer_secs() -> u64 {
    300
}

fn default_warning_secs() -> Vec<u64> {
    vec![120, 30]
}

fn default_learner_fallback() -> String {
    "Trainee".to_string()
}

fn default_lms_enabled() -> bool {
    true
}

/// Configuration for a training session
///
/// Immutable once the session starts. The required-items set defines both
/// the inspection checklist (classroom) and the collection list (warehouse).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Item IDs the trainee must inspect and later collect
    #[serde(default)]
    pub required_items: Vec<String>,

    /// Inspections needed before the warehouse unlocks (partial unlock)
    #[serde(default = "default_minimum_inspections")]
    pub minimum_inspections_required: usize,

    /// Number of quiz questions
    #[serde(default = "default_total_questions")]
    pub total_questions: u32,

    /// Correct answers needed to pass the quiz
    #[serde(default = "default_passing_score")]
    pub passing_score: u32,

    /// Warehouse countdown duration in seconds
    #[serde(default = "default_timer_secs")]
    pub timer_secs: u64,

    /// Remaining-time thresholds (seconds) that fire one-shot warnings
    #[serde(default = "default_warning_secs")]
    pub warning_secs: Vec<u64>,

    /// Learner name used when the LMS host does not provide one
    #[serde(default = "default_learner_fallback")]
    pub learner_fallback_name: String,

    /// Whether LMS reporting is enabled at all
    #[serde(default = "default_lms_enabled")]
    pub lms_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            required_items: Vec::new(),
            minimum_inspections_required: default_minimum_inspections(),
            total_questions: default_total_questions(),
            passing_score: default_passing_score(),
            timer_secs: default_timer_secs(),
            warning_secs: default_warning_secs(),
            learner_fallback_name: default_learner_fallback(),
            lms_enabled: default_lms_enabled(),
        }
    }
}

impl SessionConfig {
    /// The reference warehouse training configuration
    pub fn reference() -> Self {
        Self {
            required_items: vec![
                "tape_gun".to_string(),
                "box_cutter".to_string(),
                "safety_vest".to_string(),
                "packing_list".to_string(),
            ],
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Number of required items
    pub fn required_total(&self) -> usize {
        self.required_items.len()
    }

    /// Check whether an item ID belongs to the required set
    pub fn is_required(&self, item_id: &str) -> bool {
        self.required_items.iter().any(|i| i == item_id)
    }

    /// Warehouse countdown duration
    pub fn timer_duration(&self) -> Duration {
        Duration::from_secs(self.timer_secs)
    }

    /// Warning thresholds as durations, in configured order
    pub fn warning_thresholds(&self) -> Vec<Duration> {
        self.warning_secs.iter().map(|s| Duration::from_secs(*s)).collect()
    }
}
