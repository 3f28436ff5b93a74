//! Error types for drill-core

use thiserror::Error;

/// Top-level error type for drill-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to session driving
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid phase: expected {expected}, got {actual}")]
    InvalidPhase { expected: String, actual: String },

    #[error("Session has already ended")]
    AlreadyEnded,

    #[error("Gate error: {0}")]
    Gate(#[from] GateError),
}

/// Errors from the gate state machine
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Invalid transition: cannot {action} from {from}")]
    InvalidTransition { from: String, action: &'static str },
}

/// Errors loading session configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_invalid_phase_displays_correctly() {
        let error = SessionError::InvalidPhase {
            expected: "QuizInProgress".to_string(),
            actual: "AwaitingInspection".to_string(),
        };
        assert!(error.to_string().contains("Invalid phase"));
        assert!(error.to_string().contains("QuizInProgress"));
    }

    #[test]
    fn gate_error_invalid_transition_displays_correctly() {
        let error = GateError::InvalidTransition {
            from: "Certified".to_string(),
            action: "retry quiz",
        };
        assert!(error.to_string().contains("Invalid transition"));
        assert!(error.to_string().contains("retry quiz"));
    }

    #[test]
    fn session_error_converts_from_gate_error() {
        let gate_error = GateError::InvalidTransition {
            from: "AwaitingInspection".to_string(),
            action: "certify",
        };
        let session_error: SessionError = gate_error.into();
        assert!(matches!(session_error, SessionError::Gate(_)));
    }

    #[test]
    fn core_error_converts_from_session_error() {
        let session_error = SessionError::AlreadyEnded;
        let core_error: CoreError = session_error.into();
        assert!(matches!(core_error, CoreError::Session(_)));
    }

    #[test]
    fn core_error_converts_from_config_error() {
        let config_error = ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let core_error: CoreError = config_error.into();
        assert!(matches!(core_error, CoreError::Config(_)));
    }
}
