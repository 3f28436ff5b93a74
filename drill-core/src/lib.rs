//! drill-core: Core library for the drill training simulation
//!
//! This crate provides the progress/state tracking core of a two-scene
//! safety training session:
//!
//! - **Event ledger** - [`EventLedger`] records trainee actions (inspections,
//!   collections, quiz answers) as idempotent facts
//! - **Progress scoring** - [`completion_score`] derives a normalized [0,1]
//!   score from the ledger
//! - **Gate control** - [`GateController`] fires one-shot phase transitions
//!   when thresholds are crossed
//! - **Countdown timer** - [`CountdownTimer`] drives the warehouse deadline
//!   and its one-shot warnings
//! - **Event system** - [`EventBus`] trait and [`MemoryEventBus`] for typed
//!   [`TrainingEvent`] distribution
//! - **Session driver** - [`SessionDriver`], the single owner and mutator of
//!   all of the above
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use drill_core::{MemoryEventBus, SessionConfig, SessionDriver};
//!
//! # async fn example() -> Result<(), drill_core::SessionError> {
//! let bus = Arc::new(MemoryEventBus::new(100));
//! let mut session = SessionDriver::new(SessionConfig::reference(), bus);
//!
//! session.start().await;
//! session.mark_inspected("tape_gun").await;
//! println!("score: {}", session.score());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod ledger;
pub mod progress;
pub mod quiz;
pub mod session;
pub mod timer;

// Re-export key types for convenience
pub use config::SessionConfig;
pub use error::{ConfigError, CoreError, GateError, SessionError};
pub use events::{EventBus, EventSeq, MemoryEventBus, TrainingEvent};
pub use gate::{GateController, GateSignal, Phase};
pub use ledger::EventLedger;
pub use progress::completion_score;
pub use quiz::{AnswerRecord, Question, QuizOutcome, QuizSet};
pub use session::{SessionDriver, SessionObserver};
pub use timer::{CountdownTimer, TimerSignal};
