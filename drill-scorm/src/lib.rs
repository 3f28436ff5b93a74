//! drill-scorm: LMS reporting bridge for drill training sessions
//!
//! This crate serializes session state onto the SCORM data model and
//! pushes it to an LMS host:
//!
//! - **Client abstraction** - [`LmsClient`] trait over any reporting
//!   backend, with [`ScormClient`] (real data model) and
//!   [`SimulationLmsClient`] (no-op desktop mode) implementations
//! - **Raw API seam** - [`ScormApi`] trait so tests and desktop builds
//!   substitute an in-memory host ([`InMemoryScormApi`])
//! - **Session blob** - [`SessionBlob`], the append-only audit trail sent
//!   as suspend data
//! - **Reporter** - [`SessionReporter`], a session observer that pushes
//!   progress, completion, and suspend data on every mutation
//!
//! Reporting is strictly best-effort: a missing or failed LMS host
//! degrades the reporter to local-only mode and never fails the session.

pub mod blob;
pub mod client;
pub mod keys;
pub mod mock;
pub mod reporter;
pub mod scorm;
pub mod simulation;

// Re-export key types for convenience
pub use blob::{BlobError, SessionBlob};
pub use client::LmsClient;
pub use mock::{LmsCall, RecordingLmsClient};
pub use reporter::{SessionReporter, SharedReporter};
pub use scorm::{InMemoryScormApi, ScormApi, ScormClient, SharedScormApi};
pub use simulation::SimulationLmsClient;
