//! LmsClient trait definition
//!
//! The client abstraction decouples the reporter from any particular LMS
//! wire protocol. Calls are fire-and-forget by design: a client that has
//! not initialized silently drops them, so reporting failure can never
//! break the training session.

/// Trait for LMS reporting clients
pub trait LmsClient: Send {
    /// Open the LMS session. Failure leaves the client uninitialized.
    fn initialize(&mut self);

    /// Whether the LMS session opened successfully
    fn is_initialized(&self) -> bool;

    /// Learner name as reported by the host (or a configured fallback)
    fn learner_name(&self) -> &str;

    /// Override the learner name
    fn set_learner_name(&mut self, name: &str);

    /// Push a normalized [0,1] progress value
    fn report_progress(&mut self, progress: f32);

    /// Push the final pass/fail outcome with the quiz score
    fn report_completion(&mut self, passed: bool, correct: u32, total: u32);

    /// Push the serialized session blob as suspend data
    fn set_suspend_data(&mut self, data: &str);

    /// Close the LMS session. Must be called exactly once at teardown.
    fn terminate(&mut self);
}
