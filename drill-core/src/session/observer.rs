//! SessionObserver trait definition

use crate::events::TrainingEvent;

/// Synchronous observer of session mutations
///
/// Observers are called once per published event, in registration order,
/// with the completion score as of that event. The LMS reporter implements
/// this to push progress and suspend data on every mutation; nothing an
/// observer does can fail the session.
pub trait SessionObserver: Send {
    fn on_event(&mut self, event: &TrainingEvent, score: f32);
}
