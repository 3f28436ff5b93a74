//! EventBus trait definition
//!
//! The bus replaces the original per-frame polling of ledger state: core
//! components publish on mutation and presentation layers subscribe, with
//! replay support for late joiners.

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::TrainingEvent;

/// Monotonically increasing event sequence number
pub type EventSeq = u64;

/// Publish/subscribe surface for [`TrainingEvent`]s
///
/// Publication assigns a sequence number; subscribers get a live stream,
/// and late joiners can replay history from any sequence number.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event, returning its sequence number
    async fn publish(&self, event: TrainingEvent) -> EventSeq;

    /// Live stream of events published after this call
    fn subscribe(&self) -> broadcast::Receiver<(EventSeq, TrainingEvent)>;

    /// Replay all events at or after `seq`
    async fn events_from(&self, seq: EventSeq) -> Vec<(EventSeq, TrainingEvent)>;

    /// Next sequence number to be assigned
    fn current_seq(&self) -> EventSeq;
}
