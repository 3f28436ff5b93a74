//! In-process event bus backed by a Vec and a broadcast channel
//!
//! A training session is short and low-volume, so the whole event history
//! fits in memory; the Vec doubles as the replay log the CLI prints after
//! a run.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use super::TrainingEvent;
use super::bus::{EventBus, EventSeq};

/// Vec-backed [`EventBus`]
///
/// Every published event lands in the history Vec (replay) and on the
/// broadcast channel (live). Sequence numbers come from a single atomic
/// counter, so they are unique and ordered across concurrent publishers.
pub struct MemoryEventBus {
    /// Full history, in publish order
    events: RwLock<Vec<(EventSeq, TrainingEvent)>>,
    next_seq: AtomicU64,
    tx: broadcast::Sender<(EventSeq, TrainingEvent)>,
}

impl MemoryEventBus {
    /// `capacity` bounds how far a live subscriber may lag before it
    /// starts missing events; the history Vec is unbounded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            events: RwLock::new(Vec::new()),
            next_seq: AtomicU64::new(0),
            tx,
        }
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: TrainingEvent) -> EventSeq {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        self.events.write().await.push((seq, event.clone()));

        // A send error only means nobody is listening right now
        let _ = self.tx.send((seq, event));

        seq
    }

    fn subscribe(&self) -> broadcast::Receiver<(EventSeq, TrainingEvent)> {
        self.tx.subscribe()
    }

    async fn events_from(&self, seq: EventSeq) -> Vec<(EventSeq, TrainingEvent)> {
        self.events
            .read()
            .await
            .iter()
            .filter(|(s, _)| *s >= seq)
            .cloned()
            .collect()
    }

    fn current_seq(&self) -> EventSeq {
        self.next_seq.load(Ordering::SeqCst)
    }
}
