//! SessionDriver: the single owner and mutator of the core components
//!
//! Constructed once at session start with explicit references handed to
//! collaborators, replacing the original's global singletons and
//! scene-load lookups. Every mutation publishes exactly one domain event
//! (plus a progress update) and notifies observers synchronously.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::events::{EventBus, TrainingEvent};
use crate::gate::{GateController, GateSignal, Phase};
use crate::ledger::EventLedger;
use crate::progress::{completion_score, known_collected_count, known_inspected_count};
use crate::timer::{CountdownTimer, TimerSignal};

use super::observer::SessionObserver;

/// Drives one training session end to end
///
/// Operations map one-to-one onto trainee actions: inspect, enter the
/// warehouse, collect, answer the quiz. Gate transitions fire as side
/// effects of the thresholds those actions cross. Mark operations are
/// idempotent and never fail; structured transitions return errors when
/// called out of phase.
pub struct SessionDriver {
    id: String,
    config: SessionConfig,
    ledger: EventLedger,
    gate: GateController,
    timer: CountdownTimer,
    event_bus: Arc<dyn EventBus>,
    observers: Vec<Box<dyn SessionObserver>>,
    started: bool,
    ended: bool,
}

impl SessionDriver {
    /// Create a new driver with a generated session ID
    pub fn new(config: SessionConfig, event_bus: Arc<dyn EventBus>) -> Self {
        let timer = CountdownTimer::new(config.timer_duration(), config.warning_thresholds());
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            ledger: EventLedger::new(),
            gate: GateController::new(),
            timer,
            event_bus,
            observers: Vec::new(),
            started: false,
            ended: false,
        }
    }

    /// Register an observer, called synchronously on every event
    pub fn add_observer(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Publish the session-start event
    ///
    /// Idempotent; a second call is a no-op.
    pub async fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!(session_id = %self.id, "session started");
        self.emit(TrainingEvent::SessionStarted {
            session_id: self.id.clone(),
        })
        .await;

        // A degenerate required set satisfies the inspection gate outright
        let known = known_inspected_count(&self.ledger, &self.config);
        if let Some(GateSignal::InspectionGateOpened) = self.gate.on_inspection(known, &self.config)
        {
            self.emit(TrainingEvent::InspectionGateOpened).await;
        }
    }

    /// Mark an item inspected
    ///
    /// Returns true if the fact was new. Re-marking is a no-op and fires
    /// nothing downstream.
    pub async fn mark_inspected(&mut self, item_id: &str) -> bool {
        if self.ended {
            warn!(item_id, "mark_inspected after session end, ignoring");
            return false;
        }
        if !self.ledger.mark_inspected(item_id) {
            return false;
        }
        if !self.config.is_required(item_id) {
            debug!(item_id, "inspected item not in required set");
        }

        let count = self.ledger.inspected_count();
        self.emit(TrainingEvent::ItemInspected {
            item_id: item_id.to_string(),
            inspected_count: count,
        })
        .await;
        self.emit_progress().await;

        let known = known_inspected_count(&self.ledger, &self.config);
        if let Some(GateSignal::InspectionGateOpened) = self.gate.on_inspection(known, &self.config)
        {
            info!(inspected = known, "inspection gate open");
            self.emit(TrainingEvent::InspectionGateOpened).await;
        }
        true
    }

    /// Enter the warehouse: begin collection and start the countdown
    pub async fn enter_warehouse(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;
        self.gate.begin_collection()?;
        self.timer.start(self.config.timer_duration());
        info!(timer_secs = self.config.timer_secs, "collection started");
        self.emit(TrainingEvent::CollectionStarted {
            timer_secs: self.config.timer_secs,
        })
        .await;
        self.evaluate_collection_gate().await;
        Ok(())
    }

    /// Mark an item collected
    ///
    /// Completing the required set stops the countdown and starts the quiz.
    pub async fn mark_collected(&mut self, item_id: &str) -> bool {
        if self.ended {
            warn!(item_id, "mark_collected after session end, ignoring");
            return false;
        }
        if !self.ledger.mark_collected(item_id) {
            return false;
        }

        let count = self.ledger.collected_count();
        self.emit(TrainingEvent::ItemCollected {
            item_id: item_id.to_string(),
            collected_count: count,
        })
        .await;
        self.emit_progress().await;
        self.evaluate_collection_gate().await;
        true
    }

    async fn evaluate_collection_gate(&mut self) {
        let known = known_collected_count(&self.ledger, &self.config);
        if let Some(GateSignal::CollectionCompleted) = self.gate.on_collection(known, &self.config)
        {
            info!(collected = known, "collection complete");
            self.timer.stop();
            self.emit(TrainingEvent::CollectionCompleted).await;

            // Collection completion flows straight into the quiz
            if self.gate.start_quiz(false).is_ok() {
                self.emit(TrainingEvent::QuizStarted { forced: false }).await;
            }
        }
    }

    /// Advance the countdown
    ///
    /// Expiry forces the quiz to start regardless of collection state.
    pub async fn tick(&mut self, elapsed: Duration) {
        if self.ended {
            return;
        }
        for signal in self.timer.tick(elapsed) {
            match signal {
                TimerSignal::Warning { threshold } => {
                    warn!(remaining_secs = threshold.as_secs(), "timer warning");
                    self.emit(TrainingEvent::TimerWarning {
                        remaining_secs: threshold.as_secs(),
                    })
                    .await;
                }
                TimerSignal::TimeUp => {
                    warn!("collection deadline expired");
                    self.emit(TrainingEvent::TimeExpired).await;
                    if self.gate.phase() == Phase::AwaitingCollection
                        && self.gate.start_quiz(true).is_ok()
                    {
                        self.emit(TrainingEvent::QuizStarted { forced: true }).await;
                    }
                }
            }
        }
    }

    /// Record a quiz answer
    ///
    /// Always appends to the ledger; the quiz UI is responsible for not
    /// answering the same question twice within one attempt.
    pub async fn record_quiz_answer(
        &mut self,
        question_index: u32,
        selected_answer: u32,
        correct: bool,
    ) -> Result<(), SessionError> {
        self.ensure_live()?;
        if self.gate.phase() != Phase::QuizInProgress {
            return Err(SessionError::InvalidPhase {
                expected: Phase::QuizInProgress.as_str().to_string(),
                actual: self.gate.phase().as_str().to_string(),
            });
        }
        self.ledger
            .record_quiz_answer(question_index, selected_answer, correct);
        self.emit(TrainingEvent::QuizAnswerRecorded {
            question_index,
            selected_answer,
            correct,
        })
        .await;
        self.emit_progress().await;
        Ok(())
    }

    /// Finalize the quiz attempt and apply the outcome
    ///
    /// A passing attempt certifies the session immediately.
    pub async fn finish_quiz(&mut self) -> Result<u32, SessionError> {
        self.ensure_live()?;
        let correct_count = self.ledger.finalize_quiz();
        let signal = self.gate.finish_quiz(correct_count, &self.config)?;
        let passed = matches!(signal, GateSignal::QuizPassed { .. });
        info!(correct_count, passed, "quiz finished");

        self.emit(TrainingEvent::QuizFinished {
            correct_count,
            passed,
        })
        .await;
        self.emit_progress().await;

        if passed
            && let Ok(GateSignal::Certified) = self.gate.certify()
        {
            info!(session_id = %self.id, "course complete");
            self.emit(TrainingEvent::Certified { correct_count }).await;
        }
        Ok(correct_count)
    }

    /// Discard a failed attempt and re-enter the quiz
    pub async fn retry_quiz(&mut self) -> Result<(), SessionError> {
        self.ensure_live()?;
        self.gate.retry_quiz()?;
        self.ledger.reset_quiz();
        info!("quiz retry");
        self.emit(TrainingEvent::QuizRetried).await;
        self.emit_progress().await;
        Ok(())
    }

    /// End the session
    ///
    /// Stops the countdown and publishes the terminal event so observers
    /// can close their reporting. Idempotent; a missed call leaves the LMS
    /// session open, so callers should treat this as part of teardown.
    pub async fn finish(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.timer.stop();
        info!(session_id = %self.id, "session ended");
        self.emit(TrainingEvent::SessionEnded {
            session_id: self.id.clone(),
        })
        .await;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn phase(&self) -> Phase {
        self.gate.phase()
    }

    /// Current completion score
    pub fn score(&self) -> f32 {
        completion_score(&self.ledger, &self.config)
    }

    pub fn ledger(&self) -> &EventLedger {
        &self.ledger
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    fn ensure_live(&self) -> Result<(), SessionError> {
        if self.ended {
            return Err(SessionError::AlreadyEnded);
        }
        Ok(())
    }

    async fn emit_progress(&mut self) {
        let score = self.score();
        self.emit(TrainingEvent::ProgressUpdated { score }).await;
    }

    async fn emit(&mut self, event: TrainingEvent) {
        self.event_bus.publish(event.clone()).await;
        let score = completion_score(&self.ledger, &self.config);
        for observer in &mut self.observers {
            observer.on_event(&event, score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventBus;

    fn test_config() -> SessionConfig {
        SessionConfig {
            required_items: vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            ],
            ..SessionConfig::default()
        }
    }

    fn test_driver() -> (SessionDriver, Arc<MemoryEventBus>) {
        let bus = Arc::new(MemoryEventBus::new(256));
        let driver = SessionDriver::new(test_config(), bus.clone());
        (driver, bus)
    }

    async fn events_of(bus: &MemoryEventBus) -> Vec<TrainingEvent> {
        bus.events_from(0).await.into_iter().map(|(_, e)| e).collect()
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let (mut driver, bus) = test_driver();
        driver.start().await;
        driver.start().await;

        let events = events_of(&bus).await;
        let starts = events
            .iter()
            .filter(|e| matches!(e, TrainingEvent::SessionStarted { .. }))
            .count();
        assert_eq!(starts, 1);
    }

    #[tokio::test]
    async fn duplicate_inspection_fires_no_events() {
        let (mut driver, bus) = test_driver();
        driver.start().await;

        assert!(driver.mark_inspected("a").await);
        let seq_after_first = bus.current_seq();

        assert!(!driver.mark_inspected("a").await);
        assert_eq!(bus.current_seq(), seq_after_first);
    }

    #[tokio::test]
    async fn inspection_gate_opens_once() {
        let (mut driver, bus) = test_driver();
        driver.start().await;

        driver.mark_inspected("a").await;
        driver.mark_inspected("b").await;
        driver.mark_inspected("c").await;

        let events = events_of(&bus).await;
        let opens = events
            .iter()
            .filter(|e| matches!(e, TrainingEvent::InspectionGateOpened))
            .count();
        assert_eq!(opens, 1);
        assert_eq!(driver.phase(), Phase::InspectionGateOpen);
    }

    #[tokio::test]
    async fn unknown_item_does_not_open_gate() {
        let (mut driver, _bus) = test_driver();
        driver.start().await;

        driver.mark_inspected("forklift").await;
        assert_eq!(driver.phase(), Phase::AwaitingInspection);

        driver.mark_inspected("a").await;
        assert_eq!(driver.phase(), Phase::InspectionGateOpen);
    }

    #[tokio::test]
    async fn empty_required_set_flows_straight_to_the_quiz() {
        let bus = Arc::new(MemoryEventBus::new(256));
        let config = SessionConfig {
            required_items: Vec::new(),
            ..SessionConfig::default()
        };
        let mut driver = SessionDriver::new(config, bus.clone());

        driver.start().await;
        assert_eq!(driver.phase(), Phase::InspectionGateOpen);

        driver.enter_warehouse().await.unwrap();
        assert_eq!(driver.phase(), Phase::QuizInProgress);

        let events = events_of(&bus).await;
        assert!(events.contains(&TrainingEvent::InspectionGateOpened));
        assert!(events.contains(&TrainingEvent::CollectionCompleted));
        assert!(events.contains(&TrainingEvent::QuizStarted { forced: false }));
        assert!(!driver.timer().is_running());
    }

    #[tokio::test]
    async fn every_mutation_publishes_a_progress_update() {
        let (mut driver, bus) = test_driver();
        driver.start().await;

        driver.mark_inspected("a").await;
        driver.mark_inspected("b").await;

        let events = events_of(&bus).await;
        let updates = events
            .iter()
            .filter(|e| matches!(e, TrainingEvent::ProgressUpdated { .. }))
            .count();
        assert_eq!(updates, 2);
    }

    #[tokio::test]
    async fn full_collection_starts_quiz() {
        let (mut driver, bus) = test_driver();
        driver.start().await;
        driver.mark_inspected("a").await;
        driver.enter_warehouse().await.unwrap();

        for id in ["a", "b", "c", "d"] {
            driver.mark_collected(id).await;
        }

        assert_eq!(driver.phase(), Phase::QuizInProgress);
        let events = events_of(&bus).await;
        assert!(events.contains(&TrainingEvent::CollectionCompleted));
        assert!(events.contains(&TrainingEvent::QuizStarted { forced: false }));
        assert!(!driver.timer().is_running());
    }

    #[tokio::test]
    async fn timer_expiry_forces_quiz_with_partial_collection() {
        let (mut driver, bus) = test_driver();
        driver.start().await;
        driver.mark_inspected("a").await;
        driver.enter_warehouse().await.unwrap();

        driver.mark_collected("a").await;
        driver.mark_collected("b").await;

        driver.tick(Duration::from_secs(301)).await;

        assert_eq!(driver.phase(), Phase::QuizInProgress);
        let events = events_of(&bus).await;
        assert!(events.contains(&TrainingEvent::TimeExpired));
        assert!(events.contains(&TrainingEvent::QuizStarted { forced: true }));

        // Partial collection stays baked into the score: 0.4*1/4 + 0.4*2/4
        let expected = 0.4 * 0.25 + 0.4 * 0.5;
        assert!((driver.score() - expected).abs() < 1e-6);
    }

    #[tokio::test]
    async fn timer_warnings_are_one_shot() {
        let (mut driver, bus) = test_driver();
        driver.start().await;
        driver.mark_inspected("a").await;
        driver.enter_warehouse().await.unwrap();

        driver.tick(Duration::from_secs(200)).await;
        driver.tick(Duration::from_secs(10)).await;

        let events = events_of(&bus).await;
        let warnings = events
            .iter()
            .filter(|e| matches!(e, TrainingEvent::TimerWarning { .. }))
            .count();
        assert_eq!(warnings, 1);
    }

    #[tokio::test]
    async fn quiz_answers_require_quiz_phase() {
        let (mut driver, _bus) = test_driver();
        driver.start().await;

        let result = driver.record_quiz_answer(0, 1, true).await;
        assert!(matches!(result, Err(SessionError::InvalidPhase { .. })));
    }

    #[tokio::test]
    async fn passing_quiz_certifies_immediately() {
        let (mut driver, bus) = test_driver();
        run_to_quiz(&mut driver).await;

        driver.record_quiz_answer(0, 0, true).await.unwrap();
        driver.record_quiz_answer(1, 0, true).await.unwrap();
        driver.record_quiz_answer(2, 0, false).await.unwrap();

        let correct = driver.finish_quiz().await.unwrap();
        assert_eq!(correct, 2);
        assert_eq!(driver.phase(), Phase::Certified);

        let events = events_of(&bus).await;
        assert!(events.contains(&TrainingEvent::Certified { correct_count: 2 }));
    }

    #[tokio::test]
    async fn failed_quiz_can_retry_and_pass() {
        let (mut driver, bus) = test_driver();
        run_to_quiz(&mut driver).await;

        driver.record_quiz_answer(0, 1, false).await.unwrap();
        driver.record_quiz_answer(1, 1, false).await.unwrap();
        driver.record_quiz_answer(2, 0, true).await.unwrap();
        driver.finish_quiz().await.unwrap();
        assert_eq!(driver.phase(), Phase::QuizFailed);

        driver.retry_quiz().await.unwrap();
        assert_eq!(driver.phase(), Phase::QuizInProgress);
        assert_eq!(driver.ledger().quiz().answers().len(), 0);

        for q in 0..3 {
            driver.record_quiz_answer(q, 0, true).await.unwrap();
        }
        let correct = driver.finish_quiz().await.unwrap();
        assert_eq!(correct, 3);
        assert_eq!(driver.phase(), Phase::Certified);

        let events = events_of(&bus).await;
        assert!(events.contains(&TrainingEvent::QuizRetried));
    }

    #[tokio::test]
    async fn retry_resets_provisional_score() {
        let (mut driver, _bus) = test_driver();
        run_to_quiz(&mut driver).await;

        driver.record_quiz_answer(0, 0, true).await.unwrap();
        driver.finish_quiz().await.unwrap();
        let failed_score = driver.score();

        driver.retry_quiz().await.unwrap();
        assert!(driver.score() < failed_score);
    }

    #[tokio::test]
    async fn finish_is_idempotent_and_blocks_mutation() {
        let (mut driver, bus) = test_driver();
        driver.start().await;
        driver.finish().await;
        driver.finish().await;

        let events = events_of(&bus).await;
        let ends = events
            .iter()
            .filter(|e| matches!(e, TrainingEvent::SessionEnded { .. }))
            .count();
        assert_eq!(ends, 1);

        assert!(!driver.mark_inspected("a").await);
        assert!(matches!(
            driver.enter_warehouse().await,
            Err(SessionError::AlreadyEnded)
        ));
    }

    #[tokio::test]
    async fn observers_see_events_with_current_score() {
        struct Recorder(std::sync::Arc<std::sync::Mutex<Vec<(TrainingEvent, f32)>>>);
        impl SessionObserver for Recorder {
            fn on_event(&mut self, event: &TrainingEvent, score: f32) {
                self.0.lock().unwrap().push((event.clone(), score));
            }
        }

        let (mut driver, _bus) = test_driver();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        driver.add_observer(Box::new(Recorder(seen.clone())));

        driver.start().await;
        driver.mark_inspected("a").await;

        let seen = seen.lock().unwrap();
        // SessionStarted, ItemInspected, ProgressUpdated, InspectionGateOpened
        assert_eq!(seen.len(), 4);
        let (last_event, last_score) = &seen[seen.len() - 1];
        assert_eq!(*last_event, TrainingEvent::InspectionGateOpened);
        assert!((last_score - 0.1).abs() < 1e-6);
    }

    async fn run_to_quiz(driver: &mut SessionDriver) {
        driver.start().await;
        driver.mark_inspected("a").await;
        driver.enter_warehouse().await.unwrap();
        for id in ["a", "b", "c", "d"] {
            driver.mark_collected(id).await;
        }
        assert_eq!(driver.phase(), Phase::QuizInProgress);
    }
}
