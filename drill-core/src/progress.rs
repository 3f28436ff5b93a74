//! Progress scoring
//!
//! The completion score is a pure function of the ledger, recomputed after
//! every mutation rather than stored. Weights: 40% inspection, 40%
//! collection, 20% quiz.

use crate::config::SessionConfig;
use crate::ledger::EventLedger;

const INSPECTION_WEIGHT: f32 = 0.4;
const COLLECTION_WEIGHT: f32 = 0.4;
const QUIZ_WEIGHT: f32 = 0.2;

/// Count of inspected items that belong to the required set
///
/// Stray IDs land in the ledger but never count toward gating or scoring.
pub fn known_inspected_count(ledger: &EventLedger, config: &SessionConfig) -> usize {
    ledger
        .inspected_items()
        .filter(|id| config.is_required(id))
        .count()
}

/// Count of collected items that belong to the required set
pub fn known_collected_count(ledger: &EventLedger, config: &SessionConfig) -> usize {
    ledger
        .collected_items()
        .filter(|id| config.is_required(id))
        .count()
}

/// Normalized [0,1] completion score for the session
///
/// An empty required set (or a zero-question quiz) counts as fully
/// satisfied rather than dividing by zero.
pub fn completion_score(ledger: &EventLedger, config: &SessionConfig) -> f32 {
    let inspected = fraction(
        known_inspected_count(ledger, config),
        config.required_total(),
    );
    let collected = fraction(
        known_collected_count(ledger, config),
        config.required_total(),
    );
    let quiz = fraction(
        ledger.quiz().correct_count() as usize,
        config.total_questions as usize,
    );

    let score =
        INSPECTION_WEIGHT * inspected + COLLECTION_WEIGHT * collected + QUIZ_WEIGHT * quiz;
    score.clamp(0.0, 1.0)
}

fn fraction(count: usize, total: usize) -> f32 {
    if total == 0 {
        return 1.0;
    }
    (count as f32 / total as f32).clamp(0.0, 1.0)
}
