//! The play-session state machine.
//!
//! One session is one run through a shuffled set of feature labels. Every
//! label is attempted exactly once: a drop moves it from `remaining` into
//! either `placed` or `failed`, score only ever goes up, and the session
//! completes when nothing remains. All inputs are tolerated; malformed
//! ones are silent no-ops, never panics.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::atlas::Feature;
use crate::constants::HIT_REWARD;
use crate::game::evaluate::evaluate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Where a correctly placed label gets its marker: the feature's true
/// anchor, not wherever the user happened to drop it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub feature_id: String,
    pub x: f32,
    pub y: f32,
}

/// Terminal summary of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub score: u32,
    pub perfect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Hit,
    Miss,
}

/// The authoritative game state for one play-through.
#[derive(Resource, Debug, Default)]
pub struct GameSession {
    phase: SessionPhase,
    remaining: Vec<Feature>,
    placed: Vec<PlacementRecord>,
    failed: Vec<Feature>,
    score: u32,
    /// Snapshot of the filtered feature set from the last start, for reset.
    source: Vec<Feature>,
    /// Completion signal, reported exactly once via [`take_completion`].
    pending_completion: Option<Completion>,
}

impl GameSession {
    /// Begin a session over an already-filtered feature snapshot. The order
    /// is shuffled so the label list never leaks insertion order.
    pub fn start(&mut self, features: Vec<Feature>) {
        self.start_with_rng(features, &mut rand::thread_rng());
    }

    /// [`start`] with a caller-supplied RNG, for deterministic tests.
    pub fn start_with_rng<R: Rng>(&mut self, features: Vec<Feature>, rng: &mut R) {
        self.source = features.clone();

        let mut shuffled = features;
        shuffled.shuffle(rng);

        self.remaining = shuffled;
        self.placed.clear();
        self.failed.clear();
        self.score = 0;
        self.phase = SessionPhase::InProgress;
        self.pending_completion = None;

        // An empty set (e.g. a filter matching nothing) completes on the
        // spot: score 0, trivially perfect.
        self.check_completion();
    }

    /// Re-run the last start with the same snapshot and a fresh shuffle.
    /// Legal from any phase.
    pub fn reset(&mut self) {
        let source = self.source.clone();
        self.start(source);
    }

    /// Resolve one drop. Returns None (and changes nothing) unless the
    /// session is in progress and `feature_id` is still unplaced; a late,
    /// duplicate, or unknown drop is not an error.
    pub fn attempt_placement(
        &mut self,
        feature_id: &str,
        point: Option<Vec2>,
    ) -> Option<PlacementOutcome> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        let index = self.remaining.iter().position(|f| f.id == feature_id)?;

        let feature = self.remaining.remove(index);
        let outcome = if evaluate(&feature, point).is_hit {
            self.placed.push(PlacementRecord {
                feature_id: feature.id.clone(),
                x: feature.anchor.x,
                y: feature.anchor.y,
            });
            self.score += HIT_REWARD;
            PlacementOutcome::Hit
        } else {
            self.failed.push(feature);
            PlacementOutcome::Miss
        };

        self.check_completion();
        Some(outcome)
    }

    fn check_completion(&mut self) {
        if self.phase == SessionPhase::InProgress && self.remaining.is_empty() {
            self.phase = SessionPhase::Completed;
            self.pending_completion = Some(Completion {
                score: self.score,
                perfect: self.failed.is_empty(),
            });
        }
    }

    /// One-shot completion signal; Some exactly once per completed session.
    pub fn take_completion(&mut self) -> Option<Completion> {
        self.pending_completion.take()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining(&self) -> &[Feature] {
        &self.remaining
    }

    pub fn placed(&self) -> &[PlacementRecord] {
        &self.placed
    }

    pub fn failed(&self) -> &[Feature] {
        &self.failed
    }

    /// Whether the finished session had no failed placements. Only
    /// meaningful once completed.
    pub fn is_perfect(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Region;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn feature(id: &str, x: f32, y: f32) -> Feature {
        Feature {
            id: id.to_string(),
            name: format!("Feature {}", id),
            category_id: None,
            anchor: Vec2::new(x, y),
            region: Region::Circle { tolerance: 30.0 },
        }
    }

    fn three_features() -> Vec<Feature> {
        vec![
            feature("a", 100.0, 100.0),
            feature("b", 300.0, 200.0),
            feature("c", 500.0, 400.0),
        ]
    }

    fn start_seeded(features: Vec<Feature>) -> GameSession {
        let mut session = GameSession::default();
        session.start_with_rng(features, &mut StdRng::seed_from_u64(7));
        session
    }

    fn ids(features: &[Feature]) -> BTreeSet<String> {
        features.iter().map(|f| f.id.clone()).collect()
    }

    /// remaining + placed + failed must always partition the start set.
    fn assert_partition(session: &GameSession, expected: &BTreeSet<String>) {
        let mut seen = BTreeSet::new();
        for f in session.remaining() {
            assert!(seen.insert(f.id.clone()), "duplicate id {}", f.id);
        }
        for p in session.placed() {
            assert!(seen.insert(p.feature_id.clone()), "duplicate id {}", p.feature_id);
        }
        for f in session.failed() {
            assert!(seen.insert(f.id.clone()), "duplicate id {}", f.id);
        }
        assert_eq!(&seen, expected);
    }

    #[test]
    fn test_attempt_before_start_is_noop() {
        let mut session = GameSession::default();
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert!(session.attempt_placement("a", Some(Vec2::ZERO)).is_none());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_start_enters_in_progress_with_all_features() {
        let session = start_seeded(three_features());
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.remaining().len(), 3);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_hit_moves_to_placed_and_scores() {
        let mut session = start_seeded(three_features());
        let outcome = session.attempt_placement("a", Some(Vec2::new(110.0, 100.0)));
        assert_eq!(outcome, Some(PlacementOutcome::Hit));
        assert_eq!(session.score(), HIT_REWARD);
        assert_eq!(session.placed().len(), 1);
        // The record carries the feature's true anchor, not the drop point
        assert_eq!(session.placed()[0].x, 100.0);
        assert_eq!(session.placed()[0].y, 100.0);
    }

    #[test]
    fn test_miss_moves_to_failed_without_scoring() {
        let mut session = start_seeded(three_features());
        let outcome = session.attempt_placement("a", Some(Vec2::new(700.0, 500.0)));
        assert_eq!(outcome, Some(PlacementOutcome::Miss));
        assert_eq!(session.score(), 0);
        assert_eq!(session.failed().len(), 1);
        assert!(session.remaining().iter().all(|f| f.id != "a"));
    }

    #[test]
    fn test_unknown_id_changes_nothing() {
        let mut session = start_seeded(three_features());
        let expected = ids(&three_features());

        assert!(session.attempt_placement("nope", Some(Vec2::ZERO)).is_none());
        assert_eq!(session.score(), 0);
        assert_eq!(session.remaining().len(), 3);
        assert_partition(&session, &expected);
    }

    #[test]
    fn test_second_attempt_on_same_feature_is_noop() {
        let mut session = start_seeded(three_features());
        session.attempt_placement("a", Some(Vec2::new(100.0, 100.0)));
        // A duplicate/late drop event for the same id must not double-count
        assert!(session.attempt_placement("a", Some(Vec2::new(100.0, 100.0))).is_none());
        assert_eq!(session.score(), HIT_REWARD);
        assert_eq!(session.placed().len(), 1);
    }

    #[test]
    fn test_partition_invariant_through_full_session() {
        let mut session = start_seeded(three_features());
        let expected = ids(&three_features());
        assert_partition(&session, &expected);

        session.attempt_placement("b", Some(Vec2::new(300.0, 200.0)));
        assert_partition(&session, &expected);
        session.attempt_placement("x", Some(Vec2::ZERO));
        assert_partition(&session, &expected);
        session.attempt_placement("a", Some(Vec2::new(0.0, 0.0)));
        assert_partition(&session, &expected);
        session.attempt_placement("c", Some(Vec2::new(500.0, 400.0)));
        assert_partition(&session, &expected);
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_completion_with_one_failure_is_not_perfect() {
        let mut session = start_seeded(three_features());
        session.attempt_placement("a", Some(Vec2::new(100.0, 100.0)));
        session.attempt_placement("b", Some(Vec2::new(300.0, 200.0)));
        session.attempt_placement("c", Some(Vec2::new(0.0, 0.0)));

        assert_eq!(session.phase(), SessionPhase::Completed);
        let completion = session.take_completion().unwrap();
        assert_eq!(completion.score, 200);
        assert!(!completion.perfect);
        assert_eq!(session.failed().len(), 1);
    }

    #[test]
    fn test_all_hits_is_perfect() {
        let mut session = start_seeded(three_features());
        session.attempt_placement("a", Some(Vec2::new(100.0, 100.0)));
        session.attempt_placement("b", Some(Vec2::new(300.0, 200.0)));
        session.attempt_placement("c", Some(Vec2::new(500.0, 400.0)));

        let completion = session.take_completion().unwrap();
        assert_eq!(completion.score, 300);
        assert!(completion.perfect);
    }

    #[test]
    fn test_completion_reported_once() {
        let mut session = start_seeded(vec![feature("a", 100.0, 100.0)]);
        session.attempt_placement("a", Some(Vec2::new(100.0, 100.0)));
        assert!(session.take_completion().is_some());
        assert!(session.take_completion().is_none());
        // Phase stays Completed even after the signal is consumed
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_attempt_after_completion_is_noop() {
        let mut session = start_seeded(vec![feature("a", 100.0, 100.0)]);
        session.attempt_placement("a", Some(Vec2::new(100.0, 100.0)));
        assert!(session.attempt_placement("a", Some(Vec2::ZERO)).is_none());
        assert_eq!(session.score(), HIT_REWARD);
    }

    #[test]
    fn test_empty_feature_set_completes_immediately() {
        let session = start_seeded(Vec::new());
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.score(), 0);
        assert!(session.is_perfect());
    }

    #[test]
    fn test_empty_set_completion_signal() {
        let mut session = start_seeded(Vec::new());
        let completion = session.take_completion().unwrap();
        assert_eq!(completion.score, 0);
        assert!(completion.perfect);
    }

    #[test]
    fn test_none_point_counts_as_miss() {
        // Failed normalization (degenerate surface) still consumes the try
        let mut session = start_seeded(three_features());
        let outcome = session.attempt_placement("a", None);
        assert_eq!(outcome, Some(PlacementOutcome::Miss));
        assert_eq!(session.failed().len(), 1);
    }

    #[test]
    fn test_reset_restores_full_set() {
        let mut session = start_seeded(three_features());
        session.attempt_placement("a", Some(Vec2::new(100.0, 100.0)));
        session.attempt_placement("b", Some(Vec2::ZERO));

        session.reset();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.score(), 0);
        assert!(session.placed().is_empty());
        assert!(session.failed().is_empty());
        assert_eq!(ids(session.remaining()), ids(&three_features()));
    }

    #[test]
    fn test_reset_from_completed_state() {
        let mut session = start_seeded(vec![feature("a", 100.0, 100.0)]);
        session.attempt_placement("a", Some(Vec2::ZERO));
        assert_eq!(session.phase(), SessionPhase::Completed);

        session.reset();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.remaining().len(), 1);
    }

    #[test]
    fn test_shuffle_depends_on_rng() {
        // With enough features, two different seeds should give different
        // orders while keeping the same membership.
        let features: Vec<Feature> = (0..16)
            .map(|i| feature(&format!("f{}", i), i as f32 * 10.0, 50.0))
            .collect();

        let mut a = GameSession::default();
        a.start_with_rng(features.clone(), &mut StdRng::seed_from_u64(1));
        let mut b = GameSession::default();
        b.start_with_rng(features.clone(), &mut StdRng::seed_from_u64(2));

        assert_eq!(ids(a.remaining()), ids(&features));
        assert_eq!(ids(b.remaining()), ids(&features));
        let order_a: Vec<&str> = a.remaining().iter().map(|f| f.id.as_str()).collect();
        let order_b: Vec<&str> = b.remaining().iter().map(|f| f.id.as_str()).collect();
        assert_ne!(order_a, order_b);
    }
}
