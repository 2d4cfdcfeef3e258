//! Satisfaction predicates.
//!
//! Each query mode pairs a [`ScoringEngine`] with a [`SatisfactionPolicy`].
//! The tree builder is generic over the policy, so both modes share one
//! traversal.

use super::config::QueryMode;
use super::scoring::{Scores, ScoringEngine};

/// Decides whether a visited user belongs to the result set.
pub trait SatisfactionPolicy: Send + Sync {
    /// Distance added when crossing an edge of the given weight.
    fn step_distance(&self, edge_weight: f64) -> f64;

    /// Evaluates a user from its scores and accumulated distance.
    fn satisfies(&self, scores: &Scores, distance_from_root: f64) -> bool;
}

/// Degree-of-similarity threshold plus a minimum keyword overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityPolicy {
    pub threshold: f64,
    pub cohesiveness: usize,
}

impl SatisfactionPolicy for SimilarityPolicy {
    /// Hop count.
    fn step_distance(&self, _edge_weight: f64) -> f64 {
        1.0
    }

    fn satisfies(&self, scores: &Scores, _distance_from_root: f64) -> bool {
        scores.degree_of_similarity >= self.threshold
            && scores.common_keywords >= self.cohesiveness
    }
}

/// Accumulated edge distance plus a required shared keyword count (kd-truss).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistancePolicy {
    pub max_distance: f64,
    pub required_keywords: usize,
}

impl SatisfactionPolicy for DistancePolicy {
    fn step_distance(&self, edge_weight: f64) -> f64 {
        edge_weight
    }

    fn satisfies(&self, scores: &Scores, distance_from_root: f64) -> bool {
        scores.common_keywords >= self.required_keywords
            && distance_from_root <= self.max_distance
    }
}

/// Scoring engine and satisfaction policy for a query mode.
pub fn strategy_for(mode: &QueryMode) -> (ScoringEngine, Box<dyn SatisfactionPolicy>) {
    match *mode {
        QueryMode::Similarity {
            keyword_weight,
            relationship_weight,
            threshold,
            cohesiveness,
        } => (
            ScoringEngine::new(keyword_weight, relationship_weight),
            Box::new(SimilarityPolicy {
                threshold,
                cohesiveness,
            }),
        ),
        QueryMode::Distance {
            max_distance,
            required_keywords,
        } => (
            ScoringEngine::default(),
            Box::new(DistancePolicy {
                max_distance,
                required_keywords,
            }),
        ),
    }
}
