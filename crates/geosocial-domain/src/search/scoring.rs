//! Keyword and relationship overlap scoring.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::TimeWindow;

/// `|a ∩ b| / |a ∪ b|`, defined as `0` when the union is empty.
pub fn overlap_ratio<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let shared = a.intersection(b).count();
    let union = a.len() + b.len() - shared;
    if union == 0 {
        0.0
    } else {
        shared as f64 / union as f64
    }
}

/// Whether a shared keyword is active at the same time for both users.
///
/// The overlap must cover at least `fraction` of the query user's window.
/// A single-instant query window matches on any overlap.
pub fn windows_match(query: &TimeWindow, user: &TimeWindow, fraction: f64) -> bool {
    match query.overlap(user) {
        None => false,
        Some(_) if query.is_empty() => true,
        Some(overlap) => overlap as f64 / query.len() as f64 >= fraction,
    }
}

/// Scores of one visited user relative to the query user.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    pub keyword_score: f64,
    pub relationship_score: f64,
    pub degree_of_similarity: f64,
    /// Shared keywords counted toward cohesiveness.
    pub common_keywords: usize,
}

/// Weighted combination of keyword and relationship overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringEngine {
    keyword_weight: f64,
    relationship_weight: f64,
}

impl Default for ScoringEngine {
    /// Equal weighting of both overlaps.
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

impl ScoringEngine {
    pub fn new(keyword_weight: f64, relationship_weight: f64) -> Self {
        Self {
            keyword_weight,
            relationship_weight,
        }
    }

    /// Scores a user from its keyword and neighbor sets.
    ///
    /// `common_keywords` is computed by the caller since time-aware queries
    /// filter it with graph lookups.
    pub fn score<K: Ord, U: Ord>(
        &self,
        user_keywords: &BTreeSet<K>,
        query_keywords: &BTreeSet<K>,
        user_neighbors: &BTreeSet<U>,
        query_neighbors: &BTreeSet<U>,
        common_keywords: usize,
    ) -> Scores {
        let keyword_score = overlap_ratio(user_keywords, query_keywords);
        let relationship_score = overlap_ratio(user_neighbors, query_neighbors);
        Scores {
            keyword_score,
            relationship_score,
            degree_of_similarity: self.keyword_weight * keyword_score
                + self.relationship_weight * relationship_score,
            common_keywords,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_overlap_ratio_partial() {
        let score = overlap_ratio(&set(&["a", "b"]), &set(&["a", "c"]));
        assert!((score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_ratio_identical_sets_is_one() {
        assert_eq!(overlap_ratio(&set(&["a", "b"]), &set(&["b", "a"])), 1.0);
    }

    #[test]
    fn test_overlap_ratio_empty_union_is_zero() {
        assert_eq!(overlap_ratio(&set(&[]), &set(&[])), 0.0);
    }

    #[test]
    fn test_overlap_ratio_disjoint_is_zero() {
        assert_eq!(overlap_ratio(&set(&["a"]), &set(&["b"])), 0.0);
    }

    #[test]
    fn test_degree_of_similarity_is_weighted_sum() {
        let engine = ScoringEngine::new(0.5, 0.5);
        let scores = engine.score(
            &set(&["a", "c"]),
            &set(&["a", "b"]),
            &set(&[]),
            &set(&["n1"]),
            1,
        );
        assert!((scores.keyword_score - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(scores.relationship_score, 0.0);
        assert!((scores.degree_of_similarity - 1.0 / 6.0).abs() < 1e-12);
        assert_eq!(scores.common_keywords, 1);
    }

    #[test]
    fn test_windows_match_by_fraction_of_query_window() {
        let query = TimeWindow::new(0, 10).unwrap();
        let user = TimeWindow::new(5, 30).unwrap();
        assert!(windows_match(&query, &user, 0.5));
        assert!(!windows_match(&query, &user, 0.6));
    }

    #[test]
    fn test_windows_match_requires_overlap() {
        let query = TimeWindow::new(0, 10).unwrap();
        let user = TimeWindow::new(20, 30).unwrap();
        assert!(!windows_match(&query, &user, 0.0));
    }

    #[test]
    fn test_instant_query_window_matches_when_contained() {
        let query = TimeWindow::new(5, 5).unwrap();
        let user = TimeWindow::new(0, 10).unwrap();
        assert!(windows_match(&query, &user, 1.0));
    }
}
