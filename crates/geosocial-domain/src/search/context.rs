//! Per-query traversal state.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::DomainResult;
use crate::model::{KeywordId, KeywordSet, TimeWindow, UserId};

use super::config::{QueryParams, VisitPolicy};
use super::traits::GraphAccess;

/// Immutable input of one query, resolved from the graph before traversal.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub query_user: UserId,
    pub query_keywords: KeywordSet,
    pub query_neighbors: BTreeSet<UserId>,
    /// Windows of the query user's keywords; empty unless the query is time-aware.
    pub query_windows: HashMap<KeywordId, TimeWindow>,
    pub params: QueryParams,
}

impl QueryContext {
    /// Loads the query user's keywords, neighbors and (when needed) keyword windows.
    pub fn resolve<G: GraphAccess + ?Sized>(
        graph: &G,
        query_user: &UserId,
        params: &QueryParams,
    ) -> DomainResult<Self> {
        let query_keywords = graph.keywords(query_user)?;
        let query_neighbors = graph
            .relationships(query_user)?
            .into_iter()
            .map(|rel| rel.to)
            .collect();

        let mut query_windows = HashMap::new();
        if params.time_overlap.is_some() {
            for keyword in &query_keywords {
                if let Some(window) = graph.keyword_time_window(query_user, keyword)? {
                    query_windows.insert(keyword.clone(), window);
                }
            }
        }

        Ok(Self {
            query_user: query_user.clone(),
            query_keywords,
            query_neighbors,
            query_windows,
            params: params.clone(),
        })
    }
}

/// Visited set for a single traversal.
///
/// Always constructed fresh by the tree builder; it is never shared
/// between queries.
#[derive(Debug)]
pub(crate) struct TraversalState {
    policy: VisitPolicy,
    visited: HashSet<UserId>,
}

impl TraversalState {
    pub(crate) fn new(policy: VisitPolicy) -> Self {
        Self {
            policy,
            visited: HashSet::new(),
        }
    }

    pub(crate) fn is_visited(&self, user: &UserId) -> bool {
        self.visited.contains(user)
    }

    /// Marks `user` visited before its neighbors are explored.
    pub(crate) fn enter(&mut self, user: &UserId) {
        self.visited.insert(user.clone());
    }

    /// Called once every neighbor of `user` has been explored.
    pub(crate) fn leave(&mut self, user: &UserId) {
        if self.policy == VisitPolicy::PerPath {
            self.visited.remove(user);
        }
    }
}
