//! Request and result types for community search.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::model::UserId;

use super::config::QueryParams;
use super::partition::Partition;
use super::tree::{VisitNode, VisitTree};

/// Request for one community search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The query user (tree root).
    pub user: UserId,
    /// Mode and thresholds.
    pub params: QueryParams,
}

impl SearchRequest {
    pub fn new(user: UserId, params: QueryParams) -> Self {
        Self { user, params }
    }
}

/// Exported visit record, nested by child user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub user: UserId,
    pub distance_from_root: f64,
    pub hop_depth: u32,
    pub keyword_score: f64,
    pub relationship_score: f64,
    pub degree_of_similarity: f64,
    pub common_keywords: usize,
    pub satisfy: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<UserId, VisitRecord>,
}

impl VisitRecord {
    pub(crate) fn from_node(node: &VisitNode, children: BTreeMap<UserId, VisitRecord>) -> Self {
        Self {
            user: node.user.clone(),
            distance_from_root: node.distance_from_root,
            hop_depth: node.hop_depth,
            keyword_score: node.scores.keyword_score,
            relationship_score: node.scores.relationship_score,
            degree_of_similarity: node.scores.degree_of_similarity,
            common_keywords: node.scores.common_keywords,
            satisfy: node.satisfy,
            children,
        }
    }
}

/// Outcome of a community search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The pruned tree.
    pub tree: VisitTree,
    /// Result and pass users of the pruned tree.
    pub partition: Partition,
    /// Nodes placed in the tree before pruning.
    pub visited: usize,
    /// Nodes removed by pruning.
    pub pruned: usize,
}

impl SearchResult {
    /// Serializable view handed to export and visualization layers.
    pub fn export(&self, request: &SearchRequest) -> SearchExport {
        SearchExport {
            query_user: request.user.clone(),
            params: request.params.clone(),
            result_users: self.partition.result_users.iter().cloned().collect(),
            pass_users: self.partition.pass_users.iter().cloned().collect(),
            visited: self.visited,
            pruned: self.pruned,
            tree: self.tree.to_record(),
        }
    }
}

/// JSON-ready search output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchExport {
    pub query_user: UserId,
    pub params: QueryParams,
    pub result_users: Vec<UserId>,
    pub pass_users: Vec<UserId>,
    pub visited: usize,
    pub pruned: usize,
    pub tree: VisitRecord,
}

impl SearchExport {
    pub fn to_json_pretty(&self) -> DomainResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| DomainError::Serialization {
            message: e.to_string(),
        })
    }
}
