//! Bounded-hop community search.
//!
//! Given a query user, the engine explores the relationship graph up to
//! `max_hops`, scores every visited user against the query user, drops
//! unsatisfying dead branches and splits the remaining users into result
//! and pass-through sets.
//!
//! # Architecture Decisions
//!
//! - **Explicit stack**: the tree is a petgraph `StableGraph` addressed by
//!   node index and the traversal is driven by a frame stack, not by
//!   recursion. Deep hop limits cannot overflow the native stack.
//!
//! - **Fresh visited set**: each query builds its own traversal state. Nothing
//!   is shared between queries, so concurrent searches are independent.
//!
//! - **One traversal, two modes**: similarity and distance (kd-truss) queries
//!   differ only in their [`SatisfactionPolicy`] and how edge weights
//!   accumulate.
//!
//! - **Root retention**: the query user is never pruned and is partitioned by
//!   its own `satisfy` value.

mod builder;
mod config;
mod context;
mod engine;
mod partition;
mod policy;
mod pruner;
mod scoring;
mod traits;
mod tree;
mod types;

#[cfg(test)]
mod tests;

pub use builder::TreeBuilder;
pub use config::{
    QueryMode, QueryModeKind, QueryParams, SearchConfig, VisitPolicy, DEFAULT_MAX_HOPS_LIMIT,
};
pub use context::QueryContext;
pub use engine::CommunitySearch;
pub use partition::{partition, Partition};
pub use policy::{strategy_for, DistancePolicy, SatisfactionPolicy, SimilarityPolicy};
pub use pruner::{prune, prune_in_place};
pub use scoring::{overlap_ratio, windows_match, Scores, ScoringEngine};
pub use traits::GraphAccess;
pub use tree::{NodeId, VisitNode, VisitTree};
pub use types::{SearchExport, SearchRequest, SearchResult, VisitRecord};
