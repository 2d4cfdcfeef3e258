//! geosocial-domain: Core community search logic
//!
//! This crate contains the bounded-hop community search engine:
//! - Graph model types (users, keywords, relationships, time windows)
//! - Scoring and satisfaction policies
//! - Index-addressed tree construction, pruning and partitioning
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              geosocial-domain               │
//! ├─────────────────────────────────────────────┤
//! │  model/   - Users, keywords, relationships  │
//! │  search/  - Community search engine         │
//! │    scoring.rs   - Overlap scores            │
//! │    policy.rs    - Satisfaction predicates   │
//! │    builder.rs   - Hop-bounded tree builder  │
//! │    pruner.rs    - Dead branch collapse      │
//! │    partition.rs - Result / pass split       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod model;
pub mod search;

// Re-export commonly used types at the crate root
pub use error::{DomainError, DomainResult};
pub use model::{KeywordId, KeywordSet, Location, Relationship, TimeWindow, UserId};
pub use search::{
    CommunitySearch, GraphAccess, Partition, QueryMode, QueryModeKind, QueryParams, SearchConfig,
    SearchExport, SearchRequest, SearchResult, VisitPolicy, VisitRecord, VisitTree,
};
