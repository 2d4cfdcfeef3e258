//! geosocial-storage: Graph storage layer
//!
//! This crate provides the graph storage used by the search engine:
//! - In-memory store implementing `GraphAccess`
//! - JSON snapshots for preparing and sharing graphs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             geosocial-storage               │
//! ├─────────────────────────────────────────────┤
//! │  memory.rs   - DashMap-backed graph store   │
//! │  snapshot.rs - Serializable graph snapshot  │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod snapshot;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use memory::MemoryGraphStore;
pub use snapshot::{GraphSnapshot, KeywordSnapshot, RelationshipSnapshot, UserSnapshot};
