//! geosocial-server: configuration, query handlers and logging setup
//!
//! This crate wires the search engine to the outside world:
//! - Configuration management (defaults, YAML file, environment)
//! - Single query handler on the blocking pool
//! - Batch query handler with deduplication
//! - Structured logging initialisation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              geosocial-server                │
//! ├─────────────────────────────────────────────┤
//! │  config.rs        - Configuration           │
//! │  handlers/                                  │
//! │    query.rs       - Single query            │
//! │    batch.rs       - Batch queries           │
//! │  observability/   - Logging setup           │
//! │  main.rs          - `geosocial` binary      │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod handlers;
pub mod observability;

// Re-exports for convenience
pub use config::{ConfigLoadError, ServerConfig};
pub use handlers::{BatchQueryHandler, QueryError, QueryHandler};
