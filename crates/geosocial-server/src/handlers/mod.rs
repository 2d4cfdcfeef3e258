//! Query handlers.
//!
//! Both handlers run the synchronous engine on tokio's blocking pool; each
//! search owns its traversal state, so they can run side by side.

pub mod batch;
pub mod query;

pub use batch::{
    BatchQueryError, BatchQueryHandler, BatchQueryItemResult, BatchQueryRequest,
    BatchQueryResponse, BatchQueryResult, MAX_BATCH_SIZE,
};
pub use query::{QueryError, QueryHandler, QueryResult};
