//! Batch query handler with intra-batch deduplication.
//!
//! Identical queries (same user, same parameters) inside one batch run only
//! once; the unique ones run concurrently on the blocking pool and the
//! results are mapped back to the original positions.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use geosocial_domain::{GraphAccess, SearchRequest, SearchResult, UserId};
use tracing::{debug, instrument};

use super::query::{QueryError, QueryHandler};

/// Maximum number of queries accepted in one batch.
pub const MAX_BATCH_SIZE: usize = 50;

/// Key for identifying unique queries.
///
/// Parameters are keyed by their `Debug` rendering, which distinguishes
/// every field including non-finite floats.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    user: UserId,
    params: String,
}

impl From<&SearchRequest> for QueryKey {
    fn from(request: &SearchRequest) -> Self {
        Self {
            user: request.user.clone(),
            params: format!("{:?}", request.params),
        }
    }
}

/// A batch of community searches.
#[derive(Debug, Clone)]
pub struct BatchQueryRequest {
    pub queries: Vec<SearchRequest>,
}

impl BatchQueryRequest {
    pub fn new(queries: Vec<SearchRequest>) -> Self {
        Self { queries }
    }
}

/// Outcome of one query within a batch.
#[derive(Debug, Clone)]
pub struct BatchQueryItemResult {
    /// Shared between duplicate positions of the same query.
    pub outcome: Result<Arc<SearchResult>, QueryError>,
}

impl BatchQueryItemResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Results for each query, in request order.
#[derive(Debug, Clone)]
pub struct BatchQueryResponse {
    pub results: Vec<BatchQueryItemResult>,
}

/// Errors that reject a whole batch before anything runs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BatchQueryError {
    #[error("batch request cannot be empty")]
    EmptyBatch,

    #[error("batch size {size} exceeds maximum allowed {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("invalid query at index {index}: {message}")]
    InvalidQuery { index: usize, message: String },
}

/// Result type for batch query operations.
pub type BatchQueryResult<T> = Result<T, BatchQueryError>;

/// Handler for batches of community searches.
pub struct BatchQueryHandler<G> {
    handler: QueryHandler<G>,
}

impl<G> BatchQueryHandler<G>
where
    G: GraphAccess + 'static,
{
    pub fn new(handler: QueryHandler<G>) -> Self {
        Self { handler }
    }

    /// Validates a batch request.
    ///
    /// Parameter errors are reported here with the position of the first
    /// offending query. Lookup errors only show up when the query runs.
    pub fn validate(&self, request: &BatchQueryRequest) -> BatchQueryResult<()> {
        if request.queries.is_empty() {
            return Err(BatchQueryError::EmptyBatch);
        }

        if request.queries.len() > MAX_BATCH_SIZE {
            return Err(BatchQueryError::BatchTooLarge {
                size: request.queries.len(),
                max: MAX_BATCH_SIZE,
            });
        }

        let limit = self.handler.engine().config().max_hops_limit;
        for (index, query) in request.queries.iter().enumerate() {
            if let Err(e) = query.params.validate() {
                return Err(BatchQueryError::InvalidQuery {
                    index,
                    message: e.to_string(),
                });
            }
            if query.params.max_hops > limit {
                return Err(BatchQueryError::InvalidQuery {
                    index,
                    message: format!("max_hops {} exceeds limit {}", query.params.max_hops, limit),
                });
            }
        }

        Ok(())
    }

    /// Executes a batch. Results come back in the same order as the queries.
    #[instrument(skip_all, fields(size = request.queries.len()))]
    pub async fn query(&self, request: BatchQueryRequest) -> BatchQueryResult<BatchQueryResponse> {
        self.validate(&request)?;

        let mut unique: Vec<SearchRequest> = Vec::new();
        let mut key_to_index: HashMap<QueryKey, usize> = HashMap::new();
        let mut position_to_unique: Vec<usize> = Vec::with_capacity(request.queries.len());

        for query in request.queries {
            let key = QueryKey::from(&query);
            let unique_index = *key_to_index.entry(key).or_insert_with(|| {
                unique.push(query);
                unique.len() - 1
            });
            position_to_unique.push(unique_index);
        }

        debug!(unique = unique.len(), "running deduplicated batch");

        let futures = unique.into_iter().map(|query| {
            let handler = self.handler.clone();
            async move { handler.query(query).await.map(Arc::new) }
        });
        let unique_results: Vec<Result<Arc<SearchResult>, QueryError>> = join_all(futures).await;

        let results = position_to_unique
            .iter()
            .map(|&idx| BatchQueryItemResult {
                outcome: unique_results[idx].clone(),
            })
            .collect();

        Ok(BatchQueryResponse { results })
    }

    /// Returns (total_queries, unique_queries) for a batch.
    pub fn dedup_stats(&self, request: &BatchQueryRequest) -> (usize, usize) {
        let mut seen: HashMap<QueryKey, ()> = HashMap::new();
        for query in &request.queries {
            seen.entry(QueryKey::from(query)).or_insert(());
        }
        (request.queries.len(), seen.len())
    }
}
