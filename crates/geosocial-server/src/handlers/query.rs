//! Single query handler.

use std::sync::Arc;

use geosocial_domain::{CommunitySearch, DomainError, GraphAccess, SearchRequest, SearchResult};
use tracing::{debug, instrument};

/// Errors returned by the query handlers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// The search itself failed (bad parameters, unknown user, backend error).
    #[error("search failed: {0}")]
    Search(#[from] DomainError),

    /// The blocking task panicked or was cancelled.
    #[error("query task failed: {message}")]
    TaskFailed { message: String },
}

/// Result type for query handler operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Runs community searches off the async executor.
pub struct QueryHandler<G> {
    engine: Arc<CommunitySearch<G>>,
}

impl<G> Clone for QueryHandler<G> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<G> QueryHandler<G>
where
    G: GraphAccess + 'static,
{
    pub fn new(engine: Arc<CommunitySearch<G>>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<CommunitySearch<G>> {
        &self.engine
    }

    /// Executes one query on the blocking pool.
    #[instrument(skip(self, request), fields(user = %request.user))]
    pub async fn query(&self, request: SearchRequest) -> QueryResult<SearchResult> {
        let engine = Arc::clone(&self.engine);
        let result = tokio::task::spawn_blocking(move || engine.search(&request))
            .await
            .map_err(|e| QueryError::TaskFailed {
                message: e.to_string(),
            })??;

        debug!(
            result_users = result.partition.result_users.len(),
            pass_users = result.partition.pass_users.len(),
            "query handled"
        );
        Ok(result)
    }
}
