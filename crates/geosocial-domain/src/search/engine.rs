//! Community search orchestration: build, prune, partition.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::error::{DomainError, DomainResult};

use super::builder::TreeBuilder;
use super::config::SearchConfig;
use super::context::QueryContext;
use super::partition::partition;
use super::policy::{strategy_for, SatisfactionPolicy};
use super::pruner::prune_in_place;
use super::scoring::ScoringEngine;
use super::traits::GraphAccess;
use super::types::{SearchRequest, SearchResult};

/// Bounded-hop community search over a graph.
///
/// Every call builds its own tree and visited set, so one instance can serve
/// concurrent queries.
pub struct CommunitySearch<G> {
    graph: Arc<G>,
    config: SearchConfig,
}

impl<G> CommunitySearch<G>
where
    G: GraphAccess,
{
    /// Creates a new engine with the default configuration.
    pub fn new(graph: Arc<G>) -> Self {
        Self::with_config(graph, SearchConfig::default())
    }

    /// Creates a new engine with custom configuration.
    pub fn with_config(graph: Arc<G>, config: SearchConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn graph(&self) -> &Arc<G> {
        &self.graph
    }

    /// Runs a query with the policy of its mode.
    #[instrument(skip(self, request), fields(user = %request.user, mode = request.params.mode.name()))]
    pub fn search(&self, request: &SearchRequest) -> DomainResult<SearchResult> {
        let (scoring, policy) = strategy_for(&request.params.mode);
        self.search_with(request, scoring, policy.as_ref())
    }

    /// Runs a query with a caller-supplied scoring engine and policy.
    pub fn search_with<P>(
        &self,
        request: &SearchRequest,
        scoring: ScoringEngine,
        policy: &P,
    ) -> DomainResult<SearchResult>
    where
        P: SatisfactionPolicy + ?Sized,
    {
        self.validate_request(request)?;

        let context = QueryContext::resolve(self.graph.as_ref(), &request.user, &request.params)?;
        let mut tree = TreeBuilder::new(
            self.graph.as_ref(),
            &context,
            scoring,
            policy,
            self.config.visit_policy,
        )
        .build()?;

        let visited = tree.len();
        let pruned = prune_in_place(&mut tree);
        let partition = partition(&tree);

        debug!(visited, pruned, "tree built and pruned");
        info!(
            result_users = partition.result_users.len(),
            pass_users = partition.pass_users.len(),
            "community search complete"
        );

        Ok(SearchResult {
            tree,
            partition,
            visited,
            pruned,
        })
    }

    fn validate_request(&self, request: &SearchRequest) -> DomainResult<()> {
        request.params.validate()?;
        if request.params.max_hops > self.config.max_hops_limit {
            return Err(DomainError::invalid_parameter(
                "max_hops",
                format!(
                    "{} exceeds the configured limit of {}",
                    request.params.max_hops, self.config.max_hops_limit
                ),
            ));
        }
        Ok(())
    }
}
