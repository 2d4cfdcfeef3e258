//! Hop-bounded tree construction.
//!
//! Visits happen in the same depth-first pre-order as a recursive walk, but
//! an explicit stack of frames drives them. Each frame holds the node's
//! outgoing edges and a cursor into them, so a user reached later in a
//! sibling subtree is still seen as visited by the global policy.

use std::collections::BTreeSet;

use tracing::trace;

use crate::error::DomainResult;
use crate::model::{KeywordId, Relationship, UserId};

use super::config::VisitPolicy;
use super::context::{QueryContext, TraversalState};
use super::policy::SatisfactionPolicy;
use super::scoring::{windows_match, ScoringEngine};
use super::traits::GraphAccess;
use super::tree::{NodeId, VisitNode, VisitTree};

/// Pending neighbors of one node on the traversal stack.
struct Frame {
    node: NodeId,
    edges: Vec<Relationship>,
    next: usize,
}

/// Builds the visit tree of one query.
pub struct TreeBuilder<'a, G: ?Sized, P: ?Sized> {
    graph: &'a G,
    context: &'a QueryContext,
    scoring: ScoringEngine,
    policy: &'a P,
    visit_policy: VisitPolicy,
}

impl<'a, G, P> TreeBuilder<'a, G, P>
where
    G: GraphAccess + ?Sized,
    P: SatisfactionPolicy + ?Sized,
{
    pub fn new(
        graph: &'a G,
        context: &'a QueryContext,
        scoring: ScoringEngine,
        policy: &'a P,
        visit_policy: VisitPolicy,
    ) -> Self {
        Self {
            graph,
            context,
            scoring,
            policy,
            visit_policy,
        }
    }

    /// Traverses from the query user down to `max_hops`.
    ///
    /// Fails on the first user the graph cannot resolve.
    pub fn build(&self) -> DomainResult<VisitTree> {
        let mut state = TraversalState::new(self.visit_policy);
        let root_user = &self.context.query_user;

        state.enter(root_user);
        let (root, edges) = self.visit(root_user, 0, 0.0)?;
        let mut tree = VisitTree::with_root(root);
        let mut stack = vec![Frame {
            node: tree.root(),
            edges,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(edge) = frame.edges.get(frame.next).cloned() else {
                if let Some(done) = stack.pop() {
                    state.leave(&tree.node(done.node).user);
                }
                continue;
            };
            frame.next += 1;
            let parent = frame.node;

            if state.is_visited(&edge.to) || tree.has_child(parent, &edge.to) {
                continue;
            }

            let (hop_depth, distance) = {
                let parent_node = tree.node(parent);
                (
                    parent_node.hop_depth + 1,
                    parent_node.distance_from_root + self.policy.step_distance(edge.weight),
                )
            };

            state.enter(&edge.to);
            let (child, edges) = self.visit(&edge.to, hop_depth, distance)?;
            let child = tree.attach(parent, child);
            stack.push(Frame {
                node: child,
                edges,
                next: 0,
            });
        }

        Ok(tree)
    }

    /// Scores one user. Returns its node and the edges still to explore.
    fn visit(
        &self,
        user: &UserId,
        hop_depth: u32,
        distance: f64,
    ) -> DomainResult<(VisitNode, Vec<Relationship>)> {
        let keywords = self.graph.keywords(user)?;
        let edges = self.graph.relationships(user)?;
        let neighbors: BTreeSet<UserId> = edges.iter().map(|rel| rel.to.clone()).collect();

        let common_keywords = self.common_keywords(user, &keywords)?;
        let scores = self.scoring.score(
            &keywords,
            &self.context.query_keywords,
            &neighbors,
            &self.context.query_neighbors,
            common_keywords,
        );
        let satisfy = self.policy.satisfies(&scores, distance);

        trace!(
            user = %user,
            hop_depth,
            distance,
            degree_of_similarity = scores.degree_of_similarity,
            satisfy,
            "visited user"
        );

        let node = VisitNode::new(user.clone(), distance, hop_depth, scores, satisfy);
        if hop_depth >= self.context.params.max_hops {
            return Ok((node, Vec::new()));
        }
        Ok((node, edges))
    }

    /// Shared keywords, filtered by time overlap when the query asks for it.
    fn common_keywords(
        &self,
        user: &UserId,
        keywords: &BTreeSet<KeywordId>,
    ) -> DomainResult<usize> {
        let shared = keywords.intersection(&self.context.query_keywords);

        let Some(fraction) = self.context.params.time_overlap else {
            return Ok(shared.count());
        };

        let mut count = 0;
        for keyword in shared {
            let Some(query_window) = self.context.query_windows.get(keyword) else {
                continue;
            };
            if let Some(window) = self.graph.keyword_time_window(user, keyword)? {
                if windows_match(query_window, &window, fraction) {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}
