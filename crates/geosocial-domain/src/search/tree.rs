//! Visit tree backed by a petgraph `StableGraph`.
//!
//! Edges point from parent to child. Pruning removes nodes from the graph;
//! `StableGraph` keeps the remaining [`NodeId`]s valid, so ids handed out
//! while building stay usable afterwards. Walks use petgraph's iterative
//! `Dfs`/`DfsPostOrder` from the root and never recurse.

use std::collections::BTreeMap;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{Dfs, DfsPostOrder};
use petgraph::Direction;

use crate::model::UserId;

use super::scoring::Scores;
use super::types::VisitRecord;

/// Index of a node in a [`VisitTree`].
pub type NodeId = NodeIndex;

/// One visited user.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitNode {
    pub user: UserId,
    /// Hop count or accumulated edge weight, depending on the query mode.
    pub distance_from_root: f64,
    pub hop_depth: u32,
    pub scores: Scores,
    pub satisfy: bool,
    children: BTreeMap<UserId, NodeId>,
}

impl VisitNode {
    pub fn new(
        user: UserId,
        distance_from_root: f64,
        hop_depth: u32,
        scores: Scores,
        satisfy: bool,
    ) -> Self {
        Self {
            user,
            distance_from_root,
            hop_depth,
            scores,
            satisfy,
            children: BTreeMap::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Child nodes keyed by user.
    pub fn children(&self) -> &BTreeMap<UserId, NodeId> {
        &self.children
    }
}

/// Tree of visit records rooted at the query user.
#[derive(Debug, Clone)]
pub struct VisitTree {
    graph: StableGraph<VisitNode, ()>,
    root: NodeId,
}

impl VisitTree {
    pub(crate) fn with_root(root: VisitNode) -> Self {
        let mut graph = StableGraph::new();
        let root = graph.add_node(root);
        Self { graph, root }
    }

    /// The root node (the query user).
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node by id. Panics on an id removed by pruning, like slice indexing.
    pub fn node(&self, id: NodeId) -> &VisitNode {
        &self.graph[id]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.graph
            .neighbors_directed(id, Direction::Incoming)
            .next()
    }

    /// Links `node` under `parent`, keyed by the node's user.
    ///
    /// Callers guarantee `parent` has no child for that user yet.
    pub(crate) fn attach(&mut self, parent: NodeId, node: VisitNode) -> NodeId {
        let user = node.user.clone();
        let id = self.graph.add_node(node);
        self.graph.add_edge(parent, id, ());
        self.graph[parent].children.insert(user, id);
        id
    }

    pub(crate) fn has_child(&self, parent: NodeId, user: &UserId) -> bool {
        self.graph[parent].children.contains_key(user)
    }

    /// Removes every child of `id` matching `remove`, together with its
    /// subtree. Returns the number of nodes removed.
    pub(crate) fn remove_children_where<F>(&mut self, id: NodeId, remove: F) -> usize
    where
        F: Fn(&VisitNode) -> bool,
    {
        let doomed: Vec<(UserId, NodeId)> = self.graph[id]
            .children
            .iter()
            .filter(|(_, child)| remove(&self.graph[**child]))
            .map(|(user, child)| (user.clone(), *child))
            .collect();

        let mut removed = 0;
        for (user, child) in doomed {
            self.graph[id].children.remove(&user);
            for node in self.subtree_post_order(child) {
                self.graph.remove_node(node);
                removed += 1;
            }
        }
        removed
    }

    fn subtree_post_order(&self, start: NodeId) -> Vec<NodeId> {
        let mut walk = DfsPostOrder::new(&self.graph, start);
        let mut order = Vec::new();
        while let Some(id) = walk.next(&self.graph) {
            order.push(id);
        }
        order
    }

    /// Nodes, parents before children. Siblings come in visit order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut walk = Dfs::new(&self.graph, self.root);
        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(id) = walk.next(&self.graph) {
            order.push(id);
        }
        order
    }

    /// Nodes, children before parents.
    pub fn post_order(&self) -> Vec<NodeId> {
        self.subtree_post_order(self.root)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Always false: the root is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// First node for `user`, in pre-order.
    pub fn find(&self, user: &UserId) -> Option<NodeId> {
        self.pre_order()
            .into_iter()
            .find(|id| &self.graph[*id].user == user)
    }

    /// Users from the root down to `id`.
    pub fn path_to(&self, id: NodeId) -> Vec<&UserId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            path.push(&self.graph[node].user);
            current = self.parent(node);
        }
        path.reverse();
        path
    }

    /// Nested, serializable form of the tree.
    pub fn to_record(&self) -> VisitRecord {
        let mut built: BTreeMap<NodeId, VisitRecord> = BTreeMap::new();

        for id in self.post_order() {
            let node = &self.graph[id];
            let children = node
                .children
                .iter()
                .filter_map(|(user, child)| built.remove(child).map(|rec| (user.clone(), rec)))
                .collect();
            built.insert(id, VisitRecord::from_node(node, children));
        }

        built
            .remove(&self.root)
            .unwrap_or_else(|| VisitRecord::from_node(&self.graph[self.root], BTreeMap::new()))
    }
}
