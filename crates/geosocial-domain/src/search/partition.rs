//! Splits a pruned tree into result and pass users.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::UserId;

use super::tree::VisitTree;

/// Satisfying users and the unsatisfying users kept as connectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub result_users: BTreeSet<UserId>,
    pub pass_users: BTreeSet<UserId>,
}

impl Partition {
    pub fn contains(&self, user: &UserId) -> bool {
        self.result_users.contains(user) || self.pass_users.contains(user)
    }

    /// Total number of users in both sets.
    pub fn len(&self) -> usize {
        self.result_users.len() + self.pass_users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.result_users.is_empty() && self.pass_users.is_empty()
    }
}

/// Walks the tree bottom-up and files each user by its `satisfy` flag.
///
/// The root is filed like any other node. When a user occurs on several
/// branches and satisfies on at least one, it is a result user only.
pub fn partition(tree: &VisitTree) -> Partition {
    let mut result = Partition::default();
    for id in tree.post_order() {
        let node = tree.node(id);
        if node.satisfy {
            result.result_users.insert(node.user.clone());
        } else {
            result.pass_users.insert(node.user.clone());
        }
    }

    let Partition {
        result_users,
        pass_users,
    } = &mut result;
    pass_users.retain(|user| !result_users.contains(user));
    result
}
