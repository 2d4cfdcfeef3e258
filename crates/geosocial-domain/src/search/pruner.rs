//! Collapses unsatisfying dead branches.

use super::tree::VisitTree;

/// Removes every unsatisfying leaf, bottom-up, and returns how many nodes
/// were removed.
///
/// Children are handled before their parent, so a chain of unsatisfying
/// users ending in a dead leaf disappears in a single pass while users that
/// connect the root to a satisfying descendant stay. The root is never
/// removed. Applying it twice removes nothing the second time.
pub fn prune_in_place(tree: &mut VisitTree) -> usize {
    let mut removed = 0;
    for id in tree.post_order() {
        removed += tree.remove_children_where(id, |child| !child.satisfy && !child.has_children());
    }
    removed
}

/// Owned variant of [`prune_in_place`].
pub fn prune(mut tree: VisitTree) -> VisitTree {
    prune_in_place(&mut tree);
    tree
}
