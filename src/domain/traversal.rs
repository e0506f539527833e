//! Stack-based pre-order traversal.

use std::iter::FusedIterator;

use crate::domain::arena::TreeArena;
use crate::domain::node::{Node, NodeId};

/// Pre-order iterator: a node first, then each child's subtree left to right.
///
/// Single pass; once exhausted, ask the arena for a new one.
pub struct PreOrder<'a, P> {
    arena: &'a TreeArena<P>,
    stack: Vec<NodeId>,
}

impl<'a, P> PreOrder<'a, P> {
    pub(crate) fn new(arena: &'a TreeArena<P>, start: Option<NodeId>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = start {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a, P> Iterator for PreOrder<'a, P> {
    type Item = (NodeId, &'a Node<P>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children().iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

impl<P> FusedIterator for PreOrder<'_, P> {}

#[cfg(test)]
mod tests {
    use crate::domain::arena::TreeArena;

    #[test]
    fn given_no_start_when_traversing_then_empty() {
        let tree: TreeArena<()> = TreeArena::new();
        assert_eq!(tree.pre_order(None).count(), 0);
    }

    #[test]
    fn given_single_node_when_traversing_then_yields_it_once() {
        let mut tree: TreeArena<()> = TreeArena::new();
        let leaf = tree.insert_leaf("only", None);

        let ids: Vec<_> = tree.pre_order(Some(leaf)).map(|(id, _)| id).collect();

        assert_eq!(ids, vec![leaf]);
    }

    #[test]
    fn given_exhausted_iterator_when_polled_again_then_stays_empty() {
        let mut tree: TreeArena<()> = TreeArena::new();
        let root = tree.insert_decision("root");
        let leaf = tree.insert_leaf("leaf", None);
        tree.add(root, leaf).unwrap();

        let mut iter = tree.pre_order(Some(root));
        assert_eq!(iter.by_ref().count(), 2);
        assert!(iter.next().is_none());
        assert_eq!(tree.pre_order(Some(root)).count(), 2);
    }

    #[test]
    fn given_subtree_start_when_traversing_then_stays_inside_subtree() {
        let mut tree: TreeArena<()> = TreeArena::new();
        let root = tree.insert_decision("root");
        let a = tree.insert_decision("A");
        let b = tree.insert_leaf("B", None);
        let c = tree.insert_leaf("C", None);
        tree.add(root, a).unwrap();
        tree.add(root, b).unwrap();
        tree.add(a, c).unwrap();

        let names: Vec<_> = tree.pre_order(Some(a)).map(|(_, n)| n.name()).collect();

        assert_eq!(names, vec!["A", "C"]);
    }
}
