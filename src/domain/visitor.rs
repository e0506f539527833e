//! Visitors applied to nodes through [`Node::accept`].
//!
//! A visitor supplies one handler per node variant. Handlers receive shared
//! references only, so visiting never changes the tree structure.

use tracing::trace;

use crate::domain::arena::TreeArena;
use crate::domain::node::{Node, NodeId};

/// Operation with one handler per node variant.
pub trait NodeVisitor<P> {
    type Output;

    fn visit_decision(&mut self, id: NodeId, node: &Node<P>) -> Self::Output;

    fn visit_leaf(&mut self, id: NodeId, node: &Node<P>) -> Self::Output;
}

/// Mocked depth metric.
///
/// Not a real depth: decision nodes report `(name length mod 5) + 1`, leaves
/// always report `1`. Use [`TreeArena::depth`] for the real subtree height.
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthVisitor;

impl DepthVisitor {
    pub fn new() -> Self {
        Self
    }
}

impl<P> NodeVisitor<P> for DepthVisitor {
    type Output = usize;

    fn visit_decision(&mut self, _id: NodeId, node: &Node<P>) -> usize {
        let mocked_depth = node.name().chars().count() % 5 + 1;
        trace!("mocked depth for decision '{}': {}", node.name(), mocked_depth);
        mocked_depth
    }

    fn visit_leaf(&mut self, _id: NodeId, node: &Node<P>) -> usize {
        trace!("mocked depth for leaf '{}': 1", node.name());
        1
    }
}

/// Leaf counter with an explicit accumulator.
///
/// The count lives in the visitor value, so feeding the same instance to
/// several traversals keeps adding up. Start from [`CountLeavesVisitor::new`]
/// for a fresh count or [`CountLeavesVisitor::resume`] to carry one over.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountLeavesVisitor {
    count: usize,
}

impl CountLeavesVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume(count: usize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<P> NodeVisitor<P> for CountLeavesVisitor {
    type Output = Option<usize>;

    fn visit_decision(&mut self, _id: NodeId, _node: &Node<P>) -> Option<usize> {
        None
    }

    fn visit_leaf(&mut self, _id: NodeId, node: &Node<P>) -> Option<usize> {
        self.count += 1;
        trace!("found leaf '{}', total {}", node.name(), self.count);
        Some(self.count)
    }
}

/// Count the leaves below `start` with an accumulator scoped to this call.
pub fn count_leaves<P>(arena: &TreeArena<P>, start: Option<NodeId>) -> usize {
    let mut visitor = CountLeavesVisitor::new();
    arena.walk(start, &mut visitor);
    visitor.count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_decision_names_when_measuring_depth_then_uses_name_length_mod_five() {
        let mut tree: TreeArena<()> = TreeArena::new();
        let short = tree.insert_decision("A");
        let five = tree.insert_decision("abcde");
        let long = tree.insert_decision("RootDecision");
        let leaf = tree.insert_leaf("a-very-long-leaf-name", None);
        let mut visitor = DepthVisitor::new();

        assert_eq!(tree.dispatch(short, &mut visitor).unwrap(), 2);
        assert_eq!(tree.dispatch(five, &mut visitor).unwrap(), 1);
        assert_eq!(tree.dispatch(long, &mut visitor).unwrap(), 3);
        assert_eq!(tree.dispatch(leaf, &mut visitor).unwrap(), 1);
    }

    #[test]
    fn given_multibyte_name_when_measuring_depth_then_counts_characters() {
        let mut tree: TreeArena<()> = TreeArena::new();
        let node = tree.insert_decision("árvore");

        assert_eq!(tree.dispatch(node, &mut DepthVisitor).unwrap(), 2);
    }

    #[test]
    fn given_counter_when_visiting_then_only_leaves_increment() {
        let mut tree: TreeArena<()> = TreeArena::new();
        let decision = tree.insert_decision("d");
        let leaf = tree.insert_leaf("l", None);
        let mut visitor = CountLeavesVisitor::new();

        assert_eq!(tree.dispatch(decision, &mut visitor).unwrap(), None);
        assert_eq!(tree.dispatch(leaf, &mut visitor).unwrap(), Some(1));
        assert_eq!(tree.dispatch(leaf, &mut visitor).unwrap(), Some(2));
        assert_eq!(visitor.count(), 2);
    }

    #[test]
    fn given_resumed_counter_when_visiting_leaf_then_continues_from_carry() {
        let mut tree: TreeArena<()> = TreeArena::new();
        let leaf = tree.insert_leaf("l", None);
        let mut visitor = CountLeavesVisitor::resume(4);

        assert_eq!(tree.dispatch(leaf, &mut visitor).unwrap(), Some(5));
    }
}
