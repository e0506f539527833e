//! Visitor reports over a built tree.

use crate::domain::{CountLeavesVisitor, DepthVisitor, Node, NodeId, NodeVisitor, TreeArena};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub id: NodeId,
    pub name: String,
    pub kind: &'static str,
    /// Mocked depth from [`DepthVisitor`]
    pub mocked_depth: usize,
    /// Running leaf count, set on leaves only
    pub leaves_so_far: Option<usize>,
}

/// One pre-order pass feeding each node to both reference visitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeReport {
    pub entries: Vec<ReportEntry>,
    pub leaf_count: usize,
    /// Real height of the tree
    pub height: usize,
}

impl TreeReport {
    pub fn collect<P>(tree: &TreeArena<P>, root: NodeId) -> Self {
        let mut depth = DepthVisitor::new();
        let mut leaves = CountLeavesVisitor::new();

        let entries = tree
            .pre_order(Some(root))
            .map(|(id, node)| ReportEntry {
                id,
                name: node.name().to_string(),
                kind: node.accept(id, &mut KindLabel),
                mocked_depth: node.accept(id, &mut depth),
                leaves_so_far: node.accept(id, &mut leaves),
            })
            .collect();

        Self {
            entries,
            leaf_count: leaves.count(),
            height: tree.depth(root),
        }
    }
}

/// Kind label for report entries.
struct KindLabel;

impl<P> NodeVisitor<P> for KindLabel {
    type Output = &'static str;

    fn visit_decision(&mut self, _id: NodeId, _node: &Node<P>) -> &'static str {
        "decision"
    }

    fn visit_leaf(&mut self, _id: NodeId, _node: &Node<P>) -> &'static str {
        "leaf"
    }
}
