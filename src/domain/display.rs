//! Text rendering of a subtree with `termtree`.

use std::collections::HashMap;
use std::fmt;

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::TreeArena;
use crate::domain::node::{Node, NodeId};
use crate::domain::visitor::NodeVisitor;

pub trait TreeRender {
    fn to_tree_string(&self, root: NodeId) -> Tree<String>;
}

impl<P: fmt::Display> TreeRender for TreeArena<P> {
    /// Children are built before their parents (reverse pre-order), so the
    /// render never recurses on tree depth.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: NodeId) -> Tree<String> {
        let order: Vec<_> = self.pre_order(Some(root)).collect();
        let mut built: HashMap<NodeId, Tree<String>> = HashMap::with_capacity(order.len());

        for &(id, node) in order.iter().rev() {
            let leaves: Vec<_> = node
                .children()
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(id, Tree::new(label(id, node)).with_leaves(leaves));
        }

        built
            .remove(&root)
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

fn label<P: fmt::Display>(id: NodeId, node: &Node<P>) -> String {
    node.accept(id, &mut Label)
}

struct Label;

impl<P: fmt::Display> NodeVisitor<P> for Label {
    type Output = String;

    fn visit_decision(&mut self, _id: NodeId, node: &Node<P>) -> String {
        node.name().to_string()
    }

    fn visit_leaf(&mut self, _id: NodeId, node: &Node<P>) -> String {
        match node.payload() {
            Some(payload) => format!("{} [leaf: {}]", node.name(), payload),
            None => format!("{} [leaf]", node.name()),
        }
    }
}
