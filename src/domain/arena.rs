//! Node store: attach, detach and query decision/leaf trees by handle.

use generational_arena::Arena;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Node, NodeId, NodeKind, NodeSpec};
use crate::domain::traversal::PreOrder;
use crate::domain::visitor::NodeVisitor;

/// Arena-based store for decision/leaf trees.
///
/// The arena owns every node; parent/child edges are [`NodeId`] handles.
/// Several detached subtrees may live in one arena at the same time, a node
/// becomes part of a tree only once it is attached with [`TreeArena::add`].
#[derive(Debug, Clone)]
pub struct TreeArena<P = ()> {
    arena: Arena<Node<P>>,
}

impl<P> Default for TreeArena<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> TreeArena<P> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Create a detached decision node.
    pub fn insert_decision(&mut self, name: impl Into<String>) -> NodeId {
        NodeId(self.arena.insert(Node::decision(name)))
    }

    /// Create a detached leaf node.
    pub fn insert_leaf(&mut self, name: impl Into<String>, payload: Option<P>) -> NodeId {
        NodeId(self.arena.insert(Node::leaf(name, payload)))
    }

    /// Create a detached node from a spec.
    pub fn insert(&mut self, spec: NodeSpec<P>) -> NodeId {
        NodeId(self.arena.insert(spec.into_node()))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<P>> {
        self.arena.get(id.0)
    }

    /// Checked lookup; fails with [`DomainError::StaleNode`].
    pub fn node(&self, id: NodeId) -> DomainResult<&Node<P>> {
        self.get(id).ok_or(DomainError::StaleNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomainResult<&mut Node<P>> {
        self.arena.get_mut(id.0).ok_or(DomainError::StaleNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    fn name_of(&self, id: NodeId) -> String {
        self.get(id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// A child that is already attached somewhere is detached first, so a
    /// node is never held by two parents. Re-adding a node to its current
    /// parent therefore moves it to the last position.
    ///
    /// The cycle check walks the parent chain of `parent`, so one attach costs
    /// O(depth of `parent`). Growing a chain downwards is quadratic overall;
    /// attaching existing subtrees under fresh nodes is not.
    #[instrument(level = "trace", skip(self))]
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if !parent_node.is_decision() {
            return Err(DomainError::NotComposite(parent_node.name.clone()));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DomainError::CycleDetected {
                node: self.name_of(child),
                parent: self.name_of(parent),
            });
        }

        self.detach(child)?;

        if let NodeKind::Decision { children } = &mut self.node_mut(parent)?.kind {
            children.push(child);
        }
        self.node_mut(child)?.parent = Some(parent);
        debug!(
            "attached '{}' under '{}'",
            self.name_of(child),
            self.name_of(parent)
        );
        Ok(())
    }

    /// Remove the first occurrence of `child` from `parent`'s children.
    ///
    /// The removed node stays in the arena, detached.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> DomainResult<()> {
        self.node(child)?;
        let position = self
            .node(parent)?
            .children()
            .iter()
            .position(|&c| c == child);

        let Some(position) = position else {
            return Err(DomainError::NodeNotFound {
                child: self.name_of(child),
                parent: self.name_of(parent),
            });
        };

        if let NodeKind::Decision { children } = &mut self.node_mut(parent)?.kind {
            children.remove(position);
        }
        self.node_mut(child)?.parent = None;
        debug!(
            "removed '{}' from '{}'",
            self.name_of(child),
            self.name_of(parent)
        );
        Ok(())
    }

    /// Detach `id` from its parent, if it has one. Returns the former parent.
    pub fn detach(&mut self, id: NodeId) -> DomainResult<Option<NodeId>> {
        match self.node(id)?.parent {
            Some(parent) => {
                self.remove(parent, id)?;
                Ok(Some(parent))
            }
            None => Ok(None),
        }
    }

    /// Detach `id` and free it together with its whole subtree.
    ///
    /// Returns the number of nodes freed. Handles into the freed subtree
    /// become stale.
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, id: NodeId) -> DomainResult<usize> {
        self.detach(id)?;
        let doomed: Vec<NodeId> = self.pre_order(Some(id)).map(|(i, _)| i).collect();
        for &node in &doomed {
            self.arena.remove(node.0);
        }
        debug!("discarded {} node(s) rooted at {}", doomed.len(), id);
        Ok(doomed.len())
    }

    /// True if `ancestor` lies on the parent chain of `node` (excluding `node`).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent_of(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// True if `node` is `root` itself or lies in `root`'s subtree.
    pub fn is_reachable(&self, root: NodeId, node: NodeId) -> bool {
        self.contains(node) && (root == node || self.is_ancestor(root, node))
    }

    /// First child of `parent` carrying `name`.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children_of(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.name == name))
    }

    /// Resolve a slash-separated name path such as `root/A/C`.
    ///
    /// The first segment must name `root`; every further segment picks the
    /// first child with that name.
    pub fn resolve_path(&self, root: NodeId, path: &str) -> Option<NodeId> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        if self.get(root)?.name != first {
            return None;
        }
        segments.try_fold(root, |current, name| self.find_child(current, name))
    }

    /// Lazy pre-order traversal starting at `start`.
    pub fn pre_order(&self, start: Option<NodeId>) -> PreOrder<'_, P> {
        PreOrder::new(self, start)
    }

    /// Route the node `id` to `visitor`.
    pub fn dispatch<V>(&self, id: NodeId, visitor: &mut V) -> DomainResult<V::Output>
    where
        V: NodeVisitor<P> + ?Sized,
    {
        Ok(self.node(id)?.accept(id, visitor))
    }

    /// Visit every node of the subtree at `start` in pre-order.
    pub fn walk<V>(&self, start: Option<NodeId>, visitor: &mut V) -> Vec<(NodeId, V::Output)>
    where
        V: NodeVisitor<P> + ?Sized,
    {
        self.pre_order(start)
            .map(|(id, node)| (id, node.accept(id, &mut *visitor)))
            .collect()
    }

    /// Height of the subtree rooted at `id`, counting `id` itself.
    ///
    /// Stale ids have height 0.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, id: NodeId) -> usize {
        let mut height = 0;
        let mut stack = vec![(id, 1)];
        while let Some((current, level)) = stack.pop() {
            if let Some(node) = self.get(current) {
                height = height.max(level);
                stack.extend(node.children().iter().map(|&child| (child, level + 1)));
            }
        }
        height
    }

    /// Leaf nodes of the subtree rooted at `id`, in pre-order.
    pub fn leaf_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.pre_order(Some(id))
            .filter(|(_, node)| node.is_leaf())
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (TreeArena<()>, NodeId, NodeId, NodeId) {
        let mut tree = TreeArena::new();
        let root = tree.insert_decision("root");
        let a = tree.insert_decision("A");
        let b = tree.insert_leaf("B", None);
        tree.add(root, a).unwrap();
        tree.add(root, b).unwrap();
        (tree, root, a, b)
    }

    #[test]
    fn given_detached_nodes_when_inserted_then_no_edges_exist() {
        let mut tree: TreeArena<()> = TreeArena::new();
        let root = tree.insert_decision("root");
        let leaf = tree.insert_leaf("leaf", None);

        assert_eq!(tree.len(), 2);
        assert!(tree.children_of(root).is_empty());
        assert_eq!(tree.parent_of(leaf), None);
    }

    #[test]
    fn given_child_when_added_then_parent_backref_is_set() {
        let (tree, root, a, b) = sample();
        assert_eq!(tree.children_of(root), &[a, b]);
        assert_eq!(tree.parent_of(a), Some(root));
        assert_eq!(tree.parent_of(b), Some(root));
    }

    #[test]
    fn given_attached_child_when_added_elsewhere_then_reparents() {
        let (mut tree, root, a, b) = sample();

        tree.add(a, b).unwrap();

        assert_eq!(tree.children_of(root), &[a]);
        assert_eq!(tree.children_of(a), &[b]);
        assert_eq!(tree.parent_of(b), Some(a));
    }

    #[test]
    fn given_existing_child_when_added_again_then_moves_to_end_without_duplicate() {
        let (mut tree, root, a, b) = sample();

        tree.add(root, a).unwrap();

        assert_eq!(tree.children_of(root), &[b, a]);
    }

    #[test]
    fn given_leaf_parent_when_adding_then_not_composite() {
        let (mut tree, _, a, b) = sample();
        let err = tree.add(b, a).unwrap_err();
        assert_eq!(err, DomainError::NotComposite("B".to_string()));
    }

    #[test]
    fn given_ancestor_when_added_below_descendant_then_cycle_detected() {
        let (mut tree, root, a, _) = sample();

        assert!(matches!(
            tree.add(a, root),
            Err(DomainError::CycleDetected { .. })
        ));
        assert!(matches!(
            tree.add(a, a),
            Err(DomainError::CycleDetected { .. })
        ));
        assert_eq!(tree.parent_of(a), Some(root));
    }

    #[test]
    fn given_non_child_when_removed_then_node_not_found() {
        let (mut tree, _, a, b) = sample();
        let err = tree.remove(a, b).unwrap_err();
        assert_eq!(
            err,
            DomainError::NodeNotFound {
                child: "B".to_string(),
                parent: "A".to_string()
            }
        );
    }

    #[test]
    fn given_subtree_when_discarded_then_handles_become_stale() {
        let (mut tree, root, a, b) = sample();
        let c = tree.insert_leaf("C", None);
        tree.add(a, c).unwrap();

        let freed = tree.discard(a).unwrap();

        assert_eq!(freed, 2);
        assert_eq!(tree.children_of(root), &[b]);
        assert_eq!(tree.node(c).unwrap_err(), DomainError::StaleNode(c));
        assert_eq!(tree.add(root, a).unwrap_err(), DomainError::StaleNode(a));
    }

    #[test]
    fn given_tree_when_checking_reachability_then_follows_parent_chain() {
        let (mut tree, root, a, b) = sample();
        let orphan = tree.insert_decision("orphan");

        assert!(tree.is_reachable(root, root));
        assert!(tree.is_reachable(root, b));
        assert!(!tree.is_reachable(root, orphan));
        assert!(!tree.is_reachable(a, b));
    }

    #[test]
    fn given_path_when_resolving_then_matches_first_child_by_name() {
        let (mut tree, root, a, _) = sample();
        let c = tree.insert_leaf("C", None);
        tree.add(a, c).unwrap();

        assert_eq!(tree.resolve_path(root, "root"), Some(root));
        assert_eq!(tree.resolve_path(root, "root/A/C"), Some(c));
        assert_eq!(tree.resolve_path(root, "root/X"), None);
        assert_eq!(tree.resolve_path(root, "other/A"), None);
    }

    #[test]
    fn given_tree_when_measuring_then_depth_and_leaves_match() {
        let (mut tree, root, a, b) = sample();
        let c = tree.insert_leaf("C", None);
        tree.add(a, c).unwrap();

        assert_eq!(tree.depth(root), 3);
        assert_eq!(tree.leaf_ids(root), vec![c, b]);
    }
}
