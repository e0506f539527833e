//! Node variants and the single dispatch seam.

use std::fmt;

use generational_arena::Index;

use crate::domain::visitor::NodeVisitor;

/// Handle of a node inside a [`TreeArena`](crate::domain::TreeArena).
///
/// Handles are generational: once a node is discarded its handle never
/// resolves again, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}v{}", slot, generation)
    }
}

/// Variant-specific part of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<P> {
    /// Composite node; children are kept in insertion order.
    Decision { children: Vec<NodeId> },
    /// Terminal node with an optional opaque payload.
    Leaf { payload: Option<P> },
}

/// Tree node stored in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<P> {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind<P>,
}

impl<P> Node<P> {
    pub fn decision(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: NodeKind::Decision {
                children: Vec::new(),
            },
        }
    }

    pub fn leaf(name: impl Into<String>, payload: Option<P>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: NodeKind::Leaf { payload },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-owning back-reference, maintained by the arena on add/remove.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind<P> {
        &self.kind
    }

    pub fn is_decision(&self) -> bool {
        matches!(self.kind, NodeKind::Decision { .. })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Children in traversal order; always empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Decision { children } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    pub fn payload(&self) -> Option<&P> {
        match &self.kind {
            NodeKind::Leaf { payload } => payload.as_ref(),
            NodeKind::Decision { .. } => None,
        }
    }

    /// Route this node to the visitor handler matching its variant.
    ///
    /// This is the only place that branches on the node kind on behalf of
    /// visitors; traversal and visitor code rely on it.
    pub fn accept<V>(&self, id: NodeId, visitor: &mut V) -> V::Output
    where
        V: NodeVisitor<P> + ?Sized,
    {
        match self.kind {
            NodeKind::Decision { .. } => visitor.visit_decision(id, self),
            NodeKind::Leaf { .. } => visitor.visit_leaf(id, self),
        }
    }
}

impl<P> fmt::Display for Node<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Decision { .. } => write!(f, "<DecisionNode '{}'>", self.name),
            NodeKind::Leaf { .. } => write!(f, "<LeafNode '{}'>", self.name),
        }
    }
}

/// Description of a leaf to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafSpec<P> {
    pub name: String,
    pub payload: Option<P>,
}

impl<P> LeafSpec<P> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    pub fn with_payload(name: impl Into<String>, payload: P) -> Self {
        Self {
            name: name.into(),
            payload: Some(payload),
        }
    }
}

/// Description of a node to be created, as returned by growth policies.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec<P> {
    Decision { name: String },
    Leaf(LeafSpec<P>),
}

impl<P> NodeSpec<P> {
    pub fn decision(name: impl Into<String>) -> Self {
        Self::Decision { name: name.into() }
    }

    pub fn leaf(name: impl Into<String>) -> Self {
        Self::Leaf(LeafSpec::new(name))
    }

    pub(crate) fn into_node(self) -> Node<P> {
        match self {
            NodeSpec::Decision { name } => Node::decision(name),
            NodeSpec::Leaf(LeafSpec { name, payload }) => Node::leaf(name, payload),
        }
    }
}

impl<P> From<LeafSpec<P>> for NodeSpec<P> {
    fn from(spec: LeafSpec<P>) -> Self {
        NodeSpec::Leaf(spec)
    }
}
