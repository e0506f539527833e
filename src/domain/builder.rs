//! Tree builder state machine: split, stop and prune against a target node.

use std::fmt;
use std::str::FromStr;

use tracing::{info, instrument, warn};

use crate::domain::arena::TreeArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{LeafSpec, Node, NodeId, NodeSpec};

/// Active mutation policy of a [`TreeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildMode {
    #[default]
    Splitting,
    Stopping,
    Pruning,
}

impl BuildMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Splitting => "splitting",
            BuildMode::Stopping => "stopping",
            BuildMode::Pruning => "pruning",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "splitting" => Ok(BuildMode::Splitting),
            "stopping" => Ok(BuildMode::Stopping),
            "pruning" => Ok(BuildMode::Pruning),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}

/// What a single [`TreeBuilder::run`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Split { target: NodeId, added: Vec<NodeId> },
    Stopped { target: NodeId, leaf: NodeId },
    /// `removed` is stale once reported; its subtree has been freed.
    Pruned {
        target: NodeId,
        removed: Option<NodeId>,
        freed: usize,
    },
}

impl BuildOutcome {
    pub fn target(&self) -> NodeId {
        match self {
            BuildOutcome::Split { target, .. }
            | BuildOutcome::Stopped { target, .. }
            | BuildOutcome::Pruned { target, .. } => *target,
        }
    }
}

/// Hook points deciding what each build mode creates or removes.
///
/// `split` and `stop` only see the target; the builder attaches whatever
/// they return. `prune` picks the child to drop; the builder detaches and
/// frees its subtree. `None` leaves the target untouched.
pub trait GrowthPolicy<P> {
    fn split(&mut self, target: &Node<P>) -> Vec<NodeSpec<P>>;

    fn stop(&mut self, target: &Node<P>) -> LeafSpec<P>;

    fn prune(&mut self, target: &Node<P>) -> Option<NodeId> {
        target.children().last().copied()
    }
}

/// Default policy: placeholder children named after the target.
///
/// Split opens one decision and one leaf, stop closes with one leaf, prune
/// drops the most recently added child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPolicy {
    pub split_decision_prefix: String,
    pub split_leaf_prefix: String,
    pub stop_leaf_prefix: String,
}

impl Default for PlaceholderPolicy {
    fn default() -> Self {
        Self {
            split_decision_prefix: "split_left_of_".into(),
            split_leaf_prefix: "split_right_of_".into(),
            stop_leaf_prefix: "stopped_leaf_of_".into(),
        }
    }
}

impl<P> GrowthPolicy<P> for PlaceholderPolicy {
    fn split(&mut self, target: &Node<P>) -> Vec<NodeSpec<P>> {
        vec![
            NodeSpec::decision(format!("{}{}", self.split_decision_prefix, target.name())),
            NodeSpec::leaf(format!("{}{}", self.split_leaf_prefix, target.name())),
        ]
    }

    fn stop(&mut self, target: &Node<P>) -> LeafSpec<P> {
        LeafSpec::new(format!("{}{}", self.stop_leaf_prefix, target.name()))
    }
}

/// Owns a tree and mutates it through the active [`BuildMode`].
pub struct TreeBuilder<P = ()> {
    name: String,
    tree: TreeArena<P>,
    root: NodeId,
    current_target: Option<NodeId>,
    mode: BuildMode,
    policy: Box<dyn GrowthPolicy<P>>,
    strict_targets: bool,
}

impl<P> fmt::Debug for TreeBuilder<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("current_target", &self.current_target)
            .field("mode", &self.mode)
            .field("strict_targets", &self.strict_targets)
            .finish_non_exhaustive()
    }
}

impl<P> TreeBuilder<P> {
    /// Builder over a fresh tree whose root is a decision node named `root`.
    pub fn new(name: impl Into<String>) -> Self {
        let mut tree = TreeArena::new();
        let root = tree.insert_decision("root");
        Self::assemble(name.into(), tree, root)
    }

    /// Builder over a pre-built tree. `root` must be a live decision node.
    pub fn with_root(
        name: impl Into<String>,
        tree: TreeArena<P>,
        root: NodeId,
    ) -> DomainResult<Self> {
        let root_node = tree.node(root)?;
        if !root_node.is_decision() {
            return Err(DomainError::NotComposite(root_node.name().to_string()));
        }
        Ok(Self::assemble(name.into(), tree, root))
    }

    fn assemble(name: String, tree: TreeArena<P>, root: NodeId) -> Self {
        info!("created builder '{}' with root {}", name, root);
        Self {
            name,
            tree,
            root,
            current_target: Some(root),
            mode: BuildMode::default(),
            policy: Box::new(PlaceholderPolicy::default()),
            strict_targets: false,
        }
    }

    pub fn with_policy(mut self, policy: impl GrowthPolicy<P> + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Require targets to be reachable from the root.
    pub fn with_strict_targets(mut self, strict: bool) -> Self {
        self.strict_targets = strict;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &TreeArena<P> {
        &self.tree
    }

    /// Direct access for structural edits outside the build modes.
    pub fn tree_mut(&mut self) -> &mut TreeArena<P> {
        &mut self.tree
    }

    pub fn into_tree(self) -> (TreeArena<P>, NodeId) {
        (self.tree, self.root)
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Point the next action at `node`.
    ///
    /// Without strict targets the node is taken as-is; keeping it inside the
    /// root's subtree is then the caller's job.
    #[instrument(level = "debug", skip(self), fields(builder = %self.name))]
    pub fn set_target(&mut self, node: NodeId) -> DomainResult<()> {
        if self.strict_targets && !self.tree.is_reachable(self.root, node) {
            return Err(DomainError::InvalidTarget(node.to_string()));
        }
        self.current_target = Some(node);
        info!("target set to {}", node);
        Ok(())
    }

    /// Unset the target; `run` then acts on the root.
    pub fn clear_target(&mut self) {
        self.current_target = None;
    }

    /// Switch mode by name. Unknown names leave the mode unchanged.
    ///
    /// Returns the mode active after the call.
    #[instrument(level = "debug", skip(self), fields(builder = %self.name))]
    pub fn set_mode(&mut self, name: &str) -> BuildMode {
        match name.parse::<BuildMode>() {
            Ok(mode) => self.switch_mode(mode),
            Err(e) => {
                warn!("{}, keeping {}", e, self.mode);
            }
        }
        self.mode
    }

    pub fn switch_mode(&mut self, mode: BuildMode) {
        self.mode = mode;
        info!("builder '{}' mode set to {}", self.name, mode);
    }

    /// Apply the active mode to the current target (or the root).
    #[instrument(level = "debug", skip(self), fields(builder = %self.name, mode = %self.mode))]
    pub fn run(&mut self) -> DomainResult<BuildOutcome> {
        let target = self.current_target.unwrap_or(self.root);
        let outcome = match self.mode {
            BuildMode::Splitting => self.split(target)?,
            BuildMode::Stopping => self.stop(target)?,
            BuildMode::Pruning => self.prune(target)?,
        };
        info!("builder '{}' {}: {:?}", self.name, self.mode, outcome);
        Ok(outcome)
    }

    fn split(&mut self, target: NodeId) -> DomainResult<BuildOutcome> {
        let node = Self::composite(&self.tree, target)?;
        let specs = self.policy.split(node);
        let mut added = Vec::with_capacity(specs.len());
        for spec in specs {
            let child = self.tree.insert(spec);
            self.tree.add(target, child)?;
            added.push(child);
        }
        Ok(BuildOutcome::Split { target, added })
    }

    fn stop(&mut self, target: NodeId) -> DomainResult<BuildOutcome> {
        let node = Self::composite(&self.tree, target)?;
        let spec = self.policy.stop(node);
        let leaf = self.tree.insert(spec.into());
        self.tree.add(target, leaf)?;
        Ok(BuildOutcome::Stopped { target, leaf })
    }

    fn prune(&mut self, target: NodeId) -> DomainResult<BuildOutcome> {
        let node = self.tree.node(target)?;
        let Some(child) = self.policy.prune(node) else {
            info!("nothing to prune at {}", node);
            return Ok(BuildOutcome::Pruned {
                target,
                removed: None,
                freed: 0,
            });
        };
        self.tree.remove(target, child)?;
        let freed = self.tree.discard(child)?;
        Ok(BuildOutcome::Pruned {
            target,
            removed: Some(child),
            freed,
        })
    }

    fn composite(tree: &TreeArena<P>, target: NodeId) -> DomainResult<&Node<P>> {
        let node = tree.node(target)?;
        if node.is_decision() {
            Ok(node)
        } else {
            Err(DomainError::NotComposite(node.name().to_string()))
        }
    }
}
