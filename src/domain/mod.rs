//! Domain layer: node model, traversal, visitors and the tree builder
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod display;
pub mod error;
pub mod node;
pub mod traversal;
pub mod visitor;

pub use arena::TreeArena;
pub use builder::{BuildMode, BuildOutcome, GrowthPolicy, PlaceholderPolicy, TreeBuilder};
pub use display::TreeRender;
pub use error::{DomainError, DomainResult};
pub use node::{LeafSpec, Node, NodeId, NodeKind, NodeSpec};
pub use traversal::PreOrder;
pub use visitor::{count_leaves, CountLeavesVisitor, DepthVisitor, NodeVisitor};
