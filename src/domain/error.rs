//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Domain errors represent structural violations of the tree.
/// These are independent of configuration and I/O concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node '{child}' is not a child of '{parent}'")]
    NodeNotFound { child: String, parent: String },

    #[error("stale node handle: {0}")]
    StaleNode(NodeId),

    #[error("node '{0}' is a leaf and cannot hold children")]
    NotComposite(String),

    #[error("attaching '{node}' under '{parent}' would create a cycle")]
    CycleDetected { node: String, parent: String },

    #[error("target '{0}' is not reachable from the builder root")]
    InvalidTarget(String),

    #[error("unknown build mode: {0}")]
    UnknownMode(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
