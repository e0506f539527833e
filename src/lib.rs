//! treeforge: decision/leaf trees with pre-order traversal, visitors and a
//! split/stop/prune builder.
//!
//! Layers, innermost first:
//! - [`domain`]: node model, arena, traversal, visitors, builder
//! - [`application`]: build scripts, reports, services
//! - [`infrastructure`]: I/O boundary and service wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
