//! Application services

pub mod build;

pub use build::{BuildOutput, BuildService};
