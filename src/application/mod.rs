//! Application layer: build scripts, reports and services
//!
//! This layer drives the domain and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod report;
pub mod script;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use report::{ReportEntry, TreeReport};
pub use script::{BuildScript, NodeTemplate, Step, TemplateKind};
