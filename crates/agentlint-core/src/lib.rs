//! Shared building blocks for agent manifest validation.
//!
//! This crate holds the pieces every other stage depends on: severity
//! levels, dotted-path access into manifest documents, and the static
//! error catalog that maps stable codes to messages and remediation.

pub mod catalog;
pub mod manifest;
pub mod severity;

pub use catalog::{ErrorCatalog, ErrorDetails, ErrorExample, SeverityCounts, codes};
pub use manifest::{MAX_DEPTH, classify, resolve, resolve_array, resolve_bool, resolve_str};
pub use severity::Severity;
