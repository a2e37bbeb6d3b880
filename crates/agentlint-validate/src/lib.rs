//! Structural and semantic validation of agent manifests.
//!
//! [`SchemaValidator`] checks a manifest against a structural JSON Schema
//! and runs a heuristic advisory pass; [`SemanticLinter`] runs the fixed
//! battery of cross-field best-practice checks. Both emit raw findings;
//! mapping to catalog codes happens downstream in the report stage.

pub mod finding;
pub mod lint;
pub mod schema;

pub use finding::{Finding, ValidateError};
pub use lint::SemanticLinter;
pub use schema::{SchemaOutcome, SchemaValidator, Violation};
