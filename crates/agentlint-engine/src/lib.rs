//! End-to-end manifest validation facade.
//!
//! Wires the structural validator, semantic linter, dynamic validator
//! registry, error formatter, and progressive scorer into one engine
//! instance. Engines hold no global state; independent instances never
//! observe each other's registries or history.

pub mod engine;

pub use engine::{DEFAULT_MANIFEST_SCHEMA, EngineBuilder, EngineError, ValidationEngine};
