//! Externally authored rule sets ("validators") for agent manifests.
//!
//! Validator descriptors are discovered at startup, matched to a manifest
//! by declared type and phase, and their condition trees evaluated against
//! the manifest. Composition is strictly additive: no validator can
//! suppress another's finding.

pub mod eval;
pub mod model;
pub mod registry;
pub mod schema;

pub use eval::{evaluate_condition, execute_rule, rule_fires};
pub use model::{
    Condition, ConditionOp, Consequence, EffortTier, Fix, FixAction, Phase, RuleFinding,
    RuleOutcome, ValidationRule, ValidatorManifest,
};
pub use registry::{DiscoveryReport, RegistryError, ValidatorRegistry};
pub use schema::validator_json_schema;
