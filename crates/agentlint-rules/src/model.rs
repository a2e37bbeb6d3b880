use agentlint_core::Severity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named validation stage scoping which validators apply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Schema,
    Semantic,
    Platform,
    Runtime,
}

/// Externally authored rule-set descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorManifest {
    pub name: String,
    /// Manifest types this validator applies to; `all` is a wildcard.
    /// An empty list behaves like the wildcard.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_types: Vec<String>,
    /// Phases this validator participates in; empty means every phase.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<Phase>,
    pub rules: Vec<ValidationRule>,
    /// Whether this validator may be combined with others of the same name
    /// family. Findings are additive either way.
    #[serde(default)]
    pub composable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

/// A single rule inside a validator descriptor.
///
/// The rule fires when `(when AND and) OR or` holds; see the module docs
/// of [`crate::eval`] for the precedence decision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidationRule {
    pub id: String,
    pub when: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Condition>,
    pub consequence: Consequence,
}

/// Leaf condition of a rule's condition tree.
///
/// `path` is a dotted path into the manifest; an unresolved path evaluates
/// as "does not exist", never an error.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub path: String,
    #[serde(flatten)]
    pub op: ConditionOp,
}

/// Condition operator, one per condition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConditionOp {
    /// Resolved value equals the operand.
    Equals(Value),
    /// Resolved array contains the operand, or resolved string contains the
    /// operand substring.
    Contains(Value),
    /// Resolved string matches the operand regular expression.
    Matches(String),
    /// Path presence equals the operand.
    Exists(bool),
}

/// What a firing rule reports.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Consequence {
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<Fix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

/// Proposed structured edit expected to raise a manifest's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Fix {
    pub action: FixAction,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Estimated score impact in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
    #[serde(default)]
    pub effort: EffortTier,
}

/// Kind of edit a fix proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FixAction {
    Add,
    Change,
    Remove,
    Compose,
}

/// Effort tier for a fix or improvement.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum EffortTier {
    Low,
    #[default]
    Medium,
    High,
}

impl EffortTier {
    /// Return-on-effort weight used when ranking improvements.
    pub fn weight(&self) -> f64 {
        match self {
            EffortTier::Low => 1.0,
            EffortTier::Medium => 0.6,
            EffortTier::High => 0.3,
        }
    }
}

/// Enriched finding emitted by a firing rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleFinding {
    /// Name of the validator the rule belongs to.
    pub validator: String,
    pub rule_id: String,
    pub severity: Severity,
    /// Dotted path of the rule's `when` condition.
    pub path: String,
    pub message: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<Fix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<String>,
}

/// Aggregate result of running every applicable validator.
///
/// Findings are stored flat; validity and the fix list are derived on
/// read so they can never drift from the findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub findings: Vec<RuleFinding>,
}

impl RuleOutcome {
    /// True when no error-level finding fired.
    pub fn valid(&self) -> bool {
        self.findings
            .iter()
            .all(|finding| finding.severity != Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &RuleFinding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &RuleFinding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
    }

    /// Every fix proposed by a firing rule, concatenated in firing order.
    pub fn fixes(&self) -> Vec<Fix> {
        self.findings
            .iter()
            .flat_map(|finding| finding.fixes.iter().cloned())
            .collect()
    }

    /// Append another outcome. Strictly additive.
    pub fn merge(&mut self, other: RuleOutcome) {
        self.findings.extend(other.findings);
    }
}
