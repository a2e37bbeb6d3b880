//! Condition-tree evaluation.
//!
//! Conditions are interpreted data walked by a recursive evaluator, not
//! compiled code. Precedence is `(when AND and) OR or`: the optional `or`
//! condition is an independent alternate trigger evaluated against the
//! manifest root, so a rule fires when either the `when` branch (refined
//! by `and` when present) matches or the `or` condition matches on its
//! own.

use agentlint_core::resolve;
use regex::Regex;
use serde_json::Value;

use crate::model::{Condition, ConditionOp, RuleFinding, ValidationRule};

/// Evaluate a single leaf condition against the manifest.
pub fn evaluate_condition(condition: &Condition, manifest: &Value) -> bool {
    let resolved = resolve(manifest, &condition.path);

    match &condition.op {
        ConditionOp::Exists(expected) => resolved.is_some() == *expected,
        ConditionOp::Equals(operand) => resolved == Some(operand),
        ConditionOp::Contains(operand) => match resolved {
            Some(Value::Array(items)) => items.contains(operand),
            Some(Value::String(haystack)) => operand
                .as_str()
                .map(|needle| haystack.contains(needle))
                .unwrap_or(false),
            _ => false,
        },
        ConditionOp::Matches(pattern) => {
            let Some(Value::String(candidate)) = resolved else {
                return false;
            };
            match Regex::new(pattern) {
                Ok(regex) => regex.is_match(candidate),
                Err(err) => {
                    tracing::warn!(pattern = %pattern, error = %err, "invalid rule pattern");
                    false
                }
            }
        }
    }
}

/// Whether a rule's condition tree matches the manifest.
pub fn rule_fires(rule: &ValidationRule, manifest: &Value) -> bool {
    let when_branch = evaluate_condition(&rule.when, manifest)
        && rule
            .and
            .as_ref()
            .map(|and| evaluate_condition(and, manifest))
            .unwrap_or(true);

    when_branch
        || rule
            .or
            .as_ref()
            .map(|or| evaluate_condition(or, manifest))
            .unwrap_or(false)
}

/// Execute a rule, emitting one enriched finding when it fires.
pub fn execute_rule(
    validator: &str,
    rule: &ValidationRule,
    manifest: &Value,
) -> Option<RuleFinding> {
    if !rule_fires(rule, manifest) {
        return None;
    }

    Some(RuleFinding {
        validator: validator.to_string(),
        rule_id: rule.id.clone(),
        severity: rule.consequence.severity,
        path: rule.when.path.clone(),
        message: rule.consequence.message.clone(),
        rationale: rule.consequence.rationale.clone(),
        fixes: rule.consequence.fixes.clone(),
        docs: rule.consequence.docs.clone(),
    })
}
