use agentlint_core::{Severity, resolve, resolve_str};
use jsonschema::JSONSchema;
use jsonschema::error::ValidationErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::finding::{Finding, ValidateError};

/// Raw structural violation with the keyword parameters later stages need
/// for code mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Failing schema keyword (`required`, `type`, `enum`, ...).
    pub keyword: String,
    /// JSON pointer to the offending instance location.
    pub path: String,
    pub message: String,
    /// Keyword parameters (limits, enum sets) when the keyword carries any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Outcome of one structural validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaOutcome {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

/// Validates manifests against a structural JSON Schema.
///
/// The schema document is compiled once at construction; a malformed
/// schema is the only fatal path. Per-call validation always returns an
/// outcome.
pub struct SchemaValidator {
    compiled: JSONSchema,
}

impl SchemaValidator {
    /// Compile the schema document.
    pub fn new(schema: &Value) -> Result<Self, ValidateError> {
        let compiled =
            JSONSchema::compile(schema).map_err(|err| ValidateError::Schema(err.to_string()))?;
        Ok(Self { compiled })
    }

    /// Validate a manifest, collecting every structural violation.
    pub fn validate(&self, manifest: &Value) -> SchemaOutcome {
        let mut violations = Vec::new();

        if let Err(errors) = self.compiled.validate(manifest) {
            for error in errors {
                violations.push(Violation {
                    keyword: keyword_of(&error.kind).to_string(),
                    path: normalized_pointer(&error.instance_path.to_string()),
                    message: error.to_string(),
                    params: params_of(&error.kind),
                });
            }
        }

        SchemaOutcome {
            valid: violations.is_empty(),
            violations,
        }
    }

    /// Heuristic advisory pass for expectations the schema cannot express.
    ///
    /// Emits warnings and info only; advisories never affect structural
    /// validity.
    pub fn advise(&self, manifest: &Value) -> Vec<Finding> {
        let mut findings = Vec::new();

        if resolve_str(manifest, "kind") == Some("Agent")
            && resolve_str(manifest, "spec.role").unwrap_or("").is_empty()
        {
            findings.push(Finding::new(
                "role_missing",
                Severity::Warning,
                "/spec/role",
                "Agent manifests should describe their role",
                Some("add spec.role with a one-line statement of purpose".to_string()),
            ));
        }

        if let Some(temperature) =
            resolve(manifest, "spec.llm.temperature").and_then(Value::as_f64)
            && !(0.0..=2.0).contains(&temperature)
        {
            findings.push(Finding::new(
                "temperature_range",
                Severity::Warning,
                "/spec/llm/temperature",
                format!("unusual temperature value: {temperature}"),
                Some("pick a temperature between 0 and 2".to_string()),
            ));
        }

        if resolve_str(manifest, "metadata.description")
            .unwrap_or("")
            .is_empty()
        {
            findings.push(Finding::new(
                "description_missing",
                Severity::Info,
                "/metadata/description",
                "consider adding a description to metadata",
                Some("summarize what the agent does".to_string()),
            ));
        }

        let labels_empty = match resolve(manifest, "metadata.labels") {
            Some(Value::Object(map)) => map.is_empty(),
            _ => true,
        };
        if labels_empty {
            findings.push(Finding::new(
                "labels_missing",
                Severity::Info,
                "/metadata/labels",
                "consider adding labels for better organization",
                None,
            ));
        }

        if let Some(spec) = resolve(manifest, "spec") {
            if resolve(spec, "llm").is_none() {
                findings.push(Finding::new(
                    "llm_missing",
                    Severity::Info,
                    "/spec/llm",
                    "no LLM configuration declared",
                    Some("declare spec.llm with provider and model".to_string()),
                ));
            }
            if resolve(spec, "tools").is_none() && resolve(spec, "capabilities").is_none() {
                findings.push(Finding::new(
                    "tools_missing",
                    Severity::Info,
                    "/spec/tools",
                    "no tools or capabilities declared",
                    Some("declare spec.tools or spec.capabilities".to_string()),
                ));
            }
        }

        findings
    }
}

fn keyword_of(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::Pattern { .. } => "pattern",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::MaxLength { .. } => "maxLength",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::MinItems { .. } => "minItems",
        ValidationErrorKind::MaxItems { .. } => "maxItems",
        ValidationErrorKind::UniqueItems { .. } => "uniqueItems",
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::Constant { .. } => "const",
        _ => "schema",
    }
}

fn params_of(kind: &ValidationErrorKind) -> Option<Value> {
    match kind {
        ValidationErrorKind::Required { property } => Some(json!({ "property": property })),
        ValidationErrorKind::Enum { options } => Some(json!({ "allowed": options })),
        ValidationErrorKind::Pattern { pattern } => Some(json!({ "pattern": pattern })),
        ValidationErrorKind::MinLength { limit } => Some(json!({ "limit": limit })),
        ValidationErrorKind::MaxLength { limit } => Some(json!({ "limit": limit })),
        ValidationErrorKind::Minimum { limit } => Some(json!({ "limit": limit })),
        ValidationErrorKind::Maximum { limit } => Some(json!({ "limit": limit })),
        ValidationErrorKind::MinItems { limit } => Some(json!({ "limit": limit })),
        ValidationErrorKind::MaxItems { limit } => Some(json!({ "limit": limit })),
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            Some(json!({ "unexpected": unexpected }))
        }
        _ => None,
    }
}

fn normalized_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["apiVersion", "kind", "metadata"],
            "properties": {
                "apiVersion": { "type": "string", "pattern": "^[a-z][a-z0-9.-]*/v[0-9]+$" },
                "kind": { "enum": ["Agent", "Task", "Workflow"] },
                "metadata": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string", "maxLength": 63 }
                    }
                }
            }
        })
    }

    #[test]
    fn malformed_schema_is_fatal() {
        let bad = json!({ "type": 17 });
        assert!(SchemaValidator::new(&bad).is_err());
    }

    #[test]
    fn violations_carry_keyword_path_and_params() {
        let validator = SchemaValidator::new(&schema()).expect("compile schema");
        let outcome = validator.validate(&json!({
            "apiVersion": "agents/v1",
            "kind": "Robot",
            "metadata": { "name": "x" }
        }));

        assert!(!outcome.valid);
        let violation = &outcome.violations[0];
        assert_eq!(violation.keyword, "enum");
        assert_eq!(violation.path, "/kind");
        assert!(violation.params.is_some());
    }

    #[test]
    fn missing_required_field_points_at_parent() {
        let validator = SchemaValidator::new(&schema()).expect("compile schema");
        let outcome = validator.validate(&json!({ "kind": "Agent", "metadata": {"name": "a"} }));
        assert!(!outcome.valid);
        assert!(outcome.violations.iter().any(|v| v.keyword == "required"));
    }

    #[test]
    fn advisory_pass_never_reports_errors() {
        let validator = SchemaValidator::new(&schema()).expect("compile schema");
        let findings = validator.advise(&json!({
            "kind": "Agent",
            "spec": { "llm": { "temperature": 3.5 } }
        }));

        assert!(findings.iter().all(|f| f.level != Severity::Error));
        assert!(findings.iter().any(|f| f.id == "role_missing"));
        assert!(findings.iter().any(|f| f.id == "temperature_range"));
    }
}
