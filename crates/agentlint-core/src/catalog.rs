use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Stable error codes known to the catalog.
///
/// Codes are grouped by class: `SCHEMA_*` for structural violations,
/// `LINT_*` for semantic lint findings, `ADVICE_*` for heuristic advisories,
/// `RULE_*` for dynamic validator findings, `INPUT_*` for the file-reading
/// convenience path. Each class carries a generic fallback so unmapped
/// violations are never dropped.
pub mod codes {
    pub const SCHEMA_REQUIRED: &str = "SCHEMA_REQUIRED";
    pub const SCHEMA_TYPE: &str = "SCHEMA_TYPE";
    pub const SCHEMA_ENUM: &str = "SCHEMA_ENUM";
    pub const SCHEMA_PATTERN: &str = "SCHEMA_PATTERN";
    pub const SCHEMA_ADDITIONAL_PROPERTIES: &str = "SCHEMA_ADDITIONAL_PROPERTIES";
    pub const SCHEMA_MIN_LENGTH: &str = "SCHEMA_MIN_LENGTH";
    pub const SCHEMA_MAX_LENGTH: &str = "SCHEMA_MAX_LENGTH";
    pub const SCHEMA_MINIMUM: &str = "SCHEMA_MINIMUM";
    pub const SCHEMA_MAXIMUM: &str = "SCHEMA_MAXIMUM";
    pub const SCHEMA_MIN_ITEMS: &str = "SCHEMA_MIN_ITEMS";
    pub const SCHEMA_MAX_ITEMS: &str = "SCHEMA_MAX_ITEMS";
    pub const SCHEMA_UNIQUE_ITEMS: &str = "SCHEMA_UNIQUE_ITEMS";
    pub const SCHEMA_FORMAT: &str = "SCHEMA_FORMAT";
    pub const SCHEMA_CONST: &str = "SCHEMA_CONST";
    pub const SCHEMA_API_VERSION: &str = "SCHEMA_API_VERSION";
    pub const SCHEMA_KIND: &str = "SCHEMA_KIND";
    pub const SCHEMA_NAME: &str = "SCHEMA_NAME";
    pub const SCHEMA_SPEC_TYPE: &str = "SCHEMA_SPEC_TYPE";
    pub const SCHEMA_GENERIC: &str = "SCHEMA_GENERIC";

    pub const LINT_DOMAIN_UNKNOWN: &str = "LINT_DOMAIN_UNKNOWN";
    pub const LINT_SUBDOMAIN_MISMATCH: &str = "LINT_SUBDOMAIN_MISMATCH";
    pub const LINT_TYPE_DOMAIN_AFFINITY: &str = "LINT_TYPE_DOMAIN_AFFINITY";
    pub const LINT_LINEAGE_PARENTS_MISSING: &str = "LINT_LINEAGE_PARENTS_MISSING";
    pub const LINT_MARKETPLACE_WALLET_MISSING: &str = "LINT_MARKETPLACE_WALLET_MISSING";
    pub const LINT_IDENTITY_RECOMMENDED: &str = "LINT_IDENTITY_RECOMMENDED";
    pub const LINT_NAME_FORMAT: &str = "LINT_NAME_FORMAT";
    pub const LINT_PUBLISH_DOCS_MISSING: &str = "LINT_PUBLISH_DOCS_MISSING";
    pub const LINT_PUBLISH_LICENSE_MISSING: &str = "LINT_PUBLISH_LICENSE_MISSING";
    pub const LINT_PUBLISH_RATINGS_MISSING: &str = "LINT_PUBLISH_RATINGS_MISSING";
    pub const LINT_LIFECYCLE_STAGE_UNKNOWN: &str = "LINT_LIFECYCLE_STAGE_UNKNOWN";
    pub const LINT_LIFECYCLE_RETIRED_INCOMPLETE: &str = "LINT_LIFECYCLE_RETIRED_INCOMPLETE";
    pub const LINT_GENERIC: &str = "LINT_GENERIC";

    pub const ADVICE_ROLE_MISSING: &str = "ADVICE_ROLE_MISSING";
    pub const ADVICE_TEMPERATURE_RANGE: &str = "ADVICE_TEMPERATURE_RANGE";
    pub const ADVICE_DESCRIPTION_MISSING: &str = "ADVICE_DESCRIPTION_MISSING";
    pub const ADVICE_LABELS_MISSING: &str = "ADVICE_LABELS_MISSING";
    pub const ADVICE_LLM_MISSING: &str = "ADVICE_LLM_MISSING";
    pub const ADVICE_TOOLS_MISSING: &str = "ADVICE_TOOLS_MISSING";

    pub const RULE_ERROR: &str = "RULE_ERROR";
    pub const RULE_WARNING: &str = "RULE_WARNING";
    pub const RULE_INFO: &str = "RULE_INFO";
    pub const RULE_GENERIC: &str = "RULE_GENERIC";

    pub const INPUT_UNREADABLE: &str = "INPUT_UNREADABLE";
    pub const INPUT_UNPARSABLE: &str = "INPUT_UNPARSABLE";
}

/// Invalid/valid example pair attached to a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorExample {
    pub invalid: String,
    pub valid: String,
    pub explanation: String,
}

/// Catalog entry for a single error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub remediation: String,
    /// Relative documentation reference for the code.
    pub docs: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<ErrorExample>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

/// Counts per severity across the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}

/// Static, process-lifetime lookup of error codes.
///
/// Built once by [`ErrorCatalog::new`] and shared read-only afterwards.
/// Lookups for unknown codes return `None`/empty, never panic.
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    entries: BTreeMap<String, ErrorDetails>,
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorCatalog {
    /// Build the built-in catalog.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        for entry in builtin_entries() {
            entries.insert(entry.code.clone(), entry);
        }
        Self { entries }
    }

    /// Details for a code, or `None` when unknown.
    pub fn details(&self, code: &str) -> Option<&ErrorDetails> {
        self.entries.get(code)
    }

    /// All entries carrying the given tag, in code order.
    pub fn search_by_tag(&self, tag: &str) -> Vec<&ErrorDetails> {
        self.entries
            .values()
            .filter(|entry| entry.tags.contains(tag))
            .collect()
    }

    /// All entries of the given severity, in code order.
    pub fn search_by_severity(&self, severity: Severity) -> Vec<&ErrorDetails> {
        self.entries
            .values()
            .filter(|entry| entry.severity == severity)
            .collect()
    }

    /// All entries in code order.
    pub fn list_all(&self) -> impl Iterator<Item = &ErrorDetails> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry counts per severity.
    pub fn counts_by_severity(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for entry in self.entries.values() {
            match entry.severity {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }
}

fn entry(
    code: &str,
    severity: Severity,
    message: &str,
    remediation: &str,
    tags: &[&str],
) -> ErrorDetails {
    ErrorDetails {
        code: code.to_string(),
        severity,
        message: message.to_string(),
        remediation: remediation.to_string(),
        docs: format!("docs/codes/{}.md", code.to_ascii_lowercase()),
        examples: Vec::new(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

fn with_example(
    mut details: ErrorDetails,
    invalid: &str,
    valid: &str,
    explanation: &str,
) -> ErrorDetails {
    details.examples.push(ErrorExample {
        invalid: invalid.to_string(),
        valid: valid.to_string(),
        explanation: explanation.to_string(),
    });
    details
}

fn builtin_entries() -> Vec<ErrorDetails> {
    vec![
        // Structural schema violations.
        with_example(
            entry(
                codes::SCHEMA_REQUIRED,
                Severity::Error,
                "a required field is missing",
                "add the missing field named in the violation path",
                &["schema", "structure", "required"],
            ),
            r#"{"kind": "Agent"}"#,
            r#"{"apiVersion": "agents/v1", "kind": "Agent", "metadata": {"name": "helper"}}"#,
            "apiVersion and metadata are required at the manifest root",
        ),
        with_example(
            entry(
                codes::SCHEMA_TYPE,
                Severity::Error,
                "a field has the wrong JSON type",
                "change the field to the type the schema declares",
                &["schema", "structure", "type"],
            ),
            r#"{"metadata": {"name": 42}}"#,
            r#"{"metadata": {"name": "helper"}}"#,
            "metadata.name must be a string",
        ),
        entry(
            codes::SCHEMA_ENUM,
            Severity::Error,
            "a field value is outside its allowed set",
            "use one of the values listed in the violation parameters",
            &["schema", "structure", "enum"],
        ),
        entry(
            codes::SCHEMA_PATTERN,
            Severity::Error,
            "a field value does not match its required pattern",
            "rewrite the value to match the declared pattern",
            &["schema", "structure", "pattern"],
        ),
        entry(
            codes::SCHEMA_ADDITIONAL_PROPERTIES,
            Severity::Error,
            "an unknown property is present where the schema forbids extras",
            "remove the unexpected property or move it under labels/annotations",
            &["schema", "structure"],
        ),
        entry(
            codes::SCHEMA_MIN_LENGTH,
            Severity::Error,
            "a string is shorter than the allowed minimum",
            "lengthen the value to meet the minimum",
            &["schema", "bounds"],
        ),
        entry(
            codes::SCHEMA_MAX_LENGTH,
            Severity::Error,
            "a string exceeds the allowed maximum length",
            "shorten the value to fit the bound",
            &["schema", "bounds"],
        ),
        entry(
            codes::SCHEMA_MINIMUM,
            Severity::Error,
            "a number is below the allowed minimum",
            "raise the value to at least the minimum",
            &["schema", "bounds"],
        ),
        entry(
            codes::SCHEMA_MAXIMUM,
            Severity::Error,
            "a number exceeds the allowed maximum",
            "lower the value to at most the maximum",
            &["schema", "bounds"],
        ),
        entry(
            codes::SCHEMA_MIN_ITEMS,
            Severity::Error,
            "an array has fewer items than required",
            "add items until the minimum count is met",
            &["schema", "bounds", "array"],
        ),
        entry(
            codes::SCHEMA_MAX_ITEMS,
            Severity::Error,
            "an array has more items than allowed",
            "remove items until the maximum count is met",
            &["schema", "bounds", "array"],
        ),
        entry(
            codes::SCHEMA_UNIQUE_ITEMS,
            Severity::Error,
            "an array contains duplicate items",
            "remove the duplicated entries",
            &["schema", "array"],
        ),
        entry(
            codes::SCHEMA_FORMAT,
            Severity::Error,
            "a field value does not match its declared format",
            "rewrite the value in the declared format",
            &["schema", "structure"],
        ),
        entry(
            codes::SCHEMA_CONST,
            Severity::Error,
            "a field must equal a fixed constant",
            "set the field to the constant named in the violation",
            &["schema", "structure"],
        ),
        with_example(
            entry(
                codes::SCHEMA_API_VERSION,
                Severity::Error,
                "apiVersion is missing or malformed",
                "declare apiVersion as '<group>/v<major>' (for example agents/v1)",
                &["schema", "versioning"],
            ),
            r#"{"apiVersion": "1.0"}"#,
            r#"{"apiVersion": "agents/v1"}"#,
            "apiVersion carries a group prefix and a v-prefixed version",
        ),
        entry(
            codes::SCHEMA_KIND,
            Severity::Error,
            "kind is missing or not a recognized manifest kind",
            "set kind to Agent, Task, or Workflow",
            &["schema", "classification"],
        ),
        with_example(
            entry(
                codes::SCHEMA_NAME,
                Severity::Error,
                "metadata.name is missing or malformed",
                "name the manifest with a lowercase DNS-label string",
                &["schema", "naming"],
            ),
            r#"{"metadata": {"name": "My Agent!"}}"#,
            r#"{"metadata": {"name": "my-agent"}}"#,
            "names are lowercase alphanumerics and hyphens",
        ),
        entry(
            codes::SCHEMA_SPEC_TYPE,
            Severity::Error,
            "spec.type is not a recognized agent type",
            "set spec.type to one of the declared agent types",
            &["schema", "classification"],
        ),
        entry(
            codes::SCHEMA_GENERIC,
            Severity::Error,
            "the manifest violates its structural schema",
            "inspect the violation message and adjust the manifest shape",
            &["schema", "fallback"],
        ),
        // Semantic lint findings.
        entry(
            codes::LINT_DOMAIN_UNKNOWN,
            Severity::Error,
            "spec.domain is not in the closed domain set",
            "pick a domain from the supported classification list",
            &["lint", "classification"],
        ),
        entry(
            codes::LINT_SUBDOMAIN_MISMATCH,
            Severity::Warning,
            "spec.subdomain does not belong to the declared domain",
            "pick a subdomain allowed for the declared domain",
            &["lint", "classification"],
        ),
        entry(
            codes::LINT_TYPE_DOMAIN_AFFINITY,
            Severity::Info,
            "the declared type is unusual for the declared domain",
            "double-check that type and domain describe the same agent",
            &["lint", "classification"],
        ),
        with_example(
            entry(
                codes::LINT_LINEAGE_PARENTS_MISSING,
                Severity::Error,
                "lineage declares a generation above zero without parents",
                "list the parent identifiers this agent was derived from",
                &["lint", "lineage"],
            ),
            r#"{"spec": {"lineage": {"generation": 1, "parents": []}}}"#,
            r#"{"spec": {"lineage": {"generation": 1, "parents": ["base-agent"]}}}"#,
            "any generation above zero must name at least one parent",
        ),
        entry(
            codes::LINT_MARKETPLACE_WALLET_MISSING,
            Severity::Error,
            "a marketplace offering is declared without a wallet",
            "add spec.marketplace.wallet so offerings can settle",
            &["lint", "marketplace"],
        ),
        entry(
            codes::LINT_IDENTITY_RECOMMENDED,
            Severity::Warning,
            "lineage or marketplace features are used without a decentralized identity",
            "add spec.identity.did to anchor provenance",
            &["lint", "identity", "lineage", "marketplace"],
        ),
        entry(
            codes::LINT_NAME_FORMAT,
            Severity::Error,
            "metadata.name is not a DNS-label-like name",
            "use lowercase alphanumerics and hyphens, at most 63 characters",
            &["lint", "naming"],
        ),
        entry(
            codes::LINT_PUBLISH_DOCS_MISSING,
            Severity::Warning,
            "a published public manifest has no documentation link",
            "add spec.publishing.documentation before listing publicly",
            &["lint", "publishing"],
        ),
        entry(
            codes::LINT_PUBLISH_LICENSE_MISSING,
            Severity::Warning,
            "a published public manifest declares no license",
            "add spec.publishing.license",
            &["lint", "publishing"],
        ),
        entry(
            codes::LINT_PUBLISH_RATINGS_MISSING,
            Severity::Info,
            "a published public manifest does not accept ratings",
            "enable spec.publishing.ratings to collect feedback",
            &["lint", "publishing"],
        ),
        entry(
            codes::LINT_LIFECYCLE_STAGE_UNKNOWN,
            Severity::Warning,
            "spec.lifecycle.stage is not a recognized stage",
            "use one of: experimental, beta, stable, deprecated, retired",
            &["lint", "lifecycle"],
        ),
        entry(
            codes::LINT_LIFECYCLE_RETIRED_INCOMPLETE,
            Severity::Warning,
            "a retired manifest lacks a retirement timestamp or legacy notice",
            "add spec.lifecycle.retiredAt or spec.lifecycle.legacyNotice",
            &["lint", "lifecycle"],
        ),
        entry(
            codes::LINT_GENERIC,
            Severity::Warning,
            "the manifest violates a semantic best practice",
            "inspect the finding message for the affected field",
            &["lint", "fallback"],
        ),
        // Heuristic advisories from the companion-field pass.
        entry(
            codes::ADVICE_ROLE_MISSING,
            Severity::Warning,
            "an Agent manifest does not describe its role",
            "add spec.role with a one-line statement of purpose",
            &["advice", "completeness"],
        ),
        entry(
            codes::ADVICE_TEMPERATURE_RANGE,
            Severity::Warning,
            "spec.llm.temperature is outside the usual [0, 2] range",
            "pick a temperature between 0 and 2",
            &["advice", "llm"],
        ),
        entry(
            codes::ADVICE_DESCRIPTION_MISSING,
            Severity::Info,
            "metadata.description is empty",
            "describe what the agent does in metadata.description",
            &["advice", "completeness"],
        ),
        entry(
            codes::ADVICE_LABELS_MISSING,
            Severity::Info,
            "metadata.labels is empty",
            "add labels so catalogs can organize the manifest",
            &["advice", "completeness"],
        ),
        entry(
            codes::ADVICE_LLM_MISSING,
            Severity::Info,
            "no LLM configuration is declared",
            "declare spec.llm with provider and model",
            &["advice", "llm"],
        ),
        entry(
            codes::ADVICE_TOOLS_MISSING,
            Severity::Info,
            "no tools or capabilities are declared",
            "declare spec.tools or spec.capabilities",
            &["advice", "completeness"],
        ),
        // Dynamic validator findings.
        entry(
            codes::RULE_ERROR,
            Severity::Error,
            "a dynamic validator rule reported an error",
            "apply one of the fixes proposed by the firing rule",
            &["rule", "dynamic"],
        ),
        entry(
            codes::RULE_WARNING,
            Severity::Warning,
            "a dynamic validator rule reported a warning",
            "review the rationale attached to the firing rule",
            &["rule", "dynamic"],
        ),
        entry(
            codes::RULE_INFO,
            Severity::Info,
            "a dynamic validator rule reported an advisory",
            "review the rationale attached to the firing rule",
            &["rule", "dynamic"],
        ),
        entry(
            codes::RULE_GENERIC,
            Severity::Warning,
            "a dynamic validator rule fired",
            "inspect the rule message and rationale",
            &["rule", "dynamic", "fallback"],
        ),
        // File-reading convenience path.
        entry(
            codes::INPUT_UNREADABLE,
            Severity::Error,
            "the manifest file could not be read",
            "check the path and file permissions",
            &["input", "io"],
        ),
        entry(
            codes::INPUT_UNPARSABLE,
            Severity::Error,
            "the manifest file is not valid JSON",
            "fix the syntax error reported by the parser",
            &["input", "io"],
        ),
    ]
}
