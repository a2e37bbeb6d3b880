use std::sync::Arc;

use agentlint_core::{ErrorCatalog, Severity, codes};
use agentlint_rules::RuleFinding;
use agentlint_validate::{Finding, Violation};
use serde_json::json;

use crate::report::{ErrorReport, FormattedError};

/// Most-specific-path-wins overrides for structural violations.
///
/// A violation whose effective path starts with one of these prefixes maps
/// to the dedicated code; the longest matching prefix wins.
const PATH_OVERRIDES: &[(&str, &str)] = &[
    ("/apiVersion", codes::SCHEMA_API_VERSION),
    ("/kind", codes::SCHEMA_KIND),
    ("/metadata/name", codes::SCHEMA_NAME),
    ("/spec/type", codes::SCHEMA_SPEC_TYPE),
];

const KEYWORD_CODES: &[(&str, &str)] = &[
    ("required", codes::SCHEMA_REQUIRED),
    ("type", codes::SCHEMA_TYPE),
    ("enum", codes::SCHEMA_ENUM),
    ("pattern", codes::SCHEMA_PATTERN),
    ("additionalProperties", codes::SCHEMA_ADDITIONAL_PROPERTIES),
    ("minLength", codes::SCHEMA_MIN_LENGTH),
    ("maxLength", codes::SCHEMA_MAX_LENGTH),
    ("minimum", codes::SCHEMA_MINIMUM),
    ("maximum", codes::SCHEMA_MAXIMUM),
    ("minItems", codes::SCHEMA_MIN_ITEMS),
    ("maxItems", codes::SCHEMA_MAX_ITEMS),
    ("uniqueItems", codes::SCHEMA_UNIQUE_ITEMS),
    ("format", codes::SCHEMA_FORMAT),
    ("const", codes::SCHEMA_CONST),
];

const FINDING_CODES: &[(&str, &str)] = &[
    ("domain_unknown", codes::LINT_DOMAIN_UNKNOWN),
    ("subdomain_mismatch", codes::LINT_SUBDOMAIN_MISMATCH),
    ("type_domain_affinity", codes::LINT_TYPE_DOMAIN_AFFINITY),
    ("lineage_parents_missing", codes::LINT_LINEAGE_PARENTS_MISSING),
    ("marketplace_wallet_missing", codes::LINT_MARKETPLACE_WALLET_MISSING),
    ("identity_recommended", codes::LINT_IDENTITY_RECOMMENDED),
    ("name_format", codes::LINT_NAME_FORMAT),
    ("publish_docs_missing", codes::LINT_PUBLISH_DOCS_MISSING),
    ("publish_license_missing", codes::LINT_PUBLISH_LICENSE_MISSING),
    ("publish_ratings_missing", codes::LINT_PUBLISH_RATINGS_MISSING),
    ("lifecycle_stage_unknown", codes::LINT_LIFECYCLE_STAGE_UNKNOWN),
    ("lifecycle_retired_incomplete", codes::LINT_LIFECYCLE_RETIRED_INCOMPLETE),
    ("role_missing", codes::ADVICE_ROLE_MISSING),
    ("temperature_range", codes::ADVICE_TEMPERATURE_RANGE),
    ("description_missing", codes::ADVICE_DESCRIPTION_MISSING),
    ("labels_missing", codes::ADVICE_LABELS_MISSING),
    ("llm_missing", codes::ADVICE_LLM_MISSING),
    ("tools_missing", codes::ADVICE_TOOLS_MISSING),
];

/// Maps raw violations to catalog codes and builds reports.
#[derive(Debug, Clone)]
pub struct ErrorFormatter {
    catalog: Arc<ErrorCatalog>,
}

impl ErrorFormatter {
    pub fn new(catalog: Arc<ErrorCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    /// Build one report from every violation source.
    pub fn build_report(
        &self,
        violations: &[Violation],
        findings: &[Finding],
        rule_findings: &[RuleFinding],
    ) -> ErrorReport {
        let mut report = ErrorReport::default();
        for violation in violations {
            report.push(self.format_violation(violation));
        }
        for finding in findings {
            report.push(self.format_finding(finding));
        }
        for finding in rule_findings {
            report.push(self.format_rule_finding(finding));
        }
        report
    }

    /// Map a structural violation. Unmapped keywords fall back to the
    /// generic structural code rather than being dropped.
    pub fn format_violation(&self, violation: &Violation) -> FormattedError {
        let path = effective_path(violation);
        let code = longest_path_override(&path)
            .or_else(|| {
                KEYWORD_CODES
                    .iter()
                    .find(|(keyword, _)| *keyword == violation.keyword)
                    .map(|(_, code)| *code)
            })
            .unwrap_or(codes::SCHEMA_GENERIC);

        self.formatted(
            code,
            Severity::Error,
            &path,
            &violation.message,
            None,
            Some(json!(violation)),
        )
    }

    /// Map a lint or advisory finding by its stable id.
    pub fn format_finding(&self, finding: &Finding) -> FormattedError {
        let code = FINDING_CODES
            .iter()
            .find(|(id, _)| *id == finding.id)
            .map(|(_, code)| *code)
            .unwrap_or(codes::LINT_GENERIC);

        self.formatted(
            code,
            finding.level,
            &finding.path,
            &finding.message,
            finding.suggestion.clone(),
            Some(json!(finding)),
        )
    }

    /// Map a dynamic-rule finding by its severity class.
    pub fn format_rule_finding(&self, finding: &RuleFinding) -> FormattedError {
        let code = match finding.severity {
            Severity::Error => codes::RULE_ERROR,
            Severity::Warning => codes::RULE_WARNING,
            Severity::Info => codes::RULE_INFO,
        };
        let pointer = format!("/{}", finding.path.replace('.', "/"));

        self.formatted(
            code,
            finding.severity,
            &pointer,
            &finding.message,
            None,
            Some(json!(finding)),
        )
    }

    /// Synthetic entry for the file-reading convenience path.
    pub fn synthetic_input_error(&self, code: &str, detail: &str) -> FormattedError {
        self.formatted(code, Severity::Error, "/", detail, None, None)
    }

    fn formatted(
        &self,
        code: &str,
        fallback_severity: Severity,
        path: &str,
        message: &str,
        suggestion: Option<String>,
        source: Option<serde_json::Value>,
    ) -> FormattedError {
        let details = self.catalog.details(code);
        FormattedError {
            code: code.to_string(),
            severity: details
                .map(|details| details.severity)
                .unwrap_or(fallback_severity),
            path: path.to_string(),
            message: message.to_string(),
            remediation: suggestion.unwrap_or_else(|| {
                details
                    .map(|details| details.remediation.clone())
                    .unwrap_or_default()
            }),
            docs: details
                .map(|details| details.docs.clone())
                .unwrap_or_default(),
            source,
        }
    }
}

/// For `required` violations the instance path points at the parent
/// object; fold the missing property name in so path overrides can match.
fn effective_path(violation: &Violation) -> String {
    if violation.keyword != "required" {
        return violation.path.clone();
    }

    let property = violation
        .params
        .as_ref()
        .and_then(|params| params.get("property"))
        .and_then(|property| property.as_str());

    match property {
        Some(property) if violation.path == "/" => format!("/{property}"),
        Some(property) => format!("{}/{property}", violation.path),
        None => violation.path.clone(),
    }
}

fn longest_path_override(path: &str) -> Option<&'static str> {
    PATH_OVERRIDES
        .iter()
        .filter(|(prefix, _)| path.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, code)| *code)
}
