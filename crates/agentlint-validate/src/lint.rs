use agentlint_core::{Severity, classify, resolve, resolve_array, resolve_bool, resolve_str};
use regex::Regex;
use serde_json::Value;

use crate::finding::Finding;

/// Closed set of supported classification domains.
pub const DOMAINS: &[&str] = &[
    "engineering",
    "finance",
    "healthcare",
    "legal",
    "marketing",
    "operations",
    "research",
    "support",
];

/// Per-domain allowed subdomains.
const SUBDOMAINS: &[(&str, &[&str])] = &[
    ("engineering", &["backend", "frontend", "devops", "data", "qa"]),
    ("finance", &["accounting", "trading", "risk", "compliance"]),
    ("healthcare", &["triage", "records", "scheduling"]),
    ("legal", &["contracts", "discovery", "compliance"]),
    ("marketing", &["content", "analytics", "outreach"]),
    ("operations", &["monitoring", "incident", "capacity"]),
    ("research", &["literature", "experiments", "synthesis"]),
    ("support", &["chat", "email", "escalation"]),
];

/// Domains a declared type usually pairs with. Purely informational.
const TYPE_AFFINITY: &[(&str, &[&str])] = &[
    ("monitor", &["operations", "engineering"]),
    ("swarm", &["research", "engineering"]),
    ("orchestrator", &["operations", "engineering"]),
    ("gateway", &["engineering", "support"]),
];

/// Ordered closed set of lifecycle stages.
pub const LIFECYCLE_STAGES: &[&str] =
    &["experimental", "beta", "stable", "deprecated", "retired"];

const NAME_MAX_LEN: usize = 63;

/// Fixed battery of cross-field best-practice checks.
///
/// Checks are independent and never short-circuit one another; the overall
/// pass is simply the absence of error-level findings.
pub struct SemanticLinter {
    name_pattern: Regex,
}

impl Default for SemanticLinter {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticLinter {
    pub fn new() -> Self {
        Self {
            // DNS-label shape: lowercase alphanumerics and inner hyphens.
            name_pattern: Regex::new("^[a-z0-9]([a-z0-9-]*[a-z0-9])?$")
                .unwrap_or_else(|_| unreachable!("static pattern compiles")),
        }
    }

    /// Run every check against the manifest.
    pub fn lint(&self, manifest: &Value) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.check_classification(manifest, &mut findings);
        self.check_type_affinity(manifest, &mut findings);
        self.check_feature_prerequisites(manifest, &mut findings);
        self.check_naming(manifest, &mut findings);
        self.check_publishing(manifest, &mut findings);
        self.check_lifecycle(manifest, &mut findings);
        findings
    }

    /// True when no error-level finding is present.
    pub fn passes(findings: &[Finding]) -> bool {
        findings.iter().all(|f| f.level != Severity::Error)
    }

    fn check_classification(&self, manifest: &Value, findings: &mut Vec<Finding>) {
        let Some(domain) = classify(manifest, "domain").and_then(Value::as_str) else {
            return;
        };

        if !DOMAINS.contains(&domain) {
            findings.push(Finding::new(
                "domain_unknown",
                Severity::Error,
                "/spec/domain",
                format!("domain '{domain}' is not a supported classification"),
                Some(format!("pick one of: {}", DOMAINS.join(", "))),
            ));
            return;
        }

        if let Some(subdomain) = classify(manifest, "subdomain").and_then(Value::as_str) {
            let allowed = SUBDOMAINS
                .iter()
                .find(|(name, _)| *name == domain)
                .map(|(_, subs)| *subs)
                .unwrap_or(&[]);
            if !allowed.contains(&subdomain) {
                findings.push(Finding::new(
                    "subdomain_mismatch",
                    Severity::Warning,
                    "/spec/subdomain",
                    format!("subdomain '{subdomain}' is unusual for domain '{domain}'"),
                    Some(format!("expected one of: {}", allowed.join(", "))),
                ));
            }
        }
    }

    fn check_type_affinity(&self, manifest: &Value, findings: &mut Vec<Finding>) {
        let declared_type = classify(manifest, "type").and_then(Value::as_str);
        let domain = classify(manifest, "domain").and_then(Value::as_str);
        let (Some(declared_type), Some(domain)) = (declared_type, domain) else {
            return;
        };

        if let Some((_, domains)) = TYPE_AFFINITY.iter().find(|(t, _)| *t == declared_type)
            && DOMAINS.contains(&domain)
            && !domains.contains(&domain)
        {
            findings.push(Finding::new(
                "type_domain_affinity",
                Severity::Info,
                "/spec/type",
                format!("type '{declared_type}' is unusual for domain '{domain}'"),
                Some(format!(
                    "'{declared_type}' agents usually live in: {}",
                    domains.join(", ")
                )),
            ));
        }
    }

    fn check_feature_prerequisites(&self, manifest: &Value, findings: &mut Vec<Finding>) {
        let generation = resolve(manifest, "spec.lineage.generation")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let has_lineage = resolve(manifest, "spec.lineage").is_some();
        if generation > 0 {
            let parents_empty = resolve_array(manifest, "spec.lineage.parents")
                .map(|parents| parents.is_empty())
                .unwrap_or(true);
            if parents_empty {
                findings.push(Finding::new(
                    "lineage_parents_missing",
                    Severity::Error,
                    "/spec/lineage/parents",
                    format!("lineage generation {generation} requires at least one parent"),
                    Some("list the parent identifiers this agent was derived from".to_string()),
                ));
            }
        }

        let has_marketplace = resolve(manifest, "spec.marketplace").is_some();
        if has_marketplace && resolve(manifest, "spec.marketplace.wallet").is_none() {
            findings.push(Finding::new(
                "marketplace_wallet_missing",
                Severity::Error,
                "/spec/marketplace/wallet",
                "marketplace offering declared without a wallet",
                Some("add spec.marketplace.wallet so offerings can settle".to_string()),
            ));
        }

        if (has_lineage || has_marketplace)
            && resolve_str(manifest, "spec.identity.did").is_none()
        {
            findings.push(Finding::new(
                "identity_recommended",
                Severity::Warning,
                "/spec/identity/did",
                "lineage or marketplace features declared without a decentralized identity",
                Some("add spec.identity.did to anchor provenance".to_string()),
            ));
        }
    }

    fn check_naming(&self, manifest: &Value, findings: &mut Vec<Finding>) {
        let Some(name) = resolve_str(manifest, "metadata.name") else {
            return;
        };

        if name.len() > NAME_MAX_LEN || !self.name_pattern.is_match(name) {
            findings.push(Finding::new(
                "name_format",
                Severity::Error,
                "/metadata/name",
                format!("name '{name}' is not a DNS-label-like name"),
                Some(format!(
                    "use lowercase alphanumerics and hyphens, at most {NAME_MAX_LEN} characters"
                )),
            ));
        }
    }

    fn check_publishing(&self, manifest: &Value, findings: &mut Vec<Finding>) {
        let published = resolve_bool(manifest, "spec.publishing.published").unwrap_or(false);
        let public = resolve_bool(manifest, "spec.publishing.public").unwrap_or(false);
        if !(published && public) {
            return;
        }

        if resolve_str(manifest, "spec.publishing.documentation").is_none() {
            findings.push(Finding::new(
                "publish_docs_missing",
                Severity::Warning,
                "/spec/publishing/documentation",
                "published public manifest has no documentation link",
                Some("add spec.publishing.documentation".to_string()),
            ));
        }
        if resolve_str(manifest, "spec.publishing.license").is_none() {
            findings.push(Finding::new(
                "publish_license_missing",
                Severity::Warning,
                "/spec/publishing/license",
                "published public manifest declares no license",
                Some("add spec.publishing.license".to_string()),
            ));
        }
        if resolve_bool(manifest, "spec.publishing.ratings") != Some(true) {
            findings.push(Finding::new(
                "publish_ratings_missing",
                Severity::Info,
                "/spec/publishing/ratings",
                "published public manifest does not accept ratings",
                Some("enable spec.publishing.ratings".to_string()),
            ));
        }
    }

    fn check_lifecycle(&self, manifest: &Value, findings: &mut Vec<Finding>) {
        let Some(stage) = resolve_str(manifest, "spec.lifecycle.stage") else {
            return;
        };

        if !LIFECYCLE_STAGES.contains(&stage) {
            findings.push(Finding::new(
                "lifecycle_stage_unknown",
                Severity::Warning,
                "/spec/lifecycle/stage",
                format!("lifecycle stage '{stage}' is not recognized"),
                Some(format!("use one of: {}", LIFECYCLE_STAGES.join(", "))),
            ));
            return;
        }

        if stage == "retired"
            && resolve_str(manifest, "spec.lifecycle.retiredAt").is_none()
            && resolve_str(manifest, "spec.lifecycle.legacyNotice").is_none()
        {
            findings.push(Finding::new(
                "lifecycle_retired_incomplete",
                Severity::Warning,
                "/spec/lifecycle",
                "retired manifest lacks a retirement timestamp or legacy notice",
                Some("add spec.lifecycle.retiredAt or spec.lifecycle.legacyNotice".to_string()),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lint(manifest: Value) -> Vec<Finding> {
        SemanticLinter::new().lint(&manifest)
    }

    fn has(findings: &[Finding], id: &str) -> bool {
        findings.iter().any(|f| f.id == id)
    }

    #[test]
    fn unknown_domain_is_an_error() {
        let findings = lint(json!({"spec": {"domain": "astrology"}}));
        assert!(has(&findings, "domain_unknown"));
        assert!(!SemanticLinter::passes(&findings));
    }

    #[test]
    fn subdomain_outside_domain_set_is_a_warning() {
        let findings = lint(json!({"spec": {"domain": "finance", "subdomain": "frontend"}}));
        assert!(has(&findings, "subdomain_mismatch"));
        assert!(SemanticLinter::passes(&findings));
    }

    #[test]
    fn lineage_generation_requires_parents() {
        let base = json!({"spec": {"lineage": {"generation": 1, "parents": []}}});
        assert!(has(&lint(base), "lineage_parents_missing"));

        let with_parent = json!({"spec": {"lineage": {"generation": 1, "parents": ["base"]}}});
        assert!(!has(&lint(with_parent), "lineage_parents_missing"));
    }

    #[test]
    fn generation_zero_needs_no_parents() {
        let findings = lint(json!({"spec": {"lineage": {"generation": 0, "parents": []}}}));
        assert!(!has(&findings, "lineage_parents_missing"));
    }

    #[test]
    fn marketplace_requires_wallet_and_recommends_identity() {
        let findings = lint(json!({"spec": {"marketplace": {"listed": true}}}));
        assert!(has(&findings, "marketplace_wallet_missing"));
        assert!(has(&findings, "identity_recommended"));

        let complete = lint(json!({"spec": {
            "marketplace": {"listed": true, "wallet": {"address": "0xabc"}},
            "identity": {"did": "did:web:example.org"}
        }}));
        assert!(!has(&complete, "marketplace_wallet_missing"));
        assert!(!has(&complete, "identity_recommended"));
    }

    #[test]
    fn bad_names_are_rejected() {
        for name in ["My Agent", "-leading", "trailing-", "UPPER"] {
            let findings = lint(json!({"metadata": {"name": name}}));
            assert!(has(&findings, "name_format"), "expected rejection for {name}");
        }
        let findings = lint(json!({"metadata": {"name": "my-agent-2"}}));
        assert!(!has(&findings, "name_format"));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "a".repeat(64);
        let findings = lint(json!({"metadata": {"name": name}}));
        assert!(has(&findings, "name_format"));
    }

    #[test]
    fn published_public_manifest_wants_docs_license_ratings() {
        let findings = lint(json!({"spec": {"publishing": {"published": true, "public": true}}}));
        assert!(has(&findings, "publish_docs_missing"));
        assert!(has(&findings, "publish_license_missing"));
        assert!(has(&findings, "publish_ratings_missing"));

        let private = lint(json!({"spec": {"publishing": {"published": true, "public": false}}}));
        assert!(private.is_empty());
    }

    #[test]
    fn retired_stage_needs_timestamp_or_notice() {
        let findings = lint(json!({"spec": {"lifecycle": {"stage": "retired"}}}));
        assert!(has(&findings, "lifecycle_retired_incomplete"));

        let noted = lint(json!({"spec": {"lifecycle": {
            "stage": "retired", "legacyNotice": "superseded by helper-v2"
        }}}));
        assert!(!has(&noted, "lifecycle_retired_incomplete"));
    }

    #[test]
    fn checks_do_not_short_circuit() {
        let findings = lint(json!({
            "metadata": {"name": "Bad Name"},
            "spec": {
                "domain": "astrology",
                "lineage": {"generation": 2, "parents": []},
                "marketplace": {"listed": true}
            }
        }));
        assert!(has(&findings, "name_format"));
        assert!(has(&findings, "domain_unknown"));
        assert!(has(&findings, "lineage_parents_missing"));
        assert!(has(&findings, "marketplace_wallet_missing"));
    }
}
