use std::collections::BTreeMap;

use agentlint_core::{classify, resolve_str};
use agentlint_rules::Fix;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scorer::ValidationScore;

/// Coarse manifest classification key used to group validation history.
///
/// Deliberately built from three classification fields only — declared
/// type, kind, and architecture pattern — so structurally similar
/// manifests share history. Never a full manifest identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub agent_type: String,
    pub kind: String,
    pub architecture: String,
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.agent_type, self.kind, self.architecture)
    }
}

/// Derive the fingerprint for a manifest. Missing classification fields
/// map to `unknown` so bare manifests still share one history bucket.
pub fn fingerprint(manifest: &Value) -> Fingerprint {
    let part = |value: Option<&str>| value.unwrap_or("unknown").to_string();
    Fingerprint {
        agent_type: part(classify(manifest, "type").and_then(Value::as_str)),
        kind: part(resolve_str(manifest, "kind")),
        architecture: part(
            classify(manifest, "architecture")
                .and_then(|architecture| architecture.get("pattern"))
                .and_then(Value::as_str),
        ),
    }
}

/// One recorded scoring pass. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub fingerprint: Fingerprint,
    pub score: ValidationScore,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixes_applied: Vec<Fix>,
}

/// Incrementally maintained aggregate for one fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationPattern {
    pub fingerprint: Fingerprint,
    pub frequency: u64,
    /// Running average of the overall score across recorded passes.
    pub average_score: f64,
    /// Fixes applied in transitions where the overall score rose.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_fixes: Vec<Fix>,
}

/// In-memory cross-validation history and pattern state.
///
/// Holds mutable shared state; concurrent writers for the same
/// fingerprint must be serialized by the caller.
#[derive(Debug, Default)]
pub struct ValidationContext {
    history: BTreeMap<Fingerprint, Vec<ValidationHistoryEntry>>,
    patterns: BTreeMap<Fingerprint, ValidationPattern>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one scoring pass, updating the fingerprint's pattern.
    pub fn record_validation(
        &mut self,
        manifest: &Value,
        score: &ValidationScore,
        fixes_applied: &[Fix],
    ) {
        let fingerprint = fingerprint(manifest);
        let entries = self.history.entry(fingerprint.clone()).or_default();

        let pattern = self
            .patterns
            .entry(fingerprint.clone())
            .or_insert_with(|| ValidationPattern {
                fingerprint: fingerprint.clone(),
                frequency: 0,
                average_score: 0.0,
                recommended_fixes: Vec::new(),
            });
        pattern.frequency += 1;
        pattern.average_score +=
            (score.overall - pattern.average_score) / pattern.frequency as f64;

        // Positive transition: the fixes applied since the previous pass
        // are worth recommending again.
        if let Some(previous) = entries.last()
            && score.overall > previous.score.overall
        {
            for fix in fixes_applied {
                if !pattern
                    .recommended_fixes
                    .iter()
                    .any(|known| known.action == fix.action && known.path == fix.path)
                {
                    pattern.recommended_fixes.push(fix.clone());
                }
            }
        }

        entries.push(ValidationHistoryEntry {
            timestamp: Utc::now(),
            fingerprint,
            score: score.clone(),
            fixes_applied: fixes_applied.to_vec(),
        });
    }

    /// Ordered history for the manifest's fingerprint.
    pub fn history(&self, manifest: &Value) -> &[ValidationHistoryEntry] {
        self.history
            .get(&fingerprint(manifest))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Aggregate pattern for the manifest's fingerprint, if any pass was
    /// recorded.
    pub fn pattern(&self, manifest: &Value) -> Option<&ValidationPattern> {
        self.patterns.get(&fingerprint(manifest))
    }

    /// Fixes that preceded score increases for this fingerprint.
    ///
    /// Scans consecutive history pairs and unions the fixes applied in
    /// transitions where the overall score strictly increased. A
    /// positive-reinforcement heuristic, not a learned model.
    pub fn suggestions_from_history(&self, manifest: &Value) -> Vec<Fix> {
        let Some(entries) = self.history.get(&fingerprint(manifest)) else {
            return Vec::new();
        };

        let mut suggestions: Vec<Fix> = Vec::new();
        for pair in entries.windows(2) {
            if pair[1].score.overall > pair[0].score.overall {
                for fix in &pair[1].fixes_applied {
                    if !suggestions
                        .iter()
                        .any(|known| known.action == fix.action && known.path == fix.path)
                    {
                        suggestions.push(fix.clone());
                    }
                }
            }
        }
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::ProgressiveScorer;
    use agentlint_rules::{EffortTier, FixAction};
    use serde_json::json;

    fn fix(path: &str) -> Fix {
        Fix {
            action: FixAction::Add,
            path: path.to_string(),
            value: None,
            impact: None,
            effort: EffortTier::Low,
        }
    }

    fn scored(overall_hint: &Value) -> ValidationScore {
        ProgressiveScorer::new().score(overall_hint)
    }

    #[test]
    fn fingerprint_uses_three_coarse_fields_only() {
        let a = json!({
            "kind": "Agent",
            "metadata": {"name": "one"},
            "spec": {"type": "worker", "architecture": {"pattern": "pipeline"}}
        });
        let b = json!({
            "kind": "Agent",
            "metadata": {"name": "completely-different"},
            "spec": {"type": "worker", "architecture": {"pattern": "pipeline"}}
        });
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).to_string(), "worker/Agent/pipeline");

        let bare = fingerprint(&json!({}));
        assert_eq!(bare.to_string(), "unknown/unknown/unknown");
    }

    #[test]
    fn pattern_tracks_frequency_and_running_average() {
        let manifest = json!({"kind": "Agent", "spec": {"type": "worker"}});
        let mut context = ValidationContext::new();

        let mut low = scored(&manifest);
        low.overall = 0.6;
        let mut high = scored(&manifest);
        high.overall = 0.8;

        context.record_validation(&manifest, &low, &[]);
        context.record_validation(&manifest, &high, &[fix("spec.security.tls")]);

        let pattern = context.pattern(&manifest).expect("pattern recorded");
        assert_eq!(pattern.frequency, 2);
        assert!((pattern.average_score - 0.7).abs() < 1e-9);
        assert_eq!(pattern.recommended_fixes.len(), 1);
    }

    #[test]
    fn suggestions_come_from_score_increasing_transitions_only() {
        let manifest = json!({"kind": "Agent", "spec": {"type": "worker"}});
        let mut context = ValidationContext::new();

        let mut first = scored(&manifest);
        first.overall = 0.8;
        let mut regressed = scored(&manifest);
        regressed.overall = 0.5;
        let mut recovered = scored(&manifest);
        recovered.overall = 0.9;

        context.record_validation(&manifest, &first, &[]);
        context.record_validation(&manifest, &regressed, &[fix("spec.risky.change")]);
        context.record_validation(&manifest, &recovered, &[fix("spec.observability.logging")]);

        let suggestions = context.suggestions_from_history(&manifest);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].path, "spec.observability.logging");
    }

    #[test]
    fn different_fingerprints_keep_separate_history() {
        let worker = json!({"kind": "Agent", "spec": {"type": "worker"}});
        let swarm = json!({"kind": "Agent", "spec": {"type": "swarm"}});
        let mut context = ValidationContext::new();

        context.record_validation(&worker, &scored(&worker), &[]);

        assert_eq!(context.history(&worker).len(), 1);
        assert!(context.history(&swarm).is_empty());
        assert!(context.pattern(&swarm).is_none());
    }
}
