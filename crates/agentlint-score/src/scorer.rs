use std::collections::BTreeMap;

use agentlint_core::{classify, resolve, resolve_bool, resolve_str};
use agentlint_rules::{EffortTier, Fix, FixAction};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed dimension weights. They sum to 1.0.
pub const WEIGHT_COMPATIBILITY: f64 = 0.30;
pub const WEIGHT_PERFORMANCE: f64 = 0.20;
pub const WEIGHT_SECURITY: f64 = 0.25;
pub const WEIGHT_OBSERVABILITY: f64 = 0.15;
pub const WEIGHT_MAINTAINABILITY: f64 = 0.10;

/// Dimensions scoring below this threshold contribute improvements.
const IMPROVEMENT_THRESHOLD: f64 = 0.90;
/// Impact contribution is capped so one bad dimension cannot dominate.
const IMPACT_CAP: f64 = 0.30;
const MAX_IMPROVEMENTS: usize = 10;

/// Capabilities each known target platform supports. Unknown platforms
/// (and `generic`) are treated as unconstrained.
const PLATFORM_CAPABILITIES: &[(&str, &[&str])] = &[
    ("kagent", &["text", "tools", "planning"]),
    ("crewai", &["text", "tools", "delegation"]),
    ("langchain", &["text", "tools", "vision", "retrieval"]),
    ("autogen", &["text", "tools", "code"]),
];

const LOW_EFFORT_KEYWORDS: &[&str] = &["add", "declare", "enable", "set ", "list", "describe"];
const HIGH_EFFORT_KEYWORDS: &[&str] = &["unsupported", "migrate", "redesign", "restructure"];

/// Letter grade derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Band lookup. Bands are monotonic and exhaustive over [0, 1].
    pub fn from_score(overall: f64) -> Self {
        if overall >= 0.97 {
            Grade::APlus
        } else if overall >= 0.90 {
            Grade::A
        } else if overall >= 0.80 {
            Grade::B
        } else if overall >= 0.70 {
            Grade::C
        } else if overall >= 0.60 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One weighted quality axis with its named factor scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    /// Arithmetic mean of the factor scores, in [0, 1].
    pub score: f64,
    pub weight: f64,
    pub factors: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

/// The five quality dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSet {
    pub compatibility: DimensionScore,
    pub performance: DimensionScore,
    pub security: DimensionScore,
    pub observability: DimensionScore,
    pub maintainability: DimensionScore,
}

impl DimensionSet {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DimensionScore)> {
        [
            ("compatibility", &self.compatibility),
            ("performance", &self.performance),
            ("security", &self.security),
            ("observability", &self.observability),
            ("maintainability", &self.maintainability),
        ]
        .into_iter()
    }
}

/// Ranked, actionable improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedImprovement {
    pub id: String,
    pub description: String,
    pub impact: f64,
    pub effort: EffortTier,
    pub category: String,
    /// 1-10, higher first.
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

/// Full scoring result for one manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationScore {
    pub overall: f64,
    pub grade: Grade,
    pub dimensions: DimensionSet,
    pub improvements: Vec<RankedImprovement>,
    pub summary: String,
}

/// Computes multi-dimensional quality scores. Stateless; scoring never
/// fails — an empty manifest simply scores low.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressiveScorer;

impl ProgressiveScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, manifest: &Value) -> ValidationScore {
        let dimensions = DimensionSet {
            compatibility: score_compatibility(manifest),
            performance: score_performance(manifest),
            security: score_security(manifest),
            observability: score_observability(manifest),
            maintainability: score_maintainability(manifest),
        };

        let overall = dimensions
            .iter()
            .map(|(_, dimension)| dimension.score * dimension.weight)
            .sum();
        let grade = Grade::from_score(overall);
        let improvements = rank_improvements(&dimensions);
        let summary = format!(
            "overall {overall:.2} ({grade}): {} ranked improvement(s) across {} dimension(s)",
            improvements.len(),
            dimensions
                .iter()
                .filter(|(_, dimension)| dimension.score < IMPROVEMENT_THRESHOLD)
                .count(),
        );

        ValidationScore {
            overall,
            grade,
            dimensions,
            improvements,
            summary,
        }
    }
}

struct DimensionBuilder {
    weight: f64,
    factors: BTreeMap<String, f64>,
    issues: Vec<String>,
}

impl DimensionBuilder {
    fn new(weight: f64) -> Self {
        Self {
            weight,
            factors: BTreeMap::new(),
            issues: Vec::new(),
        }
    }

    fn factor(&mut self, name: &str, score: f64) {
        self.factors.insert(name.to_string(), score.clamp(0.0, 1.0));
    }

    fn issue(&mut self, text: impl Into<String>) {
        self.issues.push(text.into());
    }

    fn finish(self) -> DimensionScore {
        let score = if self.factors.is_empty() {
            0.0
        } else {
            self.factors.values().sum::<f64>() / self.factors.len() as f64
        };
        DimensionScore {
            score,
            weight: self.weight,
            factors: self.factors,
            issues: self.issues,
        }
    }
}

fn score_compatibility(manifest: &Value) -> DimensionScore {
    let mut dim = DimensionBuilder::new(WEIGHT_COMPATIBILITY);

    // Platform support: declared capabilities cross-referenced against the
    // target platform's capability matrix.
    let platform = classify(manifest, "agentType").and_then(Value::as_str);
    let capabilities: Vec<&str> = classify(manifest, "capabilities")
        .and_then(Value::as_array)
        .map(|caps| caps.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if capabilities.is_empty() {
        dim.factor("platform_support", 0.5);
        dim.issue("declare the capabilities the agent relies on under spec.capabilities");
    } else {
        let supported = platform.and_then(|platform| {
            PLATFORM_CAPABILITIES
                .iter()
                .find(|(name, _)| *name == platform)
                .map(|(_, caps)| *caps)
        });
        match supported {
            None => dim.factor("platform_support", 1.0),
            Some(supported) => {
                let matching = capabilities
                    .iter()
                    .filter(|cap| supported.contains(cap))
                    .count();
                dim.factor(
                    "platform_support",
                    matching as f64 / capabilities.len() as f64,
                );
                for capability in capabilities
                    .iter()
                    .filter(|cap| !supported.contains(cap))
                {
                    dim.issue(format!(
                        "capability '{capability}' is unsupported on platform '{}'",
                        platform.unwrap_or("unknown")
                    ));
                }
            }
        }
    }

    let api_version_ok = resolve_str(manifest, "apiVersion")
        .map(|version| version.contains('/'))
        .unwrap_or(false);
    dim.factor("api_version", if api_version_ok { 1.0 } else { 0.0 });
    if !api_version_ok {
        dim.issue("declare apiVersion as group/version so hosts can negotiate");
    }

    let has_type = classify(manifest, "type").is_some();
    dim.factor("declared_type", if has_type { 1.0 } else { 0.0 });
    if !has_type {
        dim.issue("declare spec.type so platforms can route the agent");
    }

    dim.finish()
}

fn score_performance(manifest: &Value) -> DimensionScore {
    let mut dim = DimensionBuilder::new(WEIGHT_PERFORMANCE);

    let has_budget = resolve(manifest, "spec.llm.maxTokens").is_some()
        || resolve(manifest, "spec.constraints.cost").is_some();
    dim.factor("resource_limits", if has_budget { 1.0 } else { 0.0 });
    if !has_budget {
        dim.issue("set a token budget under spec.llm.maxTokens or spec.constraints.cost");
    }

    let has_latency = resolve(manifest, "spec.constraints.performance").is_some();
    dim.factor("latency_budget", if has_latency { 1.0 } else { 0.0 });
    if !has_latency {
        dim.issue("set latency and timeout bounds under spec.constraints.performance");
    }

    dim.finish()
}

fn score_security(manifest: &Value) -> DimensionScore {
    let mut dim = DimensionBuilder::new(WEIGHT_SECURITY);

    let tls = resolve_bool(manifest, "spec.security.tls").unwrap_or(false);
    dim.factor("transport_security", if tls { 1.0 } else { 0.0 });
    if !tls {
        dim.issue("enable spec.security.tls so transport is encrypted");
    }

    let has_auth = resolve(manifest, "spec.security.authentication").is_some();
    dim.factor("authentication", if has_auth { 1.0 } else { 0.0 });
    if !has_auth {
        dim.issue("declare an authentication scheme under spec.security.authentication");
    }

    let has_did = resolve_str(manifest, "spec.identity.did").is_some();
    dim.factor("identity", if has_did { 1.0 } else { 0.5 });
    if !has_did {
        dim.issue("add a decentralized identity under spec.identity.did");
    }

    dim.finish()
}

fn score_observability(manifest: &Value) -> DimensionScore {
    let mut dim = DimensionBuilder::new(WEIGHT_OBSERVABILITY);

    let monitoring = resolve_bool(manifest, "spec.observability.monitoring").unwrap_or(false);
    dim.factor("monitoring", if monitoring { 1.0 } else { 0.0 });
    if !monitoring {
        dim.issue("enable spec.observability.monitoring");
    }

    let logging = resolve_bool(manifest, "spec.observability.logging").unwrap_or(false);
    dim.factor("logging", if logging { 1.0 } else { 0.0 });
    if !logging {
        dim.issue("enable spec.observability.logging");
    }

    dim.finish()
}

fn score_maintainability(manifest: &Value) -> DimensionScore {
    let mut dim = DimensionBuilder::new(WEIGHT_MAINTAINABILITY);

    let described = resolve_str(manifest, "metadata.description")
        .map(|description| !description.is_empty())
        .unwrap_or(false);
    dim.factor("description", if described { 1.0 } else { 0.0 });
    if !described {
        dim.issue("add a description under metadata.description");
    }

    let versioned = resolve_str(manifest, "metadata.version")
        .map(|version| !version.is_empty())
        .unwrap_or(false);
    dim.factor("versioning", if versioned { 1.0 } else { 0.0 });
    if !versioned {
        dim.issue("add a semantic version under metadata.version");
    }

    let documented = resolve_str(manifest, "spec.publishing.documentation").is_some();
    dim.factor("documentation", if documented { 1.0 } else { 0.5 });
    if !documented {
        dim.issue("link documentation under spec.publishing.documentation");
    }

    dim.finish()
}

/// Classify effort from issue wording.
fn classify_effort(issue: &str) -> EffortTier {
    let lowered = issue.to_ascii_lowercase();
    if HIGH_EFFORT_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        EffortTier::High
    } else if LOW_EFFORT_KEYWORDS
        .iter()
        .any(|keyword| lowered.starts_with(keyword) || lowered.contains(keyword))
    {
        EffortTier::Low
    } else {
        EffortTier::Medium
    }
}

/// Derive a structured fix from an issue that names a manifest path.
fn fix_from_issue(issue: &str, impact: f64, effort: EffortTier) -> Option<Fix> {
    let path = issue
        .split_whitespace()
        .find(|token| token.starts_with("spec.") || token.starts_with("metadata."))?
        .trim_end_matches(|ch: char| !ch.is_ascii_alphanumeric());

    Some(Fix {
        action: FixAction::Add,
        path: path.to_string(),
        value: None,
        impact: Some(impact),
        effort,
    })
}

fn rank_improvements(dimensions: &DimensionSet) -> Vec<RankedImprovement> {
    let mut improvements = Vec::new();

    for (category, dimension) in dimensions.iter() {
        if dimension.score >= IMPROVEMENT_THRESHOLD {
            continue;
        }
        let impact = (1.0 - dimension.score).min(IMPACT_CAP);
        for (index, issue) in dimension.issues.iter().enumerate() {
            let effort = classify_effort(issue);
            let priority = ((impact * effort.weight() * 10.0).round() as u8).clamp(1, 10);
            improvements.push(RankedImprovement {
                id: format!("{category}-{}", index + 1),
                description: issue.clone(),
                impact,
                effort,
                category: category.to_string(),
                priority,
                fix: fix_from_issue(issue, impact, effort),
            });
        }
    }

    improvements.sort_by(|a, b| b.priority.cmp(&a.priority));
    improvements.truncate(MAX_IMPROVEMENTS);
    improvements
}
