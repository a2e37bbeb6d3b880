use std::fs;

use agentlint_engine::ValidationEngine;
use agentlint_rules::Phase;
use serde_json::json;

fn swarm_descriptor() -> serde_json::Value {
    json!({
        "name": "swarm-basics",
        "targetTypes": ["swarm"],
        "phases": ["platform"],
        "rules": [{
            "id": "swarm-needs-coordinator",
            "when": { "path": "spec.type", "equals": "swarm" },
            "and": { "path": "spec.coordinator", "exists": false },
            "consequence": {
                "severity": "error",
                "message": "swarm manifests must name a coordinator",
                "rationale": "leaderless swarms cannot settle task ownership",
                "fixes": [{
                    "action": "add",
                    "path": "spec.coordinator",
                    "value": "round-robin",
                    "impact": 0.2,
                    "effort": "low"
                }]
            }
        }]
    })
}

fn manifest(spec_type: &str) -> serde_json::Value {
    json!({
        "apiVersion": "agents/v1",
        "kind": "Agent",
        "metadata": {"name": "demo", "description": "Demo agent"},
        "spec": {"type": spec_type, "role": "demo", "llm": {"temperature": 0.5}, "tools": []}
    })
}

#[test]
fn validation_merges_schema_lint_and_dynamic_findings() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(
        dir.path().join("swarm.json"),
        serde_json::to_string_pretty(&swarm_descriptor()).unwrap(),
    )
    .unwrap();

    let engine = ValidationEngine::builder()
        .validator_dir(dir.path())
        .build()
        .expect("engine builds");

    // Structurally fine, but the discovered swarm rule fires.
    let report = engine.validate(&manifest("swarm"), None);
    assert!(!report.valid());
    assert!(
        report
            .errors()
            .any(|entry| entry.message.contains("coordinator"))
    );

    // Phase narrowing: the swarm validator only runs in the platform phase.
    let report = engine.validate(&manifest("swarm"), Some(Phase::Semantic));
    assert!(report.valid());

    // A worker manifest is untouched by the swarm rule.
    let report = engine.validate(&manifest("worker"), None);
    assert!(report.valid(), "unexpected errors: {:?}", report);
}

#[test]
fn file_problems_become_report_entries_not_errors() {
    let engine = ValidationEngine::with_defaults().expect("engine builds");

    let report = engine.validate_file(std::path::Path::new("/nonexistent/agent.json"), None);
    assert!(!report.valid());
    assert_eq!(report.errors().count(), 1);
    assert!(
        report
            .errors()
            .any(|entry| entry.code == "INPUT_UNREADABLE")
    );

    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("agent.json");
    fs::write(&path, "{ not json").unwrap();
    let report = engine.validate_file(&path, None);
    assert!(
        report
            .errors()
            .any(|entry| entry.code == "INPUT_UNPARSABLE")
    );
}

#[test]
fn scoring_and_history_round_trip_through_the_engine() {
    let mut engine = ValidationEngine::with_defaults().expect("engine builds");
    let weak = manifest("worker");

    let before = engine.score(&weak);
    assert!(!before.improvements.is_empty());

    let mut after = before.clone();
    after.overall = (before.overall + 0.2).min(1.0);
    let applied: Vec<_> = before
        .improvements
        .iter()
        .filter_map(|improvement| improvement.fix.clone())
        .collect();

    engine.record(&weak, &before, &[]);
    engine.record(&weak, &after, &applied);

    let pattern = engine.pattern(&weak).expect("pattern recorded");
    assert_eq!(pattern.frequency, 2);
    assert_eq!(engine.history(&weak).len(), 2);
    assert!(!engine.suggestions(&weak).is_empty());
}

#[test]
fn engine_instances_are_isolated() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(
        dir.path().join("swarm.json"),
        serde_json::to_string_pretty(&swarm_descriptor()).unwrap(),
    )
    .unwrap();

    let enriched = ValidationEngine::builder()
        .validator_dir(dir.path())
        .build()
        .expect("engine builds");
    let mut plain = ValidationEngine::with_defaults().expect("engine builds");

    // The plain engine never sees the other instance's validators.
    assert_eq!(enriched.registry().len(), 1);
    assert!(plain.registry().is_empty());
    assert!(plain.validate(&manifest("swarm"), None).valid());

    // History recorded on one instance is invisible to the other.
    let weak = manifest("worker");
    let score = plain.score(&weak);
    plain.record(&weak, &score, &[]);
    assert!(plain.pattern(&weak).is_some());
    assert!(enriched.pattern(&weak).is_none());
}
