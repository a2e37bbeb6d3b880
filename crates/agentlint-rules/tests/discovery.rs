use std::fs;

use agentlint_rules::{Phase, ValidatorRegistry};
use serde_json::json;

fn descriptor(name: &str) -> serde_json::Value {
    json!({
        "name": name,
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

#[test]
fn discovery_loads_descriptors_and_skips_malformed_ones() {
    let dir = tempfile::tempdir().expect("create temp dir");

    fs::write(
        dir.path().join("swarm.json"),
        serde_json::to_string_pretty(&descriptor("swarm-basics")).unwrap(),
    )
    .unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let mut registry = ValidatorRegistry::new();
    let report = registry.load_dir(dir.path()).expect("readable dir");

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 1);
    assert!(registry.get("swarm-basics").is_some());
}

#[test]
fn discovered_rules_fire_with_enriched_findings() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(
        dir.path().join("swarm.json"),
        serde_json::to_string_pretty(&descriptor("swarm-basics")).unwrap(),
    )
    .unwrap();

    let mut registry = ValidatorRegistry::new();
    registry.load_dir(dir.path()).expect("readable dir");

    let swarm = json!({"spec": {"type": "swarm"}});
    let outcome = registry.validate(&swarm, Some(Phase::Platform));
    assert!(!outcome.valid());
    let finding = &outcome.findings[0];
    assert_eq!(finding.rule_id, "swarm-needs-coordinator");
    assert_eq!(finding.validator, "swarm-basics");
    assert!(!finding.rationale.is_empty());
    assert_eq!(outcome.fixes().len(), 1);

    // A worker manifest never triggers the swarm rule.
    let worker = json!({"spec": {"type": "worker"}});
    let outcome = registry.validate(&worker, Some(Phase::Platform));
    assert!(outcome.findings.is_empty());
    assert!(outcome.valid());
}

#[test]
fn duplicate_descriptor_files_keep_the_first() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(
        dir.path().join("a.json"),
        serde_json::to_string(&descriptor("dup")).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.path().join("b.json"),
        serde_json::to_string(&descriptor("dup")).unwrap(),
    )
    .unwrap();

    let mut registry = ValidatorRegistry::new();
    let report = registry.load_dir(dir.path()).expect("readable dir");
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 1);
}
