use agentlint_rules::{ConditionOp, ValidatorManifest, validator_json_schema};
use serde_json::json;

#[test]
fn descriptor_json_round_trips_through_the_model() {
    let raw = json!({
        "name": "marketplace-checks",
        "targetTypes": ["all"],
        "phases": ["semantic", "platform"],
        "composable": true,
        "dependencies": ["identity-checks"],
        "rules": [
            {
                "id": "listed-needs-pricing",
                "when": { "path": "spec.marketplace.listed", "equals": true },
                "or": { "path": "spec.marketplace.pricing", "exists": false },
                "consequence": {
                    "severity": "warning",
                    "message": "listed offerings should declare pricing",
                    "docs": "docs/validators/marketplace.md"
                }
            },
            {
                "id": "did-shape",
                "when": { "path": "spec.identity.did", "matches": "^did:[a-z]+:" },
                "consequence": { "severity": "info", "message": "did looks well-formed" }
            }
        ]
    });

    let descriptor: ValidatorManifest = serde_json::from_value(raw.clone()).expect("deserialize");
    assert_eq!(descriptor.name, "marketplace-checks");
    assert_eq!(descriptor.rules.len(), 2);
    assert!(matches!(
        descriptor.rules[1].when.op,
        ConditionOp::Matches(_)
    ));

    let back = serde_json::to_value(&descriptor).expect("serialize");
    assert_eq!(back["rules"][0]["when"]["path"], "spec.marketplace.listed");
    assert_eq!(back["rules"][0]["when"]["equals"], json!(true));
}

#[test]
fn descriptor_schema_covers_the_rule_fields() {
    let schema = serde_json::to_value(validator_json_schema()).expect("schema to value");
    let text = schema.to_string();
    assert!(text.contains("targetTypes"));
    assert!(text.contains("rules"));
    assert!(text.contains("consequence"));
}
