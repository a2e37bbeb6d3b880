use serde_json::Value;

/// Maximum nesting depth honored when resolving paths.
///
/// Pathological deeply nested manifests resolve as "not present" past this
/// bound instead of recursing without limit.
pub const MAX_DEPTH: usize = 64;

/// Resolve a dotted path (`spec.lineage.parents`) inside a manifest.
///
/// Numeric segments index into arrays (`spec.lineage.parents.0`). An
/// unresolved or over-deep path yields `None`; resolution never fails.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }

    let mut current = root;
    for (depth, segment) in path.split('.').enumerate() {
        if depth >= MAX_DEPTH {
            return None;
        }
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let index: usize = segment.parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve a path to a string value.
pub fn resolve_str<'a>(root: &'a Value, path: &str) -> Option<&'a str> {
    resolve(root, path).and_then(Value::as_str)
}

/// Resolve a path to a boolean value.
pub fn resolve_bool(root: &Value, path: &str) -> Option<bool> {
    resolve(root, path).and_then(Value::as_bool)
}

/// Resolve a path to an array.
pub fn resolve_array<'a>(root: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
    resolve(root, path).and_then(Value::as_array)
}

/// Look up a classification field under `spec.` with a top-level fallback.
///
/// Manifests in the wild carry classification either nested
/// (`spec.agentType`) or flattened (`agentType`); both spellings resolve to
/// the same field.
pub fn classify<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    resolve(root, &format!("spec.{key}")).or_else(|| resolve(root, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_and_indexed_paths() {
        let manifest = json!({
            "spec": {
                "lineage": { "generation": 2, "parents": ["alpha", "beta"] }
            }
        });

        assert_eq!(
            resolve(&manifest, "spec.lineage.generation"),
            Some(&json!(2))
        );
        assert_eq!(resolve_str(&manifest, "spec.lineage.parents.1"), Some("beta"));
        assert!(resolve(&manifest, "spec.lineage.missing").is_none());
        assert!(resolve(&manifest, "spec.lineage.parents.7").is_none());
    }

    #[test]
    fn empty_path_resolves_to_root() {
        let manifest = json!({"kind": "Agent"});
        assert_eq!(resolve(&manifest, ""), Some(&manifest));
    }

    #[test]
    fn depth_guard_stops_pathological_paths() {
        let mut manifest = json!("leaf");
        for _ in 0..100 {
            manifest = json!({ "n": manifest });
        }
        let path = vec!["n"; 100].join(".");
        assert!(resolve(&manifest, &path).is_none());
    }

    #[test]
    fn classify_accepts_nested_and_flattened_spellings() {
        let nested = json!({"spec": {"agentType": "kagent"}});
        let flat = json!({"agentType": "kagent"});
        assert_eq!(classify(&nested, "agentType"), Some(&json!("kagent")));
        assert_eq!(classify(&flat, "agentType"), Some(&json!("kagent")));
    }
}
