//! Configuration merge logic
//!
//! Layers are merged in order, last wins:
//! - Objects: deep-merge by key
//! - Arrays: replace
//! - Scalars: override

use serde_json::Value;

/// Deep merge two JSON values.
///
/// `null` in the overlay overrides whatever the base held.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        // Arrays and scalars: overlay wins entirely
        (_, overlay) => overlay,
    }
}

/// Merge layers in precedence order (first is base, last wins)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_deep_merge() {
        let base = json!({
            "verdict": {"signature_policy": "informational"},
            "hashes": {"salt_mode": "prefix"}
        });
        let overlay = json!({
            "hashes": {"salt_mode": "suffix"}
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["hashes"]["salt_mode"], "suffix");
        assert_eq!(result["verdict"]["signature_policy"], "informational");
    }

    #[test]
    fn test_sibling_keys_preserved() {
        let base = json!({"schema": {"path": "a.json"}, "signature": {"enabled": true}});
        let overlay = json!({"schema": {}});
        let result = deep_merge(base, overlay);

        assert_eq!(result["schema"]["path"], "a.json");
        assert_eq!(result["signature"]["enabled"], true);
    }

    #[test]
    fn test_array_replaced() {
        let result = deep_merge(json!({"list": [1, 2, 3]}), json!({"list": [9]}));
        assert_eq!(result["list"], json!([9]));
    }

    #[test]
    fn test_null_overrides() {
        let result = deep_merge(json!({"schema": {"path": "a.json"}}), json!({"schema": {"path": null}}));
        assert!(result["schema"]["path"].is_null());
    }

    #[test]
    fn test_merge_layers_precedence() {
        let builtin = json!({
            "verdict": {"signature_policy": "informational"},
            "signature": {"enabled": true}
        });
        let file = json!({
            "verdict": {"signature_policy": "gating"},
            "signature": {"enabled": false}
        });
        let cli = json!({
            "signature": {"enabled": true}
        });

        let result = merge_layers(vec![builtin, file, cli]);

        assert_eq!(result["verdict"]["signature_policy"], "gating");
        assert_eq!(result["signature"]["enabled"], true);
    }
}
