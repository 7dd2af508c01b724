//! Layered configuration merge
//!
//! Implements the build configuration merge with:
//! - Objects: deep-merge by key
//! - Arrays: CONCATENATE (earlier layer first)
//! - Scalars: override (last wins)
//!
//! Layer precedence, lowest first:
//! 1. Common defaults
//! 2. Environment defaults
//! 3. Journey/brand composition
//! 4. Explicit environment overrides

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a merge layer comes from. Ordering is precedence: later variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerOrigin {
    CommonDefaults,
    EnvironmentDefaults,
    Composition,
    Override,
}

/// A configuration fragment tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeLayer {
    pub origin: LayerOrigin,
    pub value: Value,
}

impl MergeLayer {
    pub fn new(origin: LayerOrigin, value: Value) -> Self {
        Self { origin, value }
    }
}

/// Smart merge two JSON values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive), keeping the base key order
/// - Arrays: concatenate, base elements first
/// - Scalars: override (overlay wins)
/// - Null overlay: ignored, the base value is kept
pub fn smart_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => {
                        let base_value = slot.take();
                        *slot = smart_merge(base_value, overlay_value);
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }

        (Value::Array(mut base_items), Value::Array(overlay_items)) => {
            base_items.extend(overlay_items);
            Value::Array(base_items)
        }

        (base, Value::Null) => base,

        (_, overlay) => overlay,
    }
}

/// Deep merge two JSON values where arrays replace instead of concatenating.
///
/// Used for property tables (brand properties) where a brand's list is a
/// complete replacement of the default brand's list.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => {
                        let base_value = slot.take();
                        *slot = deep_merge(base_value, overlay_value);
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }

        // Arrays and scalars: overlay wins
        (_, overlay) => overlay,
    }
}

/// Merge layers in precedence order.
///
/// Layers are stably sorted by origin before folding, so two layers of the
/// same origin keep their relative order and an `Override` layer always
/// lands last regardless of where it appears in the input.
pub fn merge_layers(mut layers: Vec<MergeLayer>) -> Value {
    layers.sort_by_key(|layer| layer.origin);
    layers
        .into_iter()
        .map(|layer| layer.value)
        .fold(Value::Null, smart_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_override() {
        let result = smart_merge(json!({"devtool": "eval"}), json!({"devtool": "source-map"}));
        assert_eq!(result["devtool"], "source-map");
    }

    #[test]
    fn test_object_deep_merge() {
        let base = json!({"output": {"filename": "[name].js", "publicPath": "/"}});
        let overlay = json!({"output": {"publicPath": "/static/"}});
        let result = smart_merge(base, overlay);

        assert_eq!(result["output"]["filename"], "[name].js");
        assert_eq!(result["output"]["publicPath"], "/static/");
    }

    #[test]
    fn test_array_concatenate() {
        let base = json!({"plugins": ["A", "B"]});
        let overlay = json!({"plugins": ["C"]});
        let result = smart_merge(base, overlay);

        let plugins = result["plugins"].as_array().unwrap();
        assert_eq!(plugins, &vec![json!("A"), json!("B"), json!("C")]);
    }

    #[test]
    fn test_null_overlay_keeps_base() {
        let result = smart_merge(json!({"limit": 10}), json!({"limit": null}));
        assert_eq!(result["limit"], 10);
    }

    #[test]
    fn test_key_order_preserved() {
        let base = json!({"entry": {"main": ["a"], "vendor": ["b"]}});
        let overlay = json!({"entry": {"main": ["c"]}});
        let result = smart_merge(base, overlay);
        let keys: Vec<&String> = result["entry"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["main", "vendor"]);
    }

    #[test]
    fn test_merge_layers_precedence() {
        let layers = vec![
            MergeLayer::new(LayerOrigin::Override, json!({"mode": "override", "plugins": ["O"]})),
            MergeLayer::new(LayerOrigin::Composition, json!({"mode": "composition", "plugins": ["J"]})),
            MergeLayer::new(LayerOrigin::CommonDefaults, json!({"mode": "common", "plugins": ["C"]})),
            MergeLayer::new(LayerOrigin::EnvironmentDefaults, json!({"mode": "env", "plugins": ["E"]})),
        ];

        let result = merge_layers(layers);

        assert_eq!(result["mode"], "override");
        assert_eq!(result["plugins"], json!(["C", "E", "J", "O"]));
    }

    #[test]
    fn test_same_origin_keeps_input_order() {
        let layers = vec![
            MergeLayer::new(LayerOrigin::Composition, json!({"plugins": ["first"]})),
            MergeLayer::new(LayerOrigin::Composition, json!({"plugins": ["second"]})),
        ];
        let result = merge_layers(layers);
        assert_eq!(result["plugins"], json!(["first", "second"]));
    }

    #[test]
    fn test_deep_merge_replaces_arrays() {
        let base = json!({"languages": ["en", "fr"], "theme": {"primary": "#000", "accent": "#111"}});
        let overlay = json!({"languages": ["de"], "theme": {"primary": "#f00"}});
        let result = deep_merge(base, overlay);

        assert_eq!(result["languages"], json!(["de"]));
        assert_eq!(result["theme"]["primary"], "#f00");
        assert_eq!(result["theme"]["accent"], "#111");
    }

    #[test]
    fn test_nested_deep_merge() {
        let base = json!({"module": {"rules": [{"test": "a"}], "noParse": "x"}});
        let overlay = json!({"module": {"rules": [{"test": "b"}]}});
        let result = smart_merge(base, overlay);

        assert_eq!(result["module"]["rules"].as_array().unwrap().len(), 2);
        assert_eq!(result["module"]["noParse"], "x");
    }
}
