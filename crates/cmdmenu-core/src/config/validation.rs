//! Config validation - warns about unknown fields

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Validate plugin config JSON and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return;
    };

    let expected = expected_plugin_config_keys();
    let unknowns = find_unknown_keys(&value, &expected, "");

    for path in unknowns {
        warn!("Unknown config field in {config_name}: {path}");
    }
}

/// Find unknown keys in JSON value compared to expected keys.
/// Returns paths like "submenu.unknownField" for unknown fields.
fn find_unknown_keys(value: &Value, expected: &ExpectedKeys, prefix: &str) -> Vec<String> {
    let mut unknowns = Vec::new();

    let Value::Object(obj) = value else {
        return unknowns;
    };

    for (key, child) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(nested) = expected.nested.get(key.as_str()) {
            unknowns.extend(find_unknown_keys(child, nested, &path));
        } else if !expected.fields.contains(key.as_str()) {
            unknowns.push(path);
        }
    }

    unknowns
}

/// Expected keys for a config section.
/// `fields` are leaf fields, `nested` are nested objects with their own expected keys.
struct ExpectedKeys {
    fields: HashSet<&'static str>,
    nested: HashMap<&'static str, ExpectedKeys>,
}

impl ExpectedKeys {
    fn new(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().copied().collect(),
            nested: HashMap::new(),
        }
    }

    fn with_nested(mut self, key: &'static str, nested: ExpectedKeys) -> Self {
        self.nested.insert(key, nested);
        self
    }
}

/// Expected keys for `PluginConfig` (settings.rs).
/// `customItems`, `slugsToIgnore`, `icons` and `shortcut` are free-form and
/// checked by serde instead, as is `submenu.icons`.
fn expected_plugin_config_keys() -> ExpectedKeys {
    let submenu_keys = ExpectedKeys::new(&["enabled", "shortcut", "debounceMs", "icons"]);
    let button_keys = ExpectedKeys::new(&["position"]);

    ExpectedKeys::new(&[
        "customItems",
        "disabled",
        "slugsToIgnore",
        "icons",
        "shortcut",
    ])
    .with_nested("submenu", submenu_keys)
    .with_nested("searchButton", button_keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_no_warnings() {
        let json = r#"{
            "disabled": false,
            "submenu": {
                "enabled": true,
                "shortcut": "enter"
            },
            "icons": {"posts": "newspaper"},
            "searchButton": {"position": "nav"}
        }"#;

        let value: Value = serde_json::from_str(json).unwrap();
        let unknowns = find_unknown_keys(&value, &expected_plugin_config_keys(), "");

        assert!(
            unknowns.is_empty(),
            "Expected no unknowns, got: {unknowns:?}"
        );
    }

    #[test]
    fn test_unknown_top_level_field() {
        let json = r#"{"submenu": {}, "blurBackground": true}"#;

        let value: Value = serde_json::from_str(json).unwrap();
        let unknowns = find_unknown_keys(&value, &expected_plugin_config_keys(), "");

        assert_eq!(unknowns, vec!["blurBackground"]);
    }

    #[test]
    fn test_unknown_nested_field() {
        let json = r#"{"submenu": {"enabled": true, "debounce": 100}}"#;

        let value: Value = serde_json::from_str(json).unwrap();
        let unknowns = find_unknown_keys(&value, &expected_plugin_config_keys(), "");

        assert_eq!(unknowns, vec!["submenu.debounce"]);
    }

    #[test]
    fn test_free_form_sections_not_descended() {
        let json = r#"{"icons": {"anything": "goes"}, "slugsToIgnore": {"ignoreList": []}}"#;

        let value: Value = serde_json::from_str(json).unwrap();
        let unknowns = find_unknown_keys(&value, &expected_plugin_config_keys(), "");

        assert!(unknowns.is_empty());
    }

    #[test]
    fn test_scoped_icon_config_no_warnings() {
        let json = r#"{
            "icons": {"collections": {"posts": "file-text"}},
            "submenu": {"icons": {"posts": "book-open"}}
        }"#;

        let value: Value = serde_json::from_str(json).unwrap();
        let unknowns = find_unknown_keys(&value, &expected_plugin_config_keys(), "");

        assert!(unknowns.is_empty(), "Expected no unknowns, got: {unknowns:?}");
    }

    #[test]
    fn test_invalid_json_is_ignored() {
        warn_unknown_fields("{not json", "config.json");
    }
}
