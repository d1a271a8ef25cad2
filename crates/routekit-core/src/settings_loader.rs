//! Settings loading from configuration files.
//!
//! Loads [`RouterSettings`] from TOML or JSON and applies environment variable
//! overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `ROUTEKIT_ORIGIN` | `origin` |
//! | `ROUTEKIT_BASE` | `base` |
//! | `ROUTEKIT_CASE_SENSITIVE` | `case_sensitive` |
//! | `ROUTEKIT_STRICT` | `strict` |
//! | `ROUTEKIT_DEBUG` | `debug` |
//! | `ROUTEKIT_LOG_LEVEL` | `log_level` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use routekit_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/router.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/router.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::RouterError;
use crate::settings::RouterSettings;

/// Loads settings from a TOML string.
///
/// Fields missing from the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<RouterSettings, RouterError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| RouterError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<RouterSettings, RouterError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        RouterError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<RouterSettings, RouterError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<RouterSettings, RouterError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RouterError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> RouterSettings {
    let mut settings = RouterSettings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `ROUTEKIT_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut RouterSettings) {
    apply_overrides_from(settings, |key| std::env::var(key).ok());
}

/// Applies overrides using an arbitrary key lookup.
///
/// [`apply_env_overrides`] is this function backed by the process environment.
pub fn apply_overrides_from<F>(settings: &mut RouterSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("ROUTEKIT_ORIGIN") {
        settings.origin = val;
    }

    if let Some(val) = lookup("ROUTEKIT_BASE") {
        settings.base = val;
    }

    if let Some(val) = lookup("ROUTEKIT_CASE_SENSITIVE") {
        settings.case_sensitive = parse_flag(&val);
    }

    if let Some(val) = lookup("ROUTEKIT_STRICT") {
        settings.strict = parse_flag(&val);
    }

    if let Some(val) = lookup("ROUTEKIT_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Some(val) = lookup("ROUTEKIT_LOG_LEVEL") {
        settings.log_level = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_flag(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn merge_over_defaults(
    value: serde_json::Value,
    format: &str,
) -> Result<RouterSettings, RouterError> {
    let default_json = serde_json::to_value(RouterSettings::default()).map_err(|e| {
        RouterError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        RouterError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            origin = "https://www.example.com:9000"
            base = "/app"
            debug = false
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.origin, "https://www.example.com:9000");
        assert_eq!(settings.base, "/app");
        assert!(!settings.debug);
        // Defaults preserved
        assert_eq!(settings.log_level, "info");
        assert!(!settings.case_sensitive);
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert_eq!(settings, RouterSettings::default());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(RouterError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("strict = \"very\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/definitely/not/here/router.toml");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read TOML file"));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{ "case_sensitive": true, "log_level": "debug" }"#;

        let settings = from_json_str(json).unwrap();
        assert!(settings.case_sensitive);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.origin, "http://localhost");
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    // ── Overrides ───────────────────────────────────────────────────

    #[test]
    fn test_apply_overrides_from_lookup() {
        let mut vars = HashMap::new();
        vars.insert("ROUTEKIT_BASE", "/shop");
        vars.insert("ROUTEKIT_STRICT", "yes");
        vars.insert("ROUTEKIT_DEBUG", "0");
        vars.insert("ROUTEKIT_LOG_LEVEL", "routekit=trace");

        let mut settings = RouterSettings::default();
        apply_overrides_from(&mut settings, |key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(settings.base, "/shop");
        assert!(settings.strict);
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "routekit=trace");
        assert_eq!(settings.origin, "http://localhost");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("no"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"a": {"b": 1, "c": 2}, "d": 3});
        let over = serde_json::json!({"a": {"b": 10}});
        let merged = merge_json(base, over);
        assert_eq!(merged, serde_json::json!({"a": {"b": 10, "c": 2}, "d": 3}));
    }
}
