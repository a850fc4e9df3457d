//! Builds [`StrategosSettings`] from compiled defaults, the optional settings
//! file laid over them with [`overlay`], and finally environment overrides.
//! Overrides that fail to parse are ignored and the file value stands.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::{LlmProviderKind, SearchProviderKind, StrategosSettings};

/// Resolve the path to the settings file (`~/.strategos/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".strategos").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<StrategosSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<StrategosSettings> {
    let mut settings = load_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn load_file(path: &Path) -> Result<StrategosSettings> {
    let defaults = serde_json::to_value(StrategosSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        overlay(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Lay the user file over the defaults. Objects merge key by key; a `null`
/// in the file keeps the default; anything else in the file wins outright.
pub fn overlay(defaults: Value, file: Value) -> Value {
    match (defaults, file) {
        (Value::Object(mut merged), Value::Object(file)) => {
            for (key, value) in file.into_iter().filter(|(_, v)| !v.is_null()) {
                let value = match merged.remove(&key) {
                    Some(default) => overlay(default, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (_, file) => file,
    }
}

/// Apply process environment overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut StrategosSettings) {
    apply_overrides_with(settings, |key| std::env::var(key).ok());
}

/// Apply overrides read through `lookup`. Invalid values are ignored
/// (the file/default value stays).
pub fn apply_overrides_with<F>(settings: &mut StrategosSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let string = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = string("STRATEGOS_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = string("STRATEGOS_PORT").and_then(|v| parse_in_range::<u16>(&v, 1, u16::MAX)) {
        settings.server.port = v;
    }

    // ── Generation ──────────────────────────────────────────────────
    if let Some(v) = string("STRATEGOS_LLM_PROVIDER").and_then(|v| LlmProviderKind::parse(&v)) {
        settings.generation.provider = v;
    }
    if let Some(v) = string("GOOGLE_MODEL") {
        settings.generation.model = v;
    }
    if let Some(v) = string("LLM_TEMPERATURE").and_then(|v| parse_in_range::<f64>(&v, 0.0, 2.0)) {
        settings.generation.temperature = v;
    }

    // ── Search ──────────────────────────────────────────────────────
    if let Some(v) =
        string("STRATEGOS_SEARCH_PROVIDER").and_then(|v| SearchProviderKind::parse(&v))
    {
        settings.search.provider = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = string("STRATEGOS_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = string("STRATEGOS_LOG_JSON").and_then(|v| parse_flag(&v)) {
        settings.logging.json = v;
    }
}

// ── Env value parsing ───────────────────────────────────────────────────────

/// Flag values from `.env` files and shells. Unrecognised text is ignored
/// rather than read as `false`.
pub fn parse_flag(val: &str) -> Option<bool> {
    let val = val.trim();
    const ON: [&str; 4] = ["true", "1", "yes", "on"];
    const OFF: [&str; 4] = ["false", "0", "no", "off"];
    if ON.iter().any(|v| v.eq_ignore_ascii_case(val)) {
        Some(true)
    } else if OFF.iter().any(|v| v.eq_ignore_ascii_case(val)) {
        Some(false)
    } else {
        None
    }
}

/// Numeric override, dropped when unparsable or outside `min..=max`. NaN never
/// compares in range, so it is dropped too.
pub fn parse_in_range<T>(val: &str, min: T, max: T) -> Option<T>
where
    T: FromStr + PartialOrd,
{
    let n: T = val.trim().parse().ok()?;
    (min <= n && n <= max).then_some(n)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    // ── overlay ─────────────────────────────────────────────────────

    #[test]
    fn overlay_keeps_sibling_defaults() {
        let defaults = serde_json::json!({"pacing": {"lineDelayMs": 10, "sectionDelayMs": 50}});
        let file = serde_json::json!({"pacing": {"sectionDelayMs": 0}});
        let merged = overlay(defaults, file);
        assert_eq!(merged["pacing"]["lineDelayMs"], 10);
        assert_eq!(merged["pacing"]["sectionDelayMs"], 0);
    }

    #[test]
    fn overlay_null_keeps_default() {
        let defaults = serde_json::json!({"server": {"port": 8000}});
        let file = serde_json::json!({"server": {"port": null}});
        assert_eq!(overlay(defaults, file)["server"]["port"], 8000);
    }

    #[test]
    fn overlay_lists_are_replaced_whole() {
        let defaults = serde_json::json!({"includeDomains": ["a", "b"]});
        let file = serde_json::json!({"includeDomains": ["c"]});
        assert_eq!(overlay(defaults, file)["includeDomains"], serde_json::json!(["c"]));
    }

    // ── load_file ───────────────────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let settings = load_file(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.generation.model, "gemini-2.5-flash");
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"server": {"port": 9090}, "directive": {"pacing": {"lineDelayMs": 0}}}"#,
        )
        .unwrap();

        let settings = load_file(&path).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.directive.pacing.line_delay_ms, 0);
        assert_eq!(settings.directive.pacing.section_delay_ms, 50);
    }

    #[test]
    fn load_domain_list_replaces_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"search": {"includeDomains": ["https://example.org/"]}}"#)
            .unwrap();

        let settings = load_file(&path).unwrap();
        assert_eq!(settings.search.include_domains, vec!["https://example.org/"]);
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = load_file(&path);
        assert!(matches!(result.unwrap_err(), SettingsError::Json(_)));
    }

    // ── overrides ───────────────────────────────────────────────────

    #[test]
    fn overrides_apply_valid_values() {
        let mut settings = StrategosSettings::default();
        apply_overrides_with(
            &mut settings,
            lookup(&[
                ("STRATEGOS_PORT", "9191"),
                ("STRATEGOS_HOST", "127.0.0.1"),
                ("STRATEGOS_LLM_PROVIDER", "openai"),
                ("GOOGLE_MODEL", "gemini-2.5-pro"),
                ("LLM_TEMPERATURE", "0.7"),
                ("STRATEGOS_SEARCH_PROVIDER", "none"),
                ("STRATEGOS_LOG_JSON", "yes"),
            ]),
        );
        assert_eq!(settings.server.port, 9191);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.generation.provider, LlmProviderKind::Openai);
        assert_eq!(settings.generation.model, "gemini-2.5-pro");
        assert!((settings.generation.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(settings.search.provider, SearchProviderKind::None);
        assert!(settings.logging.json);
    }

    #[test]
    fn overrides_ignore_invalid_values() {
        let mut settings = StrategosSettings::default();
        apply_overrides_with(
            &mut settings,
            lookup(&[
                ("STRATEGOS_PORT", "0"),
                ("LLM_TEMPERATURE", "hot"),
                ("STRATEGOS_LLM_PROVIDER", "mystery"),
                ("STRATEGOS_HOST", "   "),
            ]),
        );
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert!(settings.generation.temperature.abs() < f64::EPSILON);
        assert_eq!(settings.generation.provider, LlmProviderKind::Gemini);
    }

    // ── parsing ─────────────────────────────────────────────────────

    #[test]
    fn flags_accept_common_spellings() {
        for val in ["true", "1", "YES", " on "] {
            assert_eq!(parse_flag(val), Some(true), "{val}");
        }
        for val in ["false", "0", "No", "OFF"] {
            assert_eq!(parse_flag(val), Some(false), "{val}");
        }
        assert_eq!(parse_flag("sometimes"), None);
    }

    #[test]
    fn port_override_bounds() {
        assert_eq!(parse_in_range::<u16>("8080", 1, u16::MAX), Some(8080));
        assert_eq!(parse_in_range::<u16>("0", 1, u16::MAX), None);
        assert_eq!(parse_in_range::<u16>("99999", 1, u16::MAX), None);
    }

    #[test]
    fn temperature_override_bounds() {
        assert_eq!(parse_in_range::<f64>("0.5", 0.0, 2.0), Some(0.5));
        assert_eq!(parse_in_range::<f64>("2.5", 0.0, 2.0), None);
        assert_eq!(parse_in_range::<f64>("NaN", 0.0, 2.0), None);
        assert_eq!(parse_in_range::<f64>("inf", 0.0, 2.0), None);
    }
}
