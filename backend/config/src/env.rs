//! Environment handling for config values.
//!
//! - `${VAR_NAME}` references in string values are resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes
//!   to a literal `${VAR}`.
//! - `LINE_CHANNEL_SECRET` / `LINE_CHANNEL_ACCESS_TOKEN` override the file.
//! - `PORT` selects the listener port.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::defaults::DEFAULT_PORT;
use crate::schema::LineQrConfig;

pub const CHANNEL_SECRET_VAR: &str = "LINE_CHANNEL_SECRET";
pub const CHANNEL_ACCESS_TOKEN_VAR: &str = "LINE_CHANNEL_ACCESS_TOKEN";
pub const PORT_VAR: &str = "PORT";

/// Matches `${VAR}` and its escaped form `$${VAR}` in one pass.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Returns an error if any referenced env var is not set or is empty.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Collect all env var names referenced in a config value tree (for diagnostics).
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    let mut vars = Vec::new();
    collect_vars_recursive(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}

fn collect_vars_recursive(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            for caps in ENV_VAR_PATTERN.captures_iter(s) {
                if caps[1].is_empty() {
                    out.push(caps[2].to_string());
                }
            }
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_vars_recursive(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_vars_recursive(v, out)),
        _ => {}
    }
}

/// Let `LINE_CHANNEL_SECRET` / `LINE_CHANNEL_ACCESS_TOKEN` override file values.
pub fn apply_env_overrides_with(
    mut config: LineQrConfig,
    env: &HashMap<String, String>,
) -> LineQrConfig {
    if let Some(secret) = env.get(CHANNEL_SECRET_VAR).filter(|v| !v.is_empty()) {
        debug!(var = CHANNEL_SECRET_VAR, "Overriding channel secret from environment");
        config.line.channel_secret = Some(secret.clone());
    }
    if let Some(token) = env.get(CHANNEL_ACCESS_TOKEN_VAR).filter(|v| !v.is_empty()) {
        debug!(var = CHANNEL_ACCESS_TOKEN_VAR, "Overriding channel access token from environment");
        config.line.channel_access_token = Some(token.clone());
    }
    config
}

/// Read the listener port from `PORT`, falling back to 5000.
pub fn port_from_env() -> u16 {
    resolve_port(std::env::var(PORT_VAR).ok().as_deref())
}

/// Parse a raw `PORT` value. Unset or unparseable values yield the default.
pub fn resolve_port(raw: Option<&str>) -> u16 {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_PORT;
    };
    match raw.parse::<u16>() {
        Ok(port) => port,
        Err(e) => {
            warn!(value = %raw, error = %e, "Unparseable PORT; using {}", DEFAULT_PORT);
            DEFAULT_PORT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"line": {"channel_secret": "${MY_SECRET}"}});
        let env = env(&[("MY_SECRET", "abc123")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["line"]["channel_secret"], "abc123");
    }

    #[test]
    fn error_on_missing_var() {
        let v = json!({"line": {"channel_secret": "${MISSING_VAR}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("MISSING_VAR"));
        assert!(msg.contains("line.channel_secret"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"k": "keep $${NOT_A_VAR} here"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["k"], "keep ${NOT_A_VAR} here");
    }

    #[test]
    fn passthrough_non_var_strings() {
        let v = json!({"key": "plain-string", "n": 3});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result, v);
    }

    #[test]
    fn collects_referenced_vars_skipping_escapes() {
        let v = json!({"a": "${FOO}", "b": {"c": ["${BAR}", "$${BAZ}"]}});
        let vars = collect_referenced_vars(&v);
        assert_eq!(vars, vec!["BAR".to_string(), "FOO".to_string()]);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut cfg = LineQrConfig::default();
        cfg.line.channel_secret = Some("from-file".into());
        let cfg = apply_env_overrides_with(
            cfg,
            &env(&[(CHANNEL_SECRET_VAR, "from-env"), (CHANNEL_ACCESS_TOKEN_VAR, "")]),
        );
        assert_eq!(cfg.line.channel_secret.as_deref(), Some("from-env"));
        assert!(cfg.line.channel_access_token.is_none());
    }

    #[test]
    fn port_defaults_to_5000() {
        assert_eq!(resolve_port(None), 5000);
        assert_eq!(resolve_port(Some("")), 5000);
        assert_eq!(resolve_port(Some("not-a-port")), 5000);
        assert_eq!(resolve_port(Some("70000")), 5000);
    }

    #[test]
    fn port_parses_valid_value() {
        assert_eq!(resolve_port(Some("8080")), 8080);
        assert_eq!(resolve_port(Some(" 3000 ")), 3000);
    }
}
