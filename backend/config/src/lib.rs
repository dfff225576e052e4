//! `lineqr-config`: runtime configuration for the lineqr webhook bot.
//!
//! Provides:
//! - Typed config schema (`line` secrets, server, logging)
//! - Config file discovery and YAML loading
//! - `${ENV_VAR}` substitution and environment overrides
//! - `PORT` resolution
//! - Default value application and validation
//! - Config redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, DEFAULT_PORT};
pub use env::{
    apply_env_overrides_with, collect_referenced_vars, port_from_env, resolve_env_vars_with,
    resolve_port, MissingEnvVarError,
};
pub use io::{load_config, parse_config, resolve_config_path};
pub use redact::{collect_redacted_paths, redact};
pub use schema::{LineConfig, LineQrConfig, LoggingConfig, Secrets, ServerConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load, apply env substitution and overrides, apply defaults, and validate.
///
/// This is the main entry point for loading a config at startup. Validation
/// errors fail the load; warnings are logged.
pub async fn load_and_prepare(path: &Path) -> Result<LineQrConfig> {
    let raw_config = load_config(path).await?;
    prepare(raw_config, &std::env::vars().collect())
}

/// The pure half of [`load_and_prepare`], with an explicit environment.
pub fn prepare(raw_config: LineQrConfig, env: &HashMap<String, String>) -> Result<LineQrConfig> {
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;

    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;

    let config: LineQrConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides_with(config, env);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if !report.is_valid() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        let summary: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("invalid configuration: {}", summary.join("; "));
    }

    Ok(config)
}
