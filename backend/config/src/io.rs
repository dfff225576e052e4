//! Config file discovery and loading.

use crate::schema::LineQrConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Env var naming an explicit config file.
pub const CONFIG_PATH_VAR: &str = "LINEQR_CONFIG";

/// Config file looked up in the working directory.
const LOCAL_CONFIG_FILE: &str = "line_secret_key.yaml";

/// Resolve which config file to read.
///
/// Priority: explicit path > `LINEQR_CONFIG` env > `./line_secret_key.yaml`
/// > `~/.lineqr/config.yaml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return local;
    }
    match dirs::home_dir() {
        Some(home) => home.join(".lineqr").join("config.yaml"),
        None => local,
    }
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist, so secrets can
/// come from the environment alone.
pub async fn load_config(path: &Path) -> Result<LineQrConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(LineQrConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse config YAML. An empty document is the default config.
pub fn parse_config(raw: &str) -> Result<LineQrConfig> {
    if raw.trim().is_empty() {
        return Ok(LineQrConfig::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}
