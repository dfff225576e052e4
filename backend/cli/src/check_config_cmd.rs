//! CLI Check-Config Command
//!
//! Loads the config the way `serve` would and prints it with secrets masked.

use std::path::Path;

use anyhow::Result;

use lineqr_config::{
    collect_redacted_paths, collect_referenced_vars, load_and_prepare, load_config, port_from_env,
    redact, resolve_config_path,
};
use lineqr_logging::bootstrap_subscriber;

pub async fn run(explicit: Option<&Path>) -> Result<()> {
    let _bootstrap = tracing::subscriber::set_default(bootstrap_subscriber());

    let path = resolve_config_path(explicit);
    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("  (not found; using environment only)");
    }

    let raw = serde_json::to_value(load_config(&path).await?)?;
    let referenced = collect_referenced_vars(&raw);
    if !referenced.is_empty() {
        println!("Environment references: {}", referenced.join(", "));
    }

    let config = match load_and_prepare(&path).await {
        Ok(config) => config,
        Err(e) => {
            println!("❌ {e:#}");
            return Err(e);
        }
    };

    let value = serde_json::to_value(&config)?;
    println!("\n{}", serde_yaml::to_string(&redact(&value))?);
    println!("Masked fields: {}", collect_redacted_paths(&value).join(", "));
    println!("Listening port: {}", port_from_env());
    println!("\n✅ Config is valid.");
    Ok(())
}
