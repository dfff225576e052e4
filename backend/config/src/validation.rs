//! Config validation with user-friendly error messages.

use crate::schema::LineQrConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &LineQrConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_line(config, &mut report);
    validate_server(config, &mut report);
    report
}

/// Both secrets are required; the endpoint cannot verify or reply without them.
fn validate_line(config: &LineQrConfig, report: &mut ValidationReport) {
    let line = &config.line;
    if line.channel_secret.as_deref().map(str::is_empty).unwrap_or(true) {
        report.error("line.channel_secret", "Channel secret is required");
    }
    if line
        .channel_access_token
        .as_deref()
        .map(str::is_empty)
        .unwrap_or(true)
    {
        report.error("line.channel_access_token", "Channel access token is required");
    }
    for (path, url) in [
        ("line.api_base_url", &line.api_base_url),
        ("line.data_api_base_url", &line.data_api_base_url),
    ] {
        if let Some(url) = url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                report.error(path, format!("'{url}' is not an http(s) URL"));
            }
        }
    }
}

fn validate_server(config: &LineQrConfig, report: &mut ValidationReport) {
    let Some(server) = &config.server else { return };
    if let Some(path) = &server.webhook_path {
        if !path.starts_with('/') {
            report.error(
                "server.webhook_path",
                format!("Webhook path '{path}' must start with '/'"),
            );
        }
    }
    if let Some(addr) = &server.bind_address {
        if addr.trim().is_empty() {
            report.warn("server.bind_address", "Empty bind address; falling back to 0.0.0.0");
        }
    }
}
