//! Config defaults: applies default values to parsed config.

use crate::schema::{LineQrConfig, LoggingConfig, ServerConfig};

/// Port used when `PORT` is unset or unparseable.
pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

pub const DEFAULT_WEBHOOK_PATH: &str = "/callback";

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";

pub const DEFAULT_DATA_API_BASE_URL: &str = "https://api-data.line.me";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: LineQrConfig) -> LineQrConfig {
    let config = apply_line_defaults(config);
    let config = apply_server_defaults(config);
    apply_logging_defaults(config)
}

fn apply_line_defaults(mut config: LineQrConfig) -> LineQrConfig {
    if config.line.api_base_url.is_none() {
        config.line.api_base_url = Some(DEFAULT_API_BASE_URL.to_string());
    }
    if config.line.data_api_base_url.is_none() {
        config.line.data_api_base_url = Some(DEFAULT_DATA_API_BASE_URL.to_string());
    }
    config
}

fn apply_server_defaults(mut config: LineQrConfig) -> LineQrConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if server.bind_address.is_none() {
        server.bind_address = Some(DEFAULT_BIND_ADDRESS.to_string());
    }
    if server.webhook_path.is_none() {
        server.webhook_path = Some(DEFAULT_WEBHOOK_PATH.to_string());
    }
    config
}

/// Ensure logging.level is set. `dir` stays unset unless configured.
fn apply_logging_defaults(mut config: LineQrConfig) -> LineQrConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_missing_sections() {
        let config = apply_all_defaults(LineQrConfig::default());
        let server = config.server.as_ref().unwrap();
        assert_eq!(server.webhook_path.as_deref(), Some("/callback"));
        assert_eq!(config.logging.as_ref().unwrap().level.as_deref(), Some("info"));
        assert_eq!(config.line.api_base_url.as_deref(), Some(DEFAULT_API_BASE_URL));
    }

    #[test]
    fn keeps_explicit_values() {
        let mut config = LineQrConfig::default();
        config.server = Some(ServerConfig {
            bind_address: Some("127.0.0.1".into()),
            webhook_path: Some("/hooks/line".into()),
        });
        let config = apply_all_defaults(config);
        assert_eq!(config.webhook_path(), "/hooks/line");
        assert_eq!(config.bind_address(), "127.0.0.1");
    }
}
