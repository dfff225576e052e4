//! lineqr runtime configuration schema.
//!
//! Keys are snake_case so the `line` section reads the same as the
//! platform console labels (`channel_access_token`, `channel_secret`).

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for lineqr.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineQrConfig {
    /// Messaging platform credentials and endpoints
    #[serde(default)]
    pub line: LineConfig,

    /// HTTP listener settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_secret: Option<String>,
    /// Base URL of the reply API (overridable for staging and tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// Base URL of the content API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_api_base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the rolling JSON log file. File logging is off when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved secrets
// ---------------------------------------------------------------------------

/// The two platform secrets, read once at startup and shared read-only.
#[derive(Clone, PartialEq, Eq)]
pub struct Secrets {
    pub channel_secret: String,
    pub channel_access_token: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("channel_secret", &"***")
            .field("channel_access_token", &"***")
            .finish()
    }
}

impl LineQrConfig {
    /// Extract the secrets. `None` if either is missing or empty.
    pub fn secrets(&self) -> Option<Secrets> {
        let secret = self.line.channel_secret.as_deref().filter(|s| !s.is_empty())?;
        let token = self
            .line
            .channel_access_token
            .as_deref()
            .filter(|s| !s.is_empty())?;
        Some(Secrets {
            channel_secret: secret.to_string(),
            channel_access_token: token.to_string(),
        })
    }

    pub fn bind_address(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind_address.as_deref())
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(crate::defaults::DEFAULT_BIND_ADDRESS)
    }

    pub fn webhook_path(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.webhook_path.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_WEBHOOK_PATH)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn api_base_url(&self) -> &str {
        self.line
            .api_base_url
            .as_deref()
            .unwrap_or(crate::defaults::DEFAULT_API_BASE_URL)
    }

    pub fn data_api_base_url(&self) -> &str {
        self.line
            .data_api_base_url
            .as_deref()
            .unwrap_or(crate::defaults::DEFAULT_DATA_API_BASE_URL)
    }
}
