use thiserror::Error;

/// Top-level error type for the webhook pipeline.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("invalid webhook signature")]
    InvalidSignature,

    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A call to the messaging platform (content fetch or reply send) failed.
    #[error("messaging API call failed: {0:#}")]
    Upstream(#[from] anyhow::Error),
}

impl WebhookError {
    /// Whether the error was caused by the caller's request rather than by us.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidSignature | Self::MalformedPayload(_))
    }
}
