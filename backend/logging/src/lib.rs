//! Structured logging for lineqr.
//!
//! Handles subscriber setup (console + optional rolling JSON file), redaction
//! of tokens in free text, and the structured webhook event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, WebhookLogEvent};
pub use logger::{LogGuard, bootstrap_subscriber, init_logger};
pub use redact::redact_sensitive_data;
