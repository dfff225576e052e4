//! Webhook Event Logger
//!
//! Structured records of what the dispatcher did with each inbound event,
//! emitted through `tracing` under the `webhook_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WebhookLogEvent {
    EventReceived { kind: String },
    ReplySent { text: String },
    QrDecoded { payload_len: usize },
    QrFailed { reason: String },
    MemberJoined { already_member: bool },
    Error { error_msg: String },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: WebhookLogEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Build the entry for an event, redacting free text.
    pub fn entry(user_id: Option<&str>, mut event: WebhookLogEvent) -> EventLogEntry {
        match &mut event {
            WebhookLogEvent::ReplySent { text } => *text = redact_sensitive_data(text),
            WebhookLogEvent::QrFailed { reason } => *reason = redact_sensitive_data(reason),
            WebhookLogEvent::Error { error_msg } => *error_msg = redact_sensitive_data(error_msg),
            _ => {}
        }

        EventLogEntry {
            user_id: user_id.unwrap_or("unknown").to_string(),
            timestamp: Utc::now(),
            event,
        }
    }

    /// Log an event for a user.
    pub fn log_event(user_id: Option<&str>, event: WebhookLogEvent) {
        let entry = Self::entry(user_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "webhook_events", entry = %json, "Webhook event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_redacts_error_text() {
        let entry = EventLogger::entry(
            Some("U1"),
            WebhookLogEvent::Error {
                error_msg: "401 for Bearer abc.def.ghi".into(),
            },
        );
        let WebhookLogEvent::Error { error_msg } = &entry.event else {
            panic!("unexpected event");
        };
        assert!(!error_msg.contains("abc.def.ghi"));
        assert_eq!(entry.user_id, "U1");
    }

    #[test]
    fn test_entry_serializes_with_tag() {
        let entry = EventLogger::entry(None, WebhookLogEvent::QrDecoded { payload_len: 5 });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "qr_decoded");
        assert_eq!(json["user_id"], "unknown");
    }
}
