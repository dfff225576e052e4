//! Event Dispatcher
//!
//! Routes each inbound event by kind and sends at most one reply per event:
//! - text `/join` → membership confirmation echoing the user id
//! - image → QR payload (or the fallback message)
//! - follow / unfollow → membership bookkeeping, no reply
//!
//! Any other text, and unsupported kinds, are silently ignored.

use std::sync::Arc;

use tracing::{debug, info, warn};

use lineqr_core::{EventKind, InboundEvent, MemberStore, MessagingApi, OutboundReply, WebhookError};
use lineqr_logging::{EventLogger, WebhookLogEvent};
use lineqr_understanding::{QrDecodeError, QrReader, reply_for};

/// The only text command the bot answers.
pub const JOIN_COMMAND: &str = "/join";

pub struct EventDispatcher {
    api: Arc<dyn MessagingApi>,
    qr: QrReader,
    members: Arc<dyn MemberStore>,
}

impl EventDispatcher {
    pub fn new(api: Arc<dyn MessagingApi>, qr: QrReader, members: Arc<dyn MemberStore>) -> Self {
        Self { api, qr, members }
    }

    /// Handle every event of one webhook call, in order.
    ///
    /// Stops at the first outbound-call failure.
    pub async fn dispatch_all(&self, events: &[InboundEvent]) -> Result<(), WebhookError> {
        for event in events {
            if let Err(e) = self.dispatch(event).await {
                EventLogger::log_event(
                    event.source_user_id.as_deref(),
                    WebhookLogEvent::Error {
                        error_msg: e.to_string(),
                    },
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// Handle one event: build its reply (if any) and send it.
    pub async fn dispatch(&self, event: &InboundEvent) -> Result<(), WebhookError> {
        let user_id = event.source_user_id.as_deref();
        EventLogger::log_event(
            user_id,
            WebhookLogEvent::EventReceived {
                kind: event.kind_name().to_string(),
            },
        );

        let Some(text) = self.reply_text(event).await? else {
            return Ok(());
        };

        let Some(token) = event.reply_token.as_deref() else {
            warn!(kind = event.kind_name(), "Event has no reply token; dropping reply");
            return Ok(());
        };

        let reply = OutboundReply::new(token, text);
        self.api.reply(&reply).await?;
        EventLogger::log_event(user_id, WebhookLogEvent::ReplySent { text: reply.text });
        Ok(())
    }

    async fn reply_text(&self, event: &InboundEvent) -> Result<Option<String>, WebhookError> {
        let user_id = event.source_user_id.as_deref();
        match &event.kind {
            EventKind::Text { text } if text == JOIN_COMMAND => Ok(self.handle_join(user_id).await),
            EventKind::Text { .. } => {
                debug!("Ignoring non-command text");
                Ok(None)
            }
            EventKind::Image { message_id } => {
                self.handle_image(user_id, message_id).await.map(Some)
            }
            EventKind::Follow => {
                if let Some(user_id) = user_id {
                    self.members.add(user_id).await;
                    info!(user_id, "User followed the account and was added as a member");
                }
                Ok(None)
            }
            EventKind::Unfollow => {
                if let Some(user_id) = user_id {
                    self.members.remove(user_id).await;
                    info!(user_id, "User unfollowed the account and was removed");
                }
                Ok(None)
            }
            EventKind::Unsupported { name } => {
                debug!(kind = %name, "Ignoring unsupported event");
                Ok(None)
            }
        }
    }

    async fn handle_join(&self, user_id: Option<&str>) -> Option<String> {
        let Some(user_id) = user_id else {
            warn!("/join without a user id; cannot register");
            return None;
        };

        let added = self.members.add(user_id).await;
        EventLogger::log_event(
            Some(user_id),
            WebhookLogEvent::MemberJoined {
                already_member: !added,
            },
        );

        Some(if added {
            info!(user_id, "User joined");
            format!("Welcome! Your user_id: {user_id} has been stored as a member.")
        } else {
            format!("Your user_id: {user_id} is already stored as a member.")
        })
    }

    /// Content fetch errors propagate; everything after the download folds
    /// into the fallback reply. Decoding runs on the blocking pool.
    async fn handle_image(&self, user_id: Option<&str>, message_id: &str) -> Result<String, WebhookError> {
        let content = self.api.fetch_content(message_id).await?;

        let qr = self.qr.clone();
        let outcome = tokio::task::spawn_blocking(move || qr.decode(&content))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "QR decode task did not complete");
                Err(QrDecodeError::ScannerAborted)
            });

        if let Err(e) = &outcome {
            warn!(message_id, error = %e, "QR decode failed; sending fallback reply");
        }
        let event = qr_log_event(&outcome);
        EventLogger::log_event(user_id, event);
        Ok(reply_for(&outcome))
    }
}

fn qr_log_event(outcome: &Result<String, QrDecodeError>) -> WebhookLogEvent {
    match outcome {
        Ok(payload) => WebhookLogEvent::QrDecoded {
            payload_len: payload.len(),
        },
        Err(e) => WebhookLogEvent::QrFailed {
            reason: e.to_string(),
        },
    }
}
