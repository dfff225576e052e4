//! LINE Webhook Receiver
//!
//! Signature validation and deserialization of inbound webhook payloads
//! into [`InboundEvent`]s.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use lineqr_core::{EventKind, InboundEvent, SignatureVerifier, WebhookError};

/// Header carrying the base64 HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Verifies `X-Line-Signature` against the channel secret.
#[derive(Clone)]
pub struct LineSignatureVerifier {
    channel_secret: String,
}

impl LineSignatureVerifier {
    pub fn new(channel_secret: impl Into<String>) -> Self {
        Self {
            channel_secret: channel_secret.into(),
        }
    }

    /// Compute the signature LINE would send for `body`. Used by tests and tooling.
    pub fn sign(&self, body: &[u8]) -> Option<String> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.channel_secret.as_bytes()).ok()?;
        mac.update(body);
        Some(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl SignatureVerifier for LineSignatureVerifier {
    fn verify(&self, body: &[u8], signature: &str) -> bool {
        let Ok(expected) = STANDARD.decode(signature.trim()) else {
            debug!("Signature header is not valid base64");
            return false;
        };
        let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(self.channel_secret.as_bytes()) else {
            return false;
        };
        mac.update(body);
        // Constant-time comparison
        mac.verify_slice(&expected).is_ok()
    }
}

// ---------------------------------------------------------------------------
// LINE wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LineWebhook {
    events: Vec<LineEvent>,
}

#[derive(Deserialize)]
struct LineEvent {
    #[serde(rename = "type")]
    event_type: String,
    message: Option<LineMessage>,
    source: Option<LineSource>,
    #[serde(rename = "replyToken")]
    reply_token: Option<String>,
}

#[derive(Deserialize)]
struct LineMessage {
    #[serde(rename = "type")]
    kind: String,
    id: Option<String>,
    text: Option<String>,
}

#[derive(Deserialize)]
struct LineSource {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

/// Parse a webhook body into events, in delivery order.
///
/// Fails with [`WebhookError::MalformedPayload`] if the body is not a LINE
/// webhook envelope or a text/image message lacks its payload.
pub fn parse_webhook(body: &[u8]) -> Result<Vec<InboundEvent>, WebhookError> {
    let webhook: LineWebhook = serde_json::from_slice(body)
        .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

    webhook.events.into_iter().map(convert_event).collect()
}

fn convert_event(ev: LineEvent) -> Result<InboundEvent, WebhookError> {
    let kind = match ev.event_type.as_str() {
        "message" => {
            let msg = ev.message.ok_or_else(|| {
                WebhookError::MalformedPayload("message event without a message".into())
            })?;
            convert_message(msg)?
        }
        "follow" => EventKind::Follow,
        "unfollow" => EventKind::Unfollow,
        other => EventKind::Unsupported { name: other.to_string() },
    };

    Ok(InboundEvent {
        reply_token: ev.reply_token,
        source_user_id: ev.source.and_then(|s| s.user_id),
        kind,
    })
}

fn convert_message(msg: LineMessage) -> Result<EventKind, WebhookError> {
    match msg.kind.as_str() {
        "text" => msg
            .text
            .map(|text| EventKind::Text { text })
            .ok_or_else(|| WebhookError::MalformedPayload("text message without text".into())),
        "image" => msg
            .id
            .map(|message_id| EventKind::Image { message_id })
            .ok_or_else(|| WebhookError::MalformedPayload("image message without id".into())),
        other => Ok(EventKind::Unsupported { name: other.to_string() }),
    }
}
