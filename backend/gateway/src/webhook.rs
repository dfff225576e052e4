//! Webhook endpoint: validate → parse → route → reply.

use axum::{body::Bytes, extract::State, http::HeaderMap};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use lineqr_channels::{SIGNATURE_HEADER, parse_webhook};
use lineqr_core::WebhookError;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Handler for `POST /callback`. Responds `OK` once every event is handled.
pub async fn callback(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, ApiError> {
    let request_id = Uuid::new_v4();
    handle(&state, &headers, &body)
        .instrument(info_span!("webhook", %request_id))
        .await?;
    Ok("OK")
}

async fn handle(state: &GatewayState, headers: &HeaderMap, body: &[u8]) -> Result<(), WebhookError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::InvalidSignature)?;

    if !state.verifier.verify(body, signature) {
        return Err(WebhookError::InvalidSignature);
    }

    let events = parse_webhook(body)?;
    debug!(count = events.len(), "Parsed webhook events");

    state.dispatcher.dispatch_all(&events).await?;
    info!(count = events.len(), "Webhook handled");
    Ok(())
}
