//! HTTP mapping for pipeline errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use lineqr_core::WebhookError;

/// Wraps [`WebhookError`] so it can be returned from axum handlers.
#[derive(Debug)]
pub struct ApiError(pub WebhookError);

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            WebhookError::InvalidSignature => {
                warn!("Rejecting webhook: invalid signature");
                (StatusCode::BAD_REQUEST, "Invalid signature").into_response()
            }
            WebhookError::MalformedPayload(reason) => {
                warn!(%reason, "Rejecting webhook: malformed payload");
                (StatusCode::BAD_REQUEST, "Malformed payload").into_response()
            }
            other => {
                error!(error = %other, "Webhook processing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
