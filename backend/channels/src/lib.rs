//! LINE Messaging API plumbing: inbound webhook handling and outbound calls.

pub mod line;
pub mod line_receive;
pub mod line_send;

pub use line::{LineClient, LineClientConfig};
pub use line_receive::{LineSignatureVerifier, SIGNATURE_HEADER, parse_webhook};
pub use line_send::{ReplyMessage, ReplyRequest};
