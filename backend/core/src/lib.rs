pub mod error;
pub mod event;
pub mod message;
pub mod traits;

pub use error::WebhookError;
pub use event::{EventKind, InboundEvent};
pub use message::OutboundReply;
pub use traits::{MemberStore, MessagingApi, SignatureVerifier};
