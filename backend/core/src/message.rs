use serde::{Deserialize, Serialize};

/// A text reply addressed to the reply token of the event being answered.
///
/// Created by a handler and consumed immediately by [`crate::MessagingApi::reply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundReply {
    pub reply_token: String,
    pub text: String,
}

impl OutboundReply {
    pub fn new(reply_token: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reply_token: reply_token.into(),
            text: text.into(),
        }
    }
}
