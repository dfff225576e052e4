//! LINE Reply API wire types.

use serde::{Deserialize, Serialize};

use lineqr_core::OutboundReply;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: String,
}

impl ReplyMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            message_type: "text".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplyRequest {
    #[serde(rename = "replyToken")]
    pub reply_token: String,
    pub messages: Vec<ReplyMessage>,
}

impl From<&OutboundReply> for ReplyRequest {
    fn from(reply: &OutboundReply) -> Self {
        Self {
            reply_token: reply.reply_token.clone(),
            messages: vec![ReplyMessage::text(reply.text.clone())],
        }
    }
}
