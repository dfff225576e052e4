use serde::{Deserialize, Serialize};

/// One user interaction delivered by a webhook call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Single-use token for answering this event. Absent for events that
    /// cannot be replied to (e.g. `unfollow`).
    pub reply_token: Option<String>,
    /// Identifier of the sending user, if the platform disclosed it.
    pub source_user_id: Option<String>,
    pub kind: EventKind,
}

/// What happened, with the kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A text message.
    Text { text: String },
    /// An image message; the binary content is fetched separately by id.
    Image { message_id: String },
    /// The user added the bot as a friend.
    Follow,
    /// The user blocked the bot.
    Unfollow,
    /// Anything else (stickers, postbacks, joins, ...). Carries the platform type name.
    Unsupported { name: String },
}

impl InboundEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            reply_token: None,
            source_user_id: None,
            kind,
        }
    }

    pub fn with_reply_token(mut self, token: impl Into<String>) -> Self {
        self.reply_token = Some(token.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.source_user_id = Some(user_id.into());
        self
    }

    /// Short label used in logs.
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            EventKind::Text { .. } => "text",
            EventKind::Image { .. } => "image",
            EventKind::Follow => "follow",
            EventKind::Unfollow => "unfollow",
            EventKind::Unsupported { name } => name,
        }
    }
}
