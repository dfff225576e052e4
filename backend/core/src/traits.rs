use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::message::OutboundReply;

/// Checks that a webhook body was signed by the platform.
///
/// Implementations must compare in constant time.
pub trait SignatureVerifier: Send + Sync {
    /// Returns `true` if `signature` matches `body` under the configured secret.
    fn verify(&self, body: &[u8], signature: &str) -> bool;
}

/// The two outbound calls the bot makes to the messaging platform.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Download the binary content of a message (e.g. an image) by its id.
    async fn fetch_content(&self, message_id: &str) -> Result<Bytes>;

    /// Send one reply. Reply tokens are single-use; a second send with the
    /// same token is expected to fail at the platform.
    async fn reply(&self, reply: &OutboundReply) -> Result<()>;
}

/// Registry of users who joined via `/join` or by following the bot.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Add a member. Returns `false` if the user was already a member.
    async fn add(&self, user_id: &str) -> bool;

    /// Remove a member. Returns `false` if the user was not a member.
    async fn remove(&self, user_id: &str) -> bool;

    async fn contains(&self, user_id: &str) -> bool;

    async fn count(&self) -> usize;
}
