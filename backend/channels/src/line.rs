//! LINE Messaging API client.
//!
//! Downloads message content from the data API and sends replies via the
//! Reply API. Both calls authenticate with the channel access token.
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, error, info};

use lineqr_core::{MessagingApi, OutboundReply};
use lineqr_logging::redact_sensitive_data;

use crate::line_send::ReplyRequest;

#[derive(Clone)]
pub struct LineClientConfig {
    pub channel_access_token: String,
    /// e.g. `https://api.line.me`
    pub api_base_url: String,
    /// e.g. `https://api-data.line.me`
    pub data_api_base_url: String,
}

#[derive(Clone)]
pub struct LineClient {
    config: LineClientConfig,
    http: Client,
}

impl LineClient {
    pub fn new(config: LineClientConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: LineClientConfig, http: Client) -> Self {
        Self { config, http }
    }

    fn content_url(&self, message_id: &str) -> String {
        format!(
            "{}/v2/bot/message/{}/content",
            self.config.data_api_base_url.trim_end_matches('/'),
            message_id
        )
    }

    fn reply_url(&self) -> String {
        format!(
            "{}/v2/bot/message/reply",
            self.config.api_base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl MessagingApi for LineClient {
    async fn fetch_content(&self, message_id: &str) -> Result<Bytes> {
        debug!(message_id, "[LINE] Fetching message content");
        let res = self
            .http
            .get(self.content_url(message_id))
            .bearer_auth(&self.config.channel_access_token)
            .send()
            .await
            .with_context(|| format!("content request for message {message_id} failed"))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(message_id, %status, body = %redact_sensitive_data(&body), "[LINE] Content fetch failed");
            bail!("LINE content fetch for message {message_id} returned {status}");
        }

        let content = res.bytes().await.context("failed to read message content")?;
        debug!(message_id, bytes = content.len(), "[LINE] Fetched message content");
        Ok(content)
    }

    async fn reply(&self, reply: &OutboundReply) -> Result<()> {
        let res = self
            .http
            .post(self.reply_url())
            .bearer_auth(&self.config.channel_access_token)
            .json(&ReplyRequest::from(reply))
            .send()
            .await
            .context("reply request failed")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!(%status, body = %redact_sensitive_data(&body), "[LINE] Reply failed");
            bail!("LINE reply returned {status}");
        }
        info!("[LINE] Reply sent");
        Ok(())
    }
}
