//! Reusable test helpers for webhook HTTP tests.
//!
//! Provides `TestApp`, which wires the real router, signature verifier and QR
//! reader to a fake messaging platform that records replies.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use bytes::Bytes;
use http_body_util::BodyExt;
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use lineqr_channels::{LineSignatureVerifier, SIGNATURE_HEADER};
use lineqr_core::{MessagingApi, OutboundReply};
use lineqr_gateway::{GatewayState, InMemoryMemberStore, build_router};
use lineqr_understanding::{DetectedSymbol, QrReader, SymbolScanner};

pub const CHANNEL_SECRET: &str = "test-channel-secret";

/// Fake platform: serves canned message content and records replies.
#[derive(Default)]
pub struct FakePlatform {
    pub content: Mutex<HashMap<String, Vec<u8>>>,
    pub replies: Mutex<Vec<OutboundReply>>,
    /// Tokens the platform refuses, as if already consumed.
    pub consumed_tokens: Mutex<Vec<String>>,
}

#[async_trait]
impl MessagingApi for FakePlatform {
    async fn fetch_content(&self, message_id: &str) -> Result<Bytes> {
        self.content
            .lock()
            .unwrap()
            .get(message_id)
            .cloned()
            .map(Bytes::from)
            .ok_or_else(|| anyhow!("404 for message {message_id}"))
    }

    async fn reply(&self, reply: &OutboundReply) -> Result<()> {
        let mut consumed = self.consumed_tokens.lock().unwrap();
        if consumed.contains(&reply.reply_token) {
            return Err(anyhow!("400 Invalid reply token"));
        }
        consumed.push(reply.reply_token.clone());
        self.replies.lock().unwrap().push(reply.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub platform: Arc<FakePlatform>,
    pub members: Arc<InMemoryMemberStore>,
    signer: LineSignatureVerifier,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_path("/callback")
    }

    pub fn with_path(webhook_path: &str) -> Self {
        Self::build(webhook_path, QrReader::default())
    }

    /// App whose QR reader uses `scanner` instead of the real one.
    pub fn with_scanner(scanner: Arc<dyn SymbolScanner>) -> Self {
        Self::build("/callback", QrReader::new(scanner))
    }

    fn build(webhook_path: &str, qr: QrReader) -> Self {
        let platform = Arc::new(FakePlatform::default());
        let members = Arc::new(InMemoryMemberStore::new());
        let signer = LineSignatureVerifier::new(CHANNEL_SECRET);
        let state = GatewayState::new(
            Arc::new(signer.clone()),
            platform.clone(),
            qr,
            members.clone(),
        );
        Self {
            router: build_router(state, webhook_path),
            platform,
            members,
            signer,
        }
    }

    pub fn add_content(&self, message_id: &str, bytes: Vec<u8>) {
        self.platform
            .content
            .lock()
            .unwrap()
            .insert(message_id.to_string(), bytes);
    }

    pub fn replies(&self) -> Vec<OutboundReply> {
        self.platform.replies.lock().unwrap().clone()
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// POST a correctly signed body to `path`.
    pub async fn post_signed(&self, path: &str, body: &str) -> Response<Body> {
        let signature = self.signer.sign(body.as_bytes()).unwrap();
        self.post_with_signature(path, body, Some(&signature)).await
    }

    pub async fn post_with_signature(
        &self,
        path: &str,
        body: &str,
        signature: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::post(path).header("content-type", "application/json");
        if let Some(sig) = signature {
            builder = builder.header(SIGNATURE_HEADER, sig);
        }
        self.oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).expect("body is not JSON")
}

// ============================================================================
// Payload builders
// ============================================================================

pub fn webhook(events: Vec<Value>) -> String {
    json!({ "destination": "Ubot", "events": events }).to_string()
}

pub fn text_event(user_id: &str, reply_token: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "mode": "active",
        "timestamp": 1_700_000_000_000u64,
        "replyToken": reply_token,
        "source": { "type": "user", "userId": user_id },
        "message": { "type": "text", "id": "1", "text": text }
    })
}

pub fn image_event(user_id: &str, reply_token: &str, message_id: &str) -> Value {
    json!({
        "type": "message",
        "mode": "active",
        "timestamp": 1_700_000_000_000u64,
        "replyToken": reply_token,
        "source": { "type": "user", "userId": user_id },
        "message": { "type": "image", "id": message_id, "contentProvider": { "type": "line" } }
    })
}

pub fn follow_event(user_id: &str, reply_token: &str) -> Value {
    json!({
        "type": "follow",
        "replyToken": reply_token,
        "source": { "type": "user", "userId": user_id }
    })
}

pub fn unfollow_event(user_id: &str) -> Value {
    json!({ "type": "unfollow", "source": { "type": "user", "userId": user_id } })
}

/// Message event of an arbitrary non-text, non-image kind.
pub fn message_event(user_id: &str, reply_token: &str, kind: &str) -> Value {
    json!({
        "type": "message",
        "replyToken": reply_token,
        "source": { "type": "user", "userId": user_id },
        "message": { "type": kind, "id": "77", "packageId": "1", "stickerId": "1" }
    })
}

pub fn postback_event(user_id: &str, reply_token: &str) -> Value {
    json!({
        "type": "postback",
        "replyToken": reply_token,
        "source": { "type": "user", "userId": user_id },
        "postback": { "data": "action=buy" }
    })
}

/// `event` as delivered without a reply token.
pub fn without_reply_token(mut event: Value) -> Value {
    if let Some(obj) = event.as_object_mut() {
        obj.remove("replyToken");
    }
    event
}

/// Scanner that panics the way `rqrr` does on some damaged grids.
pub struct PanickingScanner;

impl SymbolScanner for PanickingScanner {
    fn scan(&self, _image: &GrayImage) -> Vec<DetectedSymbol> {
        panic!("assertion failed: scan >= 1");
    }
}

/// PNG of a QR code encoding `data`: 8px modules, 4-module quiet zone.
pub fn qr_png(data: &str) -> Vec<u8> {
    const MODULE_PX: u32 = 8;
    const QUIET: u32 = 4;

    let code = QrCode::new(data.as_bytes()).unwrap();
    let width = code.width() as u32;
    let side = (width + 2 * QUIET) * MODULE_PX;
    let mut canvas = GrayImage::from_pixel(side, side, Luma([255]));
    for (i, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let (mx, my) = (i as u32 % width, i as u32 / width);
        for dy in 0..MODULE_PX {
            for dx in 0..MODULE_PX {
                canvas.put_pixel(
                    (QUIET + mx) * MODULE_PX + dx,
                    (QUIET + my) * MODULE_PX + dy,
                    Luma([0]),
                );
            }
        }
    }

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(canvas)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    png
}
