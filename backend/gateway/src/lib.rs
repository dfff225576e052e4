//! lineqr Gateway HTTP Server
//!
//! Hosts the signed webhook endpoint and routes each inbound event to the
//! `/join` command handler or the QR image handler.

pub mod dispatch;
pub mod error;
pub mod health_api;
pub mod members;
pub mod server;
pub mod webhook;

pub use dispatch::{EventDispatcher, JOIN_COMMAND};
pub use error::ApiError;
pub use members::InMemoryMemberStore;
pub use server::{GatewayState, build_router, start_server};
