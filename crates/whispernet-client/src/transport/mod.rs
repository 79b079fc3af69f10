//! Network transport for the client.
//!
//! - [`push`]: WebSocket subscription delivering raw push frames
//! - [`http`]: fire-and-forget HTTP sends reporting failures back as events
//!
//! Both are thin I/O layers; decoding and state live in the app and core
//! crates.

pub mod http;
pub mod push;

use thiserror::Error;

pub use http::HttpSender;
pub use push::{ChannelEvent, PushSubscription};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Stream error.
    #[error("stream error: {0}")]
    Stream(String),

    /// HTTP request failed before a response arrived.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),
}
