//! Outbound send request.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Body of `POST /api/send`.
///
/// The backend answers with a status object, but the client never waits on it
/// for the correctness of local state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    /// Identity of the recipient peer.
    #[serde(rename = "recipient_ip")]
    pub recipient: String,

    /// Message text, exactly as typed.
    pub content: String,
}

impl SendRequest {
    /// Path the request is posted to, relative to the backend base URL.
    pub const PATH: &'static str = "/api/send";

    /// Create a send request.
    pub fn new(recipient: impl Into<String>, content: impl Into<String>) -> Self {
        Self { recipient: recipient.into(), content: content.into() }
    }

    /// JSON body.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
