//! Push channel events.
//!
//! Every frame on the push channel is a JSON object with a `type` tag and a
//! `payload`:
//!
//! ```json
//! { "type": "PEER_LIST_UPDATE", "payload": ["10.0.0.2", {"identity": "10.0.0.3", "nickname": "bob"}] }
//! { "type": "NEW_MESSAGE", "payload": { "sender": "10.0.0.2", "content": "hi" } }
//! ```
//!
//! # Security
//!
//! - Frames larger than [`MAX_FRAME_BYTES`] are rejected before parsing.
//! - Peer-supplied timestamps or extra fields are ignored; only the fields
//!   modelled here are ever read.

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Sender value the backend uses for messages originated by this client.
pub const SELF_SENDER: &str = "you";

/// Upper bound on a single push frame.
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

const PEER_LIST_UPDATE: &str = "PEER_LIST_UPDATE";
const NEW_MESSAGE: &str = "NEW_MESSAGE";

/// A decoded push event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// Full replacement snapshot of the known peers.
    PeerListUpdate(Vec<PeerEntry>),

    /// One message to append to the conversation log.
    NewMessage(NewMessage),

    /// Event type this client does not understand. Ignored by consumers.
    Unknown {
        /// Value of the `type` tag.
        kind: String,
    },
}

impl PushEvent {
    /// Decode one push frame.
    ///
    /// Unknown `type` values decode successfully to [`PushEvent::Unknown`].
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::FrameTooLarge`] if the frame exceeds
    ///   [`MAX_FRAME_BYTES`]
    /// - [`ProtocolError::Json`] if the frame is not a JSON object or the
    ///   payload does not match the event type
    /// - [`ProtocolError::MissingField`] if the `type` tag is absent
    pub fn decode(frame: &str) -> Result<Self> {
        if frame.len() > MAX_FRAME_BYTES {
            return Err(ProtocolError::FrameTooLarge { size: frame.len(), max: MAX_FRAME_BYTES });
        }

        let envelope: Envelope = serde_json::from_str(frame)?;
        let kind = envelope.kind.ok_or(ProtocolError::MissingField("type"))?;

        match kind.as_str() {
            PEER_LIST_UPDATE => Ok(Self::PeerListUpdate(serde_json::from_value(envelope.payload)?)),
            NEW_MESSAGE => Ok(Self::NewMessage(serde_json::from_value(envelope.payload)?)),
            _ => Ok(Self::Unknown { kind }),
        }
    }

    /// Encode as a push frame.
    ///
    /// Used by simulated servers and tests; the client itself never sends push
    /// frames.
    pub fn encode(&self) -> Result<String> {
        let frame = match self {
            Self::PeerListUpdate(peers) => serde_json::to_string(&OutgoingEnvelope {
                kind: PEER_LIST_UPDATE,
                payload: Some(peers),
            })?,
            Self::NewMessage(message) => serde_json::to_string(&OutgoingEnvelope {
                kind: NEW_MESSAGE,
                payload: Some(message),
            })?,
            Self::Unknown { kind } => serde_json::to_string(&OutgoingEnvelope::<()> {
                kind: kind.as_str(),
                payload: None,
            })?,
        };
        Ok(frame)
    }

    /// Wire name of this event's `type` tag.
    pub fn kind(&self) -> &str {
        match self {
            Self::PeerListUpdate(_) => PEER_LIST_UPDATE,
            Self::NewMessage(_) => NEW_MESSAGE,
            Self::Unknown { kind } => kind,
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Serialize)]
struct OutgoingEnvelope<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<T>,
}

/// One entry of a peer list snapshot.
///
/// The backend sends bare identity strings; richer backends may send objects
/// with an optional nickname. Both forms decode to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPeer")]
pub struct PeerEntry {
    /// Opaque peer identity (typically a network address).
    pub identity: String,

    /// Cosmetic display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl PeerEntry {
    /// Entry with no nickname.
    pub fn new(identity: impl Into<String>) -> Self {
        Self { identity: identity.into(), nickname: None }
    }

    /// Entry with a nickname.
    pub fn with_nickname(identity: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self { identity: identity.into(), nickname: Some(nickname.into()) }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPeer {
    Bare(String),
    Full {
        identity: String,
        #[serde(default)]
        nickname: Option<String>,
    },
}

impl From<RawPeer> for PeerEntry {
    fn from(raw: RawPeer) -> Self {
        match raw {
            RawPeer::Bare(identity) => Self { identity, nickname: None },
            RawPeer::Full { identity, nickname } => Self { identity, nickname },
        }
    }
}

/// Payload of a `NEW_MESSAGE` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Peer identity, or [`SELF_SENDER`] for our own messages.
    pub sender: String,

    /// Raw, untrusted message text.
    pub content: String,
}

impl NewMessage {
    /// Whether the backend attributes this message to the local user.
    pub fn is_from_self(&self) -> bool {
        self.sender == SELF_SENDER
    }
}
