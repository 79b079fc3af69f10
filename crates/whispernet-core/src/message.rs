//! Conversation log entries.

use whispernet_proto::SELF_SENDER;

use crate::{PeerId, Timestamp};

/// Originator of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sender {
    /// This client.
    Local,
    /// A remote peer.
    Peer(PeerId),
}

impl Sender {
    /// Interpret a wire `sender` value. [`SELF_SENDER`] maps to
    /// [`Sender::Local`].
    pub fn from_wire(sender: &str) -> Self {
        if sender == SELF_SENDER { Self::Local } else { Self::Peer(PeerId::new(sender)) }
    }

    /// Label shown next to the message.
    pub fn label(&self) -> &str {
        match self {
            Self::Local => SELF_SENDER,
            Self::Peer(id) => id.as_str(),
        }
    }
}

/// One entry of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Who sent it.
    pub sender: Sender,
    /// Raw, untrusted text. Render through [`crate::extract_spans`].
    pub content: String,
    /// Local capture time.
    pub timestamp: Timestamp,
}

impl Message {
    /// Create a message.
    pub fn new(sender: Sender, content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self { sender, content: content.into(), timestamp }
    }

    /// Whether this client sent the message.
    pub fn is_local(&self) -> bool {
        self.sender == Sender::Local
    }
}
