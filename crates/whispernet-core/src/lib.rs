//! WhisperNet client core
//!
//! Pure, synchronous building blocks of the chat client. Nothing in this crate
//! performs I/O or suspends; transports and runtimes live in higher layers.
//!
//! # Components
//!
//! - [`Synchronizer`]: single owner of [`ConversationState`]; applies push
//!   events and local actions as atomic transitions producing new snapshots
//! - [`extract_spans`]: splits untrusted message text into [`Span`]s, turning
//!   only validated `http`/`https` tokens into links
//! - [`RovingFocus`]: keyboard focus state machine over the peer list
//!
//! # Invariants
//!
//! - The selected peer, if any, is always a member of the peer set.
//! - The peer set never contains two peers with the same identity.
//! - The message log is append-only.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod clock;
pub mod error;
pub mod focus;
pub mod message;
pub mod peer;
pub mod sanitize;
pub mod state;
pub mod sync;

pub use clock::{Clock, SystemClock, Timestamp};
pub use error::SyncError;
pub use focus::{FocusChange, FocusPolicy, NavCommand, RovingFocus};
pub use message::{Message, Sender};
pub use peer::{Peer, PeerId, PeerSet};
pub use sanitize::{Span, extract_spans};
pub use state::{ConversationState, Presence};
pub use sync::Synchronizer;
pub use whispernet_proto::{PushEvent, SendRequest};
