//! WhisperNet wire schema
//!
//! JSON types exchanged with the local WhisperNet backend. The backend pushes
//! [`PushEvent`]s over a long-lived WebSocket and accepts [`SendRequest`]s on
//! `POST /api/send`.
//!
//! The schema is deliberately forgiving on input: unknown event types decode
//! to [`PushEvent::Unknown`] instead of failing, and peer entries may be bare
//! identity strings or full objects. Anything that cannot be decoded at all is
//! reported as a [`ProtocolError`] for the caller to log and discard.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
pub mod push;
pub mod send;

pub use errors::{ProtocolError, Result};
pub use push::{MAX_FRAME_BYTES, NewMessage, PeerEntry, PushEvent, SELF_SENDER};
pub use send::SendRequest;
