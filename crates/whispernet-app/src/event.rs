//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (keys, submitted text) and system ticks.
//! - The transport: push frames, channel lifecycle, send failures.

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// A complete line of text to send to the selected peer.
    Submit(String),

    /// Periodic tick.
    Tick,

    /// Push channel connection in progress.
    Connecting,

    /// Push channel established.
    ChannelOpened,

    /// Push channel lost. No automatic reconnection.
    ChannelClosed {
        /// Why the channel closed.
        reason: String,
    },

    /// Raw JSON frame from the push channel. Decoded by the App; malformed
    /// frames are discarded.
    Push(String),

    /// The transport failed to deliver an outbound request.
    SendFailed {
        /// Recipient of the failed request.
        recipient: String,
        /// Error description.
        error: String,
    },
}
