//! Rejections reported by [`crate::Synchronizer`] operations.
//!
//! A rejected operation never changes state.

use thiserror::Error;

use crate::PeerId;

/// Errors from local user actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Tried to select an identity that is not in the current peer set.
    #[error("peer {identity} is not in the peer list")]
    InvalidSelection {
        /// Identity that was requested.
        identity: PeerId,
    },

    /// Tried to send without a selected peer.
    #[error("no peer selected")]
    NoPeerSelected,

    /// Tried to send empty or whitespace-only text.
    #[error("message is empty")]
    EmptyContent,
}
