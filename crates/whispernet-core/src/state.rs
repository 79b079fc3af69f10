//! Conversation state snapshot.
//!
//! [`ConversationState`] is the view model read by presentation code. It is
//! only ever mutated through [`crate::Synchronizer`]; readers hold immutable
//! `Arc` snapshots.

use std::fmt;

use crate::{Message, Peer, PeerId, PeerSet};

/// Peers, message log and selection for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    peers: PeerSet,
    messages: Vec<Message>,
    selected: Option<PeerId>,
}

impl ConversationState {
    /// Empty state: no peers, no messages, no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Known peers in presentation order.
    pub fn peers(&self) -> &PeerSet {
        &self.peers
    }

    /// Global message log, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Identity of the selected peer.
    pub fn selected(&self) -> Option<&PeerId> {
        self.selected.as_ref()
    }

    /// The selected peer.
    pub fn selected_peer(&self) -> Option<&Peer> {
        self.selected.as_ref().and_then(|id| self.peers.find(id))
    }

    /// Presentation index of the selected peer.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.as_ref().and_then(|id| self.peers.position(id))
    }

    /// Peer-list presence summary.
    pub fn presence(&self) -> Presence {
        if self.peers.is_empty() { Presence::Scanning } else { Presence::Online(self.peers.len()) }
    }

    /// Replace the peer set and re-check the selection against it.
    ///
    /// Returns the identity that was deselected, if any.
    pub(crate) fn replace_peers(&mut self, peers: PeerSet) -> Option<PeerId> {
        self.peers = peers;
        match &self.selected {
            Some(id) if !self.peers.contains(id) => self.selected.take(),
            _ => None,
        }
    }

    pub(crate) fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Caller guarantees `id` is in the peer set.
    pub(crate) fn set_selected(&mut self, id: PeerId) {
        debug_assert!(self.peers.contains(&id));
        self.selected = Some(id);
    }
}

/// Summary of peer availability shown in the status area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Connected, but no peers discovered yet.
    Scanning,
    /// Connected with this many peers.
    Online(usize),
    /// Push channel is down; peer data is stale.
    Degraded,
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scanning => f.write_str("Scanning..."),
            Self::Online(1) => f.write_str("1 peer online"),
            Self::Online(n) => write!(f, "{n} peers online"),
            Self::Degraded => f.write_str("Offline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_text_matches_peer_count() {
        assert_eq!(Presence::Scanning.to_string(), "Scanning...");
        assert_eq!(Presence::Online(1).to_string(), "1 peer online");
        assert_eq!(Presence::Online(3).to_string(), "3 peers online");
        assert_eq!(Presence::Degraded.to_string(), "Offline");
    }

    #[test]
    fn replace_peers_clears_missing_selection() {
        let mut state = ConversationState::new();
        state.replace_peers([Peer::new("a"), Peer::new("b")].into_iter().collect());
        state.set_selected(PeerId::from("a"));

        let cleared = state.replace_peers([Peer::new("b")].into_iter().collect());

        assert_eq!(cleared, Some(PeerId::from("a")));
        assert_eq!(state.selected(), None);
        assert_eq!(state.presence(), Presence::Online(1));
    }
}
