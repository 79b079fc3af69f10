//! State synchronizer.
//!
//! [`Synchronizer`] is the single writer of [`ConversationState`]. Push events
//! and local user actions are applied as discrete transitions, each one
//! producing a new snapshot. Readers keep the `Arc` they were handed; a
//! transition never mutates a snapshot someone else is holding
//! ([`Arc::make_mut`] clones in that case).
//!
//! Every transition reads the state as it is at the moment the transition
//! runs. There is no captured selection that could go stale between an
//! event's arrival and its processing.
//!
//! # Invariants
//!
//! - Selection membership: after every transition `selected` is `None` or a
//!   member of `peers`.
//! - Unique peers: guaranteed by [`PeerSet`] construction.
//! - Append-only log: messages are only ever pushed, never reordered or
//!   edited.
//! - Rejected operations leave the state untouched.

use std::sync::Arc;

use whispernet_proto::{PushEvent, SendRequest};

use crate::{Clock, ConversationState, Message, PeerId, PeerSet, Sender, SyncError};

/// Single owner of the conversation state.
#[derive(Debug, Clone)]
pub struct Synchronizer<C: Clock> {
    state: Arc<ConversationState>,
    clock: C,
}

impl<C: Clock> Synchronizer<C> {
    /// Start a session with empty state.
    pub fn new(clock: C) -> Self {
        Self { state: Arc::new(ConversationState::new()), clock }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<ConversationState> {
        Arc::clone(&self.state)
    }

    /// Borrow the current state.
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Clock used for capture timestamps.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Replace the peer set with a full snapshot from the push channel.
    ///
    /// Clears the selection if the currently selected identity is not part of
    /// `peers`. Applying the same set twice is a no-op the second time.
    pub fn apply_peer_list_update(&mut self, peers: PeerSet) -> Arc<ConversationState> {
        let count = peers.len();
        let state = Arc::make_mut(&mut self.state);

        if let Some(cleared) = state.replace_peers(peers) {
            tracing::debug!(identity = %cleared, "selected peer left, clearing selection");
        }
        tracing::debug!(peers = count, "applied peer list update");

        self.snapshot()
    }

    /// Append a message received from the push channel.
    ///
    /// The log is global: messages are appended whatever the current
    /// selection is.
    pub fn apply_incoming_message(
        &mut self,
        sender: Sender,
        content: impl Into<String>,
    ) -> Arc<ConversationState> {
        let message = Message::new(sender, content, self.clock.now());
        tracing::debug!(sender = message.sender.label(), "appending incoming message");
        Arc::make_mut(&mut self.state).push_message(message);
        self.snapshot()
    }

    /// Apply a decoded push event.
    ///
    /// Unknown event types are ignored.
    pub fn apply_push(&mut self, event: PushEvent) -> Arc<ConversationState> {
        match event {
            PushEvent::PeerListUpdate(entries) => self.apply_peer_list_update(entries.into()),
            PushEvent::NewMessage(message) => {
                self.apply_incoming_message(Sender::from_wire(&message.sender), message.content)
            },
            PushEvent::Unknown { kind } => {
                tracing::debug!(%kind, "ignoring unknown push event");
                self.snapshot()
            },
        }
    }

    /// Select a peer.
    ///
    /// # Errors
    ///
    /// [`SyncError::InvalidSelection`] if `id` is not in the current peer set.
    pub fn select_peer(&mut self, id: &PeerId) -> Result<Arc<ConversationState>, SyncError> {
        if !self.state.peers().contains(id) {
            return Err(SyncError::InvalidSelection { identity: id.clone() });
        }

        if self.state.selected() != Some(id) {
            Arc::make_mut(&mut self.state).set_selected(id.clone());
            tracing::debug!(identity = %id, "selected peer");
        }
        Ok(self.snapshot())
    }

    /// Build an outbound message and its send request without touching state.
    ///
    /// # Errors
    ///
    /// - [`SyncError::EmptyContent`] if `text` is blank after trimming
    /// - [`SyncError::NoPeerSelected`] if no peer is selected
    pub fn compose_outbound_message(&self, text: &str) -> Result<(Message, SendRequest), SyncError> {
        if text.trim().is_empty() {
            return Err(SyncError::EmptyContent);
        }
        let recipient = self.state.selected().ok_or(SyncError::NoPeerSelected)?;

        let message = Message::new(Sender::Local, text, self.clock.now());
        let request = SendRequest::new(recipient.as_str(), text);
        Ok((message, request))
    }

    /// Optimistically append a locally composed message.
    pub fn append_outbound(&mut self, message: Message) -> Arc<ConversationState> {
        Arc::make_mut(&mut self.state).push_message(message);
        self.snapshot()
    }

    /// Compose and optimistically append in one transition.
    ///
    /// The message is in the log before the transport has seen the request.
    /// Nothing is appended if composition is rejected.
    pub fn send(&mut self, text: &str) -> Result<SendRequest, SyncError> {
        let (message, request) = self.compose_outbound_message(text)?;
        tracing::debug!(recipient = %request.recipient, "appending outbound message");
        self.append_outbound(message);
        Ok(request)
    }
}
