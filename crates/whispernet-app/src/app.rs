//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the
//! interactive state of the client completely decoupled from I/O.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Owns the [`Synchronizer`] and feeds it decoded push frames.
//! - Drives the roving focus over the peer list and keeps it reconciled with
//!   every peer list change.
//! - Edits the composer buffer and turns submissions into send requests.
//! - Tracks push channel state for presence display.
//!
//! # Invariants
//!
//! - Focus is re-anchored after every transition that can change the peer
//!   list or the selection: onto the selected peer, or the first peer when
//!   nothing is selected.
//! - Under [`FocusPolicy::SelectionFollowsFocus`] every navigation key leaves
//!   the selection on the focused peer.

use std::sync::Arc;

use whispernet_core::{
    Clock, ConversationState, FocusChange, FocusPolicy, NavCommand, PeerId, Presence, PushEvent,
    RovingFocus, SyncError, Synchronizer, SystemClock,
};

use crate::{AppAction, AppEvent, Composer, ConnectionState, KeyInput, Pane};

/// Application state machine.
///
/// No I/O dependencies; fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App<C: Clock = SystemClock> {
    /// Conversation state owner.
    sync: Synchronizer<C>,
    /// Keyboard focus over the peer list.
    focus: RovingFocus,
    /// Whether focus moves also select.
    policy: FocusPolicy,
    /// Pane receiving keyboard input.
    pane: Pane,
    /// Message being typed.
    composer: Composer,
    /// Push channel state.
    connection: ConnectionState,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl<C: Clock> App<C> {
    /// Create an App with empty state.
    pub fn new(clock: C, policy: FocusPolicy) -> Self {
        Self {
            sync: Synchronizer::new(clock),
            focus: RovingFocus::Empty,
            policy,
            pane: Pane::Peers,
            composer: Composer::new(),
            connection: ConnectionState::Disconnected,
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Submit(text) => self.submit_or_report(&text),
            AppEvent::Push(frame) => self.handle_push(&frame),
            AppEvent::Connecting => {
                self.connection = ConnectionState::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::ChannelOpened => {
                self.connection = ConnectionState::Connected;
                self.status_message = None;
                vec![AppAction::Render]
            },
            AppEvent::ChannelClosed { reason } => {
                tracing::warn!(%reason, "push channel closed");
                self.connection = ConnectionState::Disconnected;
                self.status_message = Some(format!("Disconnected: {reason}"));
                vec![AppAction::Render]
            },
            AppEvent::SendFailed { recipient, error } => {
                tracing::warn!(%recipient, %error, "message delivery failed");
                self.status_message = Some(format!("Send to {recipient} failed: {error}"));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_push(&mut self, frame: &str) -> Vec<AppAction> {
        let event = match PushEvent::decode(frame) {
            Ok(event) => event,
            Err(error) => {
                tracing::warn!(%error, "discarding malformed push frame");
                return vec![];
            },
        };

        if let PushEvent::Unknown { kind } = &event {
            tracing::debug!(%kind, "ignoring unknown push event");
            return vec![];
        }

        self.sync.apply_push(event);
        self.reconcile_focus();
        vec![AppAction::Render]
    }

    fn handle_key(&mut self, key: KeyInput) -> Vec<AppAction> {
        match (key, self.pane) {
            (KeyInput::Esc, _) => self.quit(),
            (KeyInput::Tab, pane) => {
                self.pane = pane.toggled();
                vec![AppAction::Render]
            },
            (KeyInput::Down, Pane::Peers) => self.navigate(NavCommand::Next),
            (KeyInput::Up, Pane::Peers) => self.navigate(NavCommand::Previous),
            (KeyInput::Home, Pane::Peers) => self.navigate(NavCommand::First),
            (KeyInput::End, Pane::Peers) => self.navigate(NavCommand::Last),
            (KeyInput::Enter | KeyInput::Char(' '), Pane::Peers) => {
                self.navigate(NavCommand::Activate)
            },
            (KeyInput::Enter, Pane::Composer) => self.submit_composer(),
            (key, Pane::Composer) => {
                match key {
                    KeyInput::Char(c) => self.composer.insert(c),
                    KeyInput::Backspace => self.composer.backspace(),
                    KeyInput::Delete => self.composer.delete(),
                    KeyInput::Left => self.composer.left(),
                    KeyInput::Right => self.composer.right(),
                    KeyInput::Home => self.composer.home(),
                    KeyInput::End => self.composer.end(),
                    _ => return vec![],
                }
                vec![AppAction::Render]
            },
            _ => vec![],
        }
    }

    /// Apply a navigation command to the peer list focus.
    pub fn navigate(&mut self, command: NavCommand) -> Vec<AppAction> {
        let len = self.sync.state().peers().len();
        match self.focus.apply(command, len) {
            FocusChange::None => vec![],
            FocusChange::Moved(index) => {
                if self.policy == FocusPolicy::SelectionFollowsFocus {
                    self.select_index(index);
                }
                vec![AppAction::Render]
            },
            FocusChange::Activated(index) => {
                self.select_index(index);
                vec![AppAction::Render]
            },
        }
    }

    fn select_index(&mut self, index: usize) {
        let Some(id) = self.sync.state().peers().get(index).map(|peer| peer.id.clone()) else {
            return;
        };
        if let Err(error) = self.sync.select_peer(&id) {
            tracing::warn!(%error, "focused peer could not be selected");
        }
    }

    /// Select a peer by identity and move focus onto it.
    ///
    /// # Errors
    ///
    /// [`SyncError::InvalidSelection`] if `id` is not a known peer.
    pub fn select_peer(&mut self, id: &PeerId) -> Result<Vec<AppAction>, SyncError> {
        self.sync.select_peer(id)?;
        self.reconcile_focus();
        Ok(vec![AppAction::Render])
    }

    /// Send `text` to the selected peer.
    ///
    /// The message is appended to the log before the returned
    /// [`AppAction::Send`] reaches the transport.
    ///
    /// # Errors
    ///
    /// Rejections from [`Synchronizer::send`]; state is unchanged.
    pub fn submit(&mut self, text: &str) -> Result<Vec<AppAction>, SyncError> {
        let request = self.sync.send(text)?;
        self.status_message = None;
        Ok(vec![AppAction::Send(request), AppAction::Render])
    }

    fn submit_or_report(&mut self, text: &str) -> Vec<AppAction> {
        match self.submit(text) {
            Ok(actions) => actions,
            Err(error) => {
                tracing::debug!(%error, "send rejected");
                self.status_message = Some(error.to_string());
                vec![AppAction::Render]
            },
        }
    }

    fn submit_composer(&mut self) -> Vec<AppAction> {
        let text = self.composer.text().to_owned();
        let actions = self.submit_or_report(&text);
        if actions.iter().any(|action| matches!(action, AppAction::Send(_))) {
            self.composer.clear();
        }
        actions
    }

    fn reconcile_focus(&mut self) {
        let state = self.sync.state();
        self.focus.reconcile(state.peers().len(), state.selected_index());
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Current conversation state.
    pub fn state(&self) -> &ConversationState {
        self.sync.state()
    }

    /// Shareable snapshot of the conversation state.
    pub fn snapshot(&self) -> Arc<ConversationState> {
        self.sync.snapshot()
    }

    /// Peer list focus.
    pub fn focus(&self) -> RovingFocus {
        self.focus
    }

    /// Active focus policy.
    pub fn policy(&self) -> FocusPolicy {
        self.policy
    }

    /// Pane receiving keyboard input.
    pub fn pane(&self) -> Pane {
        self.pane
    }

    /// Composer contents.
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// Presence summary. Stale peer data is reported as degraded.
    pub fn presence(&self) -> Presence {
        match self.connection {
            ConnectionState::Connected => self.sync.state().presence(),
            ConnectionState::Connecting if self.sync.state().peers().is_empty() => {
                Presence::Scanning
            },
            ConnectionState::Connecting | ConnectionState::Disconnected => Presence::Degraded,
        }
    }

    /// Current status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Whether sending is possible (a peer is selected).
    pub fn can_send(&self) -> bool {
        self.sync.state().selected().is_some()
    }
}
