//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a client at a point in time.
//! Invariants operate on snapshots rather than live state so checks are
//! consistent.

use whispernet_app::App;
use whispernet_core::{Clock, Message, PeerId, RovingFocus};

/// Snapshot of the entire system state.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-client state snapshots.
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no clients).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot with a single client.
    pub fn single(client: ClientSnapshot) -> Self {
        Self { clients: vec![client] }
    }

    /// Create a snapshot from multiple clients.
    pub fn from_clients(clients: Vec<ClientSnapshot>) -> Self {
        Self { clients }
    }
}

/// Snapshot of a single client's observable state.
#[derive(Debug, Clone, Default)]
pub struct ClientSnapshot {
    /// Client identifier.
    pub id: u64,
    /// Peer identities in presentation order, as the client exposes them.
    pub peers: Vec<PeerId>,
    /// Selected peer.
    pub selected: Option<PeerId>,
    /// Roving focus over `peers`.
    pub focus: RovingFocus,
    /// Message log.
    pub messages: Vec<Message>,
    /// Message log at the previous observation. `None` on the first one.
    pub previous_log: Option<Vec<Message>>,
}

impl ClientSnapshot {
    /// Create an empty client snapshot.
    pub fn new(id: u64) -> Self {
        Self { id, ..Default::default() }
    }

    /// Capture the observable state of `app`.
    pub fn from_app<C: Clock>(id: u64, app: &App<C>) -> Self {
        let state = app.state();
        Self {
            id,
            peers: state.peers().identities().cloned().collect(),
            selected: state.selected().cloned(),
            focus: app.focus(),
            messages: state.messages().to_vec(),
            previous_log: None,
        }
    }

    /// Record `earlier` as the previous observation.
    #[must_use]
    pub fn since(mut self, earlier: &ClientSnapshot) -> Self {
        self.previous_log = Some(earlier.messages.clone());
        self
    }
}
