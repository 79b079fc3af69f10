//! Observable session state that lives outside the conversation itself.

/// Push channel connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No push channel.
    #[default]
    Disconnected,
    /// Subscription in progress.
    Connecting,
    /// Receiving push events.
    Connected,
}

/// Which part of the screen receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    /// Peer list; arrows move the roving focus.
    #[default]
    Peers,
    /// Message composer; keys edit text.
    Composer,
}

impl Pane {
    /// The other pane.
    pub fn toggled(self) -> Self {
        match self {
            Self::Peers => Self::Composer,
            Self::Composer => Self::Peers,
        }
    }
}
