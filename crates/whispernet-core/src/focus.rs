//! Roving focus over the peer list.
//!
//! Exactly one entry of a non-empty peer list is the tab stop at any time;
//! directional keys move it. [`RovingFocus`] tracks only an index, so it must
//! be [`reconcile`](RovingFocus::reconcile)d whenever the peer list changes:
//! the tab stop is then the selected peer, or index 0 when nothing is
//! selected. Every command also clamps first, so a stale index never faults.

/// Navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Move down, wrapping to the top.
    Next,
    /// Move up, wrapping to the bottom.
    Previous,
    /// Jump to the first entry (Home).
    First,
    /// Jump to the last entry (End).
    Last,
    /// Select the focused entry (Enter/Space).
    Activate,
}

/// Whether moving focus also selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPolicy {
    /// Every focus move selects the newly focused peer.
    #[default]
    SelectionFollowsFocus,
    /// Only [`NavCommand::Activate`] selects.
    Manual,
}

/// Result of applying a [`NavCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    /// Nothing to do (empty list).
    None,
    /// Focus is now on this index.
    Moved(usize),
    /// The entry at this index should be selected.
    Activated(usize),
}

/// Roving focus state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RovingFocus {
    /// No entries.
    #[default]
    Empty,
    /// Focus on this index.
    At(usize),
}

impl RovingFocus {
    /// Initial focus for a list of `len` entries.
    pub fn new(len: usize) -> Self {
        if len == 0 { Self::Empty } else { Self::At(0) }
    }

    /// Focused index.
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Empty => None,
            Self::At(index) => Some(index),
        }
    }

    /// Whether `index` is the single tab stop.
    pub fn is_tab_stop(self, index: usize) -> bool {
        self.index() == Some(index)
    }

    /// Apply a command to a list of `len` entries.
    pub fn apply(&mut self, command: NavCommand, len: usize) -> FocusChange {
        self.clamp(len);
        let Self::At(index) = *self else {
            return FocusChange::None;
        };

        let next = match command {
            NavCommand::Next => (index + 1) % len,
            NavCommand::Previous => {
                if index == 0 {
                    len - 1
                } else {
                    index - 1
                }
            },
            NavCommand::First => 0,
            NavCommand::Last => len - 1,
            NavCommand::Activate => return FocusChange::Activated(index),
        };

        *self = Self::At(next);
        FocusChange::Moved(next)
    }

    /// Re-anchor after the peer list or the selection changed.
    ///
    /// Focus moves to the selected entry when there is one; otherwise it
    /// resets to the first entry (`Empty` for an empty list).
    pub fn reconcile(&mut self, len: usize, selected: Option<usize>) {
        *self = match selected {
            Some(index) if index < len => Self::At(index),
            _ => Self::new(len),
        };
    }

    fn clamp(&mut self, len: usize) {
        *self = match (*self, len) {
            (_, 0) => Self::Empty,
            (Self::Empty, _) => Self::At(0),
            (Self::At(index), len) => Self::At(index.min(len - 1)),
        };
    }
}
