//! Standard invariant checks.
//!
//! These capture behavioural properties of the client that must hold after
//! every event, whatever the event sequence.

use std::collections::HashSet;

use whispernet_core::RovingFocus;

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// Selected peer must be in the peer list.
///
/// Prevents sending to, or highlighting, a peer that is no longer known.
pub struct SelectionInPeers;

impl Invariant for SelectionInPeers {
    fn name(&self) -> &'static str {
        "SelectionInPeers"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            if let Some(selected) = &client.selected
                && !client.peers.contains(selected)
            {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: selected {selected} not in peers {:?}",
                        client.id, client.peers
                    ),
                });
            }
        }
        Ok(())
    }
}

/// No identity appears twice in the peer list.
pub struct UniquePeers;

impl Invariant for UniquePeers {
    fn name(&self) -> &'static str {
        "UniquePeers"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let mut seen = HashSet::new();
            if let Some(duplicate) = client.peers.iter().find(|id| !seen.insert(*id)) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("client {}: peer {duplicate} listed twice", client.id),
                });
            }
        }
        Ok(())
    }
}

/// The message log only grows at the end.
///
/// The log from the previous observation must be an unchanged prefix of the
/// current one.
pub struct LogAppendOnly;

impl Invariant for LogAppendOnly {
    fn name(&self) -> &'static str {
        "LogAppendOnly"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let Some(previous) = &client.previous_log else {
                continue;
            };
            if !client.messages.starts_with(previous) {
                let diverged = previous
                    .iter()
                    .zip(&client.messages)
                    .position(|(before, after)| before != after)
                    .unwrap_or(client.messages.len());
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: log rewritten at index {diverged} ({} -> {} messages)",
                        client.id,
                        previous.len(),
                        client.messages.len()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Focus is `Empty` exactly when there are no peers, otherwise in range.
pub struct FocusInRange;

impl Invariant for FocusInRange {
    fn name(&self) -> &'static str {
        "FocusInRange"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let len = client.peers.len();
            let valid = match client.focus {
                RovingFocus::Empty => len == 0,
                RovingFocus::At(index) => index < len,
            };
            if !valid {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: focus {:?} with {len} peers",
                        client.id, client.focus
                    ),
                });
            }
        }
        Ok(())
    }
}
