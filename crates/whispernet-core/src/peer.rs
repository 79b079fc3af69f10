//! Peers and the ordered peer set.

use std::{borrow::Borrow, collections::HashSet, fmt, hash::Hash};

use whispernet_proto::PeerEntry;

/// Opaque peer identity, typically a network address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(String);

impl PeerId {
    /// Wrap an identity string.
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    /// Identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(identity: &str) -> Self {
        Self::new(identity)
    }
}

impl From<String> for PeerId {
    fn from(identity: String) -> Self {
        Self(identity)
    }
}

impl Borrow<str> for PeerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A known peer.
///
/// Peers compare and hash by identity only; the nickname is cosmetic.
#[derive(Debug, Clone)]
pub struct Peer {
    /// Stable identity.
    pub id: PeerId,
    /// Display name, if the backend supplied one.
    pub nickname: Option<String>,
}

impl Peer {
    /// Peer without a nickname.
    pub fn new(id: impl Into<PeerId>) -> Self {
        Self { id: id.into(), nickname: None }
    }

    /// Peer with a nickname.
    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Nickname if present, identity otherwise.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(self.id.as_str())
    }
}

impl PartialEq for Peer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Peer {}

impl Hash for Peer {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl From<PeerEntry> for Peer {
    fn from(entry: PeerEntry) -> Self {
        Self { id: PeerId(entry.identity), nickname: entry.nickname }
    }
}

/// Ordered sequence of peers, unique by identity.
///
/// Insertion order is presentation order. Building a set from an iterator
/// keeps the first occurrence of each identity and drops empty identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerSet {
    peers: Vec<Peer>,
}

impl PeerSet {
    /// Empty peer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of peers.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether the set has no peers.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Peers in presentation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Peer> {
        self.peers.iter()
    }

    /// Peer at `index`.
    pub fn get(&self, index: usize) -> Option<&Peer> {
        self.peers.get(index)
    }

    /// Peer with the given identity.
    pub fn find(&self, id: &PeerId) -> Option<&Peer> {
        self.peers.iter().find(|peer| &peer.id == id)
    }

    /// Whether a peer with the given identity is present.
    pub fn contains(&self, id: &PeerId) -> bool {
        self.position(id).is_some()
    }

    /// Presentation index of the given identity.
    pub fn position(&self, id: &PeerId) -> Option<usize> {
        self.peers.iter().position(|peer| &peer.id == id)
    }

    /// Identities in presentation order.
    pub fn identities(&self) -> impl Iterator<Item = &PeerId> {
        self.peers.iter().map(|peer| &peer.id)
    }
}

impl FromIterator<Peer> for PeerSet {
    fn from_iter<I: IntoIterator<Item = Peer>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let mut peers = Vec::new();

        for peer in iter {
            if peer.id.as_str().is_empty() {
                tracing::debug!("dropping peer with empty identity");
                continue;
            }
            if seen.insert(peer.id.clone()) {
                peers.push(peer);
            } else {
                tracing::debug!(identity = %peer.id, "dropping duplicate peer");
            }
        }

        Self { peers }
    }
}

impl From<Vec<PeerEntry>> for PeerSet {
    fn from(entries: Vec<PeerEntry>) -> Self {
        entries.into_iter().map(Peer::from).collect()
    }
}

impl<'a> IntoIterator for &'a PeerSet {
    type Item = &'a Peer;
    type IntoIter = std::slice::Iter<'a, Peer>;

    fn into_iter(self) -> Self::IntoIter {
        self.peers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> PeerSet {
        ids.iter().map(|id| Peer::new(*id)).collect()
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let peers: PeerSet = vec![
            Peer::new("a").with_nickname("first"),
            Peer::new("b"),
            Peer::new("a").with_nickname("second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(peers.len(), 2);
        assert_eq!(peers.get(0).and_then(|p| p.nickname.as_deref()), Some("first"));
        assert_eq!(peers.position(&PeerId::from("b")), Some(1));
    }

    #[test]
    fn empty_identities_are_dropped() {
        let peers = set(&["", "a", ""]);
        assert_eq!(peers.identities().map(PeerId::as_str).collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn peers_compare_by_identity() {
        assert_eq!(Peer::new("a").with_nickname("x"), Peer::new("a"));
        assert_ne!(Peer::new("a"), Peer::new("b"));
    }

    #[test]
    fn display_name_falls_back_to_identity() {
        assert_eq!(Peer::new("10.0.0.2").display_name(), "10.0.0.2");
        assert_eq!(Peer::new("10.0.0.2").with_nickname("bob").display_name(), "bob");
    }

    #[test]
    fn from_wire_entries() {
        let peers = PeerSet::from(vec![
            PeerEntry::new("10.0.0.2"),
            PeerEntry::with_nickname("10.0.0.3", "carol"),
            PeerEntry::new("10.0.0.2"),
        ]);

        assert_eq!(peers.len(), 2);
        assert_eq!(peers.find(&"10.0.0.3".into()).map(Peer::display_name), Some("carol"));
    }
}
