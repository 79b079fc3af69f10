//! Property-based tests for the Synchronizer.
//!
//! Operations are generated over a small identity pool so that updates,
//! selections and departures collide often.

use proptest::prelude::*;
use whispernet_core::{
    FocusChange, NavCommand, Peer, PeerId, PeerSet, RovingFocus, Sender, SyncError, Synchronizer,
    SystemClock,
};

#[derive(Debug, Clone)]
enum Op {
    Update(Vec<u8>),
    Select(u8),
    Incoming(u8, String),
    Send(String),
}

fn identity(n: u8) -> PeerId {
    PeerId::new(format!("10.0.0.{n}"))
}

fn peer_set(ids: &[u8]) -> PeerSet {
    ids.iter().map(|&n| Peer::new(identity(n))).collect()
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => prop::collection::vec(0u8..6, 0..6).prop_map(Op::Update),
        3 => (0u8..6).prop_map(Op::Select),
        2 => ((0u8..6), "[a-z ]{0,8}").prop_map(|(n, text)| Op::Incoming(n, text)),
        2 => "[a-z ]{0,8}".prop_map(Op::Send),
    ]
}

fn nav_strategy() -> impl Strategy<Value = NavCommand> {
    prop_oneof![
        Just(NavCommand::Next),
        Just(NavCommand::Previous),
        Just(NavCommand::First),
        Just(NavCommand::Last),
        Just(NavCommand::Activate),
    ]
}

proptest! {
    #[test]
    fn prop_selection_always_in_peers(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut sync = Synchronizer::new(SystemClock);

        for op in ops {
            match op {
                Op::Update(ids) => { sync.apply_peer_list_update(peer_set(&ids)); },
                Op::Select(n) => {
                    let present = sync.state().peers().contains(&identity(n));
                    let result = sync.select_peer(&identity(n));
                    prop_assert_eq!(result.is_ok(), present);
                },
                Op::Incoming(n, text) => { sync.apply_incoming_message(Sender::Peer(identity(n)), text); },
                Op::Send(text) => { let _ = sync.send(&text); },
            }

            let state = sync.state();
            if let Some(selected) = state.selected() {
                prop_assert!(state.peers().contains(selected));
            }
        }
    }

    #[test]
    fn prop_log_is_append_only(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut sync = Synchronizer::new(SystemClock);
        let mut expected: Vec<String> = Vec::new();

        for op in ops {
            let before = sync.snapshot();
            match op {
                Op::Update(ids) => { sync.apply_peer_list_update(peer_set(&ids)); },
                Op::Select(n) => { let _ = sync.select_peer(&identity(n)); },
                Op::Incoming(n, text) => {
                    sync.apply_incoming_message(Sender::Peer(identity(n)), text.clone());
                    expected.push(text);
                },
                Op::Send(text) => {
                    if sync.send(&text).is_ok() {
                        expected.push(text);
                    }
                },
            }

            let after = sync.state().messages();
            prop_assert!(after.starts_with(before.messages()));
        }

        let contents: Vec<_> = sync.state().messages().iter().map(|m| m.content.clone()).collect();
        prop_assert_eq!(contents, expected);
    }

    #[test]
    fn prop_repeated_update_is_idempotent(
        setup in prop::collection::vec(op_strategy(), 0..20),
        ids in prop::collection::vec(0u8..6, 0..6),
    ) {
        let mut sync = Synchronizer::new(SystemClock);
        for op in setup {
            match op {
                Op::Update(ids) => { sync.apply_peer_list_update(peer_set(&ids)); },
                Op::Select(n) => { let _ = sync.select_peer(&identity(n)); },
                Op::Incoming(..) | Op::Send(_) => {},
            }
        }

        let first = sync.apply_peer_list_update(peer_set(&ids));
        let second = sync.apply_peer_list_update(peer_set(&ids));

        prop_assert_eq!(first.peers(), second.peers());
        prop_assert_eq!(first.selected(), second.selected());
    }

    #[test]
    fn prop_rejected_sends_leave_log_untouched(text in "[ \t\n]{0,6}", select in any::<bool>()) {
        let mut sync = Synchronizer::new(SystemClock);
        sync.apply_peer_list_update(peer_set(&[1]));
        if select {
            sync.select_peer(&identity(1)).unwrap();
        }

        prop_assert_eq!(sync.send(&text), Err(SyncError::EmptyContent));
        prop_assert!(sync.state().messages().is_empty());
    }

    #[test]
    fn prop_focus_stays_in_range(
        lens in prop::collection::vec(0usize..6, 1..10),
        commands in prop::collection::vec(nav_strategy(), 0..30),
    ) {
        let mut focus = RovingFocus::new(lens[0]);
        let mut commands = commands.into_iter();

        for len in lens {
            focus.reconcile(len, None);
            for command in commands.by_ref().take(3) {
                match focus.apply(command, len) {
                    FocusChange::None => prop_assert_eq!(len, 0),
                    FocusChange::Moved(i) | FocusChange::Activated(i) => prop_assert!(i < len),
                }
            }
            match focus.index() {
                Some(i) => prop_assert!(i < len),
                None => prop_assert_eq!(len, 0),
            }
        }
    }
}

#[test]
fn send_without_selection_is_rejected() {
    let mut sync = Synchronizer::new(SystemClock);
    sync.apply_peer_list_update(peer_set(&[1, 2]));

    assert_eq!(sync.send("hi"), Err(SyncError::NoPeerSelected));
    assert!(sync.state().messages().is_empty());
}
