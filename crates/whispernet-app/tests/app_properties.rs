//! Property-based tests for the App state machine.
//!
//! Arbitrary interleavings of push frames, navigation keys and submissions
//! must keep the peer list's single tab stop on the selected peer, or on the
//! first peer when nothing is selected.

use proptest::prelude::*;
use whispernet_app::{App, AppAction, AppEvent, KeyInput};
use whispernet_core::{FocusPolicy, RovingFocus, SystemClock};

fn peer_frame(ids: &[u8]) -> String {
    let entries = ids.iter().map(|id| format!("\"10.0.0.{id}\"")).collect::<Vec<_>>().join(",");
    format!(r#"{{"type":"PEER_LIST_UPDATE","payload":[{entries}]}}"#)
}

fn event_strategy() -> impl Strategy<Value = AppEvent> {
    let nav = prop_oneof![
        Just(KeyInput::Up),
        Just(KeyInput::Down),
        Just(KeyInput::Home),
        Just(KeyInput::End),
        Just(KeyInput::Enter),
        Just(KeyInput::Char(' ')),
        Just(KeyInput::Char('x')),
        Just(KeyInput::Backspace),
        Just(KeyInput::Tab),
    ];

    prop_oneof![
        4 => nav.prop_map(AppEvent::Key),
        2 => prop::collection::vec(0u8..6, 0..6).prop_map(|ids| AppEvent::Push(peer_frame(&ids))),
        1 => "[a-z ]{0,8}".prop_map(AppEvent::Submit),
        1 => ".{0,20}".prop_map(AppEvent::Push),
        1 => Just(AppEvent::Tick),
        1 => Just(AppEvent::ChannelClosed { reason: "lost".into() }),
    ]
}

/// Tab stop the peer list must expose: the selected peer, else the first.
fn expected_tab_stop(app: &App) -> RovingFocus {
    let state = app.state();
    match state.selected_index() {
        Some(index) => RovingFocus::At(index),
        None => RovingFocus::new(state.peers().len()),
    }
}

proptest! {
    #[test]
    fn prop_tab_stop_is_selection_or_first(
        events in prop::collection::vec(event_strategy(), 0..60),
    ) {
        let mut app = App::new(SystemClock, FocusPolicy::default());
        app.handle(AppEvent::ChannelOpened);

        for event in events {
            app.handle(event);
            prop_assert_eq!(app.focus(), expected_tab_stop(&app));
        }
    }

    #[test]
    fn prop_manual_focus_reanchors_on_peer_updates(
        events in prop::collection::vec(event_strategy(), 0..40),
        ids in prop::collection::vec(0u8..6, 0..6),
    ) {
        let mut app = App::new(SystemClock, FocusPolicy::Manual);
        app.handle(AppEvent::ChannelOpened);
        for event in events {
            app.handle(event);
        }

        app.handle(AppEvent::Push(peer_frame(&ids)));

        prop_assert_eq!(app.focus(), expected_tab_stop(&app));
    }

    #[test]
    fn prop_every_send_action_is_already_logged(
        texts in prop::collection::vec("[a-z ]{0,6}", 1..20),
    ) {
        let mut app = App::new(SystemClock, FocusPolicy::Manual);
        app.handle(AppEvent::ChannelOpened);
        app.handle(AppEvent::Push(peer_frame(&[1, 2])));
        app.handle(AppEvent::Key(KeyInput::Enter));

        for text in texts {
            let before = app.state().messages().len();
            let actions = app.handle(AppEvent::Submit(text.clone()));
            let sent = actions.iter().any(|action| matches!(action, AppAction::Send(_)));

            prop_assert_eq!(sent, !text.trim().is_empty());
            prop_assert_eq!(app.state().messages().len(), before + usize::from(sent));
        }
    }
}
