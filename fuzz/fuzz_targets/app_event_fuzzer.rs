//! Fuzz target for App event sequences
//!
//! Applies arbitrary sequences of keys, push frames and submissions to the
//! App and checks the standard invariants after every step.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use whispernet_app::{App, AppEvent, KeyInput};
use whispernet_core::FocusPolicy;
use whispernet_harness::{ClientSnapshot, InvariantRegistry, ManualClock, SystemSnapshot};

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Up,
    Down,
    Home,
    End,
    Enter,
    Tab,
    Char(char),
    Peers(Vec<u8>),
    Message { sender: u8, content: String },
    Submit(String),
    RawFrame(String),
    Closed,
}

fn to_event(op: Op) -> AppEvent {
    match op {
        Op::Up => AppEvent::Key(KeyInput::Up),
        Op::Down => AppEvent::Key(KeyInput::Down),
        Op::Home => AppEvent::Key(KeyInput::Home),
        Op::End => AppEvent::Key(KeyInput::End),
        Op::Enter => AppEvent::Key(KeyInput::Enter),
        Op::Tab => AppEvent::Key(KeyInput::Tab),
        Op::Char(c) => AppEvent::Key(KeyInput::Char(c)),
        Op::Peers(ids) => {
            let entries: Vec<String> = ids.iter().map(|id| format!("\"10.0.0.{}\"", id % 8)).collect();
            AppEvent::Push(format!(r#"{{"type":"PEER_LIST_UPDATE","payload":[{}]}}"#, entries.join(",")))
        },
        Op::Message { sender, content } => AppEvent::Push(format!(
            r#"{{"type":"NEW_MESSAGE","payload":{{"sender":"10.0.0.{}","content":{:?}}}}}"#,
            sender % 8,
            content
        )),
        Op::Submit(text) => AppEvent::Submit(text),
        Op::RawFrame(frame) => AppEvent::Push(frame),
        Op::Closed => AppEvent::ChannelClosed { reason: "fuzz".into() },
    }
}

fuzz_target!(|input: (bool, Vec<Op>)| {
    let (follow, ops) = input;
    let policy = if follow { FocusPolicy::SelectionFollowsFocus } else { FocusPolicy::Manual };
    let mut app = App::new(ManualClock::default(), policy);
    let registry = InvariantRegistry::standard();
    let mut previous = ClientSnapshot::from_app(0, &app);

    for op in ops.into_iter().take(256) {
        app.handle(to_event(op));

        let current = ClientSnapshot::from_app(0, &app).since(&previous);
        registry.assert_all(&SystemSnapshot::single(current.clone()), "after fuzz op");
        previous = current;
    }
});
