//! Plain-text rendering of the app state.
//!
//! Message text goes through [`extract_spans`] so links are shown with their
//! validated target and nothing else in a message is interpreted.

use std::io::{self, Write};

use whispernet_app::{App, ConnectionState, Pane};
use whispernet_core::{Clock, Message, Span, extract_spans};

/// Number of most recent messages shown per frame.
pub const VISIBLE_MESSAGES: usize = 20;

/// Write one full frame.
pub fn render<W: Write, C: Clock>(out: &mut W, app: &App<C>) -> io::Result<()> {
    let state = app.state();
    let connection = match app.connection_state() {
        ConnectionState::Disconnected => "disconnected",
        ConnectionState::Connecting => "connecting",
        ConnectionState::Connected => "connected",
    };

    writeln!(out, "== WhisperNet [{connection}] {} ==", app.presence())?;

    for (index, peer) in state.peers().iter().enumerate() {
        let focus = if app.focus().is_tab_stop(index) { '>' } else { ' ' };
        let selected = if state.selected() == Some(&peer.id) { '*' } else { ' ' };
        write!(out, "{focus}{selected} ")?;
        write_escaped(out, peer.display_name())?;
        if peer.nickname.is_some() {
            write!(out, " (")?;
            write_escaped(out, peer.id.as_str())?;
            write!(out, ")")?;
        }
        writeln!(out)?;
    }

    writeln!(out, "--")?;
    let skip = state.messages().len().saturating_sub(VISIBLE_MESSAGES);
    for message in &state.messages()[skip..] {
        write_message(out, message)?;
    }

    writeln!(out, "--")?;
    match state.selected_peer() {
        Some(peer) => {
            write!(out, "to ")?;
            write_escaped(out, peer.display_name())?;
        },
        None => write!(out, "select a peer to start chatting")?,
    }
    if app.pane() == Pane::Composer {
        write!(out, " | ")?;
        write_escaped(out, app.composer().text())?;
    }
    writeln!(out)?;

    if let Some(status) = app.status_message() {
        write!(out, "! ")?;
        write_escaped(out, status)?;
        writeln!(out)?;
    }
    out.flush()
}

fn write_message<W: Write>(out: &mut W, message: &Message) -> io::Result<()> {
    write_escaped(out, message.sender.label())?;
    write!(out, ": ")?;
    for span in extract_spans(&message.content) {
        match span {
            Span::Text(text) => write_escaped(out, &text)?,
            Span::Link { display, href } => {
                write_escaped(out, &display)?;
                if display != href {
                    write!(out, " <")?;
                    write_escaped(out, &href)?;
                    write!(out, ">")?;
                }
            },
        }
    }
    writeln!(out)
}

/// Control characters are written as escapes so message text can never
/// drive the terminal.
fn write_escaped<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    for c in text.chars() {
        if c.is_control() {
            write!(out, "{}", c.escape_default())?;
        } else {
            write!(out, "{c}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use whispernet_app::{AppEvent, KeyInput};
    use whispernet_core::{FocusPolicy, SystemClock};

    use super::*;

    fn rendered(app: &App) -> String {
        let mut out = Vec::new();
        render(&mut out, app).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_session() {
        let app = App::new(SystemClock, FocusPolicy::Manual);
        insta::assert_snapshot!(rendered(&app), @r"
        == WhisperNet [disconnected] Offline ==
        --
        --
        select a peer to start chatting
        ");
    }

    #[test]
    fn peers_messages_and_links() {
        let mut app = App::new(SystemClock, FocusPolicy::Manual);
        app.handle(AppEvent::ChannelOpened);
        app.handle(AppEvent::Push(
            r#"{"type":"PEER_LIST_UPDATE","payload":["10.0.0.2",{"identity":"10.0.0.3","nickname":"bob"}]}"#
                .into(),
        ));
        app.handle(AppEvent::Key(KeyInput::Down));
        app.handle(AppEvent::Key(KeyInput::Enter));
        app.handle(AppEvent::Push(
            r#"{"type":"NEW_MESSAGE","payload":{"sender":"10.0.0.3","content":"see www.example.com or javascript:alert(1)"}}"#
                .into(),
        ));
        app.handle(AppEvent::Submit("https://example.com/a".into()));
        app.handle(AppEvent::Key(KeyInput::Tab));
        app.handle(AppEvent::Key(KeyInput::Char('o')));

        insta::assert_snapshot!(rendered(&app), @r"
        == WhisperNet [connected] 2 peers online ==
           10.0.0.2
        >* bob (10.0.0.3)
        --
        10.0.0.3: see www.example.com <https://www.example.com> or javascript:alert(1)
        you: https://example.com/a
        --
        to bob | o
        ");
    }

    #[test]
    fn control_characters_are_escaped() {
        let mut app = App::new(SystemClock, FocusPolicy::Manual);
        app.handle(AppEvent::Push(
            r#"{"type":"NEW_MESSAGE","payload":{"sender":"x","content":"a\u001b[2Jb\nc"}}"#.into(),
        ));

        let out = rendered(&app);
        assert!(!out.contains('\u{1b}'));
        assert!(out.contains(r"x: a\u{1b}[2Jb\nc"));
    }

    #[test]
    fn status_and_composer_are_escaped() {
        let mut app = App::new(SystemClock, FocusPolicy::Manual);
        app.handle(AppEvent::ChannelClosed { reason: "bye\u{1b}]0;pwned\u{7}".into() });
        app.handle(AppEvent::Key(KeyInput::Tab));
        app.handle(AppEvent::Key(KeyInput::Char('\u{1b}')));

        let out = rendered(&app);
        assert!(!out.contains('\u{1b}'));
        assert!(!out.contains('\u{7}'));
        assert!(out.contains(r"| \u{1b}"));
        assert!(out.contains(r"! Disconnected: bye\u{1b}]0;pwned\u{7}"));
    }
}
