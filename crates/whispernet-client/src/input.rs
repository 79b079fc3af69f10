//! Line-oriented input.
//!
//! Each stdin line is either a `:command` mapped to a key, or a message to
//! send to the selected peer.

use whispernet_app::{AppEvent, KeyInput};

/// Translate one input line into an event.
///
/// Unknown commands are sent as message text, so `:)` still works.
pub fn parse_line(line: &str) -> AppEvent {
    let key = match line.trim_end_matches(['\r', '\n']) {
        ":up" | ":k" => KeyInput::Up,
        ":down" | ":j" => KeyInput::Down,
        ":home" | ":first" => KeyInput::Home,
        ":end" | ":last" => KeyInput::End,
        ":select" | ":enter" => KeyInput::Enter,
        ":tab" => KeyInput::Tab,
        ":quit" | ":q" => KeyInput::Esc,
        text => return AppEvent::Submit(text.to_owned()),
    };
    AppEvent::Key(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_to_keys() {
        assert_eq!(parse_line(":down"), AppEvent::Key(KeyInput::Down));
        assert_eq!(parse_line(":k"), AppEvent::Key(KeyInput::Up));
        assert_eq!(parse_line(":select\r"), AppEvent::Key(KeyInput::Enter));
        assert_eq!(parse_line(":q"), AppEvent::Key(KeyInput::Esc));
    }

    #[test]
    fn other_lines_are_messages() {
        assert_eq!(parse_line("hello"), AppEvent::Submit("hello".into()));
        assert_eq!(parse_line(":)"), AppEvent::Submit(":)".into()));
        assert_eq!(parse_line(""), AppEvent::Submit(String::new()));
    }
}
