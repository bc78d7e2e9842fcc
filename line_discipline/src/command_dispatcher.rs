// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Turns one input token into a [`Command`] ([`dispatch`]), and applies a [`Command`] to
//! an [`EditBuffer`] ([`execute`]).
//!
//! Both halves are pure: no display sink, no channel, no timer. The
//! [`crate::LineSession`] takes the [`Dispatched`] result and does the I/O. This keeps
//! the whole editing table testable without a runtime.
//!
//! # Cooked mode bindings
//!
//! | Input                  | Command                         |
//! |------------------------|---------------------------------|
//! | `Enter`                | [`Command::CompleteLine`]       |
//! | `Delete`, `Ctrl-H`     | [`Command::KillPreviousChar`]   |
//! | `←`, `Ctrl-B`          | [`Command::MoveCursorLeft`]     |
//! | `→`, `Ctrl-F`          | [`Command::MoveCursorRight`]    |
//! | `Ctrl-A`               | [`Command::MoveCursorToStart`]  |
//! | `Ctrl-E`               | [`Command::MoveCursorToEnd`]    |
//! | `Ctrl-K`               | [`Command::KillToEndOfLine`]    |
//! | `Ctrl-U`               | [`Command::KillToStartOfLine`]  |
//! | `Ctrl-C`               | [`Command::Break`]              |
//! | `Ctrl-D` (`Ctrl-Z`)    | [`Command::Eof`]                |
//! | printable text         | [`Command::InsertText`]         |
//!
//! `Ctrl-A`, `Ctrl-E`, `Ctrl-B` and `Ctrl-F` are only bound when the `emacs` feature is
//! on (it is on by default). The eof letter comes from [`HostPlatform::eof_letter`]; the
//! letter of the other platform is ignored. Everything else (up / down arrows, unknown
//! CSI letters, malformed escapes, other control letters) is swallowed.

use crate::{DISPLAY_NEWLINE, EditBuffer, HostPlatform, InputMode, InputToken, RedrawOp,
            RedrawOutput, SessionEvent, classify, insert_text, kill_previous_char,
            kill_to_start_of_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Input that is swallowed without any effect.
    Ignore,
    InsertText(&'a str),
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorToStart,
    MoveCursorToEnd,
    KillPreviousChar,
    KillToEndOfLine,
    KillToStartOfLine,
    CompleteLine,
    Break,
    Eof,
    /// Non cooked modes: hand the token to the consumer verbatim, optionally echo it.
    Forward {
        token: &'a str,
        echo: bool,
        newline: bool,
    },
}

impl Command<'_> {
    /// Cooked mode commands that change what is drawn on the prompt line. These need the
    /// prompt to be on screen before they run.
    #[must_use]
    pub fn edits_line(&self) -> bool {
        matches!(
            self,
            Command::InsertText(_)
                | Command::MoveCursorLeft
                | Command::MoveCursorRight
                | Command::MoveCursorToStart
                | Command::MoveCursorToEnd
                | Command::KillPreviousChar
                | Command::KillToEndOfLine
                | Command::KillToStartOfLine
                | Command::CompleteLine
        )
    }
}

/// Classifies `token` and maps it to a [`Command`] for the given mode.
#[must_use]
pub fn dispatch(
    token: &str,
    input_mode: InputMode,
    host_platform: HostPlatform,
) -> Command<'_> {
    let input_token = classify(token, input_mode);
    match input_mode {
        InputMode::Cooked => dispatch_cooked(input_token, host_platform),
        InputMode::RawEcho => Command::Forward {
            token,
            echo: true,
            newline: input_token == InputToken::Enter,
        },
        InputMode::Raw => Command::Forward {
            token,
            echo: false,
            newline: false,
        },
        InputMode::Disabled => Command::Ignore,
    }
}

fn dispatch_cooked(input_token: InputToken<'_>, host_platform: HostPlatform) -> Command<'_> {
    match input_token {
        InputToken::Enter => Command::CompleteLine,
        InputToken::Delete => Command::KillPreviousChar,
        InputToken::Csi('C') => Command::MoveCursorRight,
        InputToken::Csi('D') => Command::MoveCursorLeft,
        // Up / down, and letters that aren't bound to anything.
        InputToken::Csi(_) | InputToken::UnrecognizedEscape => Command::Ignore,
        InputToken::Control(letter) if letter == host_platform.eof_letter() => Command::Eof,
        InputToken::Control('C') => Command::Break,
        InputToken::Control('H') => Command::KillPreviousChar,
        InputToken::Control('K') => Command::KillToEndOfLine,
        InputToken::Control('U') => Command::KillToStartOfLine,
        #[cfg(feature = "emacs")]
        InputToken::Control('A') => Command::MoveCursorToStart,
        #[cfg(feature = "emacs")]
        InputToken::Control('E') => Command::MoveCursorToEnd,
        #[cfg(feature = "emacs")]
        InputToken::Control('B') => Command::MoveCursorLeft,
        #[cfg(feature = "emacs")]
        InputToken::Control('F') => Command::MoveCursorRight,
        InputToken::Control(_) => Command::Ignore,
        InputToken::Printable("") => Command::Ignore,
        InputToken::Printable(text) => Command::InsertText(text),
    }
}

/// What running one [`Command`] produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Goes to the display sink as is. May be empty.
    pub display: RedrawOutput,
    /// Goes to the consumer.
    pub event: Option<SessionEvent>,
    /// A cooked line was just delivered, so the prompt is off screen until the next
    /// redraw.
    pub is_line_completed: bool,
}

/// Applies `command` to `buffer`. The cursor invariant `1 <= cursor <= len + 1` holds
/// when this returns, no matter the command.
pub fn execute(
    command: Command<'_>,
    buffer: &mut EditBuffer,
    host_platform: HostPlatform,
) -> Dispatched {
    let cursor = buffer.cursor();
    let mut it = Dispatched::default();

    match command {
        Command::Ignore => {}

        Command::InsertText(text) => {
            let index = cursor - 1;
            let inserted_len = text.chars().count();
            buffer.insert_at(text, index);
            it.display = insert_text(inserted_len, &buffer.tail_from(index));
            buffer.set_cursor(cursor + inserted_len);
        }

        Command::MoveCursorLeft => {
            if !buffer.is_cursor_at_start() {
                buffer.set_cursor(cursor - 1);
                it.display = RedrawOutput::new().op(RedrawOp::CursorBackward(1));
            }
        }

        Command::MoveCursorRight => {
            if !buffer.is_cursor_at_end() {
                buffer.set_cursor(cursor + 1);
                it.display = RedrawOutput::new().op(RedrawOp::CursorForward(1));
            }
        }

        Command::MoveCursorToStart => {
            buffer.set_cursor(1);
            it.display = RedrawOutput::new().op(RedrawOp::CursorBackward(cursor - 1));
        }

        Command::MoveCursorToEnd => {
            let end_cursor = buffer.end_cursor();
            buffer.set_cursor(end_cursor);
            it.display = RedrawOutput::new().op(RedrawOp::CursorForward(end_cursor - cursor));
        }

        Command::KillPreviousChar => {
            if !buffer.is_cursor_at_start() {
                buffer.remove_at(cursor - 2);
                buffer.set_cursor(cursor - 1);
                it.display = kill_previous_char();
            }
        }

        Command::KillToEndOfLine => {
            if !buffer.is_cursor_at_end() {
                buffer.truncate_from(cursor - 1);
                it.display = RedrawOutput::new().op(RedrawOp::KillToEndOfLine);
            }
        }

        Command::KillToStartOfLine => {
            if !buffer.is_cursor_at_start() {
                let killed_len = cursor - 1;
                buffer.remove_before(killed_len);
                buffer.set_cursor(1);
                it.display = kill_to_start_of_line(killed_len, &buffer.content());
            }
        }

        Command::CompleteLine => {
            let line = buffer.take();
            it.event = Some(SessionEvent::Data(format!(
                "{line}{}",
                host_platform.line_terminator()
            )));
            it.display = RedrawOutput::new().text(DISPLAY_NEWLINE);
            it.is_line_completed = true;
        }

        Command::Break => it.event = Some(SessionEvent::Break),

        Command::Eof => it.event = Some(SessionEvent::Eof),

        Command::Forward {
            token,
            echo,
            newline,
        } => {
            if echo {
                it.display = RedrawOutput::new().text(token);
                if newline {
                    it.display = it.display.text(DISPLAY_NEWLINE);
                }
            }
            it.event = Some(SessionEvent::Data(token.to_string()));
        }
    }

    it
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn buffer_with(text: &str, cursor: usize) -> EditBuffer {
        let mut it = EditBuffer::new();
        it.insert_at(text, 0);
        it.set_cursor(cursor);
        it
    }

    fn run(token: &str, buffer: &mut EditBuffer) -> Dispatched {
        let command = dispatch(token, InputMode::Cooked, HostPlatform::Unix);
        execute(command, buffer, HostPlatform::Unix)
    }

    #[test_case("\r", Command::CompleteLine; "enter")]
    #[test_case("\x7f", Command::KillPreviousChar; "delete")]
    #[test_case("\x08", Command::KillPreviousChar; "ctrl h")]
    #[test_case("\x1b[C", Command::MoveCursorRight; "arrow right")]
    #[test_case("\x1b[D", Command::MoveCursorLeft; "arrow left")]
    #[test_case("\x1b[A", Command::Ignore; "arrow up")]
    #[test_case("\x1b[B", Command::Ignore; "arrow down")]
    #[test_case("\x1b[Q", Command::Ignore; "unknown csi")]
    #[test_case("\x1bOA", Command::Ignore; "malformed escape")]
    #[test_case("\x03", Command::Break; "ctrl c")]
    #[test_case("\x04", Command::Eof; "ctrl d")]
    #[test_case("\x1a", Command::Ignore; "ctrl z")]
    #[test_case("\x0b", Command::KillToEndOfLine; "ctrl k")]
    #[test_case("\x15", Command::KillToStartOfLine; "ctrl u")]
    #[test_case("\x0f", Command::Ignore; "unbound control letter")]
    #[test_case("", Command::Ignore; "empty token")]
    #[test_case("hey", Command::InsertText("hey"); "printable")]
    fn test_dispatch_cooked_unix(token: &str, expected: Command<'_>) {
        assert_eq!(dispatch(token, InputMode::Cooked, HostPlatform::Unix), expected);
    }

    #[test]
    fn test_dispatch_cooked_eof_letter_follows_host_platform() {
        assert_eq!(
            dispatch("\x1a", InputMode::Cooked, HostPlatform::Windows),
            Command::Eof
        );
        assert_eq!(
            dispatch("\x04", InputMode::Cooked, HostPlatform::Windows),
            Command::Ignore
        );
    }

    #[cfg(feature = "emacs")]
    #[test_case("\x01", Command::MoveCursorToStart; "ctrl a")]
    #[test_case("\x05", Command::MoveCursorToEnd; "ctrl e")]
    #[test_case("\x02", Command::MoveCursorLeft; "ctrl b")]
    #[test_case("\x06", Command::MoveCursorRight; "ctrl f")]
    fn test_dispatch_cooked_emacs_bindings(token: &str, expected: Command<'_>) {
        assert_eq!(dispatch(token, InputMode::Cooked, HostPlatform::Unix), expected);
    }

    #[test]
    fn test_dispatch_raw_modes() {
        assert_eq!(
            dispatch("\r", InputMode::RawEcho, HostPlatform::Unix),
            Command::Forward {
                token: "\r",
                echo: true,
                newline: true
            }
        );
        assert_eq!(
            dispatch("\x03", InputMode::RawEcho, HostPlatform::Unix),
            Command::Forward {
                token: "\x03",
                echo: true,
                newline: false
            }
        );
        assert_eq!(
            dispatch("\r", InputMode::Raw, HostPlatform::Unix),
            Command::Forward {
                token: "\r",
                echo: false,
                newline: false
            }
        );
        assert_eq!(
            dispatch("\r", InputMode::Disabled, HostPlatform::Unix),
            Command::Ignore
        );
    }

    #[test]
    fn test_insert_at_end() {
        let mut buffer = EditBuffer::new();
        let it = run("a", &mut buffer);
        assert_eq!(it.display.as_str(), "\x1b[Ka");
        assert_eq!(it.event, None);
        assert_eq!(buffer.content(), "a");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_insert_in_the_middle() {
        let mut buffer = buffer_with("abcd", 2);
        let it = run("X", &mut buffer);
        assert_eq!(buffer.content(), "aXbcd");
        assert_eq!(buffer.cursor(), 3);
        assert_eq!(it.display.as_str(), "\x1b[KXbcd\x1b[3D");
    }

    #[test]
    fn test_typing_chunks_or_chars_gives_the_same_line() {
        let mut by_char = EditBuffer::new();
        for token in ["h", "e", "l", "l", "o", " ", "w", "ö", "r", "l", "d"] {
            _ = run(token, &mut by_char);
        }
        let mut by_chunk = EditBuffer::new();
        for token in ["hel", "lo wö", "rld"] {
            _ = run(token, &mut by_chunk);
        }
        assert_eq!(by_char.content(), "hello wörld");
        assert_eq!(by_chunk, by_char);
    }

    #[test]
    fn test_left_right_stop_at_the_edges() {
        let mut buffer = buffer_with("ab", 1);
        assert!(run("\x1b[D", &mut buffer).display.is_empty());
        assert_eq!(buffer.cursor(), 1);

        assert_eq!(run("\x1b[C", &mut buffer).display.as_str(), "\x1b[C");
        assert_eq!(run("\x1b[C", &mut buffer).display.as_str(), "\x1b[C");
        assert!(run("\x1b[C", &mut buffer).display.is_empty());
        assert_eq!(buffer.cursor(), 3);

        assert_eq!(run("\x1b[D", &mut buffer).display.as_str(), "\x1b[D");
        assert_eq!(buffer.cursor(), 2);
    }

    #[cfg(feature = "emacs")]
    #[test]
    fn test_move_to_start_and_end() {
        let mut buffer = buffer_with("hello", 4);
        assert_eq!(run("\x01", &mut buffer).display.as_str(), "\x1b[3D");
        assert_eq!(buffer.cursor(), 1);
        assert_eq!(run("\x05", &mut buffer).display.as_str(), "\x1b[5C");
        assert_eq!(buffer.cursor(), 6);
        assert!(run("\x05", &mut buffer).display.is_empty());
    }

    #[test]
    fn test_kill_previous_char() {
        let mut buffer = buffer_with("abc", 3);
        let it = run("\x7f", &mut buffer);
        assert_eq!(buffer.content(), "ac");
        assert_eq!(buffer.cursor(), 2);
        assert_eq!(it.display.as_str(), "\x1b[D\x1b[P");

        let mut buffer = buffer_with("abc", 4);
        _ = run("\x08", &mut buffer);
        assert_eq!(buffer.content(), "ab");
        assert_eq!(buffer.cursor(), 3);

        let mut buffer = buffer_with("abc", 1);
        assert!(run("\x7f", &mut buffer).display.is_empty());
        assert_eq!(buffer.content(), "abc");
    }

    #[test]
    fn test_kill_to_end_of_line() {
        let mut buffer = buffer_with("hello", 3);
        let it = run("\x0b", &mut buffer);
        assert_eq!(buffer.content(), "he");
        assert_eq!(buffer.cursor(), 3);
        assert_eq!(it.display.as_str(), "\x1b[K");
    }

    #[test]
    fn test_kill_to_end_of_line_at_end_is_noop() {
        let mut buffer = buffer_with("hello", 6);
        let it = run("\x0b", &mut buffer);
        assert!(it.display.is_empty());
        assert_eq!(buffer.content(), "hello");
    }

    #[test]
    fn test_kill_to_start_of_line() {
        let mut buffer = buffer_with("hello world", 7);
        let it = run("\x15", &mut buffer);
        assert_eq!(buffer.content(), "world");
        assert_eq!(buffer.cursor(), 1);
        assert_eq!(it.display.as_str(), "\x1b[6D\x1b[Kworld\x1b[5D");
    }

    #[test]
    fn test_kill_to_start_of_line_on_empty_line_is_noop() {
        let mut buffer = EditBuffer::new();
        let it = run("\x15", &mut buffer);
        assert_eq!(it, Dispatched::default());
        assert_eq!(buffer, EditBuffer::new());
    }

    #[test_case(HostPlatform::Unix, "hi\n"; "unix")]
    #[test_case(HostPlatform::Windows, "hi\r\n"; "windows")]
    fn test_complete_line(host_platform: HostPlatform, expected: &str) {
        let mut buffer = buffer_with("hi", 2);
        let command = dispatch("\r", InputMode::Cooked, host_platform);
        let it = execute(command, &mut buffer, host_platform);
        assert_eq!(it.event, Some(SessionEvent::Data(expected.to_string())));
        assert_eq!(it.display.as_str(), "\r\n");
        assert!(it.is_line_completed);
        assert_eq!(buffer, EditBuffer::new());
    }

    #[test]
    fn test_signals_leave_the_buffer_alone() {
        let mut buffer = buffer_with("abc", 2);
        assert_eq!(run("\x03", &mut buffer).event, Some(SessionEvent::Break));
        assert_eq!(run("\x04", &mut buffer).event, Some(SessionEvent::Eof));
        assert_eq!(buffer, buffer_with("abc", 2));
    }

    #[test]
    fn test_forward_echo() {
        let mut buffer = EditBuffer::new();
        let command = dispatch("\r", InputMode::RawEcho, HostPlatform::Unix);
        let it = execute(command, &mut buffer, HostPlatform::Unix);
        assert_eq!(it.display.as_str(), "\r\r\n");
        assert_eq!(it.event, Some(SessionEvent::Data("\r".to_string())));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_edits_line() {
        assert!(Command::InsertText("a").edits_line());
        assert!(Command::CompleteLine.edits_line());
        assert!(!Command::Break.edits_line());
        assert!(!Command::Ignore.edits_line());
        assert!(
            !Command::Forward {
                token: "a",
                echo: true,
                newline: false
            }
            .edits_line()
        );
    }
}
