// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::core::{LineSession, SafeSessionState, SessionState, early_return_if_disposed};
use crate::{DISPLAY_NEWLINE, LineSessionError, RedrawOp, SessionOptions};
use std::io::{self, Write};

/// Rewrites `\r\n`, a lone `\r` and a lone `\n` as [`DISPLAY_NEWLINE`].
#[must_use]
pub fn normalize_newlines(data: &str) -> String {
    let mut acc = String::with_capacity(data.len());
    let mut chars = data.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                _ = chars.next_if_eq(&'\n');
                acc.push_str(DISPLAY_NEWLINE);
            }
            '\n' => acc.push_str(DISPLAY_NEWLINE),
            _ => acc.push(ch),
        }
    }
    acc
}

impl SessionState {
    /// Erases the prompt, writes `data`, then either schedules the prompt to come back
    /// (when `data` ends with a newline) or cancels any pending redraw (when the output
    /// line is still open).
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the display fails.
    pub fn write_output(&mut self, data: &str) -> io::Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        let data = normalize_newlines(data);
        self.unprompt()?;
        self.write_display(&data)?;

        if data.ends_with(DISPLAY_NEWLINE) {
            self.schedule_prompt();
        } else {
            self.prompt_controller.cancel_pending();
        }

        Ok(())
    }
}

impl LineSession {
    /// Writes consumer output to the display without trampling the prompt. Every newline
    /// variant is written as [`DISPLAY_NEWLINE`].
    ///
    /// Writing nothing is a no-op. So is writing after dispose. A display sink failure
    /// is logged and swallowed.
    pub fn write(&self, data: &str) {
        let mut state = self.safe_state.lock().unwrap();
        early_return_if_disposed!(state @Unit);

        if let Err(error) = state.write_output(data) {
            tracing::error!(session = %state.options.name, %error, "failed to write output");
        }
    }

    /// A [`Write`] handle that prints through this session, eg from other tasks.
    ///
    /// Don't install it as a `tracing` writer: the session logs while holding its own
    /// lock.
    #[must_use]
    pub fn writer(&self) -> SessionWriter {
        SessionWriter {
            safe_state: self.safe_state.clone(),
            incomplete_utf8: Vec::new(),
        }
    }

    /// Clears the whole display, empties the line, and shows the prompt again. Options
    /// are left alone.
    ///
    /// # Errors
    ///
    /// - [`LineSessionError::Disposed`] after dispose.
    /// - [`LineSessionError::IO`] if the display can't be written to.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    pub fn clear(&self) -> Result<(), LineSessionError> {
        let mut state = self.safe_state.lock().unwrap();
        early_return_if_disposed!(state @Err);

        state.prompt_controller.cancel_pending();
        state.write_display(&RedrawOp::ClearAndHome.to_string())?;
        state.buffer.clear();
        state.prompt_controller.mark_hidden();
        state.show_prompt_now()?;

        Ok(())
    }

    /// Swaps in new options. The `name` can't change.
    ///
    /// The pending prompt redraw is killed, the line is thrown away, and the (new) prompt
    /// is displayed immediately.
    ///
    /// # Errors
    ///
    /// - [`LineSessionError::ImmutableName`] if `options.name` differs. Nothing changes.
    /// - [`LineSessionError::Disposed`] after dispose.
    /// - [`LineSessionError::IO`] if the display can't be written to.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    pub fn reset_options(&self, options: SessionOptions) -> Result<(), LineSessionError> {
        let mut state = self.safe_state.lock().unwrap();
        early_return_if_disposed!(state @Err);

        if state.options.name != options.name {
            return Err(LineSessionError::ImmutableName {
                current: state.options.name.clone(),
                requested: options.name,
            });
        }

        state.prompt_controller.cancel_pending();
        state.unprompt()?;
        state.options = options;
        state.buffer.clear();
        state.show_prompt_now()?;

        tracing::debug!(
            session = %state.options.name,
            input_mode = %state.options.input_mode,
            host_platform = %state.options.host_platform,
            "options reset"
        );

        Ok(())
    }

    /// Replaces the prompt text and redraws it, keeping the line being typed.
    ///
    /// # Errors
    ///
    /// - [`LineSessionError::Disposed`] after dispose.
    /// - [`LineSessionError::IO`] if the display can't be written to.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    pub fn update_prompt(&self, prompt: &str) -> Result<(), LineSessionError> {
        let mut state = self.safe_state.lock().unwrap();
        early_return_if_disposed!(state @Err);

        state.unprompt()?;
        state.options.prompt.clear();
        state.options.prompt.push_str(prompt);
        state.show_prompt_now()?;

        Ok(())
    }
}

/// Prints through a [`LineSession`], see [`LineSession::writer`].
///
/// Bytes are decoded as UTF-8. A multi byte char that is split across two `write` calls
/// is held back until the rest of it arrives; bytes that can never be valid UTF-8 are
/// replaced with `U+FFFD`.
#[derive(Debug)]
pub struct SessionWriter {
    safe_state: SafeSessionState,
    incomplete_utf8: Vec<u8>,
}

impl Clone for SessionWriter {
    fn clone(&self) -> Self {
        Self {
            safe_state: self.safe_state.clone(),
            incomplete_utf8: Vec::new(),
        }
    }
}

impl Write for SessionWriter {
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.incomplete_utf8.extend_from_slice(buf);

        let text = match std::str::from_utf8(&self.incomplete_utf8) {
            Ok(text) => {
                let text = text.to_string();
                self.incomplete_utf8.clear();
                text
            }
            // Truncated char at the end: keep it for the next write.
            Err(error) if error.error_len().is_none() => {
                let valid_up_to = error.valid_up_to();
                let rest = self.incomplete_utf8.split_off(valid_up_to);
                let text = String::from_utf8_lossy(&self.incomplete_utf8).into_owned();
                self.incomplete_utf8 = rest;
                text
            }
            Err(_) => {
                let text = String::from_utf8_lossy(&self.incomplete_utf8).into_owned();
                self.incomplete_utf8.clear();
                text
            }
        };

        let mut state = self.safe_state.lock().unwrap();
        if !state.is_disposed {
            state.write_output(&text)?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputMode, PROMPT_DEBOUNCE_DELAY, SafeRawTerminal, StdMutex};
    use pretty_assertions::assert_eq;
    use r3bl_test_fixtures::StdoutMock;
    use std::{sync::Arc, time::Duration};
    use test_case::test_case;

    fn new_session(prompt: &str) -> (LineSession, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let display: SafeRawTerminal = Arc::new(StdMutex::new(stdout_mock.clone()));
        let (session, _events) =
            LineSession::new(SessionOptions::new("term").with_prompt(prompt), display)
                .unwrap();
        stdout_mock.clear();
        (session, stdout_mock)
    }

    #[test_case("a\nb", "a\r\nb"; "lf")]
    #[test_case("a\r\nb", "a\r\nb"; "crlf")]
    #[test_case("a\rb", "a\r\nb"; "lone cr")]
    #[test_case("a\n\r\nb\r", "a\r\n\r\nb\r\n"; "mixed")]
    #[test_case("\r\r", "\r\n\r\n"; "two lone cr")]
    #[test_case("plain", "plain"; "no newline")]
    fn test_normalize_newlines(input: &str, expected: &str) {
        assert_eq!(normalize_newlines(input), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_line_hides_then_restores_prompt() {
        let (session, stdout_mock) = new_session("> ");

        session.write("hello\n");
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[2D\x1b[Khello\r\n"
        );
        assert!(!session.is_prompt_shown());

        tokio::time::sleep(PROMPT_DEBOUNCE_DELAY + Duration::from_millis(1)).await;
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[2D\x1b[Khello\r\n> "
        );
        assert!(session.is_prompt_shown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_without_newline_cancels_pending_prompt() {
        let (session, stdout_mock) = new_session("> ");

        session.write("one\n");
        session.write("Password: ");
        tokio::time::sleep(PROMPT_DEBOUNCE_DELAY * 3).await;
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[2D\x1b[Kone\r\nPassword: "
        );
        assert!(!session.is_prompt_shown());
    }

    #[tokio::test]
    async fn test_write_nothing_is_noop() {
        let (session, stdout_mock) = new_session("> ");
        session.write("");
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
        assert!(session.is_prompt_shown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_writer_holds_back_split_utf8() {
        let (session, stdout_mock) = new_session("");
        let mut writer = session.writer();

        let bytes = "é\n".as_bytes();
        writer.write_all(&bytes[..1]).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");

        writer.write_all(&bytes[1..]).unwrap();
        // Empty prompt and empty line, so unprompt only erases to the end of the line.
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[Ké\r\n");
    }

    #[tokio::test]
    async fn test_writer_after_dispose_writes_nothing() {
        let (session, stdout_mock) = new_session("> ");
        let mut writer = session.writer();
        session.dispose();
        writer.write_all(b"late\n").unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
    }

    #[tokio::test]
    async fn test_clear() {
        let (session, stdout_mock) = new_session("> ");
        session.handle_input("ab");
        stdout_mock.clear();

        session.clear().unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[2J\x1b[H> ");
        assert!(session.current_line().is_empty());
        assert_eq!(session.options().prompt, "> ");
    }

    #[tokio::test]
    async fn test_reset_options() {
        let (session, stdout_mock) = new_session("> ");
        session.handle_input("ab");
        stdout_mock.clear();

        session
            .reset_options(
                SessionOptions::new("term")
                    .with_prompt("$ ")
                    .with_input_mode(InputMode::Raw),
            )
            .unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "\x1b[4D\x1b[K$ ");
        assert!(session.current_line().is_empty());
        assert_eq!(session.options().input_mode, InputMode::Raw);
    }

    #[tokio::test]
    async fn test_reset_options_rejects_new_name() {
        let (session, stdout_mock) = new_session("> ");
        session.handle_input("ab");
        stdout_mock.clear();

        let result = session.reset_options(SessionOptions::new("other"));
        assert!(matches!(
            result,
            Err(LineSessionError::ImmutableName { ref current, ref requested })
                if current == "term" && requested == "other"
        ));
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
        assert_eq!(session.current_line().content(), "ab");
    }

    #[tokio::test]
    async fn test_configuration_calls_after_dispose_fail() {
        let (session, _stdout_mock) = new_session("> ");
        session.dispose();
        assert!(matches!(session.clear(), Err(LineSessionError::Disposed)));
        assert!(matches!(
            session.reset_options(SessionOptions::new("term")),
            Err(LineSessionError::Disposed)
        ));
        assert!(matches!(
            session.update_prompt("$ "),
            Err(LineSessionError::Disposed)
        ));
    }

    #[tokio::test]
    async fn test_update_prompt_keeps_line() {
        let (session, stdout_mock) = new_session("> ");
        session.handle_input("ab");
        session.handle_input("\x1b[D");
        stdout_mock.clear();

        session.update_prompt("~/src $ ").unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[4D\x1b[K~/src $ ab\x1b[D"
        );
        assert_eq!(session.current_line().content(), "ab");
        assert_eq!(session.current_line().cursor(), 2);
    }
}
