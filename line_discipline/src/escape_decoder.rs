// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Classifies one input token.
//!
//! The host delivers one logical keypress (or one paste) per call, so there is no state
//! to carry between tokens: each token is classified on its own. Only [`InputMode::Cooked`]
//! interprets escape sequences and control characters. Every other mode sees them as
//! [`InputToken::Printable`] and passes them through.

use crate::{DELETE_KEY, ENTER_KEY, ESC, InputMode};

/// Control characters are `0x00..0x20`. Adding this maps them to their letter, so
/// `Ctrl-A` (`0x01`) becomes `'A'`.
pub const CONTROL_CHAR_TO_LETTER_OFFSET: u32 = 0x40;

/// `ESC [ <letter>`.
pub const CSI_SEQUENCE_LEN: usize = 3;

/// The `[` that follows `ESC` in a CSI sequence.
pub const CSI_INTRODUCER: char = '[';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputToken<'a> {
    Enter,
    Delete,
    /// Starts with `ESC` but is not a well formed `ESC [ <letter>`. Swallowed.
    UnrecognizedEscape,
    /// `ESC [ <letter>`, holds the letter.
    Csi(char),
    /// A single control character, holds its letter (`Ctrl-C` is `'C'`).
    Control(char),
    Printable(&'a str),
}

#[must_use]
pub fn classify(token: &str, input_mode: InputMode) -> InputToken<'_> {
    if token == ENTER_KEY {
        return InputToken::Enter;
    }

    if token == DELETE_KEY {
        return InputToken::Delete;
    }

    if input_mode != InputMode::Cooked {
        return InputToken::Printable(token);
    }

    if token.starts_with(ESC) {
        return classify_escape(token);
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        // Single control character.
        (Some(ch), None) if u32::from(ch) < 0x20 => {
            match char::from_u32(u32::from(ch) + CONTROL_CHAR_TO_LETTER_OFFSET) {
                Some(letter) => InputToken::Control(letter),
                None => InputToken::Printable(token),
            }
        }
        _ => InputToken::Printable(token),
    }
}

/// `token` starts with [`ESC`]. Only `ESC [ <letter>` is recognized.
fn classify_escape(token: &str) -> InputToken<'_> {
    let mut rest = token.chars().skip(1);
    match (token.chars().count(), rest.next(), rest.next()) {
        (CSI_SEQUENCE_LEN, Some(CSI_INTRODUCER), Some(letter)) => InputToken::Csi(letter),
        _ => InputToken::UnrecognizedEscape,
    }
}
