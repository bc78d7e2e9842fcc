// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Formats editing operations as the terminal control output that keeps the display in
//! sync with the [`crate::EditBuffer`].
//!
//! CSI sequences follow the pattern `ESC [ parameters final_character`. Only the handful
//! needed for single line editing are here. Everything is pure formatting: a
//! [`RedrawOp`] is turned into a [`String`] (via [`std::fmt::Display`]) and it is up
//! to the caller to hand that to the display sink.

use std::fmt::{self, Write};

pub const CSI_START: &str = "\x1b[";

/// CSI A: Cursor Up (CUU).
pub const CUU_CURSOR_UP: char = 'A';
/// CSI B: Cursor Down (CUD).
pub const CUD_CURSOR_DOWN: char = 'B';
/// CSI C: Cursor Forward (CUF).
pub const CUF_CURSOR_FORWARD: char = 'C';
/// CSI D: Cursor Backward (CUB).
pub const CUB_CURSOR_BACKWARD: char = 'D';
/// CSI H: Cursor Position (CUP), no params means home.
pub const CUP_CURSOR_POSITION: char = 'H';
/// CSI J: Erase in Display (ED), `2` is the entire screen.
pub const ED_ERASE_DISPLAY: char = 'J';
/// CSI K: Erase in Line (EL), no params means cursor to end of line.
pub const EL_ERASE_LINE: char = 'K';
/// CSI P: Delete Character (DCH), shifts the rest of the line left.
pub const DCH_DELETE_CHAR: char = 'P';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawOp {
    CursorUp(usize),
    CursorDown(usize),
    CursorForward(usize),
    CursorBackward(usize),
    /// Delete the char under the cursor.
    DeleteChar,
    /// Erase from the cursor to the end of the line.
    KillToEndOfLine,
    /// Move back `n` columns, then erase to the end of the line.
    KillBackThenToEndOfLine(usize),
    /// Erase the whole screen and move the cursor to the top left corner.
    ClearAndHome,
}

impl fmt::Display for RedrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RedrawOp::CursorUp(n) => write_cursor_move(f, n, CUU_CURSOR_UP),
            RedrawOp::CursorDown(n) => write_cursor_move(f, n, CUD_CURSOR_DOWN),
            RedrawOp::CursorForward(n) => write_cursor_move(f, n, CUF_CURSOR_FORWARD),
            RedrawOp::CursorBackward(n) => write_cursor_move(f, n, CUB_CURSOR_BACKWARD),
            RedrawOp::DeleteChar => write!(f, "{CSI_START}{DCH_DELETE_CHAR}"),
            RedrawOp::KillToEndOfLine => write!(f, "{CSI_START}{EL_ERASE_LINE}"),
            RedrawOp::KillBackThenToEndOfLine(n) => {
                write_cursor_move(f, n, CUB_CURSOR_BACKWARD)?;
                write!(f, "{CSI_START}{EL_ERASE_LINE}")
            }
            RedrawOp::ClearAndHome => write!(
                f,
                "{CSI_START}2{ED_ERASE_DISPLAY}{CSI_START}{CUP_CURSOR_POSITION}"
            ),
        }
    }
}

/// A count of `0` writes nothing, since terminals treat `CSI 0 D` the same as `CSI 1 D`.
fn write_cursor_move(f: &mut fmt::Formatter<'_>, n: usize, final_char: char) -> fmt::Result {
    match n {
        0 => Ok(()),
        1 => write!(f, "{CSI_START}{final_char}"),
        _ => write!(f, "{CSI_START}{n}{final_char}"),
    }
}

/// Accumulates plain text and [`RedrawOp`]s into the one string that is handed to the
/// display sink for a single editing command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedrawOutput {
    acc: String,
}

impl RedrawOutput {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn op(mut self, op: RedrawOp) -> Self {
        // Writing to a String never fails.
        _ = write!(self.acc, "{op}");
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.acc.push_str(text);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.acc.is_empty() }

    #[must_use]
    pub fn as_str(&self) -> &str { &self.acc }

    #[must_use]
    pub fn into_string(self) -> String { self.acc }
}

/// Output for inserting `inserted_len` chars at the cursor, when `tail` is everything in
/// the buffer from the insertion point on (inserted text included): erase to the end of
/// the line, rewrite the tail, then step back over the part of the tail that follows the
/// inserted text.
#[must_use]
pub fn insert_text(inserted_len: usize, tail: &str) -> RedrawOutput {
    let tail_len = tail.chars().count();
    let it = RedrawOutput::new().op(RedrawOp::KillToEndOfLine).text(tail);
    if tail_len > inserted_len {
        it.op(RedrawOp::CursorBackward(tail_len - inserted_len))
    } else {
        it
    }
}

/// Output for removing the char to the left of the cursor.
#[must_use]
pub fn kill_previous_char() -> RedrawOutput {
    RedrawOutput::new()
        .op(RedrawOp::CursorBackward(1))
        .op(RedrawOp::DeleteChar)
}

/// Output for removing the `killed_len` chars before the cursor, when `tail` is what is
/// left after the cursor: kill back to the start, rewrite the tail, and return the
/// cursor to the start.
#[must_use]
pub fn kill_to_start_of_line(killed_len: usize, tail: &str) -> RedrawOutput {
    RedrawOutput::new()
        .op(RedrawOp::KillBackThenToEndOfLine(killed_len))
        .text(tail)
        .op(RedrawOp::CursorBackward(tail.chars().count()))
}
