// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Display, Formatter, Result};

/// The line that is currently being typed, plus the cursor.
///
/// - `content` is stored as `char`s, one cursor position per `char`.
/// - `cursor` is 1-based: `cursor - 1` is the 0-based insertion point into `content`.
///   It always satisfies `1 <= cursor <= len() + 1`.
///
/// The index based mutators ([`Self::insert_at`], [`Self::remove_at`]) are permissive:
/// they never panic on an out of range index. Instead they snap to the nearest splice
/// point:
///
/// | index                | effect          |
/// |----------------------|-----------------|
/// | `0`                  | prepend / first |
/// | `index + 1 >= len`   | append / last   |
/// | anything else        | splice          |
///
/// None of the mutators move the cursor, that is up to the caller. Use
/// [`Self::set_cursor`] which clamps to the valid range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    content: Vec<char>,
    cursor: usize,
}

impl Default for EditBuffer {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            cursor: 1,
        }
    }
}

impl Display for EditBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for ch in &self.content {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

impl EditBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn len(&self) -> usize { self.content.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.content.is_empty() }

    /// 1-based cursor.
    #[must_use]
    pub fn cursor(&self) -> usize { self.cursor }

    /// The cursor position one past the last character.
    #[must_use]
    pub fn end_cursor(&self) -> usize { self.content.len() + 1 }

    #[must_use]
    pub fn is_cursor_at_start(&self) -> bool { self.cursor == 1 }

    #[must_use]
    pub fn is_cursor_at_end(&self) -> bool { self.cursor == self.end_cursor() }

    /// Moves the cursor, clamped to `1..=len() + 1`.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.clamp(1, self.end_cursor());
    }

    /// Contents of the buffer as a [`String`].
    #[must_use]
    pub fn content(&self) -> String { self.content.iter().collect() }

    /// The characters from 0-based `index` to the end.
    #[must_use]
    pub fn tail_from(&self, index: usize) -> String {
        self.content
            .get(index..)
            .map(|it| it.iter().collect())
            .unwrap_or_default()
    }

    /// Inserts `text` (all of its chars, in one step) before 0-based `index`.
    pub fn insert_at(&mut self, text: &str, index: usize) {
        let len = self.content.len();
        let splice_at = if index == 0 {
            0
        } else if index + 1 >= len {
            len
        } else {
            index
        };
        let tail = self.content.split_off(splice_at);
        self.content.extend(text.chars());
        self.content.extend(tail);
    }

    /// Removes the single char at 0-based `index`. Empty buffers are left alone.
    pub fn remove_at(&mut self, index: usize) {
        let len = self.content.len();
        if len == 0 {
            return;
        }
        if index == 0 {
            self.content.remove(0);
        } else if index + 1 >= len {
            self.content.pop();
        } else {
            self.content.remove(index);
        }
        self.clamp_cursor();
    }

    /// Drops everything before 0-based `index` (exclusive).
    pub fn remove_before(&mut self, index: usize) {
        let index = index.min(self.content.len());
        self.content.drain(..index);
        self.clamp_cursor();
    }

    /// Drops everything from 0-based `index` (inclusive) to the end.
    pub fn truncate_from(&mut self, index: usize) {
        self.content.truncate(index);
        self.clamp_cursor();
    }

    /// Empties the buffer and returns what was in it. The cursor goes back to `1`.
    pub fn take(&mut self) -> String {
        let it = self.content();
        self.clear();
        it
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 1;
    }

    fn clamp_cursor(&mut self) { self.set_cursor(self.cursor); }
}
