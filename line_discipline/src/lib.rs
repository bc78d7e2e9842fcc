// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Introduction
//!
//! This crate is a line discipline engine. It sits between a raw stream of keypress
//! tokens (delivered by some host terminal surface) and a line oriented consumer, and
//! behaves like a cooked mode TTY driver:
//!
//! 1. It keeps an edit buffer and a cursor for the line that is being typed.
//! 2. It decodes control characters and `ESC [ <letter>` arrow key sequences into
//!    editing commands (move, kill, signal).
//! 3. It renders the minimal ANSI output needed to keep the display in sync.
//! 4. It hands completed lines (or raw tokens, depending on [`InputMode`]) to the
//!    consumer as [`SessionEvent`]s.
//! 5. It manages a debounced prompt, so that output written by the consumer never
//!    collides with the prompt and the partially typed line.
//!
//! # Mental model
//!
//! ```text
//! host ──► LineSession::handle_input(token)
//!            │
//!            ├─► escape_decoder::classify()      token → InputToken
//!            ├─► command_dispatcher::dispatch()  InputToken + InputMode → Command
//!            └─► SessionState::apply()           mutate EditBuffer, render RedrawOp,
//!                                                emit SessionEvent
//!
//! consumer ──► LineSession::write(text)
//!                ├─► PromptController::unprompt()
//!                ├─► display sink
//!                └─► PromptController::schedule_prompt()  (debounced)
//! ```
//!
//! # Example
//!
//! ```
//! use r3bl_line_discipline::{LineSession, SessionEvent, SessionOptions};
//! use std::sync::{Arc, Mutex};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> miette::Result<()> {
//! let display = Arc::new(Mutex::new(Vec::<u8>::new()));
//! let options = SessionOptions::new("shell").with_prompt("> ");
//! let (session, mut events) = LineSession::new(options, display.clone())?;
//!
//! for token in ["h", "i", "\r"] {
//!     session.handle_input(token);
//! }
//!
//! let line_terminator = session.options().host_platform.line_terminator();
//! assert_eq!(
//!     events.try_recv().ok(),
//!     Some(SessionEvent::Data(format!("hi{line_terminator}")))
//! );
//! # Ok(())
//! # }
//! ```

// Enforce strict error handling in production library code only. Tests and examples are
// allowed to use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod command_dispatcher;
pub mod edit_buffer;
pub mod escape_decoder;
pub mod line_session;
pub mod log;
pub mod prompt_controller;
pub mod redraw_emitter;
pub mod session_error;
pub mod session_options;

// Re-export the public API.
pub use command_dispatcher::*;
pub use edit_buffer::*;
pub use escape_decoder::*;
pub use line_session::*;
pub use log::*;
pub use prompt_controller::*;
pub use redraw_emitter::*;
pub use session_error::*;
pub use session_options::*;

// Type aliases.
use futures_core::Stream;
use std::{pin::Pin, sync::Arc, time::Duration};

pub type StdMutex<T> = std::sync::Mutex<T>;

pub type SendRawTerminal = dyn std::io::Write + Send;
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

// Constants.

/// Quiet period that must pass after the last output write before the prompt (and the
/// partially typed line) is drawn again.
pub const PROMPT_DEBOUNCE_DELAY: Duration = Duration::from_millis(100);

/// Every newline variant written to the display is normalized to this.
pub const DISPLAY_NEWLINE: &str = "\r\n";

/// What the host delivers when the Enter key is pressed.
pub const ENTER_KEY: &str = "\r";

/// What the host delivers when the Backspace / Delete key is pressed.
pub const DELETE_KEY: &str = "\x7f";

/// First character of every escape sequence.
pub const ESC: char = '\x1b';
