// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Optional `tracing` setup for programs that host a [`crate::LineSession`].
//!
//! The session itself only emits `tracing` events (session lifecycle at `debug`,
//! swallowed display faults at `error`). Nothing is printed unless a subscriber is
//! installed, eg with [`init`] or [`TracingConfig::install_thread_local`].
//!
//! Logging to [`DisplayPreference::Stdout`] while a session owns the terminal will
//! collide with the prompt, so interactive programs usually log to a file:
//!
//! ```no_run
//! use r3bl_line_discipline::{TracingConfig, init};
//!
//! # fn main() -> miette::Result<()> {
//! init(TracingConfig::new_file(Some("line_session.log".into())))?;
//! # Ok(())
//! # }
//! ```

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use tracing_config::*;
pub use tracing_init::*;
