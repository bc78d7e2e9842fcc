// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Introduction
//!
//! This is a test fixtures library that provides reusable components for testing the
//! `r3bl_line_discipline` crate. It is intended to be a
//! [`dev-dependency`](https://doc.rust-lang.org/cargo/reference/specifying-dependencies.html#dev-dependencies).
//!
//! It provides fixtures for both ends of a line session:
//! 1. The input stream fixtures generate a stream of input tokens, just like a host
//!    terminal surface delivers keypresses.
//! 2. The stdout fixtures capture everything the session renders to its display sink.
//! 3. [`TempDir`] gives tests a scratch directory (eg for log files) that is deleted when
//!    dropped.
//!
//! # `input_device_fixtures`
//!
//! Here's an example of how create a stream of `T` from a `Vec<T>`.
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use futures_util::StreamExt;
//! use r3bl_test_fixtures::gen_input_stream;
//!
//! let mut input_stream = gen_input_stream(vec![1, 2, 3]);
//! for _ in 1..=3 {
//!     input_stream.next().await;
//! }
//! assert_eq!(input_stream.next().await, None);
//! # }
//! ```
//!
//! # `output_device_fixtures`
//!
//! ```
//! use std::io::Write;
//! use r3bl_test_fixtures::StdoutMock;
//!
//! let mut stdout_mock = StdoutMock::default();
//! let stdout_mock_clone = stdout_mock.clone(); // Points to the same inner value.
//!
//! stdout_mock.write_all(b"hello world").unwrap();
//! assert_eq!(stdout_mock_clone.get_copy_of_buffer_as_string(), "hello world");
//! ```

// Attach sources.
pub mod input_device_fixtures;
pub mod output_device_fixtures;
pub mod temp_dir;

// Re-export.
pub use input_device_fixtures::*;
pub use output_device_fixtures::*;
pub use temp_dir::*;

// Type aliases.
use futures_core::Stream;
use std::pin::Pin;

pub type StdMutex<T> = std::sync::Mutex<T>;

pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;
