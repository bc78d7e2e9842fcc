// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The composition root: [`LineSession`] owns the [`crate::EditBuffer`], the
//! [`crate::PromptController`] and the [`crate::SessionOptions`], and wires the host
//! (input tokens), the consumer ([`SessionEvent`]s and output) and the display sink
//! together.
//!
//! | Module   | Responsibility                                                       |
//! |----------|----------------------------------------------------------------------|
//! | `core`   | [`LineSession`], [`SessionState`], [`SessionEvent`], lifecycle        |
//! | `input`  | Host side: keypress tokens, input streams, host surface closing      |
//! | `output` | Consumer side: writes, [`SessionWriter`], clear, prompt and options   |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Private modules organized by functional responsibility.
mod core;
mod input;
mod output;

// Public re-exports (expose stable API).
pub use core::*;
pub use output::*;
