// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;
use std::io;

/// Errors surfaced by [`crate::LineSession`].
///
/// Misuse of the API ([`Self::ImmutableName`], [`Self::Disposed`], [`Self::NoRuntime`])
/// is returned to the caller. Display sink failures ([`Self::IO`]) raised while handling
/// a single input token or a single write are logged and swallowed by the session, so
/// they only reach the caller from the configuration calls.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LineSessionError {
    #[error("session name is immutable: can't change {current:?} to {requested:?}")]
    #[diagnostic(
        code(r3bl_line_discipline::immutable_name),
        help("Create a new LineSession if you need a different name")
    )]
    ImmutableName { current: String, requested: String },

    #[error("session was disposed")]
    #[diagnostic(
        code(r3bl_line_discipline::disposed),
        help("A disposed LineSession can't be reused, create a new one")
    )]
    Disposed,

    #[error("no tokio runtime is running")]
    #[diagnostic(
        code(r3bl_line_discipline::no_runtime),
        help("The prompt debounce timer needs a tokio runtime, create the LineSession from inside one")
    )]
    NoRuntime,

    /// An internal I/O error occurred while writing to the display sink.
    #[error(transparent)]
    #[diagnostic(code(r3bl_line_discipline::io))]
    IO(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_immutable_name_message() {
        let error = LineSessionError::ImmutableName {
            current: "a".into(),
            requested: "b".into(),
        };
        assert_eq!(
            error.to_string(),
            r#"session name is immutable: can't change "a" to "b""#
        );
        assert_eq!(
            error.code().map(|it| it.to_string()),
            Some("r3bl_line_discipline::immutable_name".to_string())
        );
    }

    #[test]
    fn test_io_is_transparent() {
        let error: LineSessionError = io::Error::other("sink gone").into();
        assert_eq!(error.to_string(), "sink gone");
    }
}
