// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How input tokens are interpreted. Fixed for the life of a session, except via
/// [`crate::LineSession::reset_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum InputMode {
    /// Full line editing. Enter completes a line, control chars are editing commands.
    #[default]
    Cooked,
    /// Every token is echoed to the display and forwarded to the consumer verbatim.
    RawEcho,
    /// Every token is forwarded to the consumer verbatim, nothing is echoed.
    Raw,
    /// All input is discarded.
    Disabled,
}

/// The two host families. Only used to pick the end of file key and the line
/// terminator that is appended to completed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum HostPlatform {
    Unix,
    Windows,
}

impl Default for HostPlatform {
    fn default() -> Self {
        if cfg!(windows) {
            HostPlatform::Windows
        } else {
            HostPlatform::Unix
        }
    }
}

impl HostPlatform {
    /// Appended to every line delivered in [`InputMode::Cooked`].
    #[must_use]
    pub fn line_terminator(&self) -> &'static str {
        match self {
            HostPlatform::Unix => "\n",
            HostPlatform::Windows => "\r\n",
        }
    }

    /// The control letter that raises [`crate::SessionEvent::Eof`]: `Ctrl-D` on Unix,
    /// `Ctrl-Z` on Windows.
    #[must_use]
    pub fn eof_letter(&self) -> char {
        match self {
            HostPlatform::Unix => 'D',
            HostPlatform::Windows => 'Z',
        }
    }
}

/// Configuration for a [`crate::LineSession`].
///
/// `name` identifies the session and can't change once set; the other fields can be
/// swapped at any time with [`crate::LineSession::reset_options`].
///
/// This can be deserialized, eg from JSON, and the fields other than `name` are
/// optional:
///
/// ```
/// use r3bl_line_discipline::{InputMode, SessionOptions};
///
/// let options: SessionOptions =
///     serde_json::from_str(r#"{ "name": "build", "input_mode": "raw-echo" }"#).unwrap();
/// assert_eq!(options.input_mode, InputMode::RawEcho);
/// assert_eq!(options.prompt, "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub name: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub input_mode: InputMode,
    #[serde(default)]
    pub host_platform: HostPlatform,
}

impl SessionOptions {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: String::new(),
            input_mode: InputMode::default(),
            host_platform: HostPlatform::default(),
        }
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn with_input_mode(mut self, input_mode: InputMode) -> Self {
        self.input_mode = input_mode;
        self
    }

    #[must_use]
    pub fn with_host_platform(mut self, host_platform: HostPlatform) -> Self {
        self.host_platform = host_platform;
        self
    }
}
