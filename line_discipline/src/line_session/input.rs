// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::core::{LineSession, SessionEvent, early_return_if_disposed,
                  early_return_if_inactive};
use crate::PinnedInputStream;
use futures_util::StreamExt;

impl LineSession {
    /// Handles one keypress (or one paste) from the host.
    ///
    /// A no-op while paused or after dispose. A display sink failure is logged and the
    /// session keeps going; the buffer and cursor stay valid.
    pub fn handle_input(&self, token: &str) {
        let mut state = self.safe_state.lock().unwrap();
        early_return_if_inactive!(state @Unit);

        if let Err(error) = state.apply_input(token) {
            tracing::error!(
                session = %state.options.name,
                ?token,
                %error,
                "failed to handle input"
            );
        }
    }

    /// The host terminal surface was closed: emits [`SessionEvent::Close`], then
    /// disposes. A no-op after dispose.
    pub fn handle_host_closed(&self) {
        let mut state = self.safe_state.lock().unwrap();
        early_return_if_disposed!(state @Unit);

        state.emit(SessionEvent::Close);
        state.dispose();
        tracing::debug!(session = %state.options.name, "host closed, line session disposed");
    }

    /// Feeds every token from `input_stream` to [`Self::handle_input`]. The stream
    /// ending means the host surface was closed, see [`Self::handle_host_closed`].
    ///
    /// Returns early, without emitting anything, if the session is disposed while the
    /// stream is still open.
    pub async fn drive(&self, mut input_stream: PinnedInputStream<String>) {
        while let Some(token) = input_stream.next().await {
            if self.is_disposed() {
                return;
            }
            self.handle_input(&token);
        }
        self.handle_host_closed();
    }
}
