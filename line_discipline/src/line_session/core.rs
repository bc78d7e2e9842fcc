// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EditBuffer, InputMode, LineSessionError, PendingPromptCheck, PromptController,
            SafeRawTerminal, SessionOptions, StdMutex,
            command_dispatcher::{dispatch, execute}};
use std::{io::{self, Write},
          sync::{Arc, Weak}};
use tokio::{runtime::Handle,
            sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel}};

/// What the consumer of a [`LineSession`] receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// In [`InputMode::Cooked`] a completed line, including the platform line terminator.
    /// In the other modes a single raw token.
    Data(String),
    /// The host terminal surface was closed.
    Close,
    /// `Ctrl-C`.
    Break,
    /// `Ctrl-D` (or `Ctrl-Z` on Windows style hosts).
    Eof,
}

/// Controls whether [`LineSession::handle_input`] processes input.
///
/// When paused, input tokens are discarded, not buffered. Output written by the
/// consumer is not affected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionLiveness {
    Paused,
    NotPaused,
}

impl SessionLiveness {
    #[must_use]
    pub fn is_paused(&self) -> bool { matches!(self, SessionLiveness::Paused) }
}

/// Early return from a function if the [`SessionState`] is paused or disposed.
macro_rules! early_return_if_inactive {
    ($state:ident @Unit) => {
        if $state.is_disposed || $state.liveness.is_paused() {
            return;
        }
    };
}

pub(crate) use early_return_if_inactive;

/// Early return from a function if the [`SessionState`] was disposed.
macro_rules! early_return_if_disposed {
    ($state:ident @Unit) => {
        if $state.is_disposed {
            return;
        }
    };

    ($state:ident @Err) => {
        if $state.is_disposed {
            return Err($crate::LineSessionError::Disposed);
        }
    };
}

pub(crate) use early_return_if_disposed;

pub type SafeSessionState = Arc<StdMutex<SessionState>>;

/// Everything a [`LineSession`] owns. It is shared with the prompt debounce task, which
/// is why it lives behind a [`SafeSessionState`].
pub struct SessionState {
    pub options: SessionOptions,
    pub buffer: EditBuffer,
    pub prompt_controller: PromptController,
    pub liveness: SessionLiveness,
    pub is_disposed: bool,
    /// Dropped on dispose, which closes the consumer's receiver.
    pub event_sender: Option<UnboundedSender<SessionEvent>>,
    pub display: SafeRawTerminal,
    runtime: Handle,
    /// Handed to the debounce task so that it never keeps a dropped session alive.
    weak_self: Weak<StdMutex<SessionState>>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("options", &self.options)
            .field("buffer", &self.buffer)
            .field("prompt_controller", &self.prompt_controller)
            .field("liveness", &self.liveness)
            .field("is_disposed", &self.is_disposed)
            .finish_non_exhaustive()
    }
}

impl SessionState {
    /// Writes `text` to the display sink and flushes. Empty text writes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the display fails.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    pub fn write_display(&self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let term = &mut *self.display.lock().unwrap();
        term.write_all(text.as_bytes())?;
        term.flush()
    }

    /// Erases the prompt and the line, if they are shown.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the display fails.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    pub fn unprompt(&mut self) -> io::Result<()> {
        let term = &mut *self.display.lock().unwrap();
        self.prompt_controller
            .unprompt(&self.options.prompt, &self.buffer, term)
    }

    /// Draws the prompt and the line right away, dropping any pending redraw.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the display fails.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    pub fn show_prompt_now(&mut self) -> io::Result<()> {
        let term = &mut *self.display.lock().unwrap();
        self.prompt_controller
            .show_now(&self.options.prompt, &self.buffer, term)
    }

    /// Redraws the prompt once the display has been quiet for
    /// [`crate::PROMPT_DEBOUNCE_DELAY`].
    pub fn schedule_prompt(&mut self) {
        let weak_self = self.weak_self.clone();
        self.prompt_controller
            .schedule_prompt(&self.runtime, move |id| {
                let Some(safe_state) = weak_self.upgrade() else {
                    return PendingPromptCheck::Stale;
                };
                let mut state = safe_state.lock().unwrap();
                if state.is_disposed {
                    return PendingPromptCheck::Stale;
                }
                // A write may have pushed the deadline out while this task was waiting
                // for the lock.
                let check = state.prompt_controller.take_pending_if(id);
                if check == PendingPromptCheck::Ready
                    && let Err(error) = state.show_prompt_now()
                {
                    tracing::error!(
                        session = %state.options.name,
                        %error,
                        "failed to redraw the prompt"
                    );
                }
                check
            });
    }

    /// Hands `event` to the consumer. Events raised after dispose go nowhere.
    pub fn emit(&self, event: SessionEvent) {
        let Some(event_sender) = &self.event_sender else {
            return;
        };
        if event_sender.send(event).is_err() {
            tracing::debug!(
                session = %self.options.name,
                "event receiver was dropped, event discarded"
            );
        }
    }

    /// Runs one input token through the decoder and the dispatcher, then does the I/O
    /// for the result.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the display fails. Any event produced by the token
    /// has already been emitted by then.
    pub fn apply_input(&mut self, token: &str) -> io::Result<()> {
        let input_mode = self.options.input_mode;
        let host_platform = self.options.host_platform;
        let command = dispatch(token, input_mode, host_platform);

        // Echoed characters must land after the prompt, so bring it back if output
        // pushed it away. A failure here must not cost the keypress.
        if input_mode == InputMode::Cooked
            && command.edits_line()
            && !self.prompt_controller.is_shown()
            && let Err(error) = self.show_prompt_now()
        {
            tracing::error!(
                session = %self.options.name,
                %error,
                "failed to show the prompt before echoing input"
            );
        }

        let dispatched = execute(command, &mut self.buffer, host_platform);

        if let Some(event) = dispatched.event {
            self.emit(event);
        }

        self.write_display(dispatched.display.as_str())?;

        if dispatched.is_line_completed {
            // The newline scrolled the prompt up, out of the way.
            self.prompt_controller.mark_hidden();
            self.schedule_prompt();
        }

        Ok(())
    }

    /// Releases the timer and the consumer channel. Returns `false` if this already
    /// happened.
    pub fn dispose(&mut self) -> bool {
        if self.is_disposed {
            return false;
        }
        self.prompt_controller.cancel_pending();
        self.event_sender = None;
        self.is_disposed = true;
        true
    }
}

/// A line discipline session.
///
/// All methods take `&self` and run to completion before they return. The only thing
/// that happens in the background is the debounced prompt redraw, which is spawned on
/// the Tokio runtime that was current when the session was created.
///
/// Dropping the session disposes it.
#[derive(Debug)]
pub struct LineSession {
    pub safe_state: SafeSessionState,
}

impl LineSession {
    /// Creates a session that draws on `display`, and shows the prompt immediately.
    /// Events for the consumer arrive on the returned receiver.
    ///
    /// # Errors
    ///
    /// - [`LineSessionError::NoRuntime`] if there is no current Tokio runtime.
    /// - [`LineSessionError::IO`] if the prompt can't be written to `display`.
    ///
    /// # Panics
    ///
    /// This will panic if the lock is poisoned, which can happen if a thread
    /// panics while holding the lock.
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    pub fn new(
        options: SessionOptions,
        display: SafeRawTerminal,
    ) -> Result<(Self, UnboundedReceiver<SessionEvent>), LineSessionError> {
        let runtime = Handle::try_current().map_err(|_| LineSessionError::NoRuntime)?;
        let (event_sender, event_receiver) = unbounded_channel();

        let safe_state = Arc::new_cyclic(|weak_self| {
            StdMutex::new(SessionState {
                options,
                buffer: EditBuffer::new(),
                prompt_controller: PromptController::default(),
                liveness: SessionLiveness::NotPaused,
                is_disposed: false,
                event_sender: Some(event_sender),
                display,
                runtime,
                weak_self: weak_self.clone(),
            })
        });

        {
            let mut state = safe_state.lock().unwrap();
            state.show_prompt_now()?;
            tracing::debug!(
                session = %state.options.name,
                input_mode = %state.options.input_mode,
                host_platform = %state.options.host_platform,
                "line session created"
            );
        }

        Ok((Self { safe_state }, event_receiver))
    }

    /// Input tokens are discarded until [`Self::resume`] is called.
    pub fn pause(&self) { self.set_liveness(SessionLiveness::Paused); }

    pub fn resume(&self) { self.set_liveness(SessionLiveness::NotPaused); }

    fn set_liveness(&self, liveness: SessionLiveness) {
        let mut state = self.safe_state.lock().unwrap();
        early_return_if_disposed!(state @Unit);
        state.liveness = liveness;
        tracing::debug!(session = %state.options.name, ?liveness, "liveness changed");
    }

    /// Kills any pending prompt redraw, closes the consumer's event receiver, and makes
    /// the session unusable. Emits nothing. Safe to call more than once.
    pub fn dispose(&self) {
        let mut state = self.safe_state.lock().unwrap();
        if state.dispose() {
            tracing::debug!(session = %state.options.name, "line session disposed");
        }
    }

    #[must_use]
    pub fn is_paused(&self) -> bool { self.safe_state.lock().unwrap().liveness.is_paused() }

    #[must_use]
    pub fn is_disposed(&self) -> bool { self.safe_state.lock().unwrap().is_disposed }

    #[must_use]
    pub fn is_prompt_shown(&self) -> bool {
        self.safe_state.lock().unwrap().prompt_controller.is_shown()
    }

    #[must_use]
    pub fn options(&self) -> SessionOptions { self.safe_state.lock().unwrap().options.clone() }

    /// Snapshot of the line being typed.
    #[must_use]
    pub fn current_line(&self) -> EditBuffer { self.safe_state.lock().unwrap().buffer.clone() }
}

impl Drop for LineSession {
    fn drop(&mut self) { self.dispose(); }
}
