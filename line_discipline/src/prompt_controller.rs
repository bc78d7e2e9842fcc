// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Keeps the prompt (and the partially typed line that follows it) out of the way of
//! output written by the consumer.
//!
//! ```text
//!              unprompt()                     debounce fires / show_now()
//!   Shown ────────────────────► Hidden ────────────────────────────────► Shown
//!                                  │  ▲
//!            schedule_prompt() ────┘  └──── reset_deadline() while pending
//! ```
//!
//! A burst of writes that each end with a newline only redraws the prompt once, after
//! [`crate::PROMPT_DEBOUNCE_DELAY`] has passed since the last of them.

use crate::{EditBuffer, PROMPT_DEBOUNCE_DELAY, RedrawOp, RedrawOutput, StdMutex};
use std::{io::{self, Write},
          sync::Arc,
          time::Duration};
use tokio::{runtime::Handle, task::JoinHandle, time::Instant};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PromptState {
    Hidden,
    Shown,
}

/// Identifies one scheduled redraw. A redraw whose id is no longer the pending one was
/// cancelled (or replaced), and must not render.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PendingPromptId(u64);

/// What a woken timer learns from [`PromptController::take_pending_if`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PendingPromptCheck {
    /// The slot was taken. Render now.
    Ready,
    /// Still the pending redraw, but its deadline was pushed out after the timer woke.
    /// Sleep again.
    NotYetDue,
    /// Cancelled or replaced. Never render.
    Stale,
}

/// A resettable "do X after Y of no activity" deadline.
#[derive(Debug, Clone)]
pub struct DebouncedDeadline {
    deadline: Option<Instant>,
    duration: Duration,
}

impl DebouncedDeadline {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            deadline: None,
            duration,
        }
    }

    /// Resets the deadline to `now + duration`.
    pub fn reset(&mut self) { self.deadline = Some(Instant::now() + self.duration); }

    pub fn clear(&mut self) { self.deadline = None; }

    #[must_use]
    pub fn is_pending(&self) -> bool { self.deadline.is_some() }

    #[must_use]
    pub fn get(&self) -> Option<Instant> { self.deadline }

    #[must_use]
    pub fn is_due(&self) -> bool {
        self.deadline.is_none_or(|instant| Instant::now() >= instant)
    }
}

pub type SafeDebouncedDeadline = Arc<StdMutex<DebouncedDeadline>>;

/// The single slot for a scheduled prompt redraw: the task that sleeps, and the deadline
/// it sleeps towards.
#[derive(Debug)]
pub struct PendingPrompt {
    pub id: PendingPromptId,
    pub deadline: SafeDebouncedDeadline,
    pub task: JoinHandle<()>,
}

impl PendingPrompt {
    /// Pushes the deadline out by another full quiet period. The sleeping task picks up
    /// the new deadline when it wakes.
    pub fn reset_deadline(&self) { self.deadline.lock().unwrap().reset(); }

    /// Kills the task. Nothing fires.
    pub fn cancel(self) { self.task.abort(); }
}

/// Sleeps until `deadline` has passed without being reset in the meantime.
async fn sleep_until_quiet(deadline: SafeDebouncedDeadline) {
    loop {
        let maybe_instant = deadline.lock().unwrap().get();
        let Some(instant) = maybe_instant else {
            return;
        };
        if Instant::now() >= instant {
            return;
        }
        tokio::time::sleep_until(instant).await;
    }
}

#[derive(Debug)]
pub struct PromptController {
    state: PromptState,
    pending: Option<PendingPrompt>,
    next_id: u64,
    delay: Duration,
}

impl Default for PromptController {
    fn default() -> Self { Self::new(PROMPT_DEBOUNCE_DELAY) }
}

impl PromptController {
    /// Starts [`PromptState::Hidden`], since nothing has been drawn yet.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            state: PromptState::Hidden,
            pending: None,
            next_id: 0,
            delay,
        }
    }

    #[must_use]
    pub fn state(&self) -> PromptState { self.state }

    #[must_use]
    pub fn is_shown(&self) -> bool { self.state == PromptState::Shown }

    #[must_use]
    pub fn has_pending(&self) -> bool { self.pending.is_some() }

    /// Erases the prompt and the line from the display. A no-op when already hidden, so
    /// calling this twice in a row writes nothing the second time.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the display fails.
    pub fn unprompt(
        &mut self,
        prompt: &str,
        buffer: &EditBuffer,
        term: &mut dyn Write,
    ) -> io::Result<()> {
        if self.state == PromptState::Hidden {
            return Ok(());
        }

        let width = prompt.chars().count() + buffer.len();
        let output = RedrawOutput::new().op(RedrawOp::KillBackThenToEndOfLine(width));
        term.write_all(output.as_str().as_bytes())?;
        term.flush()?;
        self.state = PromptState::Hidden;

        Ok(())
    }

    /// The prompt went off screen without being erased (eg the line above it was
    /// completed with a newline).
    pub fn mark_hidden(&mut self) { self.state = PromptState::Hidden; }

    /// Arranges for the prompt to be redrawn once the display has been quiet for the
    /// debounce delay.
    ///
    /// - Already shown: nothing to do.
    /// - A redraw is pending: its deadline is pushed out, no second timer is started.
    /// - Otherwise: a new timer is spawned on `runtime`. When it fires it calls `fire`
    ///   with the id of this redraw, and `fire` is expected to lock the session and
    ///   call [`Self::take_pending_if`] before rendering with [`Self::show_now`]. The
    ///   check `fire` returns decides what the timer does next: on
    ///   [`PendingPromptCheck::NotYetDue`] it sleeps again and fires again.
    pub fn schedule_prompt<F>(&mut self, runtime: &Handle, mut fire: F)
    where
        F: FnMut(PendingPromptId) -> PendingPromptCheck + Send + 'static,
    {
        if self.state == PromptState::Shown {
            return;
        }

        // Read the clock of `runtime`, which may be paused in tests.
        let _guard = runtime.enter();

        if let Some(pending) = &self.pending {
            pending.reset_deadline();
            return;
        }

        let id = PendingPromptId(self.next_id);
        self.next_id += 1;

        let mut deadline = DebouncedDeadline::new(self.delay);
        deadline.reset();
        let deadline = Arc::new(StdMutex::new(deadline));

        let task = runtime.spawn({
            let deadline = deadline.clone();
            async move {
                loop {
                    sleep_until_quiet(deadline.clone()).await;
                    if fire(id) != PendingPromptCheck::NotYetDue {
                        break;
                    }
                }
            }
        });

        self.pending = Some(PendingPrompt { id, deadline, task });
    }

    /// Kills the pending redraw, if any. Always safe to call.
    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    /// Called by a firing timer. Clears the slot only if `id` is still the pending
    /// redraw and its deadline has passed.
    ///
    /// A timer that was cancelled after it woke up gets [`PendingPromptCheck::Stale`].
    /// One whose deadline was reset while it waited for the session lock gets
    /// [`PendingPromptCheck::NotYetDue`] and keeps the slot.
    pub fn take_pending_if(&mut self, id: PendingPromptId) -> PendingPromptCheck {
        match &self.pending {
            Some(pending) if pending.id == id => {
                if !pending.deadline.lock().unwrap().is_due() {
                    return PendingPromptCheck::NotYetDue;
                }
                self.pending = None;
                PendingPromptCheck::Ready
            }
            _ => PendingPromptCheck::Stale,
        }
    }

    /// Cancels any pending redraw, then draws the prompt and the line, and puts the
    /// display cursor where the buffer cursor is.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the display fails.
    pub fn show_now(
        &mut self,
        prompt: &str,
        buffer: &EditBuffer,
        term: &mut dyn Write,
    ) -> io::Result<()> {
        self.cancel_pending();

        let output = RedrawOutput::new()
            .text(prompt)
            .text(&buffer.content())
            .op(RedrawOp::CursorBackward(buffer.end_cursor() - buffer.cursor()));
        if !output.is_empty() {
            term.write_all(output.as_str().as_bytes())?;
            term.flush()?;
        }
        self.state = PromptState::Shown;

        Ok(())
    }
}

impl Drop for PromptController {
    fn drop(&mut self) { self.cancel_pending(); }
}
