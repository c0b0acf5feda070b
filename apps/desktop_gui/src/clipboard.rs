//! Copy-to-clipboard with a short-lived "copied" acknowledgement.

use std::time::{Duration, Instant};

use arboard::Clipboard;
use thiserror::Error;

use crate::controller::Notification;

pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("There is nothing to copy yet.")]
    NothingToCopy,
    #[error("Failed to copy to clipboard: {0}")]
    Unavailable(String),
}

pub trait ClipboardBackend {
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

/// System clipboard via arboard. The handle is kept alive so the copied
/// text survives on platforms where the owning process must hold it.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl ClipboardBackend for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        if self.inner.is_none() {
            self.inner = Some(Clipboard::new().map_err(|err| err.to_string())?);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err("clipboard handle unavailable".to_string());
        };
        clipboard.set_text(text.to_string()).map_err(|err| {
            self.inner = None;
            err.to_string()
        })
    }
}

/// Single-shot deadline. Re-arming replaces the previous deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyAckTimer {
    deadline: Option<Instant>,
}

impl CopyAckTimer {
    pub fn arm(&mut self, now: Instant, duration: Duration) {
        self.deadline = Some(now + duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True while armed and not yet expired; expiry disarms the timer.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now < deadline => true,
            Some(_) => {
                self.deadline = None;
                false
            }
            None => false,
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .and_then(|deadline| deadline.checked_duration_since(now))
            .filter(|remaining| !remaining.is_zero())
    }
}

pub struct ClipboardService<B> {
    backend: B,
    timer: CopyAckTimer,
}

impl<B: ClipboardBackend> ClipboardService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timer: CopyAckTimer::default(),
        }
    }

    pub fn copy(&mut self, text: &str, now: Instant) -> Result<(), ClipboardError> {
        if text.is_empty() {
            return Err(ClipboardError::NothingToCopy);
        }
        self.backend.set_text(text).map_err(|reason| {
            tracing::warn!(%reason, "clipboard write failed");
            ClipboardError::Unavailable(reason)
        })?;
        self.timer.arm(now, COPY_ACK_DURATION);
        tracing::debug!(chars = text.chars().count(), "copied answer to clipboard");
        Ok(())
    }

    pub fn is_acknowledged(&mut self, now: Instant) -> bool {
        self.timer.poll(now)
    }

    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn reset(&mut self) {
        self.timer.cancel();
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

pub fn copy_notification(outcome: &Result<(), ClipboardError>) -> Notification {
    match outcome {
        Ok(()) => Notification::success(
            "Copied Successfully",
            "Response has been copied to your clipboard.",
        ),
        Err(err) => Notification::error("Copy Failed", err.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/clipboard_tests.rs"]
mod tests;
