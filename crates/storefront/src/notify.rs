//! User-facing notification capability.
//!
//! Stores raise transient messages ("added to cart", "sync failed") through
//! an explicit [`Notifier`] handed in at construction, so no module-level
//! mutable callback is involved and tests can observe what was raised.

use std::sync::Mutex;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
}

/// Capability for raising transient user-facing messages.
///
/// Implementations must be cheap: callers invoke this inline from store
/// mutations and never await on it.
pub trait Notifier: Send + Sync {
    /// Raise a notification.
    fn notify(&self, level: Level, message: &str);

    /// Raise an informational message.
    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }

    /// Raise a success message.
    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    /// Raise a warning (recoverable failure).
    fn warn(&self, message: &str) {
        self.notify(Level::Warning, message);
    }
}

/// Default notifier: forwards to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Info | Level::Success => tracing::info!(target: "shopmint::notify", "{message}"),
            Level::Warning => tracing::warn!(target: "shopmint::notify", "{message}"),
        }
    }
}

/// Notifier that records messages in memory.
///
/// Used by tests and by headless callers that render notifications
/// themselves.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<(Level, String)>>,
}

impl MemoryNotifier {
    /// Create an empty recording notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return all recorded messages.
    pub fn drain(&self) -> Vec<(Level, String)> {
        self.messages
            .lock()
            .map(|mut m| std::mem::take(&mut *m))
            .unwrap_or_default()
    }

    /// True if any warning has been recorded.
    pub fn has_warning(&self) -> bool {
        self.messages
            .lock()
            .map(|m| m.iter().any(|(level, _)| *level == Level::Warning))
            .unwrap_or(false)
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, level: Level, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}
