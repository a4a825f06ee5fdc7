//! User-facing notification channel.
//!
//! All user-visible outcomes surface as transient toast-style notices; there
//! is no persistent error log or retry affordance. Containers and services
//! hold an `Arc<dyn Notifier>` and emit through it; embedders plug in their
//! own sink (UI toast layer), the default logs through `tracing`.

use std::sync::Mutex;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Sink for transient user-facing notices.
pub trait Notifier: Send + Sync {
    /// Emit one notice. Must not block or fail.
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Default notifier: routes notices to the `tracing` log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info | NoticeLevel::Success => tracing::info!(notice = message),
            NoticeLevel::Warning => tracing::warn!(notice = message),
            NoticeLevel::Error => tracing::error!(notice = message),
        }
    }
}

/// Test notifier that records every notice.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices emitted so far, in order.
    #[must_use]
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Messages only, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .map(|(_, message)| message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        if let Ok(mut guard) = self.notices.lock() {
            guard.push((level, message.to_owned()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(NoticeLevel::Success, "added to cart");
        notifier.notify(NoticeLevel::Warning, "already in your wishlist");

        let messages = notifier.messages();
        assert_eq!(messages, ["added to cart", "already in your wishlist"]);
    }
}
