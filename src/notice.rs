//! User-visible notices
//!
//! Components report informational messages and failures through a
//! [`Notifier`]; the terminal loop drains the receiving end and shows the
//! latest notice on the status line.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

/// Severity of a notice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoticeLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Sending half of the notice channel
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: UnboundedSender<Notice>,
}

impl Notifier {
    /// Create a notifier and the receiver the UI drains
    pub fn channel() -> (Self, UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        info!(notice = %message);
        self.send(NoticeLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!(notice = %message);
        self.send(NoticeLevel::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(notice = %message);
        self.send(NoticeLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        error!(notice = %message);
        self.send(NoticeLevel::Error, message);
    }

    fn send(&self, level: NoticeLevel, message: String) {
        // Receiver gone means the UI is shutting down
        let _ = self.tx.send(Notice { level, message });
    }
}
