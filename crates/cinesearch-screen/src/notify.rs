//! Transient notices.
//!
//! The controller reports "empty query" and "no results" through a
//! [`NotificationSink`]. Notices are fire-and-forget and never part of
//! `SearchState`.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Default lifetime of a toast.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(4);

/// Maximum number of toasts kept at once; the oldest is dropped first.
const MAX_TOASTS: usize = 5;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational.
    Info,
    /// Something the user should correct.
    Error,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Receiver of transient notices.
pub trait NotificationSink {
    /// Shows `message`. Must not fail.
    fn notify(&mut self, kind: NoticeKind, message: &str);
}

/// A single toast on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity.
    pub kind: NoticeKind,
    /// Text.
    pub message: String,
    /// When the toast disappears.
    pub expires_at: Instant,
}

/// Toasts rendered in the top-right corner of the screen.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    ttl: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl ToastQueue {
    /// Creates an empty queue whose toasts live for `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
        }
    }

    /// Pushes a toast that expires `ttl` after `now`.
    pub fn push_at(&mut self, kind: NoticeKind, message: &str, now: Instant) {
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        if self.toasts.len() >= MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            kind,
            message: String::from(message),
            expires_at,
        });
    }

    /// Drops every toast that has expired at `now`.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    /// Toasts currently on screen, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Number of toasts on screen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Whether no toast is on screen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&mut self, kind: NoticeKind, message: &str) {
        self.push_at(kind, message, Instant::now());
    }
}

/// Notices written as tracing events, for non-interactive use.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Info => tracing::info!("{message}"),
            NoticeKind::Error => tracing::warn!("{message}"),
        }
    }
}
