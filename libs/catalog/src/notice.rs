//! User-facing notices
//!
//! Success notices expire on their own; error notices stay until dismissed.
//! Visibility is always evaluated against a caller-supplied instant.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Default lifetime of a success notice
pub const SUCCESS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    posted_at: Instant,
}

#[derive(Debug, Clone)]
pub struct NoticeBoard {
    success_ttl: Duration,
    current: Option<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(SUCCESS_TTL)
    }
}

impl NoticeBoard {
    pub fn new(success_ttl: Duration) -> Self {
        Self {
            success_ttl,
            current: None,
        }
    }

    /// Post a success notice, replacing whatever was shown
    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.post(NoticeKind::Success, message.into(), now);
    }

    /// Post an error notice, replacing whatever was shown
    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.post(NoticeKind::Error, message.into(), now);
    }

    fn post(&mut self, kind: NoticeKind, message: String, posted_at: Instant) {
        self.current = Some(Notice {
            kind,
            message,
            posted_at,
        });
    }

    /// The notice visible at `now`, if any
    pub fn visible(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|notice| match notice.kind {
            NoticeKind::Success => now.saturating_duration_since(notice.posted_at) < self.success_ttl,
            NoticeKind::Error => true,
        })
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
