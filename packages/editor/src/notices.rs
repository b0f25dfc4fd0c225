//! Transient success/failure banners shown to the operator

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Edit the notice is about; `None` for batch summaries
    pub stable_id: Option<String>,
}

impl Notice {
    pub fn success(message: impl Into<String>, stable_id: Option<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            stable_id,
        }
    }

    pub fn error(message: impl Into<String>, stable_id: Option<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            stable_id,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Where notices are delivered
pub trait NoticeSink: Send {
    fn notify(&mut self, notice: Notice);
}

/// Keeps every notice; clones share the log
#[derive(Debug, Clone, Default)]
pub struct NoticeLog {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<Notice> {
        self.notices().into_iter().filter(Notice::is_error).collect()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }
}

impl NoticeSink for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
