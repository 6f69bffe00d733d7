//! User-facing notices (toasts in a browser, stderr lines in the CLI)

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;

use crate::api::ApiResponse;

/// Payload of an error notice
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "lowercase")]
pub enum Report {
    /// The server's `msg` from a resolved non-200 response
    Message(String),
    /// A structured response attached to a failed request
    Response(ApiResponse),
    /// Anything else, rendered
    Error(String),
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Message(msg) | Report::Error(msg) => f.write_str(msg),
            Report::Response(response) => write!(f, "{} ({})", response.message(), response.status),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "level", content = "body", rename_all = "lowercase")]
pub enum Notice {
    Error(Report),
    Success(String),
    Info(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Sends notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Error(report) => tracing::error!(%report, "Notice"),
            Notice::Success(msg) => tracing::info!(%msg, "Notice"),
            Notice::Info(msg) => tracing::info!(%msg, "Notice"),
        }
    }
}

/// Keeps every notice for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn errors(&self) -> Vec<Report> {
        self.lock()
            .iter()
            .filter_map(|notice| match notice {
                Notice::Error(report) => Some(report.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn take(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.lock().push(notice);
    }
}
