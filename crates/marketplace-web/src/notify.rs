//! User-facing notifications

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

/// Receives the toasts a page wants to show
pub trait Notifier: Send + Sync {
    /// Show an error toast
    fn show_error(&self, message: &str);

    /// Show a success toast
    fn show_success(&self, message: &str);
}

/// Toast flavour
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    /// Something went right
    Success,
    /// Something went wrong
    Error,
}

/// One notification
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Toast {
    /// Flavour
    pub kind: ToastKind,
    /// Text shown to the user
    pub message: String,
}

/// Keeps toasts until a response picks them up
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending toast
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock())
    }

    /// Pending toasts, left in place
    #[must_use]
    pub fn pending(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    fn push(&self, kind: ToastKind, message: &str) {
        self.toasts.lock().push(Toast {
            kind,
            message: message.to_string(),
        });
    }
}

impl Notifier for ToastLog {
    fn show_error(&self, message: &str) {
        warn!(toast = message, "Error toast");
        self.push(ToastKind::Error, message);
    }

    fn show_success(&self, message: &str) {
        info!(toast = message, "Success toast");
        self.push(ToastKind::Success, message);
    }
}
