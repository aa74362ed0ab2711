//! Messages from workflow tasks back to the UI thread

use crossbeam_channel::Sender;
use std::sync::Arc;
use std::time::Instant;

use super::error::WorkflowError;
use crate::capture::{ImageSource, PickOutcome};
use crate::permissions::PermissionGrant;

/// Callback that asks the UI to redraw
pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// Completion of an asynchronous workflow step
#[derive(Debug)]
pub enum WorkflowEvent {
    /// Answer to a permission request for an image source
    PermissionResult {
        source: ImageSource,
        grants: Vec<PermissionGrant>,
    },
    /// A picker flow finished; `Err` carries the failure reason
    PickCompleted {
        source: ImageSource,
        result: Result<PickOutcome, String>,
    },
    /// New text for the busy indicator
    BusyMessage(&'static str),
    Recognized(String),
    Translated(String),
    /// Recognition or translation failed
    Failed(WorkflowError),
}

impl WorkflowEvent {
    /// Whether this event finishes the task that sent it
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkflowEvent::BusyMessage(_))
    }
}

/// Sending half handed to each task
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<WorkflowEvent>,
    repaint: Option<RepaintHook>,
}

impl EventSink {
    pub fn new(tx: Sender<WorkflowEvent>, repaint: Option<RepaintHook>) -> Self {
        Self { tx, repaint }
    }

    pub fn with_repaint(&self, repaint: RepaintHook) -> Self {
        Self {
            tx: self.tx.clone(),
            repaint: Some(repaint),
        }
    }

    pub fn send(&self, event: WorkflowEvent) {
        // The receiver only disappears with the controller
        let _ = self.tx.send(event);
        if let Some(repaint) = &self.repaint {
            repaint();
        }
    }
}

/// Severity of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Short, non-blocking message for the user
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub created_at: Instant,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Info,
            created_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
            created_at: Instant::now(),
        }
    }
}

impl From<&WorkflowError> for Notice {
    fn from(error: &WorkflowError) -> Self {
        if error.is_precondition() {
            Notice::info(error.to_string())
        } else {
            Notice::error(error.to_string())
        }
    }
}

/// Modal "please wait" indicator
#[derive(Debug, Clone)]
pub struct BusyIndicator {
    pub title: &'static str,
    pub message: &'static str,
    pub since: Instant,
}

impl BusyIndicator {
    pub fn new(message: &'static str) -> Self {
        Self {
            title: "Please wait",
            message,
            since: Instant::now(),
        }
    }
}
