// ── Dashboard events ──
//
// Broadcast to every subscriber. The Notifier renders `Notify`; the
// other variants let a Renderer react without diffing state.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Endpoint;
use crate::model::{AccessCode, CodeStatus};
use crate::state::{ConnectionTransition, Snapshot};

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    SnapshotApplied(Arc<Snapshot>),
    /// A refresh or connection check failed.
    RefreshFailed {
        endpoint: Option<Endpoint>,
        message: String,
    },
    CodeGenerated(AccessCode),
    AlertResolved {
        index: usize,
    },
    /// The countdown moved the current code to another status.
    CodeStatusChanged {
        from: CodeStatus,
        to: CodeStatus,
    },
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    ConnectionLost,
    ConnectionRestored,
    RateLimited,
    CodeGenerated,
    AlertResolved,
    OperationFailed,
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            kind,
            level,
            message: message.into(),
        }
    }

    pub(crate) fn connection(transition: ConnectionTransition) -> Self {
        match transition {
            ConnectionTransition::Lost => Self::new(
                NotificationKind::ConnectionLost,
                NotificationLevel::Error,
                "Connection to the lock backend lost",
            ),
            ConnectionTransition::Restored => Self::new(
                NotificationKind::ConnectionRestored,
                NotificationLevel::Success,
                "Connection restored",
            ),
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self::new(
            NotificationKind::OperationFailed,
            NotificationLevel::Error,
            message,
        )
    }
}
