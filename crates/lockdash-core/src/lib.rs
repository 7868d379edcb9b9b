//! Polling and reconciliation layer between `lockdash-api` and its
//! consumers (the CLI today, any renderer tomorrow).
//!
//! - **[`Poller`]**: Owns the refresh bookkeeping. [`refresh()`](Poller::refresh)
//!   fetches the current code, a page of door events and a page of alerts
//!   concurrently and publishes them as one snapshot. Overlapping polls are
//!   skipped, manual refreshes are rate limited, and consecutive failures
//!   escalate to a single "connection lost" notification per outage.
//!
//! - **[`Dashboard`]**: Scheduler that drives a `Poller` on tokio intervals:
//!   periodic refresh, a one-second countdown for the current code, and a
//!   connection check. [`shutdown()`](Dashboard::shutdown) cancels all of it.
//!
//! - **[`StateStream`]**: Subscription to the published [`DashboardState`].
//!   Notifications and lifecycle events arrive as [`DashboardEvent`]s on a
//!   broadcast channel ([`Poller::events`]).
//!
//! - **Domain model** ([`model`]): [`AccessCode`] with its derived
//!   [`CodeStatus`], [`LogEntry`], [`Alert`] and paginated [`Page`]s.

pub mod config;
pub mod convert;
pub mod cursor;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod model;
pub mod poller;
pub mod state;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, TlsVerification};
pub use cursor::PageCursors;
pub use dashboard::Dashboard;
pub use error::{CoreError, Endpoint};
pub use event::{DashboardEvent, Notification, NotificationKind, NotificationLevel};
pub use poller::Poller;
pub use state::{DashboardState, RefreshOutcome, RefreshStatus, SkipReason, Snapshot};
pub use stream::{DashboardWatchStream, StateStream};

pub use model::{
    AccessCode, Alert, CodeStatus, CodeUsed, Countdown, DoorEvent, EventOutcome, LogEntry, Page,
    Pagination, Severity, classify, remaining_seconds,
};
