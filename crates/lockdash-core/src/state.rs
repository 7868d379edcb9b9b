// ── Refresh bookkeeping and published state ──
//
// `RefreshState` is owned by the poller and only mutated through its
// methods. `DashboardState` is the immutable view handed to renderers
// over a watch channel; each refresh publishes a whole new value.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{AccessCode, Alert, LogEntry, Page};

// ── Published state ─────────────────────────────────────────────────

/// The last view applied by the poller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardState {
    pub code: Option<AccessCode>,
    pub logs: Option<Page<LogEntry>>,
    pub alerts: Option<Page<Alert>>,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Everything fetched by one successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub code: Option<AccessCode>,
    pub logs: Page<LogEntry>,
    pub alerts: Page<Alert>,
    pub fetched_at: DateTime<Utc>,
}

/// Result of a refresh request that did not fail.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// All three endpoints answered and the snapshot was published.
    Applied(Arc<Snapshot>),
    /// No request was made, or the result was discarded.
    Skipped(SkipReason),
}

impl RefreshOutcome {
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            Self::Applied(snap) => Some(snap),
            Self::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SkipReason {
    #[strum(to_string = "automatic polling is disabled")]
    PollingDisabled,
    #[strum(to_string = "a refresh is already in flight")]
    InFlight,
    #[strum(to_string = "the dashboard is shut down")]
    ShutDown,
}

/// Read-only view of the poller's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshStatus {
    pub refreshing: bool,
    pub consecutive_failures: u32,
    pub connection_problem: bool,
    pub polling_enabled: bool,
}

// ── Refresh state machine ───────────────────────────────────────────

/// A change of the sticky connection-problem flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConnectionTransition {
    Lost,
    Restored,
}

#[derive(Debug)]
pub(crate) struct RefreshState {
    /// Refreshes currently running. Forced refreshes may overlap.
    in_flight: u32,
    last_manual: Option<Instant>,
    consecutive_failures: u32,
    connection_problem: bool,
    polling_enabled: bool,
    failure_threshold: u32,
    min_manual_delay: Duration,
}

impl RefreshState {
    pub(crate) fn new(failure_threshold: u32, min_manual_delay: Duration) -> Self {
        Self {
            in_flight: 0,
            last_manual: None,
            consecutive_failures: 0,
            connection_problem: false,
            polling_enabled: true,
            failure_threshold: failure_threshold.max(1),
            min_manual_delay,
        }
    }

    /// Admit a refresh, marking it in flight.
    pub(crate) fn try_begin(&mut self, force: bool) -> Result<(), SkipReason> {
        if !force {
            if !self.polling_enabled {
                return Err(SkipReason::PollingDisabled);
            }
            if self.in_flight > 0 {
                return Err(SkipReason::InFlight);
            }
        }
        self.in_flight += 1;
        Ok(())
    }

    pub(crate) fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Accept a manual refresh at `now`, or return how long to wait.
    pub(crate) fn try_manual(&mut self, now: Instant) -> Result<(), Duration> {
        if let Some(last) = self.last_manual {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.min_manual_delay {
                return Err(self.min_manual_delay - elapsed);
            }
        }
        self.last_manual = Some(now);
        Ok(())
    }

    pub(crate) fn record_success(&mut self) -> Option<ConnectionTransition> {
        self.consecutive_failures = 0;
        if self.connection_problem {
            self.connection_problem = false;
            Some(ConnectionTransition::Restored)
        } else {
            None
        }
    }

    pub(crate) fn record_failure(&mut self) -> Option<ConnectionTransition> {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.consecutive_failures >= self.failure_threshold && !self.connection_problem {
            self.connection_problem = true;
            Some(ConnectionTransition::Lost)
        } else {
            None
        }
    }

    pub(crate) fn set_polling_enabled(&mut self, enabled: bool) {
        self.polling_enabled = enabled;
    }

    pub(crate) fn status(&self) -> RefreshStatus {
        RefreshStatus {
            refreshing: self.in_flight > 0,
            consecutive_failures: self.consecutive_failures,
            connection_problem: self.connection_problem,
            polling_enabled: self.polling_enabled,
        }
    }
}
