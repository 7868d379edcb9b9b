// ── Poller / reconciler ──
//
// Fetches the current code, one page of logs and one page of alerts,
// applies them as a single snapshot and tracks consecutive failures.
// Cheaply cloneable; clones share the client, bookkeeping and channels.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::Utc;
use lockdash_api::{AccessReceipt, AccessReport, LockClient, NewAlert};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::convert;
use crate::cursor::PageCursors;
use crate::error::{CoreError, Endpoint};
use crate::event::{DashboardEvent, Notification, NotificationKind, NotificationLevel};
use crate::model::{AccessCode, Alert, LogEntry, Page, Severity};
use crate::state::{
    DashboardState, RefreshOutcome, RefreshState, RefreshStatus, SkipReason, Snapshot,
};
use crate::stream::StateStream;

const EVENT_CHANNEL_SIZE: usize = 256;

/// Polls the lock backend and publishes what it finds.
///
/// State goes out on a `watch` channel ([`subscribe`](Self::subscribe));
/// notifications and lifecycle events on a `broadcast` channel
/// ([`events`](Self::events)). Nothing here spawns tasks: periodic
/// polling lives in [`Dashboard`](crate::Dashboard).
#[derive(Clone)]
pub struct Poller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    client: LockClient,
    config: DashboardConfig,
    cursors: PageCursors,
    refresh: Mutex<RefreshState>,
    /// Alert indices with a resolve request on the wire.
    pending_resolves: Mutex<HashSet<usize>>,
    state_tx: watch::Sender<Arc<DashboardState>>,
    event_tx: broadcast::Sender<DashboardEvent>,
    cancel: CancellationToken,
}

impl Poller {
    /// Build a poller and its HTTP client from configuration.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let client = LockClient::new(config.server.clone(), &config.transport()).map_err(|e| {
            CoreError::Config {
                message: e.to_string(),
            }
        })?;
        Ok(Self::with_client(client, config))
    }

    /// Build a poller around an existing client.
    pub fn with_client(client: LockClient, config: DashboardConfig) -> Self {
        let (state_tx, _) = watch::channel(Arc::new(DashboardState::default()));
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let refresh = RefreshState::new(config.failure_threshold, config.min_refresh_delay);

        Self {
            inner: Arc::new(PollerInner {
                client,
                config,
                cursors: PageCursors::new(),
                refresh: Mutex::new(refresh),
                pending_resolves: Mutex::new(HashSet::new()),
                state_tx,
                event_tx,
                cancel: CancellationToken::new(),
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &LockClient {
        &self.inner.client
    }

    /// Page cursors for the logs and alerts listings.
    pub fn cursors(&self) -> &PageCursors {
        &self.inner.cursors
    }

    /// The last published state.
    pub fn state(&self) -> Arc<DashboardState> {
        self.inner.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.inner.state_tx.subscribe())
    }

    pub fn events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.inner.event_tx.subscribe()
    }

    pub fn status(&self) -> RefreshStatus {
        self.refresh_state().status()
    }

    pub fn is_refreshing(&self) -> bool {
        self.status().refreshing
    }

    /// Enable or disable automatic polling. Forced refreshes still run.
    pub fn set_polling_enabled(&self, enabled: bool) {
        self.refresh_state().set_polling_enabled(enabled);
        debug!(enabled, "automatic polling toggled");
    }

    /// Stop the poller. In-flight requests are abandoned and any later
    /// response is discarded without being published.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    pub(crate) fn cancellation(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    pub(crate) fn state_receiver(&self) -> watch::Receiver<Arc<DashboardState>> {
        self.inner.state_tx.subscribe()
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch code, logs and alerts and publish them as one snapshot.
    ///
    /// Unless `force` is set, nothing is requested while polling is
    /// disabled or another refresh is in flight. Any endpoint failing
    /// fails the whole refresh: the current code is cleared and the
    /// listings keep their last-known pages.
    pub async fn refresh(&self, force: bool) -> Result<RefreshOutcome, CoreError> {
        if self.is_shut_down() {
            return Ok(RefreshOutcome::Skipped(SkipReason::ShutDown));
        }
        let admitted = self.refresh_state().try_begin(force);
        if let Err(reason) = admitted {
            debug!(%reason, "refresh skipped");
            return Ok(RefreshOutcome::Skipped(reason));
        }
        let _in_flight = InFlight(&self.inner);

        let fetched = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => {
                return Ok(RefreshOutcome::Skipped(SkipReason::ShutDown));
            }
            fetched = self.fetch_snapshot() => fetched,
        };

        match fetched {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.update_state(|state| {
                    state.code.clone_from(&snapshot.code);
                    state.logs = Some(snapshot.logs.clone());
                    state.alerts = Some(snapshot.alerts.clone());
                    state.last_refresh = Some(snapshot.fetched_at);
                });
                debug!(
                    logs = snapshot.logs.items.len(),
                    alerts = snapshot.alerts.items.len(),
                    has_code = snapshot.code.is_some(),
                    "snapshot applied"
                );
                self.emit(DashboardEvent::SnapshotApplied(Arc::clone(&snapshot)));
                self.record_success();
                Ok(RefreshOutcome::Applied(snapshot))
            }
            Err(err) => {
                self.update_state(|state| state.code = None);
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    /// A user-requested refresh, limited to one per `min_refresh_delay`.
    pub async fn manual_refresh(&self) -> Result<RefreshOutcome, CoreError> {
        let accepted = self.refresh_state().try_manual(Instant::now());
        if let Err(wait) = accepted {
            let retry_after_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
            debug!(retry_after_ms, "manual refresh rate limited");
            self.notify(Notification::new(
                NotificationKind::RateLimited,
                NotificationLevel::Warning,
                "Please wait before refreshing again",
            ));
            return Err(CoreError::RateLimited { retry_after_ms });
        }

        info!("manual refresh");
        let result = self.refresh(true).await;
        if let Err(ref err) = result {
            self.notify(Notification::failed(format!("Refresh failed: {err}")));
        }
        result
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, CoreError> {
        let client = &self.inner.client;
        let config = &self.inner.config;
        let logs_page = self.inner.cursors.logs_page();
        let alerts_page = self.inner.cursors.alerts_page();

        let (code, logs, alerts) = tokio::join!(
            client.get_code(),
            client.list_logs(logs_page, config.logs_per_page),
            client.list_alerts(alerts_page, config.alerts_per_page, false),
        );
        let fetched_at = Utc::now();

        let code = code.map_err(|e| CoreError::from_api(Endpoint::Code, e))?;
        let logs = logs.map_err(|e| CoreError::from_api(Endpoint::Logs, e))?;
        let alerts = alerts.map_err(|e| CoreError::from_api(Endpoint::Alerts, e))?;

        Ok(Snapshot {
            code: code.map(|record| convert::access_code(record, fetched_at)),
            logs: logs.into(),
            alerts: alerts.into(),
            fetched_at,
        })
    }

    /// Check `GET /api/code` and feed the result into the failure count.
    pub async fn check_connection(&self) -> Result<(), CoreError> {
        let reply = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => return Ok(()),
            reply = self.inner.client.get_code() => reply,
        };
        match reply {
            Ok(_) => {
                self.record_success();
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from_api(Endpoint::Code, e);
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    // ── Single-resource loads ────────────────────────────────────────

    /// Fetch only the current code and publish it.
    pub async fn load_code(&self) -> Result<Option<AccessCode>, CoreError> {
        let fetched = self.inner.client.get_code().await;
        let code = fetched
            .map_err(|e| CoreError::from_api(Endpoint::Code, e))?
            .map(|record| convert::access_code(record, Utc::now()));
        if !self.is_shut_down() {
            self.update_state(|state| state.code.clone_from(&code));
        }
        Ok(code)
    }

    /// Move the logs cursor to `page` and fetch only that listing.
    pub async fn load_logs(&self, page: u32) -> Result<Page<LogEntry>, CoreError> {
        self.inner.cursors.set_logs_page(page);
        let page = self.inner.cursors.logs_page();
        let fetched = self
            .inner
            .client
            .list_logs(page, self.inner.config.logs_per_page)
            .await;

        match fetched {
            Ok(listing) => {
                let listing: Page<LogEntry> = listing.into();
                if !self.is_shut_down() {
                    self.update_state(|state| state.logs = Some(listing.clone()));
                }
                Ok(listing)
            }
            Err(e) => {
                let err = CoreError::from_api(Endpoint::Logs, e);
                self.notify(Notification::failed(format!("Could not load logs: {err}")));
                Err(err)
            }
        }
    }

    /// Move the alerts cursor to `page` and fetch only that listing.
    pub async fn load_alerts(&self, page: u32) -> Result<Page<Alert>, CoreError> {
        self.inner.cursors.set_alerts_page(page);
        let page = self.inner.cursors.alerts_page();
        let fetched = self
            .inner
            .client
            .list_alerts(page, self.inner.config.alerts_per_page, false)
            .await;

        match fetched {
            Ok(listing) => {
                let listing: Page<Alert> = listing.into();
                if !self.is_shut_down() {
                    self.update_state(|state| state.alerts = Some(listing.clone()));
                }
                Ok(listing)
            }
            Err(e) => {
                let err = CoreError::from_api(Endpoint::Alerts, e);
                self.notify(Notification::failed(format!("Could not load alerts: {err}")));
                Err(err)
            }
        }
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Ask the backend for a new code and make it the current one.
    ///
    /// On failure the previous code is left untouched.
    pub async fn generate_code(&self) -> Result<AccessCode, CoreError> {
        let created = self.inner.client.create_code().await;
        let record = match created {
            Ok(record) => record,
            Err(e) => {
                let err = CoreError::from_api(Endpoint::GenerateCode, e);
                warn!(error = %err, "code generation failed");
                self.notify(Notification::failed(format!(
                    "Could not generate a code: {err}"
                )));
                return Err(err);
            }
        };

        let code = AccessCode {
            used: false,
            used_for_entry: false,
            ..convert::access_code(record, Utc::now())
        };
        info!(valid_until = %code.valid_until, "new access code generated");

        if !self.is_shut_down() {
            self.update_state(|state| state.code = Some(code.clone()));
            self.emit(DashboardEvent::CodeGenerated(code.clone()));
            self.notify(Notification::new(
                NotificationKind::CodeGenerated,
                NotificationLevel::Success,
                format!("New access code: {}", code.value),
            ));
        }
        Ok(code)
    }

    /// Resolve the alert at positional `index`.
    ///
    /// A second call for an index whose resolve is still on the wire
    /// fails with [`CoreError::AlreadyPending`] without sending anything.
    pub async fn resolve_alert(&self, index: usize) -> Result<(), CoreError> {
        let Some(_pending) = PendingResolve::claim(&self.inner.pending_resolves, index) else {
            debug!(index, "resolve already pending");
            return Err(CoreError::AlreadyPending { index });
        };

        let resolved = self.inner.client.resolve_alert(index).await;
        if let Err(e) = resolved {
            let err = CoreError::from_api(Endpoint::ResolveAlert, e);
            self.notify(Notification::failed(format!(
                "Could not resolve alert {index}: {err}"
            )));
            return Err(err);
        }

        info!(index, "alert resolved");
        if !self.is_shut_down() {
            self.update_state(|state| {
                if let Some(alerts) = state.alerts.as_mut() {
                    alerts.remove_alert(index);
                }
            });
            self.emit(DashboardEvent::AlertResolved { index });
            self.notify(Notification::new(
                NotificationKind::AlertResolved,
                NotificationLevel::Success,
                "Alert resolved",
            ));
        }
        Ok(())
    }

    /// Raise an alert manually. The listing picks it up on the next refresh.
    pub async fn raise_alert(
        &self,
        alert_type: &str,
        message: Option<String>,
        severity: Option<Severity>,
    ) -> Result<(), CoreError> {
        let alert = NewAlert {
            alert_type: alert_type.to_owned(),
            message,
            severity: severity.map(|s| s.to_string()),
        };
        self.inner
            .client
            .create_alert(&alert)
            .await
            .map_err(|e| CoreError::from_api(Endpoint::RaiseAlert, e))
    }

    /// Report a door event the way a door controller would.
    pub async fn report_access(
        &self,
        event: &str,
        code: Option<&str>,
        agent: Option<&str>,
    ) -> Result<AccessReceipt, CoreError> {
        let report = AccessReport {
            event: event.to_owned(),
            code: code.map(str::to_owned),
            agent: agent.map(str::to_owned),
        };
        self.inner
            .client
            .report_access(&report)
            .await
            .map_err(|e| CoreError::from_api(Endpoint::Access, e))
    }

    // ── Bookkeeping ──────────────────────────────────────────────────

    fn refresh_state(&self) -> MutexGuard<'_, RefreshState> {
        lock(&self.inner.refresh)
    }

    fn record_success(&self) {
        let transition = self.refresh_state().record_success();
        if let Some(transition) = transition {
            info!("connection to lock backend restored");
            self.notify(Notification::connection(transition));
        }
    }

    fn record_failure(&self, err: &CoreError) {
        self.emit(DashboardEvent::RefreshFailed {
            endpoint: err.endpoint(),
            message: err.to_string(),
        });
        // Local failures say nothing about the backend's reachability.
        if !err.is_backend_failure() {
            warn!(error = %err, "refresh failed before reaching the backend");
            return;
        }
        let transition = self.refresh_state().record_failure();
        warn!(error = %err, "backend request failed");
        if let Some(transition) = transition {
            warn!("connection to lock backend lost");
            self.notify(Notification::connection(transition));
        }
    }

    /// Publish a modified copy of the current state.
    fn update_state(&self, apply: impl FnOnce(&mut DashboardState)) {
        self.inner.state_tx.send_modify(|state| {
            let mut next = DashboardState::clone(state);
            apply(&mut next);
            *state = Arc::new(next);
        });
    }

    pub(crate) fn emit(&self, event: DashboardEvent) {
        // No subscribers is not an error.
        let _ = self.inner.event_tx.send(event);
    }

    fn notify(&self, notification: Notification) {
        debug!(kind = %notification.kind, "{}", notification.message);
        self.emit(DashboardEvent::Notify(notification));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight marker when a refresh ends, however it ends.
struct InFlight<'a>(&'a PollerInner);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(&self.0.refresh).finish();
    }
}

/// Holds an alert index in the pending set until dropped.
struct PendingResolve<'a> {
    pending: &'a Mutex<HashSet<usize>>,
    index: usize,
}

impl<'a> PendingResolve<'a> {
    fn claim(pending: &'a Mutex<HashSet<usize>>, index: usize) -> Option<Self> {
        lock(pending)
            .insert(index)
            .then_some(Self { pending, index })
    }
}

impl Drop for PendingResolve<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.index);
    }
}
