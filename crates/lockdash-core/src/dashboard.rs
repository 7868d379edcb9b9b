// ── Scheduler ──
//
// Drives a `Poller` on timers: the periodic refresh, the one-second
// countdown and the connection check. All tasks share the poller's
// cancellation token, so `shutdown` stops them and silences any
// response still on the wire.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::event::DashboardEvent;
use crate::model::Countdown;
use crate::poller::Poller;
use crate::state::RefreshOutcome;

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// A running dashboard: a poller plus its background tasks.
pub struct Dashboard {
    poller: Poller,
    countdown: watch::Receiver<Countdown>,
    handles: Vec<JoinHandle<()>>,
}

impl Dashboard {
    /// Run an initial forced refresh, then spawn the background tasks.
    ///
    /// A failing initial refresh is logged, not returned: the poll task
    /// keeps retrying on its own schedule.
    pub async fn start(poller: Poller) -> Self {
        info!(server = %poller.config().server, "starting dashboard");
        if let Err(e) = poller.refresh(true).await {
            warn!(error = %e, "initial refresh failed");
        }

        let cancel = poller.cancellation().clone();
        let poll_interval = poller.config().poll_interval;
        let health_interval = poller.config().health_interval;

        let initial = Countdown::compute(poller.state().code.as_ref(), Utc::now());
        let (countdown_tx, countdown) = watch::channel(initial);

        let mut handles = Vec::new();
        handles.push(tokio::spawn(countdown_task(
            poller.clone(),
            countdown_tx,
            cancel.clone(),
        )));

        if !poll_interval.is_zero() {
            handles.push(tokio::spawn(poll_task(
                poller.clone(),
                poll_interval,
                cancel.clone(),
            )));
        }

        if !health_interval.is_zero() {
            handles.push(tokio::spawn(health_task(
                poller.clone(),
                health_interval,
                cancel,
            )));
        }

        Self {
            poller,
            countdown,
            handles,
        }
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    /// Live countdown for the current code, updated every second.
    pub fn countdown(&self) -> watch::Receiver<Countdown> {
        self.countdown.clone()
    }

    /// Cancel the background tasks and wait for them to finish.
    pub async fn shutdown(self) {
        self.poller.shutdown();
        for handle in self.handles {
            let _ = handle.await;
        }
        debug!("dashboard stopped");
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn poll_task(poller: Poller, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match poller.refresh(false).await {
                    Ok(RefreshOutcome::Skipped(reason)) => debug!(%reason, "poll skipped"),
                    Ok(RefreshOutcome::Applied(_)) => {}
                    Err(e) => warn!(error = %e, "periodic refresh failed"),
                }
            }
        }
    }
}

/// Recomputes the countdown from cached state only; never does I/O.
async fn countdown_task(
    poller: Poller,
    countdown_tx: watch::Sender<Countdown>,
    cancel: CancellationToken,
) {
    let mut state_rx = poller.state_receiver();
    let mut interval = tokio::time::interval(COUNTDOWN_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = *countdown_tx.borrow();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = interval.tick() => {}
        }

        let code = state_rx.borrow_and_update().code.clone();
        let tick = Countdown::compute(code.as_ref(), Utc::now());
        countdown_tx.send_replace(tick);
        if tick.status != last.status {
            debug!(from = %last.status, to = %tick.status, "code status changed");
            poller.emit(DashboardEvent::CodeStatusChanged {
                from: last.status,
                to: tick.status,
            });
        }
        last = tick;
    }
}

async fn health_task(poller: Poller, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = poller.check_connection().await {
                    debug!(error = %e, "connection check failed");
                }
            }
        }
    }
}
