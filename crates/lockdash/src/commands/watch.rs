//! Live dashboard: periodic refresh, countdown and notifications until Ctrl-C.
//!
//! Lines typed on stdin drive the operator actions: `r` refreshes now,
//! `g` generates a code, `a <index>` resolves an alert and `q` quits.

use std::io::BufRead;

use chrono::Utc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::debug;

use lockdash_core::{
    CoreError, Countdown, Dashboard, DashboardEvent, NotificationLevel, Poller, Snapshot,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn snapshot_line(snapshot: &Snapshot) -> String {
    let countdown = Countdown::compute(snapshot.code.as_ref(), Utc::now());
    let code = snapshot.code.as_ref().map_or("-", |c| c.value.as_str());
    let latest = snapshot
        .logs
        .items
        .first()
        .map_or_else(String::new, |e| format!(", latest: {}", e.summary()));
    format!(
        "[{}] code {code} {} ({countdown}) | {} events{latest} | {} alerts",
        util::fmt_time(snapshot.fetched_at),
        countdown.status,
        snapshot.logs.total(),
        snapshot.alerts.total(),
    )
}

fn render_event(event: &DashboardEvent, color: bool) -> Option<String> {
    match event {
        DashboardEvent::SnapshotApplied(snapshot) => Some(snapshot_line(snapshot)),
        DashboardEvent::Notify(n) => Some(output::paint_level(n.level, &n.message, color)),
        DashboardEvent::CodeStatusChanged { from, to } => Some(format!(
            "Code status: {} -> {}",
            output::paint_status(*from, color),
            output::paint_status(*to, color)
        )),
        DashboardEvent::RefreshFailed { endpoint, message } => {
            debug!(?endpoint, error = %message, "refresh failed");
            None
        }
        // Both are followed by a notification.
        DashboardEvent::CodeGenerated(_) | DashboardEvent::AlertResolved { .. } => None,
    }
}

const KEY_HELP: &str = "Keys: r refresh, g new code, a <index> resolve alert, q quit";

/// One operator command read from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Refresh,
    Generate,
    Resolve(usize),
    Quit,
    Help,
}

fn parse_action(line: &str) -> Option<Action> {
    let mut words = line.split_whitespace();
    let action = match words.next()? {
        "r" | "refresh" => Action::Refresh,
        "g" | "generate" => Action::Generate,
        "a" | "resolve" => Action::Resolve(words.next()?.parse().ok()?),
        "q" | "quit" => Action::Quit,
        "h" | "?" | "help" => Action::Help,
        _ => return None,
    };
    // Trailing words make the line ambiguous.
    words.next().is_none().then_some(action)
}

/// Forward stdin lines over a channel until EOF.
///
/// A plain thread, not a runtime task: a blocking stdin read cannot be
/// cancelled and must not hold up runtime shutdown.
fn spawn_line_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Run one operator action. Returns `true` when the session should end.
///
/// The poller reports outcomes as notifications, which reach the
/// terminal through the event stream.
async fn run_action(poller: &Poller, action: Action, global: &GlobalOpts, color: bool) -> bool {
    let result = match action {
        Action::Quit => return true,
        Action::Help => {
            output::print_output(KEY_HELP, global.quiet);
            return false;
        }
        Action::Refresh => poller.manual_refresh().await.map(|_| ()),
        Action::Generate => poller.generate_code().await.map(|_| ()),
        Action::Resolve(index) => poller.resolve_alert(index).await,
    };
    match result {
        Ok(()) => {}
        // The only refusal the poller does not announce itself.
        Err(CoreError::AlreadyPending { index }) => {
            let line = output::paint_level(
                NotificationLevel::Warning,
                &format!("Alert {index} is already being resolved"),
                color,
            );
            output::print_output(&line, global.quiet);
        }
        Err(e) => debug!(error = %e, "operator action failed"),
    }
    false
}

pub async fn handle(poller: &Poller, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    // Subscribe before starting so the initial snapshot is printed.
    let mut events = poller.events();
    let dashboard = Dashboard::start(poller.clone()).await;
    let mut countdown = dashboard.countdown();
    let mut was_urgent = countdown.borrow_and_update().is_urgent();
    let mut lines = spawn_line_reader();
    let mut stdin_open = true;

    output::print_status("Watching the lock backend, Ctrl-C to stop", global.quiet);
    output::print_status(KEY_HELP, global.quiet);

    let result = loop {
        tokio::select! {
            biased;

            signal = tokio::signal::ctrl_c() => break signal.map_err(CliError::from),

            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(line) = render_event(&event, color) {
                        output::print_output(&line, global.quiet);
                    }
                }
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "event stream lagged"),
                Err(RecvError::Closed) => break Ok(()),
            },

            changed = countdown.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let tick = *countdown.borrow_and_update();
                if tick.is_urgent() && !was_urgent {
                    let line = output::paint_level(
                        NotificationLevel::Warning,
                        &format!("Access code expires soon ({tick})"),
                        color,
                    );
                    output::print_output(&line, global.quiet);
                }
                was_urgent = tick.is_urgent();
            }

            line = lines.recv(), if stdin_open => match line {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match parse_action(&line) {
                    Some(action) => {
                        if run_action(poller, action, global, color).await {
                            break Ok(());
                        }
                    }
                    None => output::print_output(
                        &format!("Unknown command '{}'. {KEY_HELP}", line.trim()),
                        global.quiet,
                    ),
                },
                // Stdin closed: keep watching until Ctrl-C.
                None => stdin_open = false,
            },
        }
    };

    dashboard.shutdown().await;
    result
}
