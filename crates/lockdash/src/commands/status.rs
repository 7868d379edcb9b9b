//! One-shot dashboard summary.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lockdash_core::{AccessCode, Alert, Countdown, LogEntry, Poller, Severity};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StatusView {
    server: String,
    code: Option<AccessCode>,
    countdown: Countdown,
    events_total: usize,
    latest_event: Option<LogEntry>,
    alerts_total: usize,
    highest_severity: Option<Severity>,
    refreshed_at: Option<DateTime<Utc>>,
}

fn detail(view: &StatusView, color: bool) -> String {
    let code = view.code.as_ref().map_or_else(
        || "-".to_owned(),
        |c| format!("{} ({})", c.value, view.countdown),
    );
    let mut lines = vec![
        format!("Server:    {}", view.server),
        format!("Code:      {code}"),
        format!(
            "Status:    {}",
            output::paint_status(view.countdown.status, color)
        ),
    ];
    match &view.latest_event {
        Some(entry) => lines.push(format!(
            "Events:    {} total, latest: {} at {}",
            view.events_total,
            entry.summary(),
            util::fmt_time(entry.timestamp)
        )),
        None => lines.push(format!("Events:    {}", view.events_total)),
    }
    match view.highest_severity {
        Some(severity) => lines.push(format!(
            "Alerts:    {} unresolved (highest: {})",
            view.alerts_total,
            output::paint_severity(severity, color)
        )),
        None => lines.push("Alerts:    none".into()),
    }
    if let Some(at) = view.refreshed_at {
        lines.push(format!("Refreshed: {}", util::fmt_time(at)));
    }
    lines.join("\n")
}

pub async fn handle(poller: &Poller, global: &GlobalOpts) -> Result<(), CliError> {
    // An operator request, so it goes through the refresh rate limit.
    poller.manual_refresh().await?;

    let state = poller.state();
    let highest_severity = state
        .alerts
        .as_ref()
        .and_then(|page| page.items.iter().map(|a: &Alert| a.severity).max());
    let view = StatusView {
        server: poller.config().server.to_string(),
        code: state.code.clone(),
        countdown: Countdown::compute(state.code.as_ref(), Utc::now()),
        events_total: state.logs.as_ref().map_or(0, |p| p.total()),
        latest_event: state.logs.as_ref().and_then(|p| p.items.first().cloned()),
        alerts_total: state.alerts.as_ref().map_or(0, |p| p.total()),
        highest_severity,
        refreshed_at: state.last_refresh,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        |v| v.countdown.status.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
