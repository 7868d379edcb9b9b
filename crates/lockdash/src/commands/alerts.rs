//! Alert command handlers.

use tabled::Tabled;

use lockdash_core::{Alert, CoreError, Poller, Severity};

use crate::cli::{AlertsArgs, AlertsCommand, GlobalOpts, OutputFormat, SeverityArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Type")]
    title: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl AlertRow {
    fn new(alert: &Alert, color: bool) -> Self {
        Self {
            index: alert.index,
            time: util::fmt_time(alert.timestamp),
            severity: output::paint_severity(alert.severity, color),
            title: alert.title(),
            message: alert.message.clone(),
        }
    }
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Low => Self::Low,
            SeverityArg::Medium => Self::Medium,
            SeverityArg::High => Self::High,
            SeverityArg::Critical => Self::Critical,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    poller: &Poller,
    args: AlertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AlertsCommand::List(page_args) => {
            let page = poller
                .load_alerts(util::validate_page(page_args.page)?)
                .await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &page.items,
                |a| AlertRow::new(a, color),
                |a| a.index.to_string(),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::print_status(&util::page_footer(&page.pagination), global.quiet);
            }
            Ok(())
        }

        AlertsCommand::Resolve { index } => {
            poller
                .resolve_alert(index)
                .await
                .map_err(|e| not_found_as_index(e, index))?;
            output::print_status(&format!("Alert {index} resolved"), global.quiet);
            Ok(())
        }

        AlertsCommand::Raise {
            alert_type,
            message,
            severity,
        } => {
            poller
                .raise_alert(&alert_type, message, severity.map(Severity::from))
                .await?;
            output::print_status(&format!("Alert '{alert_type}' raised"), global.quiet);
            Ok(())
        }
    }
}

/// A 404 on resolve means the index no longer exists.
fn not_found_as_index(err: CoreError, index: usize) -> CliError {
    if err.is_not_found() {
        CliError::NotFound {
            resource_type: "alert".into(),
            identifier: index.to_string(),
            list_command: "alerts list".into(),
        }
    } else {
        err.into()
    }
}
