//! Door event log command handlers.

use tabled::Tabled;

use lockdash_core::{LogEntry, Poller};

use crate::cli::{GlobalOpts, LogsArgs, LogsCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Agent")]
    agent: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Source")]
    source: String,
}

impl From<&LogEntry> for LogRow {
    fn from(entry: &LogEntry) -> Self {
        Self {
            time: util::fmt_time(entry.timestamp),
            event: entry.summary(),
            agent: entry.agent_or_unknown().to_owned(),
            code: util::fmt_code_used(&entry.code_used),
            reason: util::or_dash(entry.reason_text().as_deref()),
            source: util::or_dash(entry.source.as_deref()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(poller: &Poller, args: LogsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        LogsCommand::List(page_args) => {
            let page = poller.load_logs(util::validate_page(page_args.page)?).await?;
            let out = output::render_list(
                &global.output,
                &page.items,
                |e| LogRow::from(e),
                |e| format!("{}\t{}", e.timestamp.to_rfc3339(), e.summary()),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::print_status(&util::page_footer(&page.pagination), global.quiet);
            }
            Ok(())
        }
    }
}
