//! Door event reporting.

use lockdash_core::Poller;

use crate::cli::{AccessArgs, AccessCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    poller: &Poller,
    args: AccessArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccessCommand::Report { event, code, agent } => {
            let receipt = poller
                .report_access(event.as_wire(), code.as_deref(), agent.as_deref())
                .await?;
            let out = output::render_single(
                &global.output,
                &receipt,
                |r| format!("Event recorded: {}", r.event_status),
                |r| r.event_status.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
