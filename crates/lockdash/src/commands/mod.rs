//! Command handlers, one module per top-level subcommand.

pub mod access;
pub mod alerts;
pub mod code;
pub mod config_cmd;
pub mod logs;
pub mod status;
pub mod util;
pub mod watch;

use lockdash_core::Poller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a backend command to its handler.
pub async fn dispatch(cmd: Command, poller: &Poller, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(poller, global).await,
        Command::Code(args) => code::handle(poller, args, global).await,
        Command::Logs(args) => logs::handle(poller, args, global).await,
        Command::Alerts(args) => alerts::handle(poller, args, global).await,
        Command::Access(args) => access::handle(poller, args, global).await,
        Command::Watch(_) => watch::handle(poller, global).await,
        Command::Config(_) | Command::Completions(_) => {
            unreachable!("handled before a backend connection is built")
        }
    }
}
