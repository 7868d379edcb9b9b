//! Access code command handlers.

use chrono::Utc;
use serde::Serialize;

use lockdash_core::{AccessCode, Countdown, Poller};

use crate::cli::{CodeArgs, CodeCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct CodeView {
    code: Option<AccessCode>,
    #[serde(flatten)]
    countdown: Countdown,
}

impl CodeView {
    fn new(code: Option<AccessCode>) -> Self {
        let countdown = Countdown::compute(code.as_ref(), Utc::now());
        Self { code, countdown }
    }
}

fn detail(view: &CodeView, color: bool) -> String {
    let Some(code) = &view.code else {
        return "No access code has been issued".into();
    };
    let mut lines = vec![
        format!("Code:      {}", code.value),
        format!(
            "Status:    {}",
            output::paint_status(view.countdown.status, color)
        ),
        format!("Expires:   {} ({})", util::fmt_time(code.valid_until), view.countdown),
        format!("Generated: {}", util::fmt_time(code.generated_at)),
    ];
    if code.used_for_entry && !code.used {
        lines.push("Entry:     door opened with this code, waiting for close".into());
    }
    lines.join("\n")
}

fn print_code(code: Option<AccessCode>, global: &GlobalOpts) {
    let view = CodeView::new(code);
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        |v| v.code.as_ref().map(|c| c.value.clone()).unwrap_or_default(),
    );
    output::print_output(&out, global.quiet);
}

pub async fn handle(poller: &Poller, args: CodeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        CodeCommand::Show => {
            let code = poller.load_code().await?;
            print_code(code, global);
            Ok(())
        }

        CodeCommand::Generate => {
            let code = poller.generate_code().await?;
            output::print_status("New access code generated", global.quiet);
            print_code(Some(code), global);
            Ok(())
        }
    }
}
