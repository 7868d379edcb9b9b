// ── Dashboard domain model ──
//
// Canonical types the poller publishes and renderers consume. Wire
// records from `lockdash-api` are converted into these in `convert.rs`.

pub mod alert;
pub mod code;
pub mod log;
pub mod page;

// ── Re-exports ──────────────────────────────────────────────────────

pub use alert::{Alert, Severity};
pub use code::{AccessCode, CodeStatus, Countdown, classify, remaining_seconds};
pub use log::{CodeUsed, DoorEvent, EventOutcome, LogEntry};
pub use page::{Page, Pagination};

/// Turn a `snake_case` wire token into display text: `force_attempt` -> `Force attempt`.
pub fn humanize(token: &str) -> String {
    let spaced = token.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
