// ── Access code and its display status ──
//
// The status of a code is derived, never stored: it depends on `now`,
// so the countdown can be recomputed every second without touching the
// network.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds below which an active countdown is flagged as urgent.
const URGENT_BELOW_SECS: i64 = 60;

/// The currently issued access credential.
///
/// Replaced wholesale on every fetch or generation; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCode {
    pub value: String,
    pub valid_until: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    /// The code opened the door and the door has since closed.
    pub used: bool,
    /// The code opened the door; it is consumed once the door closes.
    pub used_for_entry: bool,
}

impl AccessCode {
    pub fn status(&self, now: DateTime<Utc>) -> CodeStatus {
        if self.used {
            CodeStatus::Used
        } else if self.valid_until > now {
            CodeStatus::Active
        } else {
            CodeStatus::Expired
        }
    }

    /// Whole seconds until expiry, floored, never negative.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.valid_until - now).num_milliseconds();
        millis.div_euclid(1000).max(0)
    }
}

/// Display status of the current code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, Default,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum CodeStatus {
    /// No code has been issued (or the last refresh failed).
    #[default]
    None,
    Active,
    Expired,
    /// `used` dominates expiry.
    Used,
}

/// Classify an optional code at instant `now`.
pub fn classify(code: Option<&AccessCode>, now: DateTime<Utc>) -> CodeStatus {
    code.map_or(CodeStatus::None, |c| c.status(now))
}

/// Seconds left on an optional code; zero when absent or expired.
pub fn remaining_seconds(code: Option<&AccessCode>, now: DateTime<Utc>) -> i64 {
    code.map_or(0, |c| c.remaining_seconds(now))
}

// ── Countdown ───────────────────────────────────────────────────────

/// One tick of the live countdown display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Countdown {
    pub status: CodeStatus,
    pub remaining_secs: i64,
}

impl Countdown {
    pub fn compute(code: Option<&AccessCode>, now: DateTime<Utc>) -> Self {
        let status = classify(code, now);
        let remaining_secs = match status {
            CodeStatus::Active => remaining_seconds(code, now),
            _ => 0,
        };
        Self {
            status,
            remaining_secs,
        }
    }

    /// Active with less than a minute left.
    pub fn is_urgent(&self) -> bool {
        self.status == CodeStatus::Active && self.remaining_secs < URGENT_BELOW_SECS
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            CodeStatus::None => f.write_str("No code"),
            CodeStatus::Used => f.write_str("Used"),
            CodeStatus::Active if self.remaining_secs > 0 => {
                let mins = self.remaining_secs / 60;
                let secs = self.remaining_secs % 60;
                write!(f, "{mins}:{secs:02} remaining")
            }
            CodeStatus::Active | CodeStatus::Expired => f.write_str("Expired"),
        }
    }
}
