// Wire schemas for the lock backend.
//
// One struct per response shape. Timestamps are RFC 3339 instants with an
// explicit offset; anything else fails deserialization rather than being
// guessed at. Required-but-optional-on-the-wire fields are checked by the
// endpoint methods, which turn absences into `Error::MissingField`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── Access code ─────────────────────────────────────────────────────

/// Raw body of `GET /api/code` and `POST /api/code`.
///
/// Every field is optional on the wire: a `null`, missing or empty `code`
/// is the "no active code" shape.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CodeBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub used: bool,
    #[serde(default)]
    pub used_for_entry: bool,
}

/// A validated access code as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRecord {
    pub value: String,
    pub valid_until: DateTime<Utc>,
    /// Absent in creation responses from older backends.
    pub generated_at: Option<DateTime<Utc>>,
    pub used: bool,
    pub used_for_entry: bool,
}

impl CodeBody {
    /// Validate the body, returning `None` for the absent-code shape.
    ///
    /// A present code without an expiry is a schema violation.
    pub fn into_record(self) -> Result<Option<CodeRecord>, Error> {
        let Some(value) = self.code.filter(|c| !c.is_empty()) else {
            return Ok(None);
        };
        let valid_until = self.valid_until.ok_or(Error::MissingField {
            field: "valid_until",
        })?;
        Ok(Some(CodeRecord {
            value,
            valid_until,
            generated_at: self.generated_at,
            used: self.used,
            used_for_entry: self.used_for_entry,
        }))
    }
}

// ── Pagination ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

// ── Logs ────────────────────────────────────────────────────────────

/// One door event from `GET /api/logs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogRecord {
    pub event: String,
    #[serde(default)]
    pub status: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub code_used: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, alias = "ip", alias = "source_ip")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogsPage {
    pub logs: Vec<LogRecord>,
    pub pagination: Pagination,
}

// ── Alerts ──────────────────────────────────────────────────────────

/// One unresolved alert from `GET /api/alerts`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AlertRecord {
    /// Positional index used by the resolve endpoint.
    #[serde(rename = "_index")]
    pub index: usize,
    #[serde(rename = "type")]
    pub alert_type: String,
    #[serde(default = "default_severity")]
    pub severity: String,
    #[serde(default)]
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub resolved: bool,
}

fn default_severity() -> String {
    "medium".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlertsPage {
    pub alerts: Vec<AlertRecord>,
    pub pagination: Pagination,
}

/// Body of `POST /api/alert`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAlert {
    #[serde(rename = "type")]
    pub alert_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}

// ── Door events ─────────────────────────────────────────────────────

/// Body of `POST /api/access`, as sent by the door controller.
#[derive(Debug, Clone, Serialize)]
pub struct AccessReport {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

/// Response of `POST /api/access`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessReceipt {
    pub status: String,
    pub event_status: String,
}

// ── Status bodies ───────────────────────────────────────────────────

/// `{ status }` on success, `{ error | message }` on failure.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusBody {
    /// The server-supplied failure text, preferring `error` over `message`.
    pub(crate) fn failure(self) -> Option<String> {
        self.error.or(self.message)
    }
}
