// ── Wire record → domain conversion ──
//
// Everything coming off `lockdash-api` passes through here exactly
// once. Timestamps were already validated on ingress; this layer only
// classifies tokens and fills defaults.

use chrono::{DateTime, Utc};
use lockdash_api::models as wire;

use crate::model::{
    AccessCode, Alert, CodeUsed, DoorEvent, EventOutcome, LogEntry, Page, Pagination, Severity,
};

/// Build an `AccessCode`, stamping `received_at` when the backend did
/// not report a generation time.
pub fn access_code(record: wire::CodeRecord, received_at: DateTime<Utc>) -> AccessCode {
    AccessCode {
        value: record.value,
        valid_until: record.valid_until,
        generated_at: record.generated_at.unwrap_or(received_at),
        used: record.used,
        used_for_entry: record.used_for_entry,
    }
}

impl From<wire::Pagination> for Pagination {
    fn from(p: wire::Pagination) -> Self {
        Self {
            page: p.page,
            pages: p.pages,
            total: p.total.and_then(|t| usize::try_from(t).ok()),
            per_page: p.per_page,
        }
    }
}

impl From<wire::LogRecord> for LogEntry {
    fn from(r: wire::LogRecord) -> Self {
        Self {
            event: DoorEvent::from_wire(&r.event),
            outcome: r.status.as_deref().map(EventOutcome::from_wire),
            timestamp: r.timestamp,
            agent: r.agent.filter(|a| !a.is_empty()),
            code_used: CodeUsed::from_wire(r.code_used.as_deref()),
            reason: r.reason.filter(|s| !s.is_empty()),
            source: r.source.filter(|s| !s.is_empty()),
        }
    }
}

impl From<wire::AlertRecord> for Alert {
    fn from(r: wire::AlertRecord) -> Self {
        Self {
            index: r.index,
            alert_type: r.alert_type,
            severity: Severity::from_wire(&r.severity),
            message: r.message,
            timestamp: r.timestamp,
        }
    }
}

impl From<wire::LogsPage> for Page<LogEntry> {
    fn from(p: wire::LogsPage) -> Self {
        Self {
            items: p.logs.into_iter().map(LogEntry::from).collect(),
            pagination: p.pagination.into(),
        }
    }
}

impl From<wire::AlertsPage> for Page<Alert> {
    fn from(p: wire::AlertsPage) -> Self {
        Self {
            items: p.alerts.into_iter().map(Alert::from).collect(),
            pagination: p.pagination.into(),
        }
    }
}
