// ── Door event log types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::humanize;

/// Token the door controller sends in `code_used` for the inside button.
pub const BUTTON_SENTINEL: &str = "button";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorEvent {
    DoorOpen,
    DoorClose,
    Other(String),
}

impl DoorEvent {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "door_open" => Self::DoorOpen,
            "door_close" => Self::DoorClose,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    Success,
    Failed,
    Other(String),
}

impl EventOutcome {
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "success" => Self::Success,
            "failed" => Self::Failed,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// What unlocked (or tried to unlock) the door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeUsed {
    /// No code accompanied the event.
    None,
    /// The physical button inside the enclosure.
    Button,
    Code(String),
}

impl CodeUsed {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::None,
            Some(s) if s.eq_ignore_ascii_case(BUTTON_SENTINEL) => Self::Button,
            Some(s) => Self::Code(s.to_owned()),
        }
    }
}

/// A single immutable door event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub event: DoorEvent,
    pub outcome: Option<EventOutcome>,
    pub timestamp: DateTime<Utc>,
    pub agent: Option<String>,
    pub code_used: CodeUsed,
    pub reason: Option<String>,
    /// Network address the event was reported from.
    pub source: Option<String>,
}

impl LogEntry {
    /// Short human description: "Door opened", "Failed attempt", ...
    pub fn summary(&self) -> String {
        match (&self.event, &self.outcome) {
            (DoorEvent::DoorOpen, Some(EventOutcome::Success)) => "Door opened".into(),
            (DoorEvent::DoorOpen, _) => "Failed attempt".into(),
            (DoorEvent::DoorClose, _) => "Door closed".into(),
            (DoorEvent::Other(raw), _) => humanize(raw),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Some(EventOutcome::Failed))
    }

    pub fn agent_or_unknown(&self) -> &str {
        self.agent.as_deref().unwrap_or("Unknown")
    }

    pub fn reason_text(&self) -> Option<String> {
        self.reason.as_deref().map(humanize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_used_sentinels() {
        assert_eq!(CodeUsed::from_wire(None), CodeUsed::None);
        assert_eq!(CodeUsed::from_wire(Some("")), CodeUsed::None);
        assert_eq!(CodeUsed::from_wire(Some("BUTTON")), CodeUsed::Button);
        assert_eq!(
            CodeUsed::from_wire(Some("1234")),
            CodeUsed::Code("1234".into())
        );
    }

    #[test]
    fn door_open_without_success_is_a_failed_attempt() {
        let entry = LogEntry {
            event: DoorEvent::from_wire("door_open"),
            outcome: Some(EventOutcome::from_wire("failed")),
            timestamp: Utc::now(),
            agent: None,
            code_used: CodeUsed::Code("0000".into()),
            reason: Some("wrong_code".into()),
            source: None,
        };
        assert_eq!(entry.summary(), "Failed attempt");
        assert!(entry.is_failure());
        assert_eq!(entry.agent_or_unknown(), "Unknown");
        assert_eq!(entry.reason_text().as_deref(), Some("Wrong code"));
    }
}
