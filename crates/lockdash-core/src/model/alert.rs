// ── Alert types ──

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::humanize;

/// Alert severity, ordered from least to most urgent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Parse a wire severity; unknown values are treated as `Medium`,
    /// the backend's own default.
    pub fn from_wire(raw: &str) -> Self {
        Self::from_str(raw.trim()).unwrap_or(Self::Medium)
    }
}

/// An unresolved anomaly awaiting operator acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Positional identifier for the resolve action.
    pub index: usize,
    pub alert_type: String,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Alert {
    pub fn title(&self) -> String {
        humanize(&self.alert_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_from_wire() {
        assert_eq!(Severity::from_wire("HIGH"), Severity::High);
        assert_eq!(Severity::from_wire("catastrophic"), Severity::Medium);
        assert_eq!(Severity::Critical.to_string(), "critical");
    }
}
