// ── Runtime dashboard configuration ──
//
// Describes which backend to poll and how often. Never touches disk:
// the CLI resolves a profile from `lockdash-config` and hands in a
// `DashboardConfig`.

use std::path::PathBuf;
use std::time::Duration;

use lockdash_api::{TlsMode, TransportConfig};
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lock gateways).
    DangerAcceptInvalid,
}

/// Configuration for polling a single lock backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend root (e.g. `http://192.168.1.20:5000`).
    pub server: Url,
    pub tls: TlsVerification,
    /// Upper bound for every request.
    pub timeout: Duration,
    /// Period of the automatic refresh. Zero disables the poll task.
    pub poll_interval: Duration,
    /// Period of the connection check. Zero disables the health task.
    pub health_interval: Duration,
    /// Minimum spacing between two accepted manual refreshes.
    pub min_refresh_delay: Duration,
    /// Consecutive failures before the connection is reported lost.
    pub failure_threshold: u32,
    pub logs_per_page: u32,
    pub alerts_per_page: u32,
}

/// Backend address used when no profile or flag names one.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server: Url::parse(DEFAULT_SERVER).expect("DEFAULT_SERVER is a valid URL"),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(10),
            health_interval: Duration::from_secs(30),
            min_refresh_delay: Duration::from_secs(2),
            failure_threshold: 3,
            logs_per_page: 5,
            alerts_per_page: 5,
        }
    }
}

impl DashboardConfig {
    /// Transport settings for the API client.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            ..TransportConfig::default()
        }
        .with_timeout(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_server_parses() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.server.as_str(), "http://127.0.0.1:5000/");
        assert!(Url::parse(DEFAULT_SERVER).is_ok());
    }

    #[test]
    fn insecure_tls_maps_to_danger_mode() {
        let cfg = DashboardConfig {
            tls: TlsVerification::DangerAcceptInvalid,
            ..DashboardConfig::default()
        };
        assert!(matches!(cfg.transport().tls, TlsMode::DangerAcceptInvalid));
    }
}
