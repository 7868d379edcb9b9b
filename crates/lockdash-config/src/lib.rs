//! Shared configuration for the lockdash CLI.
//!
//! TOML profiles layered with `LOCKDASH_*` environment variables, and
//! translation to `lockdash_core::DashboardConfig`. The CLI adds
//! `GlobalOpts`-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lockdash_core::{DashboardConfig, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());
        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile)),
            None => Err(ConfigError::ProfileNotFound { name }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    5
}

/// A named lock backend profile. Unset tunables use the dashboard defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "http://192.168.1.20:5000").
    pub server: String,

    /// Automatic refresh period in seconds; 0 disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,

    /// Override the request timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_timeout_secs: Option<u64>,

    /// Connection check period in seconds; 0 disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_interval_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_refresh_delay_ms: Option<u64>,

    /// Consecutive failures before "connection lost" is reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs_per_page: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts_per_page: Option<u32>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "smartcadenas", "lockdash").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("lockdash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Environment keys nest with a double underscore:
/// `LOCKDASH_DEFAULTS__TIMEOUT=10`, `LOCKDASH_DEFAULT_PROFILE=lab`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LOCKDASH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse and check a backend URL.
pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "server".into(),
            reason: format!("expected an http or https URL, got scheme '{other}'"),
        }),
    }
}

fn at_least_one(field: &str, value: u32) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(value)
}

/// Build a `DashboardConfig` from a profile and the global defaults.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let base = DashboardConfig::default();
    let server = parse_server_url(&profile.server)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(DashboardConfig {
        server,
        tls,
        timeout: Duration::from_secs(profile.api_timeout_secs.unwrap_or(defaults.timeout)),
        poll_interval: profile
            .poll_interval_secs
            .map_or(base.poll_interval, Duration::from_secs),
        health_interval: profile
            .health_interval_secs
            .map_or(base.health_interval, Duration::from_secs),
        min_refresh_delay: profile
            .min_refresh_delay_ms
            .map_or(base.min_refresh_delay, Duration::from_millis),
        failure_threshold: at_least_one(
            "failure_threshold",
            profile.failure_threshold.unwrap_or(base.failure_threshold),
        )?,
        logs_per_page: at_least_one(
            "logs_per_page",
            profile.logs_per_page.unwrap_or(base.logs_per_page),
        )?,
        alerts_per_page: at_least_one(
            "alerts_per_page",
            profile.alerts_per_page.unwrap_or(base.alerts_per_page),
        )?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn unset_tunables_use_dashboard_defaults() {
        let cfg = profile_to_dashboard_config(&profile("http://lock.local:5000"), &Defaults::default())
            .unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_secs(10));
        assert_eq!(cfg.health_interval, Duration::from_secs(30));
        assert_eq!(cfg.min_refresh_delay, Duration::from_secs(2));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.failure_threshold, 3);
        assert_eq!(cfg.logs_per_page, 5);
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let p = Profile {
            insecure: Some(true),
            ca_cert: Some("/etc/lock-ca.pem".into()),
            ..profile("https://lock.local")
        };
        let cfg = profile_to_dashboard_config(&p, &Defaults::default()).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn rejects_non_http_server() {
        let err = profile_to_dashboard_config(&profile("ftp://lock.local"), &Defaults::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));
    }

    #[test]
    fn rejects_zero_page_size() {
        let p = Profile {
            logs_per_page: Some(0),
            ..profile("http://lock.local")
        };
        let err = profile_to_dashboard_config(&p, &Defaults::default()).unwrap_err();
        assert_eq!(err.to_string(), "invalid logs_per_page: must be at least 1");
    }

    #[test]
    fn profile_lookup_falls_back_to_default_profile() {
        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), profile("http://a"));
        cfg.profiles.insert("lab".into(), profile("http://b"));

        let (name, p) = cfg.profile(None).unwrap();
        assert_eq!((name.as_str(), p.server.as_str()), ("default", "http://a"));

        let (name, _) = cfg.profile(Some("lab")).unwrap();
        assert_eq!(name, "lab");

        assert!(matches!(
            cfg.profile(Some("missing")),
            Err(ConfigError::ProfileNotFound { .. })
        ));
    }
}
