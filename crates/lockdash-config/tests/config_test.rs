#![allow(clippy::unwrap_used)]
// File-backed config loading and saving.

use std::time::Duration;

use pretty_assertions::assert_eq;

use lockdash_config::{
    Config, Profile, load_config_from, profile_to_dashboard_config, save_config_to,
};

const SAMPLE: &str = r#"
default_profile = "entrance"

[defaults]
output = "json"
timeout = 8

[profiles.entrance]
server = "http://192.168.1.20:5000"
poll_interval_secs = 15
min_refresh_delay_ms = 500

[profiles.lab]
server = "https://lock.lab.internal"
insecure = true
alerts_per_page = 10
"#;

#[test]
fn test_load_profiles_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(cfg.default_profile.as_deref(), Some("entrance"));
    assert_eq!(cfg.defaults.output, "json");
    assert_eq!(cfg.defaults.color, "auto");

    let (name, profile) = cfg.profile(None).unwrap();
    assert_eq!(name, "entrance");
    let dash = profile_to_dashboard_config(profile, &cfg.defaults).unwrap();
    assert_eq!(dash.server.as_str(), "http://192.168.1.20:5000/");
    assert_eq!(dash.poll_interval, Duration::from_secs(15));
    assert_eq!(dash.min_refresh_delay, Duration::from_millis(500));
    assert_eq!(dash.timeout, Duration::from_secs(8));

    let (_, lab) = cfg.profile(Some("lab")).unwrap();
    let dash = profile_to_dashboard_config(lab, &cfg.defaults).unwrap();
    assert_eq!(dash.alerts_per_page, 10);
    assert_eq!(dash.logs_per_page, 5);
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.default_profile.as_deref(), Some("default"));
    assert!(cfg.profiles.is_empty());
    assert_eq!(cfg.defaults.timeout, 5);
}

#[test]
fn test_save_then_load_preserves_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.profiles.insert(
        "default".into(),
        Profile {
            server: "http://10.0.0.5:5000".into(),
            failure_threshold: Some(5),
            ..Profile::default()
        },
    );
    save_config_to(&cfg, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("failure_threshold = 5"));
    assert!(!written.contains("poll_interval_secs"));

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded, cfg);
}
