#![allow(clippy::unwrap_used)]
// Scheduler tests: the dashboard's timers against a wiremock backend.

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lockdash_core::{CodeStatus, Dashboard, DashboardConfig, DashboardEvent, Poller};

// ── Helpers ─────────────────────────────────────────────────────────

async fn backend(valid_for: chrono::Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "7788",
            "valid_until": (Utc::now() + valid_for).to_rfc3339(),
            "used": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [],
            "pagination": { "page": 1, "pages": 1 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alerts": [],
            "pagination": { "page": 1, "pages": 1 }
        })))
        .mount(&server)
        .await;
    server
}

fn poller(server: &MockServer, poll_interval: Duration, health_interval: Duration) -> Poller {
    Poller::new(DashboardConfig {
        server: server.uri().parse().unwrap(),
        poll_interval,
        health_interval,
        ..DashboardConfig::default()
    })
    .unwrap()
}

async fn count(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == endpoint)
        .count()
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_runs_initial_refresh() {
    let server = backend(chrono::Duration::seconds(600)).await;
    let dashboard = Dashboard::start(poller(&server, Duration::ZERO, Duration::ZERO)).await;

    let state = dashboard.poller().state();
    assert_eq!(state.code.as_ref().unwrap().value, "7788");
    assert!(state.last_refresh.is_some());

    let countdown = *dashboard.countdown().borrow();
    assert_eq!(countdown.status, CodeStatus::Active);
    assert!(countdown.remaining_secs > 590);

    dashboard.shutdown().await;
    assert_eq!(count(&server, "/api/logs").await, 1);
}

#[tokio::test]
async fn test_poll_task_repeats_until_shutdown() {
    let server = backend(chrono::Duration::seconds(600)).await;
    let dashboard = Dashboard::start(poller(
        &server,
        Duration::from_millis(100),
        Duration::ZERO,
    ))
    .await;

    tokio::time::sleep(Duration::from_millis(450)).await;
    let poller = dashboard.poller().clone();
    dashboard.shutdown().await;

    let polled = count(&server, "/api/logs").await;
    assert!(polled >= 3, "only {polled} refreshes");
    assert!(poller.is_shut_down());

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(count(&server, "/api/logs").await, polled);
}

#[tokio::test]
async fn test_health_task_polls_code_endpoint() {
    let server = backend(chrono::Duration::seconds(600)).await;
    let dashboard = Dashboard::start(poller(
        &server,
        Duration::ZERO,
        Duration::from_millis(100),
    ))
    .await;

    tokio::time::sleep(Duration::from_millis(250)).await;
    dashboard.shutdown().await;

    // One code request from the initial refresh, the rest from health checks.
    assert!(count(&server, "/api/code").await >= 3);
    assert_eq!(count(&server, "/api/logs").await, 1);
}

// ── Countdown ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_countdown_reports_expiry_without_polling() {
    let server = backend(chrono::Duration::milliseconds(1500)).await;
    let dashboard = Dashboard::start(poller(&server, Duration::ZERO, Duration::ZERO)).await;
    let mut events = dashboard.poller().events();

    let changed = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(DashboardEvent::CodeStatusChanged { from, to }) = events.recv().await {
                return (from, to);
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(changed, (CodeStatus::Active, CodeStatus::Expired));
    assert_eq!(dashboard.countdown().borrow().to_string(), "Expired");

    dashboard.shutdown().await;
    assert_eq!(count(&server, "/api/code").await, 1);
}
