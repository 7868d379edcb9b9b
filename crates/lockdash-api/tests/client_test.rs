#![allow(clippy::unwrap_used)]
// Integration tests for `LockClient` using wiremock.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lockdash_api::{AccessReport, Error, LockClient, NewAlert, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, LockClient) {
    setup_with(TransportConfig::default()).await
}

async fn setup_with(transport: TransportConfig) -> (MockServer, LockClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = LockClient::new(base_url, &transport).unwrap();
    (server, client)
}

// ── Access code ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_code_present() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/code"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "4821",
            "valid_until": "2025-03-01T10:05:00Z",
            "generated_at": "2025-03-01T10:00:00Z",
            "used": false,
            "used_for_entry": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let code = client.get_code().await.unwrap().unwrap();

    assert_eq!(code.value, "4821");
    assert_eq!(
        code.valid_until,
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 5, 0).unwrap()
    );
    assert_eq!(
        code.generated_at,
        Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap())
    );
    assert!(!code.used);
    assert!(code.used_for_entry);
}

#[tokio::test]
async fn test_get_code_absent_shapes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": null,
            "valid": false,
            "remaining_time": 0
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": "" })))
        .mount(&server)
        .await;

    assert!(client.get_code().await.unwrap().is_none());
    assert!(client.get_code().await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_code_without_expiry_is_missing_field() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": "1234" })))
        .mount(&server)
        .await;

    let result = client.get_code().await;

    assert!(
        matches!(result, Err(Error::MissingField { field: "valid_until" })),
        "expected MissingField(valid_until), got: {result:?}"
    );
}

#[tokio::test]
async fn test_naive_timestamp_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "1234",
            "valid_until": "2025-03-01T10:05:00.123456"
        })))
        .mount(&server)
        .await;

    let err = client.get_code().await.unwrap_err();

    assert!(
        matches!(err, Error::Deserialization { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_create_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/code"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "code": "1234",
            "valid_until": "2025-03-01T10:05:00+01:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let code = client.create_code().await.unwrap();

    assert_eq!(code.value, "1234");
    assert_eq!(
        code.valid_until,
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 5, 0).unwrap()
    );
    assert_eq!(code.generated_at, None);
}

#[tokio::test]
async fn test_create_code_missing_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/code"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "valid_until": "2025-03-01T10:05:00Z"
        })))
        .mount(&server)
        .await;

    let result = client.create_code().await;

    assert!(
        matches!(result, Err(Error::MissingField { field: "code" })),
        "expected MissingField(code), got: {result:?}"
    );
}

// ── Logs ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_logs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [
                {
                    "timestamp": "2025-03-01T10:01:00Z",
                    "event": "door_open",
                    "code_used": "1234",
                    "status": "success",
                    "agent": "TestBot",
                    "ip": "192.168.1.40"
                },
                {
                    "timestamp": "2025-03-01T09:58:00Z",
                    "event": "door_close",
                    "status": "success",
                    "reason": "button_pressed"
                }
            ],
            "pagination": { "total": 7, "page": 2, "per_page": 5, "pages": 2 }
        })))
        .mount(&server)
        .await;

    let page = client.list_logs(2, 5).await.unwrap();

    assert_eq!(page.logs.len(), 2);
    assert_eq!(page.logs[0].event, "door_open");
    assert_eq!(page.logs[0].source.as_deref(), Some("192.168.1.40"));
    assert_eq!(page.logs[1].reason.as_deref(), Some("button_pressed"));
    assert_eq!(page.logs[1].agent, None);
    assert_eq!(page.pagination.page, 2);
    assert_eq!(page.pagination.pages, 2);
    assert_eq!(page.pagination.total, Some(7));
}

#[tokio::test]
async fn test_list_logs_clamps_page_zero() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [],
            "pagination": { "page": 1, "pages": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.list_logs(0, 5).await.unwrap();

    assert!(page.logs.is_empty());
}

// ── Alerts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_alerts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .and(query_param("show_resolved", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "alerts": [{
                "_index": 3,
                "type": "force_attempt",
                "severity": "high",
                "message": "3 failed attempts",
                "timestamp": "2025-03-01T10:02:00Z"
            }, {
                "_index": 1,
                "type": "failed_attempt",
                "message": "Failed attempt with code 0000",
                "timestamp": "2025-03-01T10:01:00Z"
            }],
            "pagination": { "page": 1, "pages": 1, "total": 2 }
        })))
        .mount(&server)
        .await;

    let page = client.list_alerts(1, 5, false).await.unwrap();

    assert_eq!(page.alerts.len(), 2);
    assert_eq!(page.alerts[0].index, 3);
    assert_eq!(page.alerts[0].alert_type, "force_attempt");
    assert_eq!(page.alerts[1].severity, "medium");
}

#[tokio::test]
async fn test_resolve_alert() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alert/2/resolve"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "alert_resolved" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.resolve_alert(2).await.unwrap();
}

#[tokio::test]
async fn test_resolve_unknown_alert() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alert/42/resolve"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Alert not found" })))
        .mount(&server)
        .await;

    let err = client.resolve_alert(42).await.unwrap_err();

    match err {
        Error::Http { status, ref message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Alert not found");
        }
        ref other => panic!("expected Http error, got: {other:?}"),
    }
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_resolve_alert_unexpected_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alert/0/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "queued" })))
        .mount(&server)
        .await;

    let result = client.resolve_alert(0).await;

    assert!(
        matches!(result, Err(Error::Rejected { ref message }) if message.contains("queued")),
        "expected Rejected, got: {result:?}"
    );
}

#[tokio::test]
async fn test_create_alert() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alert"))
        .and(body_json(json!({
            "type": "tamper",
            "message": "Casing opened",
            "severity": "high"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "status": "alert_created" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .create_alert(&NewAlert {
            alert_type: "tamper".into(),
            message: Some("Casing opened".into()),
            severity: Some("high".into()),
        })
        .await
        .unwrap();
}

// ── Door events ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_report_access() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/access"))
        .and(body_json(json!({ "event": "door_open", "code": "0000" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "logged",
            "event_status": "failed"
        })))
        .mount(&server)
        .await;

    let receipt = client
        .report_access(&AccessReport {
            event: "door_open".into(),
            code: Some("0000".into()),
            agent: None,
        })
        .await
        .unwrap();

    assert_eq!(receipt.event_status, "failed");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db locked" })))
        .mount(&server)
        .await;

    let err = client.list_logs(1, 5).await.unwrap_err();

    assert!(
        matches!(err, Error::Http { status: 500, ref message } if message == "db locked"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn test_non_json_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client.get_code().await.unwrap_err();

    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"alerts\": 12}"))
        .mount(&server)
        .await;

    let result = client.list_alerts(1, 5, false).await;

    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("alerts")),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_timeout() {
    let transport = TransportConfig::default().with_timeout(Duration::from_millis(200));
    let (server, client) = setup_with(transport).await;

    Mock::given(method("GET"))
        .and(path("/api/code"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": null }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client.get_code().await;

    assert!(
        matches!(result, Err(Error::Timeout { timeout_ms: 200 })),
        "expected Timeout, got: {result:?}"
    );
}

// ── Redirects ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_same_origin_redirect_is_followed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/code"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/api/v2/code"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "4821",
            "valid_until": "2025-03-01T10:05:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let code = client.get_code().await.unwrap().unwrap();

    assert_eq!(code.value, "4821");
}

#[tokio::test]
async fn test_cross_origin_redirect_is_not_followed() {
    let (server, client) = setup().await;
    let elsewhere = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/code"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/api/code", elsewhere.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Nothing may reach the other origin.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": null })))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let result = client.get_code().await;

    assert!(
        matches!(result, Err(Error::Http { status: 302, .. })),
        "expected the redirect to surface as an HTTP error, got: {result:?}"
    );
}
