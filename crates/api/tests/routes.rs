//! Router tests driven through `tower::ServiceExt::oneshot`

use api::{create_router, spawn_monitor, AppState, ServiceConfig};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use vital_signs::ThresholdTable;

fn app() -> (Router, Arc<AppState>) {
    let (state, _rx) = AppState::new(&ServiceConfig::default(), ThresholdTable::standard());
    let state = Arc::new(state);
    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["vitalsTracked"], 5);
}

#[tokio::test]
async fn test_evaluate_creates_then_suppresses() {
    let (app, _) = app();
    let reading = json!({ "id": "p1", "name": "Sam", "bpm": 35 });

    let (status, body) = send(&app, "POST", "/api/v1/vitals/evaluate", Some(reading.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["alertsCreated"], 1);
    assert_eq!(body["message"], "Created 1 alerts");
    let alert = &body["alerts"][0];
    assert_eq!(alert["vitalType"], "heartRate");
    assert_eq!(alert["severity"], "critical");
    assert_eq!(alert["direction"], "low");
    assert_eq!(alert["isGlobal"], true);
    assert_eq!(alert["acknowledged"], false);

    let (_, body) = send(&app, "POST", "/api/v1/vitals/evaluate", Some(reading)).await;
    assert_eq!(body["alertsCreated"], 0);
    assert_eq!(body["suppressed"], 1);
}

#[tokio::test]
async fn test_evaluate_null_and_normal() {
    let (app, _) = app();

    let (_, body) = send(&app, "POST", "/api/v1/vitals/evaluate", Some(Value::Null)).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Unable to check vitals");

    let normal = json!({ "uid": "u2", "heartRate": 72, "oxygen": 98, "temperature": 36.6, "bloodPressure": "115/75" });
    let (_, body) = send(&app, "POST", "/api/v1/vitals/evaluate", Some(normal)).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "All vitals normal");
    assert_eq!(body["alertsCreated"], 0);
}

#[tokio::test]
async fn test_list_and_acknowledge() {
    let (app, state) = app();
    let reading = json!({ "id": "p1", "doctorId": "dr-2", "temperature": "39.8", "bloodPressure": "185/95" });
    send(&app, "POST", "/api/v1/vitals/evaluate", Some(reading)).await;
    assert_eq!(state.store.len(), 3);

    let (status, body) = send(&app, "GET", "/api/v1/alerts?severity=critical&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["unacknowledgedCount"], 3);

    let id = body["data"][0]["id"].as_str().unwrap().to_string();
    let ack = json!({ "acknowledgerId": "dr-2", "acknowledgerName": "Dr. Ito" });
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/alerts/{id}/acknowledge"),
        Some(ack.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], true);
    assert_eq!(body["acknowledgedByName"], "Dr. Ito");

    let (_, body) = send(&app, "GET", "/api/v1/alerts?acknowledged=false", None).await;
    assert_eq!(body["count"], 2);

    let (status, _) = send(&app, "POST", "/api/v1/alerts/missing/acknowledge", Some(ack)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_thresholds_listed() {
    let (app, _) = app();
    let (status, body) = send(&app, "GET", "/api/v1/thresholds", None).await;
    assert_eq!(status, StatusCode::OK);
    let defs = body.as_array().unwrap();
    assert_eq!(defs.len(), 5);
    assert_eq!(defs[0]["vitalType"], "heartRate");
    assert_eq!(defs[0]["unit"], "bpm");
}

#[tokio::test]
async fn test_ingest_feeds_monitor() {
    let (state, rx) = AppState::new(&ServiceConfig::default(), ThresholdTable::standard());
    let monitor = spawn_monitor(rx, state.orchestrator.clone());
    let state = Arc::new(state);
    let app = create_router(state.clone());

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/vitals/ingest",
        Some(json!({ "phoneNumber": "+15550100", "spo2": 86 })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    // Closing every sender lets the monitor drain and finish
    drop(app);
    drop(state);
    let stats = monitor.await.unwrap();
    assert_eq!(stats.readings, 1);
    assert_eq!(stats.alerts_created, 1);
}
