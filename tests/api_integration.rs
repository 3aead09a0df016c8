//! Integration tests for the HTTP monitor
//!
//! Tests endpoint structure and the session flow end to end.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use thermo0::core::create_router;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_create_session() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session/new")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"extent": 10000.0}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["session_id"].is_string());
    assert!(json["websocket_url"].is_string());
}

#[tokio::test]
async fn test_unknown_preset_rejected() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session/new")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"preset": "supercritical"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_not_found() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/session/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_session_flow() {
    let app = create_router();

    // Create a session with a known extent
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session/new")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"preset": "thermal", "extent": 10000.0}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let session_id = json["session_id"].as_str().unwrap().to_string();

    // Snapshot carries the full state surface. The background ticker races
    // this request, so only tick-independent fields are pinned down.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/session/{}", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["phase"].is_string());
    assert_eq!(json["scroll_percent"], 0.0);
    assert!(json["landmarks"].is_array());

    // Feed a scroll event and read the snapshot back
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/session/{}/scroll", session_id))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"offset": 5000.0}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["scroll_percent"], 0.5);

    // Configuration endpoint mirrors the active preset
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/session/{}/config", session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["phases"], serde_json::json!(["hot", "warm", "cold"]));
}

#[tokio::test]
async fn test_scroll_to_unknown_session() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session/nonexistent/scroll")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"offset": 100.0}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
