//! Integration tests for heddwch-store HTTP endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Update submission (scoped and legacy shapes, rejection paths)
//! - SSE event stream handshake

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use heddwch_common::claims::Topic;
use heddwch_common::events::{Channels, FactOrFictionMessage, InternalMessage, Update};
use heddwch_store::{build_router, AppContext};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: Create app around fresh channels
fn setup_app() -> (axum::Router, Channels) {
    let channels = Channels::new(16);
    (build_router(AppContext::new(channels.clone())), channels)
}

/// Test helper: JSON POST request
fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, channels) = setup_app();
    let _renderer = channels.broadcasts.subscribe();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "heddwch-store");
    assert!(body["version"].is_string());
    assert_eq!(body["subscribers"], 1);
}

// =============================================================================
// Update Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_scoped_update_is_queued() {
    let (app, channels) = setup_app();
    let mut engine_rx = channels.updates.subscribe();

    let response = app
        .oneshot(post_json(
            "/api/update",
            r#"{"page":"FactOrFiction","message":{"kind":"SelectedATopic","topic":"USA"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["queued"], "FactOrFiction:SelectedATopic");

    assert_eq!(
        engine_rx.try_recv().unwrap(),
        Update::FactOrFiction(FactOrFictionMessage::SelectedATopic { topic: Topic::USA })
    );
}

#[tokio::test]
async fn test_legacy_bare_messages_are_accepted() {
    let (app, channels) = setup_app();
    let mut engine_rx = channels.updates.subscribe();

    let response = app
        .clone()
        .oneshot(post_json("/api/update", r#"{"kind":"ReadyToRender"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .oneshot(post_json("/api/update", r#"{"kind":"Restart"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    assert_eq!(
        engine_rx.try_recv().unwrap(),
        Update::Internal(InternalMessage::ReadyToRender)
    );
    assert_eq!(
        engine_rx.try_recv().unwrap(),
        Update::FactOrFiction(FactOrFictionMessage::Restart)
    );
}

#[tokio::test]
async fn test_unknown_message_is_rejected() {
    let (app, channels) = setup_app();
    let mut engine_rx = channels.updates.subscribe();

    let response = app
        .oneshot(post_json(
            "/api/update",
            r#"{"page":"Headlines","message":{"kind":"Explode"}}"#,
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(engine_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (app, _channels) = setup_app();

    let response = app
        .oneshot(post_json("/api/update", "{ not json"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_update_without_engine_is_unavailable() {
    let (app, _channels) = setup_app();

    let response = app
        .oneshot(post_json(
            "/api/update",
            r#"{"page":"internal","message":{"kind":"Noop"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// SSE Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_event_stream_subscribes_a_renderer() {
    let (app, channels) = setup_app();

    let request = Request::builder()
        .uri("/events")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    // The open stream holds a subscription until the response is dropped
    assert_eq!(channels.broadcasts.subscriber_count(), 1);
}
