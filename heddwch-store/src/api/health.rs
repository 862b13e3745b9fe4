//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppContext;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Renderers currently following broadcasts
    pub subscribers: usize,
}

/// GET /health
pub async fn health_check(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "heddwch-store".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        subscribers: ctx.channels.broadcasts.subscriber_count(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppContext> {
    Router::new().route("/health", get(health_check))
}
