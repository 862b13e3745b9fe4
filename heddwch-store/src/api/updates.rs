//! Update submission endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use heddwch_common::events::{Update, WireUpdate};
use serde_json::json;
use tracing::{debug, warn};

use crate::AppContext;

/// POST /api/update
///
/// Accepts a page-scoped `{"page", "message"}` envelope or a bare legacy
/// `{"kind"}` message and queues it for the dispatch engine. Returns
/// `202 Accepted` once queued; handling happens asynchronously. Returns
/// `503 Service Unavailable` if no engine is listening.
pub async fn post_update(
    State(ctx): State<AppContext>,
    Json(wire): Json<WireUpdate>,
) -> impl IntoResponse {
    let update = Update::from(wire);
    let entry = update.log_entry();

    match ctx.channels.updates.publish(update) {
        Ok(_) => {
            debug!("Queued update {}", entry);
            (StatusCode::ACCEPTED, Json(json!({ "queued": entry })))
        }
        Err(_) => {
            warn!("Update {} rejected: dispatch engine is not running", entry);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "dispatch engine is not running" })),
            )
        }
    }
}
