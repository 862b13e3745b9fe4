//! heddwch-store library - central state store for the quiz pages
//!
//! Updates arrive on the `updates` bus (from HTTP clients or in-process
//! publishers), the [`engine::DispatchEngine`] reduces them one at a time,
//! and snapshots go out on the `render` bus to SSE subscribers.

use axum::Router;
use heddwch_common::events::Channels;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod debug_log;
pub mod engine;
pub mod feed;
pub mod history;
pub mod reducers;
pub mod sampling;

/// State shared across HTTP handlers
#[derive(Clone)]
pub struct AppContext {
    pub channels: Channels,
}

impl AppContext {
    pub fn new(channels: Channels) -> Self {
        Self { channels }
    }
}

/// Build application router
pub fn build_router(ctx: AppContext) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/api/update", post(api::post_update))
        .route("/events", get(api::event_stream))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
