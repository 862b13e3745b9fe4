//! Server-Sent Events (SSE) for state broadcasts
//!
//! Every broadcast on the `render` bus becomes one SSE event named after its
//! kind (`rerender` or `ReadyToRender`).

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use heddwch_common::events::Broadcast;
use std::convert::Infallible;

use crate::AppContext;

/// GET /events - SSE stream of state snapshots
pub async fn event_stream(
    State(ctx): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    heddwch_common::sse::broadcast_sse_stream(
        "heddwch-store",
        ctx.channels.broadcasts.subscribe(),
        Broadcast::kind,
    )
}
