//! Server-Sent Events (SSE) utilities
//!
//! Turns a MessageBus subscription into an SSE response so that browser
//! renderers can follow broadcasts.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};

/// Create an SSE stream forwarding every message from `rx`
///
/// Each message becomes one SSE event named by `event_name`, with the
/// message serialized as JSON data. Lagged or unserializable messages are
/// logged and skipped; the stream itself never errors.
///
/// # Arguments
/// * `service_name` - Name of the service for logging (e.g., "heddwch-store")
/// * `rx` - Subscription to forward
/// * `event_name` - SSE event name for a message
///
/// # Example
/// ```rust,ignore
/// pub async fn event_stream(
///     State(ctx): State<AppContext>,
/// ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
///     heddwch_common::sse::broadcast_sse_stream(
///         "heddwch-store",
///         ctx.channels.broadcasts.subscribe(),
///         Broadcast::kind,
///     )
/// }
/// ```
pub fn broadcast_sse_stream<T>(
    service_name: &'static str,
    rx: broadcast::Receiver<T>,
    event_name: fn(&T) -> &'static str,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    T: Clone + Serialize + Send + 'static,
{
    info!("New SSE client connected to {} events", service_name);

    let stream = BroadcastStream::new(rx).filter_map(move |result| async move {
        match result {
            Ok(message) => match Event::default().event(event_name(&message)).json_data(&message) {
                Ok(event) => {
                    debug!("SSE: forwarding {} event", event_name(&message));
                    Some(Ok(event))
                }
                Err(e) => {
                    warn!("Failed to serialize SSE event: {}", e);
                    None
                }
            },
            Err(e) => {
                // Lagged subscriber; keep the connection open
                warn!("SSE stream error on {}: {:?}", service_name, e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
