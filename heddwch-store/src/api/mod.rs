//! HTTP API handlers for heddwch-store

pub mod health;
pub mod sse;
pub mod updates;

pub use health::health_routes;
pub use sse::event_stream;
pub use updates::post_update;
