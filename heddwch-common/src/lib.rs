//! # Heddwch Common Library
//!
//! Shared code for the heddwch quiz services including:
//! - Claim records and page state data model
//! - Message types (Update / Broadcast) and the MessageBus
//! - Configuration loading
//! - Settings key-value store
//! - SSE helpers

pub mod claims;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod sse;
pub mod state;

pub use error::{Error, Result};
