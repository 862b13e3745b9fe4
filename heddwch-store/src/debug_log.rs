//! Debugging recorder
//!
//! Every dispatched message leaves one entry in an append-only log. The log
//! is persisted externally after each broadcast and merged back in at
//! startup. Persistence problems never reach the dispatch loop: a missing
//! or corrupt stored log reads as absent.

use async_trait::async_trait;
use heddwch_common::db::settings;
use heddwch_common::state::DebuggingInfo;
use heddwch_common::{Error, Result};
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Settings key holding the serialized log
pub const DEBUGGING_INFO_KEY: &str = "debugging-info";

/// Bounded append-only log of message identifiers
///
/// Appends never remove entries. Once `max_entries` is reached further
/// appends fail with [`Error::DebugLogFull`]; the caller logs and carries on.
/// A restored log that would overflow the bound loses its oldest entries.
#[derive(Debug, Clone)]
pub struct DebugRecorder {
    info: Arc<DebuggingInfo>,
    max_entries: usize,
}

impl DebugRecorder {
    pub fn new(max_entries: usize) -> Self {
        Self {
            info: Arc::new(DebuggingInfo::default()),
            max_entries,
        }
    }

    pub fn append(&mut self, entry: String) -> Result<()> {
        if self.info.event_log.len() >= self.max_entries {
            return Err(Error::DebugLogFull(self.max_entries));
        }
        Arc::make_mut(&mut self.info).event_log.push(entry);
        Ok(())
    }

    /// Replace the log wholesale
    pub fn replace(&mut self, info: DebuggingInfo) {
        self.info = Arc::new(info);
    }

    /// Put `restored` entries in front of what is already recorded
    ///
    /// Keeps the newest `max_entries`; returns how many restored entries
    /// were dropped to fit.
    pub fn merge_restored(&mut self, restored: DebuggingInfo) -> usize {
        let mut event_log = restored.event_log;
        event_log.extend(self.info.event_log.iter().cloned());
        let dropped = event_log.len().saturating_sub(self.max_entries);
        if dropped > 0 {
            warn!(
                "Restored debug log exceeds {} entries, dropping the oldest {}",
                self.max_entries, dropped
            );
            event_log.drain(..dropped);
        }
        self.info = Arc::new(DebuggingInfo { event_log });
        dropped
    }

    /// Shared snapshot for broadcasting and persistence
    pub fn snapshot(&self) -> Arc<DebuggingInfo> {
        Arc::clone(&self.info)
    }

    pub fn len(&self) -> usize {
        self.info.event_log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.info.event_log.is_empty()
    }
}

/// External key-value storage for the log
#[async_trait]
pub trait DebugLogStore: Send + Sync {
    /// Stored log, or `None` if absent or unreadable
    async fn load(&self) -> Option<DebuggingInfo>;

    async fn save(&self, info: &DebuggingInfo) -> Result<()>;
}

fn parse_stored(raw: &str) -> Option<DebuggingInfo> {
    match serde_json::from_str(raw) {
        Ok(info) => Some(info),
        Err(e) => {
            warn!("Stored debugging info is corrupt, ignoring it: {}", e);
            None
        }
    }
}

/// Log stored in the `settings` table under [`DEBUGGING_INFO_KEY`]
#[derive(Clone)]
pub struct SqliteDebugLogStore {
    db: SqlitePool,
}

impl SqliteDebugLogStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DebugLogStore for SqliteDebugLogStore {
    async fn load(&self) -> Option<DebuggingInfo> {
        match settings::get_setting(&self.db, DEBUGGING_INFO_KEY).await {
            Ok(Some(raw)) => {
                if let Ok(Some(saved_at)) =
                    settings::setting_updated_at(&self.db, DEBUGGING_INFO_KEY).await
                {
                    debug!("Stored debugging info last saved at {}", saved_at);
                }
                parse_stored(&raw)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read stored debugging info: {}", e);
                None
            }
        }
    }

    async fn save(&self, info: &DebuggingInfo) -> Result<()> {
        let raw = serde_json::to_string(info)?;
        settings::set_setting(&self.db, DEBUGGING_INFO_KEY, &raw).await
    }
}

/// Process-local store holding the raw serialized text
#[derive(Default)]
pub struct MemoryDebugLogStore {
    raw: Mutex<Option<String>>,
}

impl MemoryDebugLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with arbitrary stored text (possibly corrupt)
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl DebugLogStore for MemoryDebugLogStore {
    async fn load(&self) -> Option<DebuggingInfo> {
        self.raw().as_deref().and_then(parse_stored)
    }

    async fn save(&self, info: &DebuggingInfo) -> Result<()> {
        let raw = serde_json::to_string(info)?;
        *self
            .raw
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(raw);
        Ok(())
    }
}
