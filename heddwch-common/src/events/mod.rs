//! Message types and the MessageBus
//!
//! Two message families travel between clients and the store:
//! - [`Update`]: client → engine, page-scoped commands
//! - [`Broadcast`]: engine → client, render-ready state snapshots
//!
//! Both travel over a [`MessageBus`], a named multi-subscriber channel.

// Sub-modules (message vocabularies per page)
mod fact_or_fiction_types;
mod headlines_types;
mod internal_types;
mod page_types;

pub use fact_or_fiction_types::FactOrFictionMessage;
pub use headlines_types::{HeadlinesMessage, Story};
pub use internal_types::InternalMessage;
pub use page_types::{IndexMessage, SocialMediaPostReviewerMessage};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::state::{AppState, DebuggingInfo, PageId};

/// Client → engine message envelope
///
/// Serialized as `{"page": <PageId>, "message": {"kind": ..., ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "page", content = "message")]
pub enum Update {
    Index(IndexMessage),
    FactOrFiction(FactOrFictionMessage),
    Headlines(HeadlinesMessage),
    SocialMediaPostReviewer(SocialMediaPostReviewerMessage),
    #[serde(rename = "internal", alias = ":internal")]
    Internal(InternalMessage),
}

impl Update {
    /// Page this update is addressed to
    pub fn page(&self) -> PageId {
        match self {
            Update::Index(_) => PageId::Index,
            Update::FactOrFiction(_) => PageId::FactOrFiction,
            Update::Headlines(_) => PageId::Headlines,
            Update::SocialMediaPostReviewer(_) => PageId::SocialMediaPostReviewer,
            Update::Internal(_) => PageId::Internal,
        }
    }

    /// Message kind without the page
    pub fn kind(&self) -> &'static str {
        match self {
            Update::Index(m) => m.kind(),
            Update::FactOrFiction(m) => m.kind(),
            Update::Headlines(m) => m.kind(),
            Update::SocialMediaPostReviewer(m) => m.kind(),
            Update::Internal(m) => m.kind(),
        }
    }

    /// Debug log identifier: bare kind for internal messages, `Page:Kind` otherwise
    pub fn log_entry(&self) -> String {
        match self.page() {
            PageId::Internal => self.kind().to_string(),
            page => format!("{}:{}", page, self.kind()),
        }
    }

    pub fn internal(message: InternalMessage) -> Self {
        Update::Internal(message)
    }
}

/// Any update accepted on the wire
///
/// Besides the page-scoped envelope, the bare `{"kind": ...}` shape of the
/// single-page client is still accepted: internal kinds go to the internal
/// channel, everything else is a fact or fiction message.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireUpdate {
    Scoped(Update),
    LegacyInternal(InternalMessage),
    LegacyFactOrFiction(FactOrFictionMessage),
}

impl From<WireUpdate> for Update {
    fn from(wire: WireUpdate) -> Self {
        match wire {
            WireUpdate::Scoped(update) => update,
            WireUpdate::LegacyInternal(message) => Update::Internal(message),
            WireUpdate::LegacyFactOrFiction(message) => Update::FactOrFiction(message),
        }
    }
}

/// Engine → client message
///
/// Snapshots are behind `Arc`: every subscriber shares the same immutable
/// copy instead of cloning the whole state per receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Broadcast {
    #[serde(rename = "rerender", rename_all = "camelCase")]
    Rerender {
        state: Arc<AppState>,
        debugging_info: Arc<DebuggingInfo>,
    },
    ReadyToRender,
}

impl Broadcast {
    pub fn kind(&self) -> &'static str {
        match self {
            Broadcast::Rerender { .. } => "rerender",
            Broadcast::ReadyToRender => "ReadyToRender",
        }
    }
}

// ========================================
// MessageBus Implementation
// ========================================

/// Named publish/subscribe channel
///
/// The MessageBus uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - FIFO delivery per bus (no ordering across buses)
/// - Lagged message detection for slow subscribers
///
/// Delivery is asynchronous: `publish` only enqueues, subscribers observe the
/// message on their next `recv().await`. Nothing is persisted.
///
/// # Examples
///
/// ```
/// use heddwch_common::events::{InternalMessage, MessageBus, Update};
///
/// let bus: MessageBus<Update> = MessageBus::new("updates", 16);
/// let mut rx = bus.subscribe();
///
/// bus.publish_lossy(Update::internal(InternalMessage::ReadyToRender));
///
/// let received = rx.try_recv().unwrap();
/// assert_eq!(received.kind(), "ReadyToRender");
/// ```
#[derive(Clone)]
pub struct MessageBus<T> {
    name: &'static str,
    tx: broadcast::Sender<T>,
    capacity: usize,
}

impl<T: Clone> MessageBus<T> {
    /// Creates a new bus buffering up to `capacity` messages per subscriber
    ///
    /// A zero capacity is raised to 1.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self { name, tx, capacity }
    }

    /// Subscribe to all future messages
    ///
    /// Messages published before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }

    /// Publish to all current subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` (carrying the message back) if nobody is listening.
    #[allow(clippy::result_large_err)]
    pub fn publish(&self, message: T) -> Result<usize, broadcast::error::SendError<T>> {
        self.tx.send(message)
    }

    /// Publish, ignoring whether anybody is listening
    pub fn publish_lossy(&self, message: T) {
        let _ = self.tx.send(message);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: Clone + Send + 'static> MessageBus<T> {
    /// Register a handler invoked once per published message
    ///
    /// The handler runs on its own task. It stops when the bus is dropped.
    /// Lagging behind the buffer drops the oldest messages with a warning.
    pub fn subscribe_with<F>(&self, mut handler: F) -> JoinHandle<()>
    where
        F: FnMut(T) + Send + 'static,
    {
        let mut rx = self.subscribe();
        let name = self.name;
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(message) => handler(message),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Subscriber on '{}' lagged, {} messages dropped", name, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

/// The two logical topics between clients and the store
#[derive(Clone)]
pub struct Channels {
    /// Client → engine
    pub updates: MessageBus<Update>,
    /// Engine → renderers
    pub broadcasts: MessageBus<Broadcast>,
}

impl Channels {
    pub fn new(capacity: usize) -> Self {
        Self {
            updates: MessageBus::new("updates", capacity),
            broadcasts: MessageBus::new("render", capacity),
        }
    }
}
