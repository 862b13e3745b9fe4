//! Claim data feeds
//!
//! Claim datasets are static JSON files laid out under `/data/` of the web
//! root. The store reads them over HTTP or straight from a directory; tests
//! use the in-memory feed.

use async_trait::async_trait;
use heddwch_common::claims::{
    ClaimReview, ClaimsOpenGraphData, FetchResult, FetchedClaims, Topic,
};
use heddwch_common::config::DataSourceConfig;
use heddwch_common::events::{InternalMessage, MessageBus, Update};
use heddwch_common::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

/// Paths of one credible / not-credible bucket pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketPaths {
    pub credible: &'static str,
    pub not_credible: &'static str,
}

/// Bucket paths per topic
pub fn topic_paths(topic: Topic) -> BucketPaths {
    match topic {
        Topic::Norway => BucketPaths {
            credible: "/data/norwegian_credible.json",
            not_credible: "/data/norwegian_not_credible.json",
        },
        Topic::Sweden => BucketPaths {
            credible: "/data/sweden_credible.json",
            not_credible: "/data/sweden_not_credible.json",
        },
        Topic::UK => BucketPaths {
            credible: "/data/uk_credible.json",
            not_credible: "/data/uk_not_credible.json",
        },
        Topic::USA => BucketPaths {
            credible: "/data/usa_credible.json",
            not_credible: "/data/usa_not_credible.json",
        },
    }
}

pub const HEADLINE_PATHS: BucketPaths = BucketPaths {
    credible: "/data/headlines_credible.json",
    not_credible: "/data/headlines_not_credible.json",
};

pub const OPEN_GRAPH_PATH: &str = "/data/claim_review_opengraph_database.json";

/// Source of claim batches and preview metadata
#[async_trait]
pub trait ClaimFeed: Send + Sync {
    /// Both buckets for a fact or fiction topic
    async fn fetch_topic_claims(&self, topic: Topic) -> FetchResult<FetchedClaims>;

    /// Both buckets for the headlines page
    async fn fetch_headline_claims(&self) -> FetchResult<FetchedClaims>;

    /// OpenGraph dump keyed by review URL
    async fn fetch_open_graph(&self) -> FetchResult<ClaimsOpenGraphData>;
}

/// Build the feed described by the config
pub fn from_config(source: &DataSourceConfig) -> Arc<dyn ClaimFeed> {
    match source {
        DataSourceConfig::Url(base) => Arc::new(HttpClaimFeed::new(base.clone())),
        DataSourceConfig::Directory(dir) => Arc::new(DirectoryClaimFeed::new(dir.clone())),
    }
}

/// Combine two bucket fetches; both must succeed
///
/// On failure the message names every path that failed, one per line.
fn combine_buckets(
    paths: BucketPaths,
    credible: Result<Vec<ClaimReview>>,
    not_credible: Result<Vec<ClaimReview>>,
) -> FetchResult<FetchedClaims> {
    match (credible, not_credible) {
        (Ok(credible), Ok(not_credible)) => FetchResult::Success {
            value: FetchedClaims {
                credible,
                not_credible,
            },
        },
        (credible, not_credible) => {
            let mut errors = Vec::new();
            if let Err(e) = credible {
                errors.push(format!("Failed to fetch {} due to {}", paths.credible, e));
            }
            if let Err(e) = not_credible {
                errors.push(format!("Failed to fetch {} due to {}", paths.not_credible, e));
            }
            FetchResult::Error {
                message: errors.join("\n"),
            }
        }
    }
}

// ========================================
// HTTP feed
// ========================================

/// Reads datasets from a web server
#[derive(Clone)]
pub struct HttpClaimFeed {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClaimFeed {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Fetch(e.to_string()))?;

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))
    }

    async fn fetch_pair(&self, paths: BucketPaths) -> FetchResult<FetchedClaims> {
        let (credible, not_credible) = tokio::join!(
            self.get_json::<Vec<ClaimReview>>(paths.credible),
            self.get_json::<Vec<ClaimReview>>(paths.not_credible),
        );
        combine_buckets(paths, credible, not_credible)
    }
}

#[async_trait]
impl ClaimFeed for HttpClaimFeed {
    async fn fetch_topic_claims(&self, topic: Topic) -> FetchResult<FetchedClaims> {
        self.fetch_pair(topic_paths(topic)).await
    }

    async fn fetch_headline_claims(&self) -> FetchResult<FetchedClaims> {
        self.fetch_pair(HEADLINE_PATHS).await
    }

    async fn fetch_open_graph(&self) -> FetchResult<ClaimsOpenGraphData> {
        self.get_json::<ClaimsOpenGraphData>(OPEN_GRAPH_PATH)
            .await
            .into()
    }
}

// ========================================
// Directory feed
// ========================================

/// Reads datasets from a local copy of the web root
#[derive(Debug, Clone)]
pub struct DirectoryClaimFeed {
    root: PathBuf,
}

impl DirectoryClaimFeed {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let file = self.root.join(path.trim_start_matches('/'));
        debug!("Reading {}", file.display());
        let bytes = tokio::fs::read(&file).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn read_pair(&self, paths: BucketPaths) -> FetchResult<FetchedClaims> {
        let (credible, not_credible) = tokio::join!(
            self.read_json::<Vec<ClaimReview>>(paths.credible),
            self.read_json::<Vec<ClaimReview>>(paths.not_credible),
        );
        combine_buckets(paths, credible, not_credible)
    }
}

#[async_trait]
impl ClaimFeed for DirectoryClaimFeed {
    async fn fetch_topic_claims(&self, topic: Topic) -> FetchResult<FetchedClaims> {
        self.read_pair(topic_paths(topic)).await
    }

    async fn fetch_headline_claims(&self) -> FetchResult<FetchedClaims> {
        self.read_pair(HEADLINE_PATHS).await
    }

    async fn fetch_open_graph(&self) -> FetchResult<ClaimsOpenGraphData> {
        self.read_json::<ClaimsOpenGraphData>(OPEN_GRAPH_PATH)
            .await
            .into()
    }
}

// ========================================
// In-memory feed
// ========================================

/// Feed backed by fixed data; topics without data fail like a 404
#[derive(Default)]
pub struct InMemoryClaimFeed {
    topics: Mutex<HashMap<Topic, FetchedClaims>>,
    headlines: Mutex<Option<FetchedClaims>>,
    open_graph: Mutex<Option<ClaimsOpenGraphData>>,
    fetches: AtomicUsize,
}

impl InMemoryClaimFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topic(self, topic: Topic, claims: FetchedClaims) -> Self {
        self.set_topic(topic, claims);
        self
    }

    pub fn with_headlines(self, claims: FetchedClaims) -> Self {
        *lock(&self.headlines) = Some(claims);
        self
    }

    pub fn with_open_graph(self, data: ClaimsOpenGraphData) -> Self {
        *lock(&self.open_graph) = Some(data);
        self
    }

    pub fn set_topic(&self, topic: Topic, claims: FetchedClaims) {
        lock(&self.topics).insert(topic, claims);
    }

    /// Number of fetches served so far, failed ones included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn missing<T>(what: &str) -> FetchResult<T> {
    FetchResult::Error {
        message: format!("Failed to fetch {} due to no data", what),
    }
}

#[async_trait]
impl ClaimFeed for InMemoryClaimFeed {
    async fn fetch_topic_claims(&self, topic: Topic) -> FetchResult<FetchedClaims> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match lock(&self.topics).get(&topic) {
            Some(claims) => FetchResult::Success {
                value: claims.clone(),
            },
            None => missing(topic_paths(topic).credible),
        }
    }

    async fn fetch_headline_claims(&self) -> FetchResult<FetchedClaims> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match lock(&self.headlines).as_ref() {
            Some(claims) => FetchResult::Success {
                value: claims.clone(),
            },
            None => missing(HEADLINE_PATHS.credible),
        }
    }

    async fn fetch_open_graph(&self) -> FetchResult<ClaimsOpenGraphData> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match lock(&self.open_graph).as_ref() {
            Some(data) => FetchResult::Success { value: data.clone() },
            None => missing(OPEN_GRAPH_PATH),
        }
    }
}

/// Publish the OpenGraph dump as a single `MergeOpenGraphData` update
///
/// Returns the number of entries published. A failed fetch is logged and
/// publishes nothing. One update for the whole dump keeps a large dump from
/// overrunning the bus while the engine is busy with a slow fetch.
pub async fn publish_open_graph(feed: &dyn ClaimFeed, updates: &MessageBus<Update>) -> usize {
    let open_graph_data = match feed.fetch_open_graph().await {
        FetchResult::Success { value } => value,
        FetchResult::Error { message } => {
            error!("Could not load OpenGraph data: {}", message);
            return 0;
        }
    };

    let count = open_graph_data.len();
    if count == 0 {
        debug!("OpenGraph dump is empty");
        return 0;
    }
    updates.publish_lossy(Update::internal(InternalMessage::MergeOpenGraphData {
        open_graph_data,
    }));
    info!("Published OpenGraph data for {} reviews", count);
    count
}
