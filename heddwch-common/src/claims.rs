//! Claim review records and related feed types
//!
//! Claim records arrive from static JSON datasets, one array per topic and
//! credibility bucket. Once sampled into a quiz they are never modified.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Credibility tag attached to a claim by the fact checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimLabel {
    Credible,
    NotCredible,
    MostlyCredible,
    CheckMe,
    NotVerifiable,
    Uncertain,
}

impl ClaimLabel {
    /// Whether a quiz answer of "true" is correct for this label
    pub fn is_credible(self) -> bool {
        matches!(self, ClaimLabel::Credible | ClaimLabel::MostlyCredible)
    }
}

/// A single published review of a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub original_label: String,
    #[serde(default)]
    pub date_published: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactChecker {
    pub country: String,
}

/// A fact-checked statement with its review metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReview {
    pub label: ClaimLabel,
    /// Claim text, one entry per line
    pub claim_text: Vec<String>,
    #[serde(default)]
    pub appearances: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub review_url: String,
    #[serde(default)]
    pub fact_checker: FactChecker,
}

/// Short claim shown on the social media post reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMediaClaimReview {
    pub label: ClaimLabel,
    pub text: String,
}

/// Quiz topics, each backed by its own pair of claim buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Norway,
    USA,
    UK,
    Sweden,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Norway, Topic::USA, Topic::UK, Topic::Sweden];

    /// File stem used by the claim datasets (`/data/<stem>_credible.json`)
    pub fn data_stem(self) -> &'static str {
        match self {
            Topic::Norway => "norwegian",
            Topic::USA => "usa",
            Topic::UK => "uk",
            Topic::Sweden => "sweden",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Norway => "Norway",
            Topic::USA => "USA",
            Topic::UK => "UK",
            Topic::Sweden => "Sweden",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown topic: {}", s)))
    }
}

/// Both credibility buckets for one topic, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedClaims {
    pub credible: Vec<ClaimReview>,
    pub not_credible: Vec<ClaimReview>,
}

/// Outcome of an external fetch, as carried over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FetchResult<T> {
    Success { value: T },
    Error { message: String },
}

impl<T> FetchResult<T> {
    pub fn into_result(self) -> crate::Result<T> {
        match self {
            FetchResult::Success { value } => Ok(value),
            FetchResult::Error { message } => Err(Error::Fetch(message)),
        }
    }
}

impl<T> From<crate::Result<T>> for FetchResult<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(value) => FetchResult::Success { value },
            Err(e) => FetchResult::Error {
                message: e.to_string(),
            },
        }
    }
}

/// OpenGraph preview metadata for a review page; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Review URL → preview metadata
pub type ClaimsOpenGraphData = BTreeMap<String, OpenGraph>;
