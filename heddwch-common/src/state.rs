//! Application state shared between the dispatch engine and renderers
//!
//! `AppState` is owned and mutated by exactly one writer (the dispatch
//! engine). Renderers only ever see it through broadcast snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::claims::{ClaimReview, ClaimsOpenGraphData, Topic};

/// Addressable pages, plus the internal control channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageId {
    Index,
    FactOrFiction,
    Headlines,
    SocialMediaPostReviewer,
    #[serde(rename = "internal", alias = ":internal")]
    Internal,
}

impl PageId {
    pub fn as_str(self) -> &'static str {
        match self {
            PageId::Index => "Index",
            PageId::FactOrFiction => "FactOrFiction",
            PageId::Headlines => "Headlines",
            PageId::SocialMediaPostReviewer => "SocialMediaPostReviewer",
            PageId::Internal => "internal",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fact or fiction quiz
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FactOrFictionState {
    #[default]
    LoadedPage,
    ChoosingATopic,
    QuizIntro {
        topic: Topic,
        claims: Vec<ClaimReview>,
    },
    #[serde(rename_all = "camelCase")]
    InQuiz {
        topic: Topic,
        claims: Vec<ClaimReview>,
        /// 0-based, never exceeds `claims.len()`
        question_index: usize,
        previous_answers: Vec<bool>,
    },
    QuizOver {
        topic: Topic,
        claims: Vec<ClaimReview>,
        answers: Vec<bool>,
    },
}

/// Story identifier on the headlines page (index into `claims`)
pub type StoryId = usize;

/// Headlines quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum HeadlinesState {
    LoadedPage {
        claims: Vec<ClaimReview>,
        scores: Vec<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Quiz {
        claims: Vec<ClaimReview>,
        scores: Vec<u32>,
        upvoted_stories: Vec<StoryId>,
        downvoted_stories: Vec<StoryId>,
    },
}

impl HeadlinesState {
    /// Stories already voted on in either direction
    pub fn voted_stories(&self) -> Vec<StoryId> {
        match self {
            HeadlinesState::LoadedPage { .. } => Vec::new(),
            HeadlinesState::Quiz {
                upvoted_stories,
                downvoted_stories,
                ..
            } => upvoted_stories
                .iter()
                .chain(downvoted_stories.iter())
                .copied()
                .collect(),
        }
    }

    /// Whether a story may still receive a vote (renderer eligibility check)
    pub fn is_vote_eligible(&self, story: StoryId) -> bool {
        !self.voted_stories().contains(&story)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum IndexState {
    #[default]
    LoadedPage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SocialMediaPostReviewerState {
    #[default]
    LoadedPage,
}

/// The one active page and its local state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", content = "state")]
pub enum ActivePage {
    Index(IndexState),
    FactOrFiction(FactOrFictionState),
    Headlines(HeadlinesState),
    SocialMediaPostReviewer(SocialMediaPostReviewerState),
}

impl ActivePage {
    pub fn kind(&self) -> PageId {
        match self {
            ActivePage::Index(_) => PageId::Index,
            ActivePage::FactOrFiction(_) => PageId::FactOrFiction,
            ActivePage::Headlines(_) => PageId::Headlines,
            ActivePage::SocialMediaPostReviewer(_) => PageId::SocialMediaPostReviewer,
        }
    }
}

/// Top-level process state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub active_page: ActivePage,
    pub claims_open_graph_data: ClaimsOpenGraphData,
}

impl AppState {
    pub fn new(active_page: ActivePage) -> Self {
        Self {
            active_page,
            claims_open_graph_data: ClaimsOpenGraphData::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ActivePage::FactOrFiction(FactOrFictionState::LoadedPage))
    }
}

/// Append-only log of dispatched message kinds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebuggingInfo {
    pub event_log: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_quiz_uses_camel_case_fields() {
        let state = FactOrFictionState::InQuiz {
            topic: Topic::USA,
            claims: Vec::new(),
            question_index: 3,
            previous_answers: vec![true, false, true],
        };

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["kind"], "InQuiz");
        assert_eq!(json["topic"], "USA");
        assert_eq!(json["questionIndex"], 3);
        assert_eq!(json["previousAnswers"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_active_page_wire_shape() {
        let app = AppState::default();
        let json = serde_json::to_value(&app).unwrap();

        assert_eq!(json["activePage"]["page"], "FactOrFiction");
        assert_eq!(json["activePage"]["state"]["kind"], "LoadedPage");
        assert!(json["claimsOpenGraphData"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_internal_page_id_accepts_both_spellings() {
        let plain: PageId = serde_json::from_str(r#""internal""#).unwrap();
        let prefixed: PageId = serde_json::from_str(r#"":internal""#).unwrap();
        assert_eq!(plain, PageId::Internal);
        assert_eq!(prefixed, PageId::Internal);
    }

    #[test]
    fn test_vote_eligibility_excludes_both_directions() {
        let state = HeadlinesState::Quiz {
            claims: Vec::new(),
            scores: Vec::new(),
            upvoted_stories: vec![1],
            downvoted_stories: vec![4],
        };

        assert!(!state.is_vote_eligible(1));
        assert!(!state.is_vote_eligible(4));
        assert!(state.is_vote_eligible(2));
    }

    #[test]
    fn test_debugging_info_ignores_legacy_kind_field() {
        let info: DebuggingInfo =
            serde_json::from_str(r#"{"kind":"DebuggingInfo","eventLog":["Noop"]}"#).unwrap();
        assert_eq!(info.event_log, vec!["Noop".to_string()]);
    }
}
