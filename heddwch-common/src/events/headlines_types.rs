//! Messages addressed to the headlines page

use serde::{Deserialize, Serialize};

use crate::state::StoryId;

/// Story as rendered on the headlines page; only `id` matters to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: u32,
}

impl Story {
    pub fn with_id(id: StoryId) -> Self {
        Self {
            id,
            title: String::new(),
            url: String::new(),
            score: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum HeadlinesMessage {
    Noop,
    UpvoteClicked { story: Story },
    DownvoteClicked { story: Story },
    BeginQuizClicked,
}

impl HeadlinesMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            HeadlinesMessage::Noop => "Noop",
            HeadlinesMessage::UpvoteClicked { .. } => "UpvoteClicked",
            HeadlinesMessage::DownvoteClicked { .. } => "DownvoteClicked",
            HeadlinesMessage::BeginQuizClicked => "BeginQuizClicked",
        }
    }
}
