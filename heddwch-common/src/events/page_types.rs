//! Messages for the pages without their own interaction model yet

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum IndexMessage {
    Noop,
}

impl IndexMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            IndexMessage::Noop => "Noop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SocialMediaPostReviewerMessage {
    Noop,
}

impl SocialMediaPostReviewerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            SocialMediaPostReviewerMessage::Noop => "Noop",
        }
    }
}
