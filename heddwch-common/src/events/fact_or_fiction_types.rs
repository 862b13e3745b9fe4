//! Messages addressed to the fact or fiction quiz page

use serde::{Deserialize, Serialize};

use crate::claims::{SocialMediaClaimReview, Topic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FactOrFictionMessage {
    SelectedATopic { topic: Topic },
    BeginQuizClicked,
    /// Legacy answer path, superseded by `ContinueButtonClicked`
    ClickedTrue { claim: SocialMediaClaimReview },
    /// Legacy answer path, superseded by `ContinueButtonClicked`
    ClickedFalse { claim: SocialMediaClaimReview },
    ContinueButtonClicked { answer: bool },
    Restart,
}

impl FactOrFictionMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            FactOrFictionMessage::SelectedATopic { .. } => "SelectedATopic",
            FactOrFictionMessage::BeginQuizClicked => "BeginQuizClicked",
            FactOrFictionMessage::ClickedTrue { .. } => "ClickedTrue",
            FactOrFictionMessage::ClickedFalse { .. } => "ClickedFalse",
            FactOrFictionMessage::ContinueButtonClicked { .. } => "ContinueButtonClicked",
            FactOrFictionMessage::Restart => "Restart",
        }
    }
}
