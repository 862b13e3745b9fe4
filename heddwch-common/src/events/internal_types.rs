//! Control messages on the internal channel
//!
//! Internal messages bypass the active-page check: they are always handled,
//! whatever page is currently loaded.

use serde::{Deserialize, Serialize};

use crate::claims::{ClaimsOpenGraphData, OpenGraph};
use crate::state::PageId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum InternalMessage {
    /// A renderer wants the current snapshot
    ReadyToRender,
    /// Replace the debug log wholesale
    ///
    /// Kept as raw JSON: it comes from external storage and is validated by
    /// the engine, which falls back to a plain rebroadcast if it is malformed.
    SetDebuggingInfo { info: serde_json::Value },
    Noop,
    /// Record preview metadata for a review URL (never rerenders)
    #[serde(rename_all = "camelCase")]
    AddOpenGraphData {
        review_url: String,
        open_graph_data: OpenGraph,
    },
    /// Record preview metadata for many review URLs at once (never rerenders)
    #[serde(rename_all = "camelCase")]
    MergeOpenGraphData {
        open_graph_data: ClaimsOpenGraphData,
    },
    /// Navigate: make `page` active with its initial state
    LoadPage { page: PageId },
    /// Restore the previous navigation history entry
    NavigateBack,
    /// Restore the next navigation history entry
    NavigateForward,
}

impl InternalMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            InternalMessage::ReadyToRender => "ReadyToRender",
            InternalMessage::SetDebuggingInfo { .. } => "SetDebuggingInfo",
            InternalMessage::Noop => "Noop",
            InternalMessage::AddOpenGraphData { .. } => "AddOpenGraphData",
            InternalMessage::MergeOpenGraphData { .. } => "MergeOpenGraphData",
            InternalMessage::LoadPage { .. } => "LoadPage",
            InternalMessage::NavigateBack => "NavigateBack",
            InternalMessage::NavigateForward => "NavigateForward",
        }
    }
}
