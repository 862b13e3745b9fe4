//! Page reducers
//!
//! One reducer per page. A reducer takes a message and the page-local state
//! and returns the replacement state, whether to rerender, and the effects
//! the engine should carry out on its behalf. Reducers never touch the
//! navigation history or the broadcast channel themselves.

pub mod fact_or_fiction;
pub mod headlines;
pub mod index;
pub mod social_media_post_reviewer;

use heddwch_common::config::FinalAnswerPolicy;
use heddwch_common::state::{
    ActivePage, FactOrFictionState, IndexState, PageId, SocialMediaPostReviewerState,
};
use heddwch_common::{Error, Result};
use rand::RngCore;

use crate::feed::ClaimFeed;

/// Whether a broadcast follows the state update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAction {
    Rerender,
    DoNotRerender,
}

/// Side effects requested by a reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Add a navigation history entry holding this page state
    PushHistory(ActivePage),
    /// Overwrite the current navigation history entry
    ReplaceHistory(ActivePage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResponse<S> {
    pub state: S,
    pub render_action: RenderAction,
    pub effects: Vec<Effect>,
}

impl<S> UpdateResponse<S> {
    pub fn rerender(state: S) -> Self {
        Self {
            state,
            render_action: RenderAction::Rerender,
            effects: Vec::new(),
        }
    }

    pub fn do_not_rerender(state: S) -> Self {
        Self {
            state,
            render_action: RenderAction::DoNotRerender,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Lift a page-local response into an `ActivePage` one
    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> UpdateResponse<T> {
        UpdateResponse {
            state: f(self.state),
            render_action: self.render_action,
            effects: self.effects,
        }
    }
}

/// Capabilities lent to reducers for one update
pub struct ReducerContext<'a> {
    pub feed: &'a dyn ClaimFeed,
    pub rng: &'a mut (dyn RngCore + Send),
    pub final_answer: FinalAnswerPolicy,
}

/// Fresh state for a page being navigated to
pub async fn initial_page(page: PageId, ctx: &mut ReducerContext<'_>) -> Result<ActivePage> {
    match page {
        PageId::Index => Ok(ActivePage::Index(IndexState::LoadedPage)),
        PageId::FactOrFiction => Ok(ActivePage::FactOrFiction(FactOrFictionState::LoadedPage)),
        PageId::Headlines => Ok(ActivePage::Headlines(headlines::load(ctx).await?)),
        PageId::SocialMediaPostReviewer => Ok(ActivePage::SocialMediaPostReviewer(
            SocialMediaPostReviewerState::LoadedPage,
        )),
        PageId::Internal => Err(Error::InvalidInput(
            "the internal channel is not a page".to_string(),
        )),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::feed::InMemoryClaimFeed;
    use rand::rngs::mock::StepRng;

    /// Context whose coin always lands on "credible"
    pub(crate) struct Harness {
        pub feed: InMemoryClaimFeed,
        pub rng: StepRng,
        pub final_answer: FinalAnswerPolicy,
    }

    impl Harness {
        pub(crate) fn new(feed: InMemoryClaimFeed) -> Self {
            Self {
                feed,
                rng: StepRng::new(0, 0),
                final_answer: FinalAnswerPolicy::Include,
            }
        }

        pub(crate) fn ctx(&mut self) -> ReducerContext<'_> {
            ReducerContext {
                feed: &self.feed,
                rng: &mut self.rng,
                final_answer: self.final_answer,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use crate::feed::InMemoryClaimFeed;

    #[tokio::test]
    async fn test_static_pages_start_loaded() {
        let mut harness = Harness::new(InMemoryClaimFeed::new());

        assert_eq!(
            initial_page(PageId::Index, &mut harness.ctx()).await.unwrap(),
            ActivePage::Index(IndexState::LoadedPage)
        );
        assert_eq!(
            initial_page(PageId::FactOrFiction, &mut harness.ctx())
                .await
                .unwrap(),
            ActivePage::FactOrFiction(FactOrFictionState::LoadedPage)
        );
        assert_eq!(harness.feed.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_internal_channel_is_not_navigable() {
        let mut harness = Harness::new(InMemoryClaimFeed::new());
        assert!(initial_page(PageId::Internal, &mut harness.ctx())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_headlines_page_without_data_fails() {
        let mut harness = Harness::new(InMemoryClaimFeed::new());
        assert!(initial_page(PageId::Headlines, &mut harness.ctx())
            .await
            .is_err());
    }
}
