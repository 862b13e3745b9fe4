//! Headlines reducer
//!
//! Votes are recorded in the order they arrive and replace the current
//! navigation history entry; starting the quiz pushes a new one. Vote
//! eligibility (one vote per story) is checked by the renderer, not here.

use heddwch_common::events::HeadlinesMessage;
use heddwch_common::state::{ActivePage, HeadlinesState, StoryId};
use heddwch_common::Result;
use rand::Rng;
use std::ops::RangeInclusive;
use tracing::debug;

use super::{Effect, ReducerContext, UpdateResponse};
use crate::sampling::sample_claims;

/// Range of the fake story scores shown next to each headline
pub const SCORE_RANGE: RangeInclusive<u32> = 1..=500;

/// Initial state: sampled headline claims with random scores
pub async fn load(ctx: &mut ReducerContext<'_>) -> Result<HeadlinesState> {
    let fetched = ctx.feed.fetch_headline_claims().await.into_result()?;
    let claims = sample_claims(&fetched.credible, &fetched.not_credible, &mut *ctx.rng)?;
    let scores = claims
        .iter()
        .map(|_| ctx.rng.gen_range(SCORE_RANGE))
        .collect();

    debug!("Loaded {} headline claims", claims.len());
    Ok(HeadlinesState::LoadedPage { claims, scores })
}

pub fn update(
    message: HeadlinesMessage,
    state: HeadlinesState,
) -> UpdateResponse<HeadlinesState> {
    match message {
        HeadlinesMessage::Noop => UpdateResponse::do_not_rerender(state),
        HeadlinesMessage::UpvoteClicked { story } => vote(state, story.id, Vote::Up),
        HeadlinesMessage::DownvoteClicked { story } => vote(state, story.id, Vote::Down),
        HeadlinesMessage::BeginQuizClicked => {
            let (claims, scores) = match state {
                HeadlinesState::LoadedPage { claims, scores } => (claims, scores),
                HeadlinesState::Quiz { claims, scores, .. } => (claims, scores),
            };
            let quiz = HeadlinesState::Quiz {
                claims,
                scores,
                upvoted_stories: Vec::new(),
                downvoted_stories: Vec::new(),
            };
            UpdateResponse::rerender(quiz.clone())
                .with_effect(Effect::PushHistory(ActivePage::Headlines(quiz)))
        }
    }
}

enum Vote {
    Up,
    Down,
}

fn vote(state: HeadlinesState, story: StoryId, direction: Vote) -> UpdateResponse<HeadlinesState> {
    match state {
        HeadlinesState::Quiz {
            claims,
            scores,
            mut upvoted_stories,
            mut downvoted_stories,
        } => {
            match direction {
                Vote::Up => upvoted_stories.push(story),
                Vote::Down => downvoted_stories.push(story),
            }
            let quiz = HeadlinesState::Quiz {
                claims,
                scores,
                upvoted_stories,
                downvoted_stories,
            };
            UpdateResponse::rerender(quiz.clone())
                .with_effect(Effect::ReplaceHistory(ActivePage::Headlines(quiz)))
        }
        // Votes only count once the quiz has begun
        loaded => UpdateResponse::rerender(loaded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::InMemoryClaimFeed;
    use crate::reducers::test_support::Harness;
    use crate::reducers::RenderAction;
    use crate::sampling::tests::bucket;
    use crate::sampling::QUIZ_LENGTH;
    use heddwch_common::claims::{ClaimLabel, FetchedClaims};
    use heddwch_common::events::Story;

    fn headline_feed() -> InMemoryClaimFeed {
        InMemoryClaimFeed::new().with_headlines(FetchedClaims {
            credible: bucket(ClaimLabel::Credible, 12),
            not_credible: bucket(ClaimLabel::NotCredible, 12),
        })
    }

    fn quiz(upvoted: Vec<StoryId>, downvoted: Vec<StoryId>) -> HeadlinesState {
        HeadlinesState::Quiz {
            claims: bucket(ClaimLabel::Credible, QUIZ_LENGTH),
            scores: vec![1; QUIZ_LENGTH],
            upvoted_stories: upvoted,
            downvoted_stories: downvoted,
        }
    }

    #[tokio::test]
    async fn test_load_samples_claims_and_scores() {
        let mut harness = Harness::new(headline_feed());
        let state = load(&mut harness.ctx()).await.unwrap();

        match state {
            HeadlinesState::LoadedPage { claims, scores } => {
                assert_eq!(claims.len(), QUIZ_LENGTH);
                assert_eq!(scores.len(), claims.len());
                assert!(scores.iter().all(|s| SCORE_RANGE.contains(s)));
            }
            other => panic!("expected LoadedPage, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_without_headlines_fails() {
        let mut harness = Harness::new(InMemoryClaimFeed::new());
        assert!(load(&mut harness.ctx()).await.is_err());
    }

    #[test]
    fn test_begin_quiz_keeps_claims_and_pushes_history() {
        let loaded = HeadlinesState::LoadedPage {
            claims: bucket(ClaimLabel::Credible, QUIZ_LENGTH),
            scores: vec![1; QUIZ_LENGTH],
        };

        let response = update(HeadlinesMessage::BeginQuizClicked, loaded);

        assert_eq!(response.state, quiz(Vec::new(), Vec::new()));
        assert_eq!(response.render_action, RenderAction::Rerender);
        assert_eq!(
            response.effects,
            vec![Effect::PushHistory(ActivePage::Headlines(quiz(
                Vec::new(),
                Vec::new()
            )))]
        );
    }

    #[test]
    fn test_upvote_records_story_and_replaces_history() {
        let response = update(
            HeadlinesMessage::UpvoteClicked {
                story: Story::with_id(3),
            },
            quiz(Vec::new(), Vec::new()),
        );

        assert_eq!(response.state, quiz(vec![3], Vec::new()));
        assert_eq!(response.render_action, RenderAction::Rerender);
        assert_eq!(
            response.effects,
            vec![Effect::ReplaceHistory(ActivePage::Headlines(quiz(
                vec![3],
                Vec::new()
            )))]
        );
    }

    #[test]
    fn test_votes_keep_arrival_order() {
        let mut state = quiz(Vec::new(), Vec::new());
        for (id, up) in [(5, true), (1, false), (2, true), (7, false)] {
            let story = Story::with_id(id);
            let message = if up {
                HeadlinesMessage::UpvoteClicked { story }
            } else {
                HeadlinesMessage::DownvoteClicked { story }
            };
            state = update(message, state).state;
        }

        assert_eq!(state, quiz(vec![5, 2], vec![1, 7]));
        assert!(!state.is_vote_eligible(7));
        assert!(state.is_vote_eligible(0));
    }

    #[test]
    fn test_vote_before_quiz_changes_nothing() {
        let loaded = HeadlinesState::LoadedPage {
            claims: Vec::new(),
            scores: Vec::new(),
        };
        let response = update(
            HeadlinesMessage::DownvoteClicked {
                story: Story::with_id(0),
            },
            loaded.clone(),
        );

        assert_eq!(response.state, loaded);
        assert!(response.effects.is_empty());
    }

    #[test]
    fn test_noop_does_not_rerender() {
        let response = update(HeadlinesMessage::Noop, quiz(vec![1], Vec::new()));
        assert_eq!(response.state, quiz(vec![1], Vec::new()));
        assert_eq!(response.render_action, RenderAction::DoNotRerender);
    }
}
