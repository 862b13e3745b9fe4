//! Fact or fiction quiz reducer
//!
//! `LoadedPage → ChoosingATopic → QuizIntro → InQuiz → QuizOver`, with
//! `Restart` returning to `LoadedPage` from anywhere. Every transition
//! rerenders except a topic selection whose claims could not be loaded.

use heddwch_common::claims::{ClaimReview, Topic};
use heddwch_common::config::FinalAnswerPolicy;
use heddwch_common::events::FactOrFictionMessage;
use heddwch_common::state::FactOrFictionState;
use heddwch_common::Result;
use tracing::{debug, error};

use super::{ReducerContext, UpdateResponse};
use crate::sampling::sample_claims;

pub async fn update(
    message: FactOrFictionMessage,
    state: FactOrFictionState,
    ctx: &mut ReducerContext<'_>,
) -> UpdateResponse<FactOrFictionState> {
    match message {
        FactOrFictionMessage::BeginQuizClicked => {
            UpdateResponse::rerender(FactOrFictionState::ChoosingATopic)
        }
        FactOrFictionMessage::SelectedATopic { topic } => match load_quiz(topic, ctx).await {
            Ok(claims) => {
                debug!("Loaded {} claims for topic {}", claims.len(), topic);
                UpdateResponse::rerender(FactOrFictionState::QuizIntro { topic, claims })
            }
            Err(e) => {
                error!("Could not start the {} quiz: {}", topic, e);
                UpdateResponse::do_not_rerender(state)
            }
        },
        FactOrFictionMessage::ClickedTrue { .. } => {
            UpdateResponse::rerender(record_answer(state, true))
        }
        FactOrFictionMessage::ClickedFalse { .. } => {
            UpdateResponse::rerender(record_answer(state, false))
        }
        FactOrFictionMessage::ContinueButtonClicked { answer } => {
            UpdateResponse::rerender(continue_quiz(state, answer, ctx.final_answer))
        }
        FactOrFictionMessage::Restart => UpdateResponse::rerender(FactOrFictionState::LoadedPage),
    }
}

async fn load_quiz(topic: Topic, ctx: &mut ReducerContext<'_>) -> Result<Vec<ClaimReview>> {
    let fetched = ctx.feed.fetch_topic_claims(topic).await.into_result()?;
    sample_claims(&fetched.credible, &fetched.not_credible, &mut *ctx.rng)
}

/// Legacy answer path: append without moving to the next question
fn record_answer(state: FactOrFictionState, answer: bool) -> FactOrFictionState {
    match state {
        FactOrFictionState::InQuiz {
            topic,
            claims,
            question_index,
            mut previous_answers,
        } => {
            previous_answers.push(answer);
            FactOrFictionState::InQuiz {
                topic,
                claims,
                question_index,
                previous_answers,
            }
        }
        other => other,
    }
}

fn continue_quiz(
    state: FactOrFictionState,
    answer: bool,
    policy: FinalAnswerPolicy,
) -> FactOrFictionState {
    match state {
        FactOrFictionState::QuizIntro { topic, claims } => FactOrFictionState::InQuiz {
            topic,
            claims,
            question_index: 0,
            previous_answers: Vec::new(),
        },
        FactOrFictionState::InQuiz {
            topic,
            claims,
            question_index,
            mut previous_answers,
        } => {
            if question_index + 1 >= claims.len() {
                if policy == FinalAnswerPolicy::Include {
                    previous_answers.push(answer);
                }
                FactOrFictionState::QuizOver {
                    topic,
                    claims,
                    answers: previous_answers,
                }
            } else {
                previous_answers.push(answer);
                FactOrFictionState::InQuiz {
                    topic,
                    claims,
                    question_index: question_index + 1,
                    previous_answers,
                }
            }
        }
        // Nothing to continue from: LoadedPage, ChoosingATopic, QuizOver
        other => other,
    }
}
