use heddwch_common::events::SocialMediaPostReviewerMessage;
use heddwch_common::state::SocialMediaPostReviewerState;

use super::UpdateResponse;

pub fn update(
    message: SocialMediaPostReviewerMessage,
    state: SocialMediaPostReviewerState,
) -> UpdateResponse<SocialMediaPostReviewerState> {
    match message {
        SocialMediaPostReviewerMessage::Noop => UpdateResponse::do_not_rerender(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducers::RenderAction;

    #[test]
    fn test_noop_does_not_rerender() {
        let response = update(
            SocialMediaPostReviewerMessage::Noop,
            SocialMediaPostReviewerState::LoadedPage,
        );
        assert_eq!(response.render_action, RenderAction::DoNotRerender);
    }
}
