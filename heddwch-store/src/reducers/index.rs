//! Index page reducer

use heddwch_common::events::IndexMessage;
use heddwch_common::state::IndexState;

use super::UpdateResponse;

pub fn update(message: IndexMessage, state: IndexState) -> UpdateResponse<IndexState> {
    match message {
        IndexMessage::Noop => UpdateResponse::do_not_rerender(state),
    }
}
