//! gui/update/search.rs
//! Search box: every edit jumps to the first matching track.

use iced::Task;
use tracing::debug;

use super::super::state::{Message, Minim};

pub(crate) fn query_changed(state: &mut Minim, query: String) -> Task<Message> {
    state.query = query;

    let Some(player) = state.player.as_mut() else {
        return Task::none();
    };

    match player.filter_and_select(&state.query) {
        Ok(Some(i)) => debug!("[GUI] search {:?} -> track {i}", state.query),
        Ok(None) => {}
        Err(e) => debug!("[GUI] search {:?} failed: {e}", state.query),
    }
    Task::none()
}
