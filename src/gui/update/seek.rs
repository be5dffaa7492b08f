//! gui/update/seek.rs
//! Seek bar drag handling.
//!
//! iced's slider reports every change and then a release, but has no
//! "drag started" event. The first change of a drag stands in for it.

use iced::Task;

use super::super::state::{Message, Minim};

pub(crate) fn seek_dragged(state: &mut Minim, position_ms: f32) -> Task<Message> {
    let Some(player) = state.player.as_mut() else {
        return Task::none();
    };

    if !state.seeking {
        state.seeking = true;
        player.on_seek_start();
    }

    player.seek(position_ms.round() as i64, true);
    Task::none()
}

pub(crate) fn seek_released(state: &mut Minim) -> Task<Message> {
    if !state.seeking {
        return Task::none();
    }
    state.seeking = false;

    if let Some(player) = state.player.as_mut() {
        player.on_seek_end();
    }
    Task::none()
}
