//! gui/update/playback.rs
//! GUI -> player bridge for transport buttons, volume and the pump.
//!
//! - GUI never touches rodio directly; it only calls the controller.
//! - Load failures are already on screen (the controller told the view),
//!   so here they are only logged.

use std::time::Instant;

use iced::Task;
use tracing::debug;

use super::super::state::{Message, Minim};
use crate::error::PlayerError;

pub(crate) fn tick(state: &mut Minim, now: Instant) -> Task<Message> {
    if let Some(player) = state.player.as_mut() {
        player.poll(now);
    }
    Task::none()
}

pub(crate) fn toggle_play_pause(state: &mut Minim) -> Task<Message> {
    if let Some(player) = state.player.as_mut() {
        let now = player.toggle_play_pause();
        debug!("[GUI] play/pause -> {now:?}");
    }
    Task::none()
}

pub(crate) fn next(state: &mut Minim) -> Task<Message> {
    if let Some(player) = state.player.as_mut() {
        log_outcome("next", player.next());
    }
    Task::none()
}

pub(crate) fn prev(state: &mut Minim) -> Task<Message> {
    if let Some(player) = state.player.as_mut() {
        log_outcome("previous", player.previous());
    }
    Task::none()
}

pub(crate) fn select_track(state: &mut Minim, index: usize) -> Task<Message> {
    if let Some(player) = state.player.as_mut() {
        log_outcome("select", player.select_track(index));
    }
    Task::none()
}

/// Volume slider runs 0..=100.
pub(crate) fn set_volume(state: &mut Minim, value: f32) -> Task<Message> {
    if let Some(player) = state.player.as_mut() {
        player.set_volume(value.round().clamp(0.0, 100.0) as u8);
    }
    Task::none()
}

pub(super) fn log_outcome(op: &str, result: Result<(), PlayerError>) {
    if let Err(e) = result {
        debug!("[GUI] {op} failed: {e}");
    }
}
