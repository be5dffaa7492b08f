//! gui/update/mod.rs
//! Update logic (router).
//! Mutates state in response to `Message` events.

use iced::Task;

use super::state::{Message, Minim};

mod playback;
mod search;
mod seek;

pub(crate) fn update(state: &mut Minim, message: Message) -> Task<Message> {
    match message {
        Message::Tick(now) => playback::tick(state, now),

        // Transport
        Message::TogglePlayPause => playback::toggle_play_pause(state),
        Message::Next => playback::next(state),
        Message::Prev => playback::prev(state),
        Message::SelectTrack(i) => playback::select_track(state, i),

        // Seek: drag vs release
        Message::SeekDragged(ms) => seek::seek_dragged(state, ms),
        Message::SeekReleased => seek::seek_released(state),

        Message::VolumeChanged(v) => playback::set_volume(state, v),

        // Search
        Message::QueryChanged(q) => search::query_changed(state, q),
    }
}
