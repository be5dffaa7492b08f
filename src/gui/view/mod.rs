//! GUI renderer (reads state, produces widgets; no mutation).
//!
//! One screen, top to bottom:
//! cover, title, seek row, transport, volume, search, track list.

mod constants;
mod tracks;
mod widgets;

use iced::widget::{column, container, text, text_input};
use iced::{Alignment, Element, Length};

use super::state::{Message, Minim};
use crate::core::controller::PlayerState;
use constants::{COVER_BIG, TITLE_TEXT};

pub(crate) use constants::{WINDOW_H, WINDOW_W};

pub(crate) fn view(state: &Minim) -> Element<'_, Message> {
    let Some(player) = state.player.as_ref() else {
        return container(text(state.status.as_str()))
            .padding(24)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    };

    let v = player.view();

    let status = match (v.error.as_deref(), player.state()) {
        (Some(err), _) => err,
        (None, PlayerState::Stopped) if state.status.is_empty() => "Stopped",
        (None, _) => state.status.as_str(),
    };

    let search = text_input("Search tracks", &state.query)
        .on_input(Message::QueryChanged)
        .width(Length::Fill);

    column![
        widgets::cover_art(v.cover.as_ref(), COVER_BIG),
        text(v.title.as_str()).size(TITLE_TEXT),
        widgets::seek_row(v),
        widgets::transport_row(v.playing),
        widgets::volume_row(player.volume_percent()),
        search,
        tracks::build_track_list(player),
        text(status).size(12),
    ]
    .spacing(12)
    .padding(16)
    .align_x(Alignment::Center)
    .into()
}
