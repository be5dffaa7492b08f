//! Reusable small widgets used by the player screen.

use iced::widget::{button, column, container, image, row, slider, text};
use iced::{Alignment, Element, Length};

use super::super::sink::GuiView;
use super::super::state::Message;
use super::constants::{TIME_LABEL_W, TIME_TEXT, VOLUME_W};

pub(crate) fn cover_placeholder(size: f32) -> iced::widget::Container<'static, Message> {
    container(
        column![text("♪").size(48), text("no cover").size(12)]
            .spacing(4)
            .align_x(Alignment::Center),
    )
    .width(Length::Fixed(size))
    .height(Length::Fixed(size))
    .center_x(Length::Fixed(size))
    .center_y(Length::Fixed(size))
}

/// If `handle` exists, show it; otherwise show the placeholder.
pub(crate) fn cover_art(handle: Option<&image::Handle>, size: f32) -> Element<'static, Message> {
    match handle {
        Some(h) => container(image(h.clone()))
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .center_x(Length::Fixed(size))
            .center_y(Length::Fixed(size))
            .into(),
        None => cover_placeholder(size).into(),
    }
}

/// Current time, seek slider, total time.
///
/// The slider works in milliseconds; its range comes from the progress max
/// the controller pushed.
pub(crate) fn seek_row(v: &GuiView) -> iced::widget::Row<'_, Message> {
    // slider needs a sane range; with no known duration freeze it at 0..=1
    let (max, value) = if v.progress_max > 0 {
        (v.progress_max as f32, v.progress.min(v.progress_max) as f32)
    } else {
        (1.0, 0.0)
    };

    let seek = slider(0.0..=max, value, Message::SeekDragged)
        .on_release(Message::SeekReleased)
        .width(Length::Fill);

    row![
        text(v.current_time.as_str())
            .size(TIME_TEXT)
            .width(Length::Fixed(TIME_LABEL_W)),
        seek,
        text(v.total_time.as_str())
            .size(TIME_TEXT)
            .width(Length::Fixed(TIME_LABEL_W)),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
}

/// Prev / play-pause / next.
pub(crate) fn transport_row(playing: bool) -> iced::widget::Row<'static, Message> {
    let play_label = if playing { "Pause" } else { "Play" };

    row![
        button("⏮").on_press(Message::Prev),
        button(play_label).on_press(Message::TogglePlayPause),
        button("⏭").on_press(Message::Next),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
}

pub(crate) fn volume_row(percent: u8) -> iced::widget::Row<'static, Message> {
    let vol_slider = slider(0.0..=100.0, f32::from(percent), Message::VolumeChanged)
        .step(1.0)
        .width(Length::Fixed(VOLUME_W));

    row![text("Vol").size(TIME_TEXT), vol_slider, text(format!("{percent}%")).size(TIME_TEXT)]
        .spacing(8)
        .align_y(Alignment::Center)
}
