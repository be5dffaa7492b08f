//! Track list under the search box. Click a row to play it.

use iced::Length;
use iced::widget::{button, column, scrollable, text};

use super::super::state::{Message, Player};
use super::constants::{ROW_TEXT, TRACK_LIST_H, TRACK_LIST_SPACING};

pub(crate) fn build_track_list(player: &Player) -> iced::widget::Scrollable<'_, Message> {
    let current = player.current_index();

    let mut list = column![].spacing(TRACK_LIST_SPACING);
    for (i, track) in player.catalog().iter().enumerate() {
        let style = if current == Some(i) {
            button::primary
        } else {
            button::text
        };

        list = list.push(
            button(text(track.name.as_str()).size(ROW_TEXT))
                .on_press(Message::SelectTrack(i))
                .style(style)
                .width(Length::Fill),
        );
    }

    scrollable(list).height(Length::Fixed(TRACK_LIST_H))
}
