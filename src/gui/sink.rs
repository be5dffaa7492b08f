//! gui/sink.rs
//! The controller's view of the screen.
//!
//! `GuiView` is what `PlayerController` writes into; `view/` reads it back
//! out when drawing. Nothing here touches widgets directly.

use iced::widget::image::Handle;
use tracing::debug;

use crate::core::controller::ViewSink;
use crate::core::tags::read_embedded_art;
use crate::core::types::CoverRef;

#[derive(Default)]
pub(crate) struct GuiView {
    pub progress_max: u64,
    pub progress: u64,
    pub current_time: String,
    pub total_time: String,
    pub title: String,
    pub cover: Option<Handle>,
    pub playing: bool,
    pub error: Option<String>,
}

impl ViewSink for GuiView {
    fn set_progress_max(&mut self, ms: u64) {
        self.progress_max = ms;
    }

    fn set_progress(&mut self, ms: u64) {
        self.progress = ms;
    }

    fn set_current_time_label(&mut self, text: &str) {
        self.current_time = text.to_string();
    }

    fn set_total_time_label(&mut self, text: &str) {
        self.total_time = text.to_string();
    }

    fn set_title(&mut self, text: &str) {
        // A new title means a load succeeded.
        self.error = None;
        self.title = text.to_string();
    }

    fn set_cover_image(&mut self, cover: Option<&CoverRef>) {
        self.cover = match cover {
            Some(CoverRef::File(path)) => Some(Handle::from_path(path)),
            Some(CoverRef::Embedded(path)) => match read_embedded_art(path) {
                Some((bytes, mime)) => {
                    debug!("Embedded cover ({mime}, {} bytes)", bytes.len());
                    Some(Handle::from_bytes(bytes))
                }
                None => None,
            },
            None => None,
        };
    }

    fn set_play_button_icon(&mut self, playing: bool) {
        self.playing = playing;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}
