//! GUI state + messages.
//! Pure data definitions used by update/ + view/.

use std::time::Instant;

use tracing::error;

use super::sink::GuiView;
use crate::core::catalog::Catalog;
use crate::core::controller::{ControllerOptions, PlayerController};
use crate::core::playback::RodioBackend;

pub(crate) type Player = PlayerController<RodioBackend, GuiView>;

/// App state
pub(crate) struct Minim {
    /// None if the audio device could not be opened.
    pub player: Option<Player>,

    /// Startup problems that happen before a player exists.
    pub status: String,

    /// Search box text.
    pub query: String,

    /// True between the first slider change of a drag and its release.
    pub seeking: bool,
}

impl Minim {
    pub(crate) fn boot(catalog: Catalog, options: ControllerOptions) -> Self {
        let (player, status) = match RodioBackend::open() {
            Ok(backend) => {
                let player = PlayerController::init(catalog, backend, GuiView::default(), options);
                let status = if player.catalog().is_empty() {
                    "No tracks found.".to_string()
                } else {
                    String::new()
                };
                (Some(player), status)
            }
            Err(e) => {
                error!("Playback unavailable: {e}");
                (None, format!("Playback unavailable: {e}"))
            }
        };

        Self {
            player,
            status,
            query: String::new(),
            seeking: false,
        }
    }
}

impl Drop for Minim {
    fn drop(&mut self) {
        if let Some(player) = self.player.take() {
            player.teardown();
        }
    }
}

/// Message = “something happened”.
#[derive(Debug, Clone)]
pub(crate) enum Message {
    /// Periodic pump: refresh timer + end-of-track detection.
    Tick(Instant),

    // Transport
    TogglePlayPause,
    Next,
    Prev,
    SelectTrack(usize),

    // Seek bar: every change while dragging, then release
    SeekDragged(f32),
    SeekReleased,

    VolumeChanged(f32),

    // Search box
    QueryChanged(String),
}
