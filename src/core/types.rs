//! Core data types shared between the controller, the catalog and the UI.
//!
//! Rule of thumb:
//! - These structs are boring bags of data
//! - No GUI code
//! - No audio code
//!
//! `Track` represents ONE playable item: the audio file, where its cover art
//! lives, and the name we show for it.

use std::path::PathBuf;

/// Where a track's cover art comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverRef {
    /// A standalone image file (png/jpg) next to the audio.
    File(PathBuf),
    /// The first picture frame in the audio file's ID3 tag.
    Embedded(PathBuf),
}

/// One entry in the catalog. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Full path of the audio file on disk.
    pub audio: PathBuf,

    /// Cover art, if we found any.
    pub cover: Option<CoverRef>,

    /// Name shown in the title label and matched by the search box.
    pub name: String,
}

impl Track {
    pub fn new(audio: impl Into<PathBuf>, cover: Option<CoverRef>, name: impl Into<String>) -> Self {
        Self {
            audio: audio.into(),
            cover,
            name: name.into(),
        }
    }
}

/// Identity of one loaded playback session.
///
/// Every `select_track` mints a fresh id, so anything tagged with an old id
/// (refresh timers, completion notices) can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
