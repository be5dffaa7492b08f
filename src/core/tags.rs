//! ID3 helpers: display title and embedded cover art.
//!
//! Tag reading never fails hard. A file with a broken or missing tag simply
//! has no title and no art, and the caller falls back to the file name.

use std::path::Path;

use id3::frame::Content;
use id3::{Tag, TagLike};

/// The TIT2 title, trimmed, if the file has a readable non-empty one.
pub fn read_title(path: &Path) -> Option<String> {
    let tag = Tag::read_from_path(path).ok()?;
    tag.title()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

/// True if the tag carries at least one picture frame.
pub fn has_embedded_art(path: &Path) -> bool {
    Tag::read_from_path(path)
        .map(|tag| tag.pictures().next().is_some())
        .unwrap_or(false)
}

/// Returns (image_bytes, mime) for the first embedded picture (APIC/PIC).
pub fn read_embedded_art(path: &Path) -> Option<(Vec<u8>, String)> {
    let tag = Tag::read_from_path(path).ok()?;

    tag.frames()
        .filter(|f| f.id() == "APIC" || f.id() == "PIC")
        .find_map(|f| match f.content() {
            Content::Picture(p) => Some((p.data.clone(), p.mime_type.clone())),
            _ => None,
        })
}
