//! The catalog: a fixed, ordered list of tracks built once at startup.
//!
//! Two ways to build one:
//! - a TOML manifest listing tracks explicitly (order = file order)
//! - scanning a music folder (order = sorted path)
//!
//! Either way the result is immutable for the life of the process.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use super::library;
use super::tags;
use super::types::{CoverRef, Track};
use crate::error::CatalogError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

/// On-disk manifest shape.
///
/// ```toml
/// [[track]]
/// name = "Umyttynba"
/// audio = "sample_audio.mp3"
/// cover = "cover1.png"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default, rename = "track")]
    tracks: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    audio: PathBuf,
    name: Option<String>,
    cover: Option<PathBuf>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Index after `index`, wrapping to 0 past the end.
    /// Returns None on an empty catalog.
    pub fn wrap_next(&self, index: usize) -> Option<usize> {
        let n = self.tracks.len();
        (n > 0).then(|| (index % n + 1) % n)
    }

    /// Index before `index`, wrapping to the last track before 0.
    pub fn wrap_prev(&self, index: usize) -> Option<usize> {
        let n = self.tracks.len();
        (n > 0).then(|| (index % n + n - 1) % n)
    }

    /// First track (in catalog order) whose name contains `query`,
    /// ignoring case.
    pub fn find_first(&self, query: &str) -> Option<usize> {
        let needle = query.to_lowercase();
        self.tracks
            .iter()
            .position(|t| t.name.to_lowercase().contains(&needle))
    }

    /// Builds a catalog from a TOML manifest. Relative paths resolve against
    /// the manifest's own directory.
    pub fn from_manifest(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse_manifest(&text, path)?;

        info!(
            "Loaded {} tracks from manifest {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn parse_manifest(text: &str, path: &Path) -> Result<Self, CatalogError> {
        let manifest: Manifest =
            toml::from_str(text).map_err(|source| CatalogError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut tracks = Vec::with_capacity(manifest.tracks.len());
        for entry in manifest.tracks {
            let audio = base.join(&entry.audio);
            if !audio.is_file() {
                return Err(CatalogError::MissingAudio(audio));
            }

            let cover = match entry.cover {
                Some(c) => Some(CoverRef::File(base.join(c))),
                None => discover_cover(&audio),
            };
            let name = entry
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| display_name(&audio));

            tracks.push(Track::new(audio, cover, name));
        }

        Ok(Self::new(tracks))
    }

    /// Builds a catalog by walking `root` for audio files.
    pub fn scan_dir(root: &Path) -> Result<Self, CatalogError> {
        let paths = library::scan_audio_files(root)?;

        let tracks: Vec<Track> = paths
            .into_iter()
            .map(|audio| {
                let cover = discover_cover(&audio);
                let name = display_name(&audio);
                debug!("Catalog entry {name:?} <- {}", audio.display());
                Track::new(audio, cover, name)
            })
            .collect();

        info!("Scanned {} tracks under {}", tracks.len(), root.display());
        Ok(Self::new(tracks))
    }
}

fn display_name(audio: &Path) -> String {
    tags::read_title(audio).unwrap_or_else(|| library::file_stem(audio))
}

fn discover_cover(audio: &Path) -> Option<CoverRef> {
    if let Some(image) = library::find_cover_image(audio) {
        return Some(CoverRef::File(image));
    }
    tags::has_embedded_art(audio).then(|| CoverRef::Embedded(audio.to_path_buf()))
}
