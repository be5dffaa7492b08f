//! Filesystem discovery: audio files under a root, and cover images next to them.

use std::path::{Path, PathBuf};

use crate::error::CatalogError;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const FOLDER_COVER_STEM: &str = "cover";

/// Recursively collects supported audio files under `root`, sorted by path.
pub fn scan_audio_files(root: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut out = Vec::new();
    walk_dir(root, &mut out)?;
    out.sort();
    out.dedup();
    Ok(out)
}

fn walk_dir(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            walk_dir(&path, out)?;
        } else if has_extension(&path, AUDIO_EXTENSIONS) {
            out.push(path);
        }
    }

    Ok(())
}

/// Finds a cover image for `audio`:
/// 1. `<stem>.png|jpg|jpeg` next to the file
/// 2. `cover.png|jpg|jpeg` in the same folder
pub fn find_cover_image(audio: &Path) -> Option<PathBuf> {
    let dir = audio.parent()?;
    let stem = audio.file_stem()?.to_str()?;

    [stem, FOLDER_COVER_STEM]
        .iter()
        .flat_map(|s| IMAGE_EXTENSIONS.iter().map(move |ext| dir.join(format!("{s}.{ext}"))))
        .find(|candidate| candidate.is_file())
}

/// File name without extension, used when a track has no usable title tag.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown Title")
        .to_string()
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_finds_audio_recursively_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/two.FLAC"), b"").unwrap();
        fs::write(dir.path().join("one.mp3"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let found = scan_audio_files(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("b/two.FLAC"), dir.path().join("one.mp3")]
        );
    }

    #[test]
    fn scan_missing_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_audio_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn cover_prefers_same_stem_over_folder_cover() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("song.mp3");
        fs::write(&audio, b"").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"").unwrap();
        assert_eq!(find_cover_image(&audio), Some(dir.path().join("cover.jpg")));

        fs::write(dir.path().join("song.png"), b"").unwrap();
        assert_eq!(find_cover_image(&audio), Some(dir.path().join("song.png")));
    }

    #[test]
    fn no_cover_when_folder_has_no_images() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("song.mp3");
        fs::write(&audio, b"").unwrap();
        assert_eq!(find_cover_image(&audio), None);
    }
}
