//! Error types.
//!
//! One enum per layer so callers can tell "the file is broken" apart from
//! "the player was asked to do something impossible".

use std::path::PathBuf;

use thiserror::Error;

/// A track could not be turned into a playable engine.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("audio output unavailable: {0}")]
    Output(String),
}

/// Reading a track's length from its container headers failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognised format in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error("no supported audio track in {0}")]
    NoTrack(PathBuf),
}

/// Transport errors surfaced by the controller.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("catalog is empty")]
    EmptyCatalog,

    #[error("track index {index} out of range (catalog has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Building the catalog failed.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("audio file not found: {0}")]
    MissingAudio(PathBuf),
}

/// Reading the config file failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
