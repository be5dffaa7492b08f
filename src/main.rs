//! Minim
//!
//! # What this program is
//! A single-screen desktop audio player (built with `iced`): cover art, title,
//! seek bar, previous / play-pause / next, volume, and a search box that
//! jumps to the first track whose name matches.
//!
//! # How it fits together
//! - `core::catalog` builds the fixed track list once at startup, from a TOML
//!   manifest or by scanning a music folder.
//! - `core::controller::PlayerController` is the player state machine. It
//!   owns the one live playback session and the position-refresh timer.
//! - `core::playback` is the engine seam; `RodioBackend` is the real one.
//! - `gui` is Iced: Message -> update -> view, with a periodic Tick that
//!   pumps the controller.
//!
//! # Concurrency model
//! Everything the player does happens on the GUI thread, in `update()`.
//! The only other thread owns the audio output stream and never touches
//! player state.

mod config;
mod core;
mod error;
mod gui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{CatalogSource, Config, DEFAULT_CONFIG_FILE};
use crate::core::catalog::Catalog;

/// Command-line arguments. Anything given here overrides the config file.
#[derive(Parser, Debug)]
#[command(name = "minim")]
#[command(about = "Minimal single-screen audio player")]
#[command(version)]
struct Args {
    /// Config file (default: ./minim.toml if present)
    #[arg(short, long, env = "MINIM_CONFIG")]
    config: Option<PathBuf>,

    /// TOML track manifest
    #[arg(short, long, conflicts_with = "library")]
    manifest: Option<PathBuf>,

    /// Music folder to scan
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Startup volume (0-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: Option<u8>,

    /// Position refresh interval in milliseconds (1-60000)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=60_000))]
    refresh_ms: Option<u64>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(m) = &self.manifest {
            config.manifest = Some(m.clone());
            config.library = None;
        }
        if let Some(l) = &self.library {
            config.library = Some(l.clone());
            config.manifest = None;
        }
        if let Some(v) = self.volume {
            config.volume = v;
        }
        if let Some(ms) = self.refresh_ms {
            config.refresh_interval_ms = ms;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config_path, required) = match &args.config {
        Some(p) => (p.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let mut config = Config::load(&config_path, required)?;
    args.apply(&mut config);

    // Initialize tracing: RUST_LOG wins over the config file.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = match config.catalog_source() {
        CatalogSource::Manifest(path) => Catalog::from_manifest(&path)
            .with_context(|| format!("Failed to load manifest {}", path.display()))?,
        CatalogSource::Library(dir) => Catalog::scan_dir(&dir)
            .with_context(|| format!("Failed to scan music folder {}", dir.display()))?,
    };
    let options = config.controller_options();

    info!(
        "Starting with {} tracks, volume {}%, refresh every {:?}",
        catalog.len(),
        options.volume_percent,
        options.refresh_interval
    );

    iced::application(
        move || gui::Minim::boot(catalog.clone(), options),
        gui::update,
        gui::view,
    )
    .title("Minim")
    .subscription(gui::subscription)
    .window_size((gui::WINDOW_W, gui::WINDOW_H))
    .run()?;

    Ok(())
}
