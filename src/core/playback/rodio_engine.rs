//! core/playback/rodio_engine.rs
//! Rodio-backed playback.
//!
//! Owns:
//! - OutputStream (on its own parked thread, must stay alive)
//! - one Sink per loaded track
//!
//! No Iced imports.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStreamBuilder, Sink, Source};
use tracing::{debug, info, warn};

use super::probe::probe_duration_ms;
use super::{CompletionHandler, PlaybackBackend, PlaybackEngine};
use crate::core::types::Track;
use crate::error::LoadError;

/// Opens the default output device and hands out one engine per track.
pub struct RodioBackend {
    mixer: Mixer,
    // Dropping this wakes the output thread, which then drops the stream.
    _keepalive: mpsc::Sender<()>,
}

impl RodioBackend {
    pub fn open() -> Result<Self, LoadError> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<Mixer, String>>();
        let (keepalive_tx, keepalive_rx) = mpsc::channel::<()>();

        thread::Builder::new()
            .name("audio-output".into())
            .spawn(move || {
                // rodio 0.21.x: build/open the default output stream via OutputStreamBuilder
                let stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(s) => s,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };

                let _ = ready_tx.send(Ok(stream.mixer().clone()));

                // Park until the backend goes away.
                let _ = keepalive_rx.recv();
                drop(stream);
            })
            .map_err(|e| LoadError::Output(format!("failed to spawn output thread: {e}")))?;

        let mixer = ready_rx
            .recv()
            .map_err(|_| LoadError::Output("output thread exited early".into()))?
            .map_err(LoadError::Output)?;

        info!("Audio output opened");

        Ok(Self {
            mixer,
            _keepalive: keepalive_tx,
        })
    }
}

impl PlaybackBackend for RodioBackend {
    type Engine = RodioEngine;

    fn load(&mut self, track: &Track) -> Result<RodioEngine, LoadError> {
        let path = track.audio.clone();

        let file = File::open(&path).map_err(|source| LoadError::Open {
            path: path.clone(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| LoadError::Decode {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let duration_ms = match decoder.total_duration() {
            Some(d) => d.as_millis() as u64,
            None => match probe_duration_ms(&path) {
                Ok(Some(ms)) => ms,
                Ok(None) => {
                    warn!("No duration for {}; seek bar disabled", path.display());
                    0
                }
                Err(e) => {
                    warn!("Duration probe failed: {e}");
                    0
                }
            },
        };

        // rodio 0.21.x: Sink is created from the stream's mixer
        let sink = Sink::connect_new(&self.mixer);
        sink.pause();
        sink.append(decoder);

        debug!("Loaded {} ({duration_ms} ms)", path.display());

        Ok(RodioEngine {
            sink,
            path,
            duration_ms,
            started: false,
            completed: false,
            on_complete: None,
        })
    }
}

/// One loaded track on one sink.
pub struct RodioEngine {
    sink: Sink,
    path: PathBuf,
    duration_ms: u64,

    // End-of-track only counts once playback was actually started.
    started: bool,
    completed: bool,
    on_complete: Option<CompletionHandler>,
}

impl PlaybackEngine for RodioEngine {
    fn start(&mut self) {
        self.started = true;
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn seek_to(&mut self, position_ms: u64) {
        if let Err(e) = self.sink.try_seek(Duration::from_millis(position_ms)) {
            warn!(
                "Seek to {position_ms} ms failed in {}: {e}",
                self.path.display()
            );
        }
    }

    fn set_volume(&mut self, left: f32, right: f32) {
        // A sink has a single gain; use the louder channel.
        self.sink.set_volume(left.max(right).clamp(0.0, 1.0));
    }

    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    fn position_ms(&self) -> u64 {
        self.sink.get_pos().as_millis() as u64
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    fn on_completion(&mut self, handler: CompletionHandler) {
        self.on_complete = Some(handler);
    }

    fn poll(&mut self) {
        if self.started && !self.completed && self.sink.empty() {
            self.completed = true;
            debug!("Reached end of {}", self.path.display());
            if let Some(handler) = &self.on_complete {
                handler();
            }
        }
    }

    fn release(self) {
        self.sink.stop();
        debug!("Released {}", self.path.display());
    }
}
