//! core/playback/mod.rs
//! Playback seams between the controller and whatever actually makes sound.
//!
//! - `PlaybackBackend` turns a `Track` into a loaded engine.
//! - `PlaybackEngine` is ONE loaded media resource (one track).
//!
//! The controller only talks to these traits, so tests can swap in fakes and
//! the rodio implementation stays out of the state machine.

mod probe;
mod rodio_engine;

pub use rodio_engine::RodioBackend;

use crate::core::types::Track;
use crate::error::LoadError;

/// Called by an engine when its track plays through to the end.
///
/// Must be `Send`: some engines notice end-of-stream on an audio thread.
pub type CompletionHandler = Box<dyn Fn() + Send + 'static>;

pub trait PlaybackBackend {
    type Engine: PlaybackEngine;

    /// Opens `track` and returns an engine positioned at 0, paused.
    fn load(&mut self, track: &Track) -> Result<Self::Engine, LoadError>;
}

pub trait PlaybackEngine {
    fn start(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, position_ms: u64);

    /// Per-channel gain, 0.0..=1.0.
    fn set_volume(&mut self, left: f32, right: f32);

    fn duration_ms(&self) -> u64;
    fn position_ms(&self) -> u64;
    fn is_playing(&self) -> bool;

    /// Registers the end-of-track handler. Replaces any earlier one.
    fn on_completion(&mut self, handler: CompletionHandler);

    /// Gives polling engines a chance to notice end-of-track.
    fn poll(&mut self) {}

    /// Stops output and frees the underlying resource.
    fn release(self);
}
