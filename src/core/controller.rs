//! core/controller.rs
//! The player state machine.
//!
//! `PlayerController` owns the catalog, the one live playback session, and
//! the position-refresh timer. Host UI events call in; the controller calls
//! out to a `PlaybackBackend`/`PlaybackEngine` and a `ViewSink`.
//!
//! States:
//! - Stopped: no session (empty catalog, or the last load failed)
//! - Paused / Playing: a session is loaded; the engine decides which
//!
//! Everything runs on the caller's thread. The refresh "timer" is just a
//! deadline that `poll(now)` checks, so it can never race a UI mutation.
//! Timers and completion notices are tagged with a `SessionId`; anything
//! tagged with a released session is dropped instead of acted on.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use super::catalog::Catalog;
use super::playback::{PlaybackBackend, PlaybackEngine};
use super::time::format_time;
use super::types::{CoverRef, SessionId, Track};
use crate::error::PlayerError;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(1000);
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// What the controller pushes to the UI.
pub trait ViewSink {
    fn set_progress_max(&mut self, ms: u64);
    fn set_progress(&mut self, ms: u64);
    fn set_current_time_label(&mut self, text: &str);
    fn set_total_time_label(&mut self, text: &str);
    fn set_title(&mut self, text: &str);
    fn set_cover_image(&mut self, cover: Option<&CoverRef>);
    /// `playing == true` means the button should offer "pause".
    fn set_play_button_icon(&mut self, playing: bool);
    fn show_error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped,
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub refresh_interval: Duration,
    /// Initial volume, 0..=100.
    pub volume_percent: u8,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            volume_percent: 100,
        }
    }
}

struct Session<E> {
    id: SessionId,
    index: usize,
    engine: E,
    duration_ms: u64,
}

#[derive(Debug, Clone, Copy)]
struct RefreshTimer {
    session: SessionId,
    due: Instant,
}

pub struct PlayerController<B: PlaybackBackend, V: ViewSink> {
    catalog: Catalog,
    backend: B,
    view: V,
    refresh_interval: Duration,
    volume_percent: u8,

    session: Option<Session<B::Engine>>,
    refresh: Option<RefreshTimer>,

    // Index of the last load attempt. Navigation continues from here when a
    // load failed and no session is live.
    cursor: Option<usize>,
    next_session_id: u64,

    completion_tx: Sender<SessionId>,
    completion_rx: Receiver<SessionId>,
}

impl<B: PlaybackBackend, V: ViewSink> PlayerController<B, V> {
    /// Builds the controller and starts the first track, if there is one.
    pub fn init(catalog: Catalog, backend: B, view: V, options: ControllerOptions) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel();

        let mut controller = Self {
            catalog,
            backend,
            view,
            refresh_interval: options
                .refresh_interval
                .clamp(Duration::from_millis(1), MAX_REFRESH_INTERVAL),
            volume_percent: options.volume_percent.min(100),
            session: None,
            refresh: None,
            cursor: None,
            next_session_id: 0,
            completion_tx,
            completion_rx,
        };

        if controller.catalog.is_empty() {
            warn!("Catalog is empty; player stays stopped");
            controller.view.set_play_button_icon(false);
        } else if let Err(e) = controller.select_track(0) {
            // Already reported to the view by select_track.
            warn!("Initial track failed to load: {e}");
        }

        controller
    }

    /// Releases the live session. The controller is gone afterwards.
    pub fn teardown(mut self) {
        self.release_session();
        info!("Player torn down");
    }

    // ---------------------------------------------------------------------
    // Read-only accessors
    // ---------------------------------------------------------------------

    pub fn state(&self) -> PlayerState {
        match &self.session {
            None => PlayerState::Stopped,
            Some(s) if s.engine.is_playing() => PlayerState::Playing,
            Some(_) => PlayerState::Paused,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.index)
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_index().and_then(|i| self.catalog.get(i))
    }

    /// Length of the loaded track; 0 when the engine couldn't tell.
    pub fn duration_ms(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.duration_ms)
    }

    pub fn position_ms(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.engine.position_ms())
    }

    pub fn volume_percent(&self) -> u8 {
        self.volume_percent
    }

    pub fn refresh_armed(&self) -> bool {
        self.refresh.is_some()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    // ---------------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------------

    /// Replaces the current session with a fresh one on `catalog[index]` and
    /// starts it.
    pub fn select_track(&mut self, index: usize) -> Result<(), PlayerError> {
        let len = self.catalog.len();
        if len == 0 {
            return Err(PlayerError::EmptyCatalog);
        }
        if index >= len {
            return Err(PlayerError::IndexOutOfRange { index, len });
        }

        // The old engine goes first: never two live engines.
        self.release_session();
        self.cursor = Some(index);

        let Some(track) = self.catalog.get(index).cloned() else {
            return Err(PlayerError::IndexOutOfRange { index, len });
        };

        let mut engine = match self.backend.load(&track) {
            Ok(engine) => engine,
            Err(e) => {
                error!("Failed to load {:?}: {e}", track.name);
                self.view
                    .show_error(&format!("Could not load \"{}\": {e}", track.name));
                self.view.set_play_button_icon(false);
                return Err(e.into());
            }
        };

        let id = SessionId(self.next_session_id);
        self.next_session_id += 1;

        let tx = self.completion_tx.clone();
        engine.on_completion(Box::new(move || {
            let _ = tx.send(id);
        }));

        let g = gain(self.volume_percent);
        engine.set_volume(g, g);

        let duration_ms = engine.duration_ms();
        self.view.set_title(&track.name);
        self.view.set_cover_image(track.cover.as_ref());
        self.view.set_total_time_label(&format_time(duration_ms));
        self.view.set_progress_max(duration_ms);
        self.view.set_progress(0);
        self.view.set_current_time_label(&format_time(0));

        engine.start();
        self.view.set_play_button_icon(true);

        self.session = Some(Session {
            id,
            index,
            engine,
            duration_ms,
        });
        self.arm_refresh(Instant::now());

        info!(
            "Session {id}: playing {:?} ({}/{len}, {})",
            track.name,
            index + 1,
            format_time(duration_ms)
        );
        Ok(())
    }

    /// Playing -> Paused or Paused -> Playing. Does nothing when Stopped.
    pub fn toggle_play_pause(&mut self) -> PlayerState {
        let Some(session) = self.session.as_mut() else {
            debug!("Play/pause ignored: nothing loaded");
            return PlayerState::Stopped;
        };

        if session.engine.is_playing() {
            session.engine.pause();
            self.refresh = None;
            self.view.set_play_button_icon(false);
            debug!("Session {}: paused", session.id);
            PlayerState::Paused
        } else {
            session.engine.start();
            let id = session.id;
            self.view.set_play_button_icon(true);
            self.arm_refresh(Instant::now());
            debug!("Session {id}: resumed");
            PlayerState::Playing
        }
    }

    pub fn next(&mut self) -> Result<(), PlayerError> {
        let target = self
            .anchor()
            .and_then(|i| self.catalog.wrap_next(i))
            .ok_or(PlayerError::EmptyCatalog)?;
        self.select_track(target)
    }

    pub fn previous(&mut self) -> Result<(), PlayerError> {
        let target = self
            .anchor()
            .and_then(|i| self.catalog.wrap_prev(i))
            .ok_or(PlayerError::EmptyCatalog)?;
        self.select_track(target)
    }

    /// End of track: roll over to the next one and make sure it plays.
    pub fn on_track_complete(&mut self) -> Result<(), PlayerError> {
        self.next()?;

        // Second start on top of select_track's own one.
        // Rodio treats play() on a playing sink as a no-op.
        if let Some(session) = self.session.as_mut() {
            debug!("Session {}: explicit start after rollover", session.id);
            session.engine.start();
        }
        Ok(())
    }

    /// Moves playback to `position_ms`, clamped to [0, duration].
    /// Programmatic progress changes (`user_initiated == false`) are ignored,
    /// and so is any seek on a track of unknown length.
    pub fn seek(&mut self, position_ms: i64, user_initiated: bool) {
        if !user_initiated {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.duration_ms == 0 {
            debug!("Session {}: seek ignored, duration unknown", session.id);
            return;
        }

        let max = i64::try_from(session.duration_ms).unwrap_or(i64::MAX);
        let target = position_ms.clamp(0, max) as u64;
        if target as i64 != position_ms {
            debug!("Seek {position_ms} ms clamped to {target} ms");
        }

        session.engine.seek_to(target);
        self.view.set_progress(target);
        self.view.set_current_time_label(&format_time(target));
    }

    /// A drag on the seek bar began: stop refreshing so we don't fight it.
    pub fn on_seek_start(&mut self) {
        self.refresh = None;
    }

    /// The drag ended: resume refreshing after one full interval.
    pub fn on_seek_end(&mut self) {
        if self.session.is_some() {
            self.arm_refresh(Instant::now());
        }
    }

    /// `percent` is 0..=100 (larger values are treated as 100).
    pub fn set_volume(&mut self, percent: u8) {
        self.volume_percent = percent.min(100);
        let g = gain(self.volume_percent);

        if let Some(session) = self.session.as_mut() {
            session.engine.set_volume(g, g);
        }
        debug!("Volume {}%", self.volume_percent);
    }

    /// Loads the first track whose name contains `query` (ignoring case).
    ///
    /// Returns the selected index, or `None` when nothing matched. An empty
    /// query matches every name, so it reloads the first track.
    pub fn filter_and_select(&mut self, query: &str) -> Result<Option<usize>, PlayerError> {
        let Some(index) = self.catalog.find_first(query) else {
            debug!("No track matches {query:?}");
            return Ok(None);
        };

        self.select_track(index)?;
        Ok(Some(index))
    }

    // ---------------------------------------------------------------------
    // Host pump
    // ---------------------------------------------------------------------

    /// Called periodically by the host.
    ///
    /// - lets the engine notice end-of-track
    /// - turns a completion from the live session into `on_track_complete`
    /// - fires the refresh timer if it is due
    pub fn poll(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            session.engine.poll();
        }

        let current = self.session.as_ref().map(|s| s.id);
        let mut completed = false;
        while let Ok(id) = self.completion_rx.try_recv() {
            if Some(id) == current {
                completed = true;
            } else {
                debug!("Ignoring completion from released session {id}");
            }
        }

        if completed {
            if let Err(e) = self.on_track_complete() {
                warn!("Rollover after end of track failed: {e}");
            }
        }

        self.fire_refresh(now);
    }

    fn fire_refresh(&mut self, now: Instant) {
        let Some(timer) = self.refresh else {
            return;
        };
        if now < timer.due {
            return;
        }

        let Some(session) = self.session.as_ref().filter(|s| s.id == timer.session) else {
            debug!("Dropping refresh for released session {}", timer.session);
            self.refresh = None;
            return;
        };

        if !session.engine.is_playing() {
            self.refresh = None;
            return;
        }

        let position = session.engine.position_ms();
        self.view.set_progress(position);
        self.view.set_current_time_label(&format_time(position));

        self.refresh = self.deadline(now).map(|due| RefreshTimer {
            session: timer.session,
            due,
        });
    }

    fn arm_refresh(&mut self, now: Instant) {
        let due = self.deadline(now);
        self.refresh = self
            .session
            .as_ref()
            .zip(due)
            .map(|(s, due)| RefreshTimer { session: s.id, due });
    }

    fn deadline(&self, now: Instant) -> Option<Instant> {
        let due = now.checked_add(self.refresh_interval);
        if due.is_none() {
            warn!("Refresh interval {:?} overflows the clock", self.refresh_interval);
        }
        due
    }

    fn release_session(&mut self) {
        self.refresh = None;
        if let Some(session) = self.session.take() {
            let id = session.id;
            session.engine.release();
            debug!("Session {id}: released");
        }
    }

    fn anchor(&self) -> Option<usize> {
        self.current_index().or(self.cursor)
    }
}

fn gain(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::playback::CompletionHandler;
    use crate::error::LoadError;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::rc::Rc;

    // -----------------------------------------------------------------
    // Fakes
    // -----------------------------------------------------------------

    #[derive(Default)]
    struct EngineLog {
        track: String,
        starts: u32,
        pauses: u32,
        seeks: Vec<u64>,
        volume: Option<(f32, f32)>,
        releases: u32,
        position_reads: u32,
        playing: bool,
        position_ms: u64,
        handler: Option<CompletionHandler>,
    }

    #[derive(Default)]
    struct Journal {
        engines: Vec<EngineLog>,
        failing: HashSet<String>,
    }

    impl Journal {
        fn live(&self) -> usize {
            self.engines.iter().filter(|e| e.releases == 0).count()
        }
    }

    type Shared = Rc<RefCell<Journal>>;

    struct FakeBackend {
        journal: Shared,
        duration_ms: u64,
    }

    impl PlaybackBackend for FakeBackend {
        type Engine = FakeEngine;

        fn load(&mut self, track: &Track) -> Result<FakeEngine, LoadError> {
            let mut j = self.journal.borrow_mut();
            if j.failing.contains(&track.name) {
                return Err(LoadError::Decode {
                    path: track.audio.clone(),
                    reason: "corrupt".into(),
                });
            }
            j.engines.push(EngineLog {
                track: track.name.clone(),
                ..EngineLog::default()
            });
            Ok(FakeEngine {
                slot: j.engines.len() - 1,
                journal: Rc::clone(&self.journal),
                duration_ms: self.duration_ms,
            })
        }
    }

    struct FakeEngine {
        slot: usize,
        journal: Shared,
        duration_ms: u64,
    }

    impl FakeEngine {
        fn with<R>(&self, f: impl FnOnce(&mut EngineLog) -> R) -> R {
            f(&mut self.journal.borrow_mut().engines[self.slot])
        }
    }

    impl PlaybackEngine for FakeEngine {
        fn start(&mut self) {
            self.with(|e| {
                e.starts += 1;
                e.playing = true;
            });
        }

        fn pause(&mut self) {
            self.with(|e| {
                e.pauses += 1;
                e.playing = false;
            });
        }

        fn seek_to(&mut self, position_ms: u64) {
            self.with(|e| {
                e.seeks.push(position_ms);
                e.position_ms = position_ms;
            });
        }

        fn set_volume(&mut self, left: f32, right: f32) {
            self.with(|e| e.volume = Some((left, right)));
        }

        fn duration_ms(&self) -> u64 {
            self.duration_ms
        }

        fn position_ms(&self) -> u64 {
            self.with(|e| {
                e.position_reads += 1;
                e.position_ms
            })
        }

        fn is_playing(&self) -> bool {
            self.with(|e| e.playing)
        }

        fn on_completion(&mut self, handler: CompletionHandler) {
            self.with(|e| e.handler = Some(handler));
        }

        fn release(self) {
            self.with(|e| {
                e.releases += 1;
                e.playing = false;
            });
        }
    }

    #[derive(Default)]
    struct RecordingView {
        title: String,
        cover: Option<CoverRef>,
        progress_max: u64,
        progress: u64,
        progress_pushes: u32,
        current_label: String,
        total_label: String,
        play_icon: Option<bool>,
        errors: Vec<String>,
    }

    impl ViewSink for RecordingView {
        fn set_progress_max(&mut self, ms: u64) {
            self.progress_max = ms;
        }
        fn set_progress(&mut self, ms: u64) {
            self.progress = ms;
            self.progress_pushes += 1;
        }
        fn set_current_time_label(&mut self, text: &str) {
            self.current_label = text.to_string();
        }
        fn set_total_time_label(&mut self, text: &str) {
            self.total_label = text.to_string();
        }
        fn set_title(&mut self, text: &str) {
            self.title = text.to_string();
        }
        fn set_cover_image(&mut self, cover: Option<&CoverRef>) {
            self.cover = cover.cloned();
        }
        fn set_play_button_icon(&mut self, playing: bool) {
            self.play_icon = Some(playing);
        }
        fn show_error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    type TestController = PlayerController<FakeBackend, RecordingView>;

    const DURATION_MS: u64 = 185_000;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    Track::new(
                        PathBuf::from(format!("{n}.mp3")),
                        Some(CoverRef::File(PathBuf::from(format!("cover{}.png", i + 1)))),
                        *n,
                    )
                })
                .collect(),
        )
    }

    fn player_with(names: &[&str], failing: &[&str]) -> (TestController, Shared) {
        let journal: Shared = Rc::default();
        journal
            .borrow_mut()
            .failing
            .extend(failing.iter().map(|s| s.to_string()));
        let backend = FakeBackend {
            journal: Rc::clone(&journal),
            duration_ms: DURATION_MS,
        };
        let c = PlayerController::init(
            catalog(names),
            backend,
            RecordingView::default(),
            ControllerOptions::default(),
        );
        (c, journal)
    }

    fn player(names: &[&str]) -> (TestController, Shared) {
        player_with(names, &[])
    }

    fn two() -> (TestController, Shared) {
        player(&["Umyttynba", "Tusinbedin"])
    }

    fn after_interval() -> Instant {
        Instant::now() + DEFAULT_REFRESH_INTERVAL
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    #[test]
    fn init_starts_first_track() {
        let (c, j) = two();

        assert_eq!(c.state(), PlayerState::Playing);
        assert_eq!(c.current_index(), Some(0));
        assert!(c.refresh_armed());

        let v = c.view();
        assert_eq!(v.title, "Umyttynba");
        assert_eq!(v.cover, Some(CoverRef::File(PathBuf::from("cover1.png"))));
        assert_eq!(v.total_label, "3:05");
        assert_eq!(v.current_label, "0:00");
        assert_eq!(v.progress_max, DURATION_MS);
        assert_eq!(v.play_icon, Some(true));

        let j = j.borrow();
        assert_eq!(j.engines.len(), 1);
        assert_eq!(j.engines[0].starts, 1);
        assert_eq!(j.engines[0].volume, Some((1.0, 1.0)));
    }

    #[test]
    fn empty_catalog_stays_stopped_and_ignores_transport() {
        let (mut c, j) = player(&[]);

        assert_eq!(c.state(), PlayerState::Stopped);
        assert_eq!(c.toggle_play_pause(), PlayerState::Stopped);
        assert!(matches!(c.next(), Err(PlayerError::EmptyCatalog)));
        assert!(matches!(c.previous(), Err(PlayerError::EmptyCatalog)));
        assert!(matches!(c.filter_and_select("x"), Ok(None)));
        c.seek(10, true);
        c.set_volume(30);
        c.poll(after_interval());

        assert_eq!(c.state(), PlayerState::Stopped);
        assert!(!c.refresh_armed());
        assert!(j.borrow().engines.is_empty());
    }

    #[test]
    fn accessors_describe_the_live_session() {
        let (mut c, j) = two();
        c.select_track(1).unwrap();
        j.borrow_mut().engines[1].position_ms = 42_000;

        assert_eq!(c.current_track().map(|t| t.name.as_str()), Some("Tusinbedin"));
        assert_eq!(c.duration_ms(), Some(DURATION_MS));
        assert_eq!(c.position_ms(), Some(42_000));
    }

    #[test]
    fn accessors_are_empty_when_stopped() {
        let (c, _) = player_with(&["broken"], &["broken"]);

        assert_eq!(c.state(), PlayerState::Stopped);
        assert!(c.current_track().is_none());
        assert_eq!(c.duration_ms(), None);
        assert_eq!(c.position_ms(), None);
    }

    #[test]
    fn huge_refresh_interval_is_capped() {
        let journal: Shared = Rc::default();
        let backend = FakeBackend {
            journal: Rc::clone(&journal),
            duration_ms: DURATION_MS,
        };
        let options = ControllerOptions {
            refresh_interval: Duration::from_millis(u64::MAX),
            volume_percent: 100,
        };
        let mut c = PlayerController::init(catalog(&["a"]), backend, RecordingView::default(), options);

        assert_eq!(c.state(), PlayerState::Playing);
        assert!(c.refresh_armed());

        let pushes = c.view().progress_pushes;
        c.poll(Instant::now() + MAX_REFRESH_INTERVAL);
        assert_eq!(c.view().progress_pushes, pushes + 1);
    }

    #[test]
    fn teardown_releases_live_session() {
        let (c, j) = two();
        c.teardown();

        let j = j.borrow();
        assert_eq!(j.engines[0].releases, 1);
        assert_eq!(j.live(), 0);
    }

    // -----------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------

    #[test]
    fn select_track_releases_prior_session_exactly_once() {
        let (mut c, j) = player(&["a", "b", "c"]);

        c.select_track(2).unwrap();
        assert_eq!(c.current_index(), Some(2));
        assert_eq!(c.view().title, "c");
        {
            let j = j.borrow();
            assert_eq!(j.engines[0].releases, 1);
            assert_eq!(j.engines[1].releases, 0);
            assert_eq!(j.live(), 1);
        }

        c.select_track(0).unwrap();
        let j = j.borrow();
        assert_eq!(j.engines[0].releases, 1);
        assert_eq!(j.engines[1].releases, 1);
        assert_eq!(j.engines[2].track, "a");
        assert_eq!(j.live(), 1);
    }

    #[test]
    fn select_track_out_of_range_changes_nothing() {
        let (mut c, j) = two();

        let err = c.select_track(5).unwrap_err();
        assert!(matches!(err, PlayerError::IndexOutOfRange { index: 5, len: 2 }));
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(c.state(), PlayerState::Playing);
        assert_eq!(j.borrow().engines[0].releases, 0);
    }

    #[test]
    fn reselecting_from_paused_plays_again() {
        let (mut c, _) = two();
        c.toggle_play_pause();
        assert_eq!(c.state(), PlayerState::Paused);

        c.select_track(1).unwrap();
        assert_eq!(c.state(), PlayerState::Playing);
        assert_eq!(c.view().play_icon, Some(true));
        assert!(c.refresh_armed());
    }

    #[test]
    fn next_and_previous_wrap_at_both_ends() {
        let (mut c, _) = player(&["a", "b", "c"]);

        c.previous().unwrap();
        assert_eq!(c.current_index(), Some(2));
        c.next().unwrap();
        assert_eq!(c.current_index(), Some(0));
        c.next().unwrap();
        assert_eq!(c.current_index(), Some(1));
    }

    #[test]
    fn single_track_catalog_next_reloads_same_track() {
        let (mut c, j) = player(&["only"]);
        c.next().unwrap();

        assert_eq!(c.current_index(), Some(0));
        let j = j.borrow();
        assert_eq!(j.engines.len(), 2);
        assert_eq!(j.engines[0].releases, 1);
    }

    proptest! {
        #[test]
        fn next_n_times_is_identity(len in 1usize..8, start in 0usize..8) {
            let start = start % len;
            let names: Vec<String> = (0..len).map(|i| format!("t{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let (mut c, j) = player(&refs);
            c.select_track(start).unwrap();

            for _ in 0..len {
                c.next().unwrap();
            }
            prop_assert_eq!(c.current_index(), Some(start));

            for _ in 0..len {
                c.previous().unwrap();
            }
            prop_assert_eq!(c.current_index(), Some(start));
            prop_assert_eq!(j.borrow().live(), 1);
        }
    }

    // -----------------------------------------------------------------
    // Play / pause
    // -----------------------------------------------------------------

    #[test]
    fn toggle_pairs_end_paused_without_extra_starts() {
        let (mut c, j) = two();

        assert_eq!(c.toggle_play_pause(), PlayerState::Paused);
        assert!(!c.refresh_armed());
        assert_eq!(c.view().play_icon, Some(false));

        assert_eq!(c.toggle_play_pause(), PlayerState::Playing);
        assert!(c.refresh_armed());
        assert_eq!(c.view().play_icon, Some(true));

        assert_eq!(c.toggle_play_pause(), PlayerState::Paused);
        assert_eq!(c.state(), PlayerState::Paused);

        let j = j.borrow();
        // One start from loading, one from the single resume.
        assert_eq!(j.engines[0].starts, 2);
        assert_eq!(j.engines[0].pauses, 2);
    }

    #[test]
    fn resume_waits_a_full_interval_before_refreshing() {
        let (mut c, _) = two();
        c.toggle_play_pause();
        c.toggle_play_pause();
        let pushes = c.view().progress_pushes;

        c.poll(Instant::now());
        assert_eq!(c.view().progress_pushes, pushes);

        c.poll(after_interval());
        assert_eq!(c.view().progress_pushes, pushes + 1);
    }

    // -----------------------------------------------------------------
    // Refresh signal
    // -----------------------------------------------------------------

    #[test]
    fn refresh_pushes_position_and_rearms() {
        let (mut c, j) = two();
        j.borrow_mut().engines[0].position_ms = 65_000;
        let pushes = c.view().progress_pushes;

        c.poll(Instant::now());
        assert_eq!(c.view().progress_pushes, pushes);

        let t1 = after_interval();
        c.poll(t1);
        assert_eq!(c.view().progress, 65_000);
        assert_eq!(c.view().current_label, "1:05");
        assert_eq!(c.view().progress_pushes, pushes + 1);

        // Re-armed relative to the fire time.
        c.poll(t1 + Duration::from_millis(500));
        assert_eq!(c.view().progress_pushes, pushes + 1);
        c.poll(t1 + DEFAULT_REFRESH_INTERVAL);
        assert_eq!(c.view().progress_pushes, pushes + 2);
    }

    #[test]
    fn refresh_stops_when_engine_reports_not_playing() {
        let (mut c, j) = two();
        // The engine stopped on its own; the controller only learns at fire time.
        j.borrow_mut().engines[0].playing = false;
        assert!(c.refresh_armed());

        let pushes = c.view().progress_pushes;
        c.poll(after_interval());
        assert_eq!(c.view().progress_pushes, pushes);
        assert!(!c.refresh_armed());
    }

    #[test]
    fn old_session_is_never_refreshed_after_replacement() {
        let (mut c, j) = two();
        j.borrow_mut().engines[0].position_ms = 50_000;

        c.select_track(1).unwrap();
        c.poll(after_interval());
        c.poll(after_interval() + DEFAULT_REFRESH_INTERVAL);

        let j = j.borrow();
        assert_eq!(j.engines[0].position_reads, 0);
        assert!(j.engines[1].position_reads > 0);
        assert_eq!(c.view().progress, 0);
    }

    #[test]
    fn custom_refresh_interval_is_honoured() {
        let journal: Shared = Rc::default();
        let backend = FakeBackend {
            journal: Rc::clone(&journal),
            duration_ms: DURATION_MS,
        };
        let options = ControllerOptions {
            refresh_interval: Duration::from_millis(250),
            volume_percent: 40,
        };
        let mut c = PlayerController::init(catalog(&["a"]), backend, RecordingView::default(), options);

        assert_eq!(c.volume_percent(), 40);
        assert_eq!(journal.borrow().engines[0].volume, Some((0.4, 0.4)));

        let pushes = c.view().progress_pushes;
        c.poll(Instant::now() + Duration::from_millis(250));
        assert_eq!(c.view().progress_pushes, pushes + 1);
    }

    // -----------------------------------------------------------------
    // Seeking
    // -----------------------------------------------------------------

    #[test]
    fn only_user_seeks_reach_the_engine() {
        let (mut c, j) = two();

        c.seek(30_000, false);
        assert!(j.borrow().engines[0].seeks.is_empty());
        assert_eq!(c.view().current_label, "0:00");

        c.seek(65_000, true);
        assert_eq!(j.borrow().engines[0].seeks, vec![65_000]);
        assert_eq!(c.view().current_label, "1:05");
        assert_eq!(c.view().progress, 65_000);
    }

    #[test]
    fn seeks_are_clamped_to_track_bounds() {
        let (mut c, j) = two();

        c.seek(DURATION_MS as i64 + 10_000, true);
        c.seek(-5, true);

        assert_eq!(j.borrow().engines[0].seeks, vec![DURATION_MS, 0]);
        assert_eq!(c.view().current_label, "0:00");
    }

    #[test]
    fn seek_is_ignored_when_duration_is_unknown() {
        let journal: Shared = Rc::default();
        let backend = FakeBackend {
            journal: Rc::clone(&journal),
            duration_ms: 0,
        };
        let mut c = PlayerController::init(
            catalog(&["stream"]),
            backend,
            RecordingView::default(),
            ControllerOptions::default(),
        );
        journal.borrow_mut().engines[0].position_ms = 90_000;

        c.seek(1, true);

        assert!(journal.borrow().engines[0].seeks.is_empty());
        assert_eq!(c.position_ms(), Some(90_000));
        assert_eq!(c.state(), PlayerState::Playing);
    }

    #[test]
    fn drag_suspends_refresh_and_rearms_with_full_delay() {
        let (mut c, _) = two();

        c.on_seek_start();
        assert!(!c.refresh_armed());
        let pushes = c.view().progress_pushes;
        c.poll(after_interval());
        assert_eq!(c.view().progress_pushes, pushes);

        c.on_seek_end();
        assert!(c.refresh_armed());
        c.poll(Instant::now());
        assert_eq!(c.view().progress_pushes, pushes);
        c.poll(after_interval());
        assert_eq!(c.view().progress_pushes, pushes + 1);
    }

    #[test]
    fn drag_end_while_paused_refreshes_nothing() {
        let (mut c, _) = two();
        c.toggle_play_pause();
        c.on_seek_start();
        c.on_seek_end();

        let pushes = c.view().progress_pushes;
        c.poll(after_interval());
        assert_eq!(c.view().progress_pushes, pushes);
        assert!(!c.refresh_armed());
    }

    // -----------------------------------------------------------------
    // Volume
    // -----------------------------------------------------------------

    #[test]
    fn volume_maps_linearly_to_both_channels() {
        let (mut c, j) = two();

        c.set_volume(50);
        assert_eq!(j.borrow().engines[0].volume, Some((0.5, 0.5)));

        c.set_volume(0);
        assert_eq!(j.borrow().engines[0].volume, Some((0.0, 0.0)));
        assert_eq!(c.state(), PlayerState::Playing);

        c.set_volume(250);
        assert_eq!(c.volume_percent(), 100);
        assert_eq!(j.borrow().engines[0].volume, Some((1.0, 1.0)));
    }

    #[test]
    fn volume_carries_over_to_next_session() {
        let (mut c, j) = two();
        c.set_volume(25);
        c.next().unwrap();

        assert_eq!(j.borrow().engines[1].volume, Some((0.25, 0.25)));
    }

    #[test]
    fn volume_change_while_paused_keeps_paused() {
        let (mut c, _) = two();
        c.toggle_play_pause();
        c.set_volume(70);
        assert_eq!(c.state(), PlayerState::Paused);
    }

    // -----------------------------------------------------------------
    // Filtering
    // -----------------------------------------------------------------

    #[test]
    fn filter_selects_first_case_insensitive_match() {
        let (mut c, _) = two();

        assert_eq!(c.filter_and_select("tus").unwrap(), Some(1));
        assert_eq!(c.current_index(), Some(1));
        assert_eq!(c.view().title, "Tusinbedin");
    }

    #[test]
    fn filter_without_match_is_a_noop() {
        let (mut c, j) = two();

        assert_eq!(c.filter_and_select("zzz").unwrap(), None);
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(c.state(), PlayerState::Playing);
        assert_eq!(j.borrow().engines.len(), 1);
    }

    #[test]
    fn filter_with_empty_query_reloads_first_track() {
        let (mut c, j) = two();
        c.select_track(1).unwrap();

        assert_eq!(c.filter_and_select("").unwrap(), Some(0));
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(c.state(), PlayerState::Playing);
        let j = j.borrow();
        assert_eq!(j.engines.len(), 3);
        assert_eq!(j.live(), 1);
    }

    // -----------------------------------------------------------------
    // Completion
    // -----------------------------------------------------------------

    #[test]
    fn completion_at_last_track_wraps_and_plays() {
        let (mut c, j) = two();
        c.select_track(1).unwrap();

        c.on_track_complete().unwrap();

        assert_eq!(c.current_index(), Some(0));
        assert_eq!(c.state(), PlayerState::Playing);
        assert_eq!(c.view().play_icon, Some(true));
        // select_track's start plus the explicit rollover start.
        assert_eq!(j.borrow().engines[2].starts, 2);
    }

    #[test]
    fn engine_completion_is_delivered_on_poll() {
        let (mut c, j) = player(&["a", "b", "c"]);

        {
            let j = j.borrow();
            let handler = j.engines[0].handler.as_ref().unwrap();
            handler();
        }
        assert_eq!(c.current_index(), Some(0));

        c.poll(Instant::now());
        assert_eq!(c.current_index(), Some(1));
        assert_eq!(c.state(), PlayerState::Playing);
    }

    #[test]
    fn completion_from_released_session_is_ignored() {
        let (mut c, j) = player(&["a", "b", "c"]);
        c.select_track(2).unwrap();

        {
            let j = j.borrow();
            let stale = j.engines[0].handler.as_ref().unwrap();
            stale();
        }
        c.poll(Instant::now());

        assert_eq!(c.current_index(), Some(2));
        assert_eq!(j.borrow().engines.len(), 2);
    }

    // -----------------------------------------------------------------
    // Load failures
    // -----------------------------------------------------------------

    #[test]
    fn load_failure_reports_and_leaves_no_live_engine() {
        let (mut c, j) = player_with(&["a", "broken", "c"], &["broken"]);

        let err = c.next().unwrap_err();
        assert!(matches!(err, PlayerError::Load(_)));

        assert_eq!(c.state(), PlayerState::Stopped);
        assert_eq!(c.current_index(), None);
        assert!(!c.refresh_armed());
        assert_eq!(c.view().play_icon, Some(false));
        assert_eq!(c.view().errors.len(), 1);
        assert!(c.view().errors[0].contains("broken"));
        assert_eq!(j.borrow().live(), 0);

        // Navigation continues past the broken track.
        c.next().unwrap();
        assert_eq!(c.current_index(), Some(2));
        assert_eq!(c.state(), PlayerState::Playing);
    }

    #[test]
    fn broken_first_track_leaves_player_stopped() {
        let (mut c, _) = player_with(&["broken", "ok"], &["broken"]);

        assert_eq!(c.state(), PlayerState::Stopped);
        assert_eq!(c.view().errors.len(), 1);
        assert_eq!(c.toggle_play_pause(), PlayerState::Stopped);

        c.previous().unwrap();
        assert_eq!(c.current_index(), Some(1));
    }
}
