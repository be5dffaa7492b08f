//! core/mod.rs
//!
//! The brain of the app:
//! - Build the catalog (manifest or folder scan, tag reading)
//! - Run the player state machine against a playback backend
//! - Return plain data for the GUI to render
//!
//! No Iced imports in here. The GUI talks to `controller::PlayerController`
//! and implements `controller::ViewSink`; everything else stays behind it.

pub mod catalog;
pub mod controller;
pub mod library;
pub mod playback;
pub mod tags;
pub mod time;
pub mod types;
