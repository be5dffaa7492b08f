//! gui/mod.rs
//!
//! This folder contains ONLY frontend concerns:
//! - app state (`Minim`) and messages (`Message`)
//! - the controller's view model (`sink::GuiView`)
//! - update logic (`update()`)
//! - view layout (`view()`)
//! - subscriptions (the player pump)

pub(crate) mod sink;
pub(crate) mod state;
pub(crate) mod subscription;
pub(crate) mod update;
pub(crate) mod view;

// Re-export the entry points main.rs needs.
pub(crate) use state::Minim;
pub(crate) use subscription::subscription;
pub(crate) use update::update;
pub(crate) use view::{WINDOW_H, WINDOW_W, view};
