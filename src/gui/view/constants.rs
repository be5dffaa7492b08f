//! View constants (layout/sizing).

pub(crate) const WINDOW_W: f32 = 420.0;
pub(crate) const WINDOW_H: f32 = 720.0;

pub(crate) const COVER_BIG: f32 = 260.0;

pub(crate) const TITLE_TEXT: f32 = 20.0;
pub(crate) const TIME_TEXT: f32 = 12.0;
pub(crate) const ROW_TEXT: f32 = 14.0;
pub(crate) const TIME_LABEL_W: f32 = 44.0;

pub(crate) const VOLUME_W: f32 = 200.0;

pub(crate) const TRACK_LIST_H: f32 = 180.0;
pub(crate) const TRACK_LIST_SPACING: f32 = 1.0;
