//! gui/subscription.rs
//! Pump the player by emitting a periodic Tick message.

use iced::{Subscription, time};
use std::time::Duration;

use super::state::{Message, Minim};

/// Finer than the refresh interval so refresh and end-of-track land on time.
const PUMP_MS: u64 = 100;

pub(crate) fn subscription(state: &Minim) -> Subscription<Message> {
    if state.player.is_none() {
        return Subscription::none();
    }

    time::every(Duration::from_millis(PUMP_MS)).map(Message::Tick)
}
