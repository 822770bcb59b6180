//! Topic-based event bus for routing session events to subscribers.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::CombatEvent;
