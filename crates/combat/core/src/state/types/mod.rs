//! Plain data types composing the combat session state.

mod combatant;
mod common;
mod config;
mod movement;
mod timeline;
mod timer;

pub use combatant::{CHARACTER_DEFAULT_MAX_AP, CREATURE_DEFAULT_MAX_AP, Combatant};
pub use common::{CreatureId, Position, TokenId};
pub use config::{ApRestoration, CombatConfig};
pub use movement::{ActiveMovement, MovementInfo, PendingMoveConfirmation};
pub use timeline::{
    TIMELINE_ROUNDS_AHEAD, TIMELINE_ROUNDS_DEFAULT, TimelineEntry, project_timeline,
};
pub use timer::{TimerInfo, TurnTimer};
