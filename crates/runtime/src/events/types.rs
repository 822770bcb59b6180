//! Event payloads published on the bus.

use combat_core::{InitiativeRoll, TokenId};
use serde::{Deserialize, Serialize};

use super::bus::Topic;

/// Events emitted by the session worker after a commit.
///
/// Payloads are self-contained so subscribers never need to query state to
/// render them; lagging subscribers simply lose events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Combat started with the rolled order, highest initiative first.
    Started {
        order: Vec<InitiativeRoll>,
        round: u32,
    },
    /// The turn moved to the next combatant.
    TurnChanged {
        /// Whose turn just ended, when the index was in range.
        ended: Option<TokenId>,
        next: TokenId,
        round: u32,
        /// True when the hand-off wrapped into a new round.
        wrapped: bool,
    },
    /// Combat ended or the session was force-reset.
    Ended,
    /// Action points left a combatant's pool, by spend or confirmed move.
    ActionPointsSpent {
        token_id: TokenId,
        amount: u32,
        remaining: u32,
    },
}

impl CombatEvent {
    pub fn topic(&self) -> Topic {
        match self {
            CombatEvent::Started { .. } | CombatEvent::Ended => Topic::Session,
            CombatEvent::TurnChanged { .. } => Topic::Turns,
            CombatEvent::ActionPointsSpent { .. } => Topic::Economy,
        }
    }
}
