//! Projected initiative timeline for turn-order displays.

use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use super::common::TokenId;

/// Rounds projected into the cached timeline when combat starts.
pub const TIMELINE_ROUNDS_AHEAD: u32 = 5;
/// Default projection depth for ad-hoc timeline queries.
pub const TIMELINE_ROUNDS_DEFAULT: u32 = 3;

/// One row of the projected initiative timeline.
///
/// Rounds are numbered locally within the projection starting at 1, not by
/// the session's live round counter; the current-turn marker is only
/// meaningful in the first projected round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimelineEntry {
    RoundSeparator {
        round: u32,
    },
    Turn {
        round: u32,
        turn_index: usize,
        token_id: TokenId,
        name: String,
        initiative: i32,
        is_current_turn: bool,
    },
}

/// Projects `rounds` rounds of the given order into timeline rows.
pub fn project_timeline(
    order: &[Combatant],
    current_turn_index: usize,
    rounds: u32,
) -> Vec<TimelineEntry> {
    let mut timeline = Vec::with_capacity(rounds as usize * (order.len() + 1));
    for round in 1..=rounds {
        timeline.push(TimelineEntry::RoundSeparator { round });
        for (turn_index, combatant) in order.iter().enumerate() {
            timeline.push(TimelineEntry::Turn {
                round,
                turn_index,
                token_id: combatant.token_id.clone(),
                name: combatant.name.clone(),
                initiative: combatant.initiative,
                is_current_turn: round == 1 && turn_index == current_turn_index,
            });
        }
    }
    timeline
}
