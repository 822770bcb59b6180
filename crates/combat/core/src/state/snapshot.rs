//! Serialization adapter for persisting a combat session.
//!
//! Maps and sets are flattened into sorted pair lists so snapshot files stay
//! stable across runs, and every field defaults so snapshots written by older
//! builds restore with empty collections instead of failing. Gesture state,
//! selection, and the timeline cache are deliberately not captured.

use serde::{Deserialize, Serialize};

use super::CombatState;
use super::types::{CombatConfig, Combatant, Position, TokenId, TurnTimer};

/// Persistable portion of a [`CombatState`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub session_seed: u64,
    #[serde(default)]
    pub action_nonce: u64,
    #[serde(default)]
    pub is_in_combat: bool,
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub current_turn_index: usize,
    #[serde(default)]
    pub turn_order: Vec<Combatant>,
    #[serde(default)]
    pub config: CombatConfig,
    #[serde(default)]
    pub turn_timers: Vec<(TokenId, TurnTimer)>,
    #[serde(default)]
    pub turn_movement_used: Vec<(TokenId, f64)>,
    #[serde(default)]
    pub movement_unlocked: Vec<TokenId>,
    #[serde(default)]
    pub turn_start_positions: Vec<(TokenId, Position)>,
}

impl SessionSnapshot {
    /// Captures the persistable portion of a session.
    pub fn capture(state: &CombatState) -> Self {
        let mut turn_timers: Vec<_> = state
            .turn_timers
            .iter()
            .map(|(token, timer)| (token.clone(), timer.clone()))
            .collect();
        turn_timers.sort_by(|a, b| a.0.cmp(&b.0));

        let mut turn_movement_used: Vec<_> = state
            .turn_movement_used
            .iter()
            .map(|(token, used)| (token.clone(), *used))
            .collect();
        turn_movement_used.sort_by(|a, b| a.0.cmp(&b.0));

        let mut movement_unlocked: Vec<_> = state.movement_unlocked.iter().cloned().collect();
        movement_unlocked.sort();

        let mut turn_start_positions: Vec<_> = state
            .turn_start_positions
            .iter()
            .map(|(token, position)| (token.clone(), *position))
            .collect();
        turn_start_positions.sort_by(|a, b| a.0.cmp(&b.0));

        Self {
            session_seed: state.session_seed,
            action_nonce: state.action_nonce,
            is_in_combat: state.is_in_combat,
            round: state.round,
            current_turn_index: state.current_turn_index,
            turn_order: state.turn_order.clone(),
            config: state.config.clone(),
            turn_timers,
            turn_movement_used,
            movement_unlocked,
            turn_start_positions,
        }
    }

    /// Rebuilds live state from a snapshot.
    ///
    /// Absent fields restore to their defaults, the round floors at 1, and a
    /// turn index past the end of the order clamps back into range.
    pub fn restore(self) -> CombatState {
        let mut state = CombatState::with_seed(self.session_seed);
        state.action_nonce = self.action_nonce;
        state.is_in_combat = self.is_in_combat;
        state.round = self.round.max(1);
        state.current_turn_index = if self.turn_order.is_empty() {
            0
        } else {
            self.current_turn_index.min(self.turn_order.len() - 1)
        };
        state.turn_order = self.turn_order;
        state.config = self.config;
        state.turn_timers = self.turn_timers.into_iter().collect();
        state.turn_movement_used = self.turn_movement_used.into_iter().collect();
        state.movement_unlocked = self.movement_unlocked.into_iter().collect();
        state.turn_start_positions = self.turn_start_positions.into_iter().collect();
        state
    }
}
