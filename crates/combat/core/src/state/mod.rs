//! Authoritative combat session state.
//!
//! This module owns the combatant roster, round/turn bookkeeping, turn
//! timers, and the per-turn movement ledgers. Hosts read this state through
//! the query methods here but mutate it exclusively through the engine.

pub mod snapshot;
pub mod types;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub use snapshot::SessionSnapshot;
pub use types::{
    ActiveMovement, ApRestoration, CHARACTER_DEFAULT_MAX_AP, CREATURE_DEFAULT_MAX_AP,
    CombatConfig, Combatant, CreatureId, MovementInfo, PendingMoveConfirmation, Position,
    TIMELINE_ROUNDS_AHEAD, TIMELINE_ROUNDS_DEFAULT, TimelineEntry, TimerInfo, TokenId,
    TurnTimer, project_timeline,
};

/// Canonical state of one combat session.
///
/// The movement ledgers (`turn_movement_used`, `movement_unlocked`,
/// `turn_start_positions`, `temp_movement_distance`) are keyed by token and
/// purged together when that token's turn ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// RNG seed fixed at session creation; combined with `action_nonce` and
    /// token identity to derive per-roll seeds.
    pub session_seed: u64,
    pub is_in_combat: bool,
    pub is_selection_mode: bool,
    /// 1-based round counter; stays at 1 while out of combat.
    pub round: u32,
    pub turn_order: Vec<Combatant>,
    pub current_turn_index: usize,
    pub selected_tokens: HashSet<TokenId>,
    pub combat_timeline: Vec<TimelineEntry>,
    pub config: CombatConfig,
    pub turn_timers: HashMap<TokenId, TurnTimer>,
    /// Committed feet moved this turn, per token.
    pub turn_movement_used: HashMap<TokenId, f64>,
    /// Tokens that have paid for at least one movement segment this turn.
    pub movement_unlocked: HashSet<TokenId>,
    /// Where each token stood when it first moved this turn.
    pub turn_start_positions: HashMap<TokenId, Position>,
    /// Provisional feet for an in-flight drag, per token.
    pub temp_movement_distance: HashMap<TokenId, f64>,
    pub active_movement: Option<ActiveMovement>,
    pub pending_confirmation: Option<PendingMoveConfirmation>,
    /// Increments once per successfully executed action.
    #[serde(default)]
    pub action_nonce: u64,
}

impl CombatState {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(session_seed: u64) -> Self {
        Self {
            session_seed,
            is_in_combat: false,
            is_selection_mode: false,
            round: 1,
            turn_order: Vec::new(),
            current_turn_index: 0,
            selected_tokens: HashSet::new(),
            combat_timeline: Vec::new(),
            config: CombatConfig::default(),
            turn_timers: HashMap::new(),
            turn_movement_used: HashMap::new(),
            movement_unlocked: HashSet::new(),
            turn_start_positions: HashMap::new(),
            temp_movement_distance: HashMap::new(),
            active_movement: None,
            pending_confirmation: None,
            action_nonce: 0,
        }
    }

    /// The combatant whose turn it is, if any.
    pub fn current_combatant(&self) -> Option<&Combatant> {
        self.turn_order.get(self.current_turn_index)
    }

    pub fn combatant(&self, token_id: &TokenId) -> Option<&Combatant> {
        self.turn_order.iter().find(|c| &c.token_id == token_id)
    }

    pub(crate) fn combatant_mut(&mut self, token_id: &TokenId) -> Option<&mut Combatant> {
        self.turn_order.iter_mut().find(|c| &c.token_id == token_id)
    }

    /// Always false while combat is not running.
    pub fn is_tokens_turn(&self, token_id: &TokenId) -> bool {
        self.is_in_combat
            && self
                .current_combatant()
                .is_some_and(|c| &c.token_id == token_id)
    }

    /// In combat with an empty order: the session needs a force reset.
    pub fn is_degraded(&self) -> bool {
        self.is_in_combat && self.turn_order.is_empty()
    }

    /// Committed feet this token has moved this turn.
    pub fn movement_used(&self, token_id: &TokenId) -> f64 {
        self.turn_movement_used.get(token_id).copied().unwrap_or(0.0)
    }

    pub fn is_movement_unlocked(&self, token_id: &TokenId) -> bool {
        self.movement_unlocked.contains(token_id)
    }

    /// Paid movement budget in feet: whole segments already bought, rounded
    /// up from the feet used so far. Zero while the token is still locked.
    pub fn unlocked_movement(&self, token_id: &TokenId, speed_feet: f64) -> f64 {
        if !self.is_movement_unlocked(token_id) {
            return 0.0;
        }
        let used = self.movement_used(token_id);
        (used / speed_feet).ceil() * speed_feet
    }

    /// Feet this token could still move, counting both the unspent part of
    /// the paid budget and budget its remaining action points could buy.
    ///
    /// The remaining action points include the point that already paid for
    /// the current segment, so this intentionally over-reports by up to one
    /// segment; displays treat it as an upper bound.
    pub fn remaining_movement(&self, token_id: &TokenId, speed_feet: f64) -> f64 {
        let Some(combatant) = self.combatant(token_id) else {
            return 0.0;
        };
        let action_points = combatant.current_action_points;
        if !self.is_movement_unlocked(token_id) {
            return if action_points > 0 { speed_feet } else { 0.0 };
        }
        let used = self.movement_used(token_id);
        let unlocked = self.unlocked_movement(token_id, speed_feet);
        (unlocked - used).max(0.0) + f64::from(action_points) * speed_feet
    }

    /// Movement summary for one token, or `None` when it is not in the
    /// turn order.
    pub fn movement_info(&self, token_id: &TokenId, speed_feet: f64) -> Option<MovementInfo> {
        let combatant = self.combatant(token_id)?;
        let provisional = self
            .temp_movement_distance
            .get(token_id)
            .copied()
            .unwrap_or(0.0);
        let is_unlocked = self.is_movement_unlocked(token_id);
        Some(MovementInfo {
            speed_feet,
            current_action_points: combatant.current_action_points,
            movement_used_feet: self.movement_used(token_id) + provisional,
            is_unlocked,
            remaining_feet: self.remaining_movement(token_id, speed_feet),
            unlocked_feet: self.unlocked_movement(token_id, speed_feet),
            can_move: combatant.current_action_points > 0 || is_unlocked,
        })
    }

    /// Timer view for one token; zeroed when no timer exists.
    pub fn timer_info(&self, token_id: &TokenId, now_ms: u64) -> TimerInfo {
        match self.turn_timers.get(token_id) {
            Some(timer) => TimerInfo {
                total_time_ms: timer.total_time_ms,
                current_time_ms: timer.live_span_ms(now_ms),
                is_active: timer.is_active,
            },
            None => TimerInfo::default(),
        }
    }

    /// Fresh projection of the next `rounds` rounds from the live order.
    pub fn timeline(&self, rounds: u32) -> Vec<TimelineEntry> {
        project_timeline(&self.turn_order, self.current_turn_index, rounds)
    }

    /// Drops every per-turn ledger entry for one token.
    pub(crate) fn purge_token_ledgers(&mut self, token_id: &TokenId) {
        self.turn_movement_used.remove(token_id);
        self.movement_unlocked.remove(token_id);
        self.turn_start_positions.remove(token_id);
        self.temp_movement_distance.remove(token_id);
    }

    /// Returns the session to its out-of-combat shape, keeping the seed,
    /// nonce, and configuration.
    pub(crate) fn reset_session(&mut self) {
        self.is_in_combat = false;
        self.is_selection_mode = false;
        self.round = 1;
        self.turn_order.clear();
        self.current_turn_index = 0;
        self.selected_tokens.clear();
        self.combat_timeline.clear();
        self.turn_timers.clear();
        self.turn_movement_used.clear();
        self.movement_unlocked.clear();
        self.turn_start_positions.clear();
        self.temp_movement_distance.clear();
        self.active_movement = None;
        self.pending_confirmation = None;
    }
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new()
    }
}
