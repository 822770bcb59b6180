//! Combat session initialization: roll initiative and seat the roster.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::action::{ActionTransition, InitiativeRoll};
use crate::env::{CombatEnv, OracleError, compute_seed, token_entropy};
use crate::error::{CombatError, ErrorSeverity};
use crate::rules::{ability_modifier, action_points_for_initiative};
use crate::state::{
    CHARACTER_DEFAULT_MAX_AP, CREATURE_DEFAULT_MAX_AP, CombatState, Combatant, CreatureId,
    TIMELINE_ROUNDS_AHEAD, TokenId, TurnTimer, project_timeline,
};

/// A token nominated for the encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    pub token_id: TokenId,
    pub creature_id: Option<CreatureId>,
    /// Set for tokens owned by a remote player in a shared session.
    pub player_id: Option<String>,
    /// Set for the local player's own token.
    pub is_player_token: bool,
}

impl TokenRef {
    /// True when the token stands in for a player character and may fall
    /// back to the character sheet for stats.
    pub fn is_player_controlled(&self) -> bool {
        self.player_id.is_some() || self.is_player_token
    }

    /// Synthetic creature id recorded when stats come from the sheet.
    fn character_creature_id(&self) -> CreatureId {
        match &self.player_id {
            Some(player) => CreatureId::new(format!("character_{player}")),
            None => CreatureId::new("character_local"),
        }
    }
}

/// Starts an encounter from the nominated tokens.
///
/// Tokens whose stats cannot be resolved are dropped without failing the
/// whole start; player tokens fall back to the local character sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCombatAction {
    pub tokens: Vec<TokenRef>,
    /// Wall-clock start of the first turn, in Unix milliseconds.
    pub now_ms: u64,
}

/// Roster summary returned from a completed start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStarted {
    /// False when every nominated token was unresolvable and the session
    /// stayed out of combat.
    pub started: bool,
    /// Rolls in final turn order, highest initiative first.
    pub rolls: Vec<InitiativeRoll>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StartCombatError {
    #[error("no tokens were nominated for combat")]
    NoTokens,
    #[error("combat is already in progress")]
    AlreadyInCombat,
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CombatError for StartCombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StartCombatError::NoTokens | StartCombatError::AlreadyInCombat => {
                ErrorSeverity::Validation
            }
            StartCombatError::Oracle(error) => error.severity(),
        }
    }
}

impl ActionTransition for StartCombatAction {
    type Error = StartCombatError;
    type Result = CombatStarted;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if state.is_in_combat {
            return Err(StartCombatError::AlreadyInCombat);
        }
        if self.tokens.is_empty() {
            return Err(StartCombatError::NoTokens);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut CombatState,
        env: &CombatEnv<'_>,
    ) -> Result<CombatStarted, StartCombatError> {
        let creatures = env.creatures()?;
        let rng = env.rng()?;

        let mut combatants = Vec::with_capacity(self.tokens.len());
        for (slot, token) in self.tokens.iter().enumerate() {
            let mut record = token
                .creature_id
                .as_ref()
                .and_then(|id| creatures.creature(id));
            let mut creature_id = token.creature_id.clone();
            let mut is_character_token = false;

            if record.is_none() && token.is_player_controlled() {
                is_character_token = true;
                if let Some(sheet) = env.characters()?.sheet() {
                    creature_id = Some(token.character_creature_id());
                    record = Some(sheet.to_creature_record());
                }
            }
            let Some(record) = record else {
                // No stats anywhere: this token sits the encounter out.
                continue;
            };
            let creature_id = creature_id.unwrap_or_else(|| token.character_creature_id());

            let seed = compute_seed(
                state.session_seed,
                state.action_nonce,
                token_entropy(&token.token_id),
                slot as u32,
            );
            let d20_roll = rng.roll_d20(seed);
            let initiative_mod = record.initiative_modifier();
            let initiative = d20_roll as i32 + initiative_mod;

            let max_action_points = record.max_action_points.unwrap_or(if is_character_token {
                CHARACTER_DEFAULT_MAX_AP
            } else {
                CREATURE_DEFAULT_MAX_AP
            });

            combatants.push(Combatant {
                token_id: token.token_id.clone(),
                creature_id,
                name: record.name.clone(),
                token_icon: record.token_icon.clone(),
                token_border: record.token_border.clone(),
                d20_roll,
                agility_mod: ability_modifier(record.agility),
                initiative_mod,
                initiative,
                current_action_points: action_points_for_initiative(initiative),
                max_action_points,
                is_character_token,
                current_hp: None,
                current_mana: None,
            });
        }

        if combatants.is_empty() {
            // Nothing resolved: complete without entering combat.
            return Ok(CombatStarted { started: false, rolls: Vec::new() });
        }

        // Stable sort keeps nomination order among initiative ties.
        combatants.sort_by(|a, b| b.initiative.cmp(&a.initiative));

        let mut turn_timers = HashMap::with_capacity(combatants.len());
        for combatant in combatants.iter().skip(1) {
            turn_timers.insert(combatant.token_id.clone(), TurnTimer::idle());
        }
        if let Some(first) = combatants.first() {
            turn_timers.insert(first.token_id.clone(), TurnTimer::running(self.now_ms));
        }

        let rolls = combatants
            .iter()
            .map(|c| InitiativeRoll {
                token_id: c.token_id.clone(),
                name: c.name.clone(),
                d20_roll: c.d20_roll,
                modifier: c.initiative_mod,
                total: c.initiative,
            })
            .collect();

        state.is_in_combat = true;
        state.is_selection_mode = false;
        state.round = 1;
        state.current_turn_index = 0;
        state.selected_tokens.clear();
        state.combat_timeline = project_timeline(&combatants, 0, TIMELINE_ROUNDS_AHEAD);
        state.turn_timers = turn_timers;
        state.turn_movement_used.clear();
        state.movement_unlocked.clear();
        state.turn_start_positions.clear();
        state.temp_movement_distance.clear();
        state.active_movement = None;
        state.pending_confirmation = None;
        state.turn_order = combatants;

        Ok(CombatStarted { started: true, rolls })
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        debug_assert!(
            !state.is_in_combat || !state.turn_order.is_empty(),
            "a started session must have combatants"
        );
        debug_assert_eq!(state.round, 1, "combat must start at round 1");
        Ok(())
    }
}
