//! Turn advancement: ledger purge, timer hand-off, re-roll, effect ticks,
//! and regen.

use serde::{Deserialize, Serialize};

use crate::action::{ActionTransition, InitiativeRoll};
use crate::env::{CombatEnv, OracleError, RegenApplied, TickTrigger, compute_seed, token_entropy};
use crate::error::{CombatError, ErrorSeverity};
use crate::rules::restored_action_points;
use crate::state::{CombatState, TokenId, TurnTimer};

/// Ends the current combatant's turn and hands the round to the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextTurnAction {
    /// Wall-clock moment of the hand-off, in Unix milliseconds.
    pub now_ms: u64,
}

/// Best-effort collaborator outcomes recorded while the turn changed.
///
/// Failures are kept as display strings so the host can log them; they never
/// block the hand-off itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSideEffects {
    pub buffs_ticked: u32,
    pub debuffs_ticked: u32,
    /// Over-time effects fired across every trigger during the hand-off.
    pub over_time_ticked: u32,
    /// Turn-based ability cooldowns still counting down after the tick.
    pub cooldowns_pending: u32,
    pub regen: Option<RegenApplied>,
    pub failures: Vec<String>,
}

/// Fires over-time effects on a target and folds the outcome into the
/// side-effect record.
fn tick_over_time(
    env: &CombatEnv<'_>,
    target: &TokenId,
    trigger: TickTrigger,
    side_effects: &mut TurnSideEffects,
) {
    match env.over_time().map(|o| o.process_over_time(target, trigger)) {
        Ok(Ok(count)) => side_effects.over_time_ticked += count,
        Ok(Err(error)) => side_effects
            .failures
            .push(format!("over-time ({}): {error}", trigger.as_str())),
        Err(error) => side_effects
            .failures
            .push(format!("over-time ({}): {error}", trigger.as_str())),
    }
}

/// Outcome of advancing the turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnAdvanced {
    /// Whose turn just ended; absent only if the turn index was out of
    /// range, which a well-formed session never produces.
    pub ended_token: Option<TokenId>,
    pub next_token: TokenId,
    pub round: u32,
    pub current_turn_index: usize,
    /// True when the hand-off wrapped into a new round.
    pub round_advanced: bool,
    /// The next combatant's fresh initiative roll.
    pub roll: InitiativeRoll,
    pub restored_action_points: u32,
    pub side_effects: TurnSideEffects,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("combat is not running")]
    NotInCombat,
    #[error("no combatants in the turn order")]
    NoCombatants,
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CombatError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::NotInCombat => ErrorSeverity::Validation,
            // In combat with nobody seated means the session is degraded.
            TurnError::NoCombatants => ErrorSeverity::Fatal,
            TurnError::Oracle(error) => error.severity(),
        }
    }
}

impl ActionTransition for NextTurnAction {
    type Error = TurnError;
    type Result = TurnAdvanced;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if !state.is_in_combat {
            return Err(TurnError::NotInCombat);
        }
        if state.turn_order.is_empty() {
            return Err(TurnError::NoCombatants);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut CombatState,
        env: &CombatEnv<'_>,
    ) -> Result<TurnAdvanced, TurnError> {
        let rng = env.rng()?;
        let now_ms = self.now_ms;

        let ended_token = state
            .turn_order
            .get(state.current_turn_index)
            .map(|c| c.token_id.clone());
        let next_index = (state.current_turn_index + 1) % state.turn_order.len();
        let round_advanced = next_index == 0;
        if round_advanced {
            state.round += 1;
        }

        let mut side_effects = TurnSideEffects::default();

        if let Some(ended_token) = &ended_token {
            state.purge_token_ledgers(ended_token);

            match env.buffs().map(|o| o.decrement_round_durations(ended_token)) {
                Ok(Ok(count)) => side_effects.buffs_ticked = count,
                Ok(Err(error)) => side_effects.failures.push(format!("buff durations: {error}")),
                Err(error) => side_effects.failures.push(format!("buff durations: {error}")),
            }
            match env.debuffs().map(|o| o.decrement_round_durations(ended_token)) {
                Ok(Ok(count)) => side_effects.debuffs_ticked = count,
                Ok(Err(error)) => side_effects
                    .failures
                    .push(format!("debuff durations: {error}")),
                Err(error) => side_effects
                    .failures
                    .push(format!("debuff durations: {error}")),
            }

            tick_over_time(env, ended_token, TickTrigger::TurnEnd, &mut side_effects);

            state
                .turn_timers
                .entry(ended_token.clone())
                .or_insert_with(TurnTimer::idle)
                .stop(now_ms);
        }
        match env.over_time().map(|o| o.tick_cooldowns()) {
            Ok(Ok(count)) => side_effects.cooldowns_pending = count,
            Ok(Err(error)) => side_effects.failures.push(format!("cooldowns: {error}")),
            Err(error) => side_effects.failures.push(format!("cooldowns: {error}")),
        }
        state.active_movement = None;
        state.pending_confirmation = None;

        let next_token = state.turn_order[next_index].token_id.clone();
        tick_over_time(env, &next_token, TickTrigger::TurnStart, &mut side_effects);
        if round_advanced {
            // A completed round ticks round-keyed effects on everyone.
            let roster: Vec<TokenId> =
                state.turn_order.iter().map(|c| c.token_id.clone()).collect();
            for token_id in &roster {
                tick_over_time(env, token_id, TickTrigger::Round, &mut side_effects);
            }
        }
        state
            .turn_timers
            .entry(next_token.clone())
            .or_insert_with(TurnTimer::idle)
            .resume(now_ms);

        // The incoming combatant re-rolls; everyone else keeps their totals.
        let seed = compute_seed(
            state.session_seed,
            state.action_nonce,
            token_entropy(&next_token),
            0,
        );
        let d20_roll = rng.roll_d20(seed);
        let config = state.config.clone();
        let (roll, restored) = {
            let combatant = &mut state.turn_order[next_index];
            let initiative = d20_roll as i32 + combatant.initiative_mod;
            combatant.d20_roll = d20_roll;
            combatant.initiative = initiative;
            combatant.current_action_points =
                restored_action_points(&config, initiative, combatant.max_action_points);
            (
                InitiativeRoll {
                    token_id: next_token.clone(),
                    name: combatant.name.clone(),
                    d20_roll,
                    modifier: combatant.initiative_mod,
                    total: initiative,
                },
                combatant.current_action_points,
            )
        };

        if config.health_regen_enabled || config.mana_regen_enabled {
            let outcome = env.regen().map(|o| {
                o.apply_turn_start_regen(
                    &next_token,
                    config.health_regen_enabled,
                    config.mana_regen_enabled,
                )
            });
            match outcome {
                Ok(Ok(Some(applied))) => {
                    side_effects.regen = Some(applied);
                    if let Some(combatant) = state.combatant_mut(&next_token) {
                        if applied.new_hp.is_some() {
                            combatant.current_hp = applied.new_hp;
                        }
                        if applied.new_mana.is_some() {
                            combatant.current_mana = applied.new_mana;
                        }
                    }
                }
                Ok(Ok(None)) => {}
                Ok(Err(error)) => side_effects.failures.push(format!("regen: {error}")),
                Err(error) => side_effects.failures.push(format!("regen: {error}")),
            }
        }

        state.current_turn_index = next_index;

        Ok(TurnAdvanced {
            ended_token,
            next_token,
            round: state.round,
            current_turn_index: next_index,
            round_advanced,
            roll,
            restored_action_points: restored,
            side_effects,
        })
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        debug_assert!(
            state.current_turn_index < state.turn_order.len(),
            "turn index must stay in range"
        );
        debug_assert!(
            state.pending_confirmation.is_none(),
            "a turn change must clear pending confirmations"
        );
        Ok(())
    }
}
