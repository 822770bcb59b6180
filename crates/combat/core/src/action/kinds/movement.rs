//! Movement gesture pipeline: preview, validation, confirmation.
//!
//! Movement is unlock-based. A combatant's first move of the turn costs one
//! action point and unlocks a budget of one speed's worth of feet; moves
//! inside the already-paid budget are free, and pushing past it asks for
//! more points, one per additional speed segment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::ActionTransition;
use crate::env::{CombatEnv, OracleError};
use crate::error::{CombatError, ErrorSeverity, NeverError};
use crate::rules::movement_feet;
use crate::state::{ActiveMovement, CombatState, PendingMoveConfirmation, Position, TokenId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MovementError {
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CombatError for MovementError {
    fn severity(&self) -> ErrorSeverity {
        let MovementError::Oracle(error) = self;
        error.severity()
    }
}

/// Why a proposed move was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveRejection {
    TokenNotInCombat,
    CreatureNotFound,
    InsufficientActionPoints,
}

impl MoveRejection {
    /// Prompt-ready description.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveRejection::TokenNotInCombat => "Token not in combat",
            MoveRejection::CreatureNotFound => "Creature data not found",
            MoveRejection::InsufficientActionPoints => "Insufficient Action Points",
        }
    }
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quoted cost and validity of one proposed drag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveValidation {
    pub is_valid: bool,
    /// Feet this drag alone covers.
    pub current_move_feet: f64,
    /// Cumulative feet for the turn if the drag commits.
    pub total_after_feet: f64,
    /// Feet already committed before this drag.
    pub used_before_feet: f64,
    /// Unspent feet inside the already-paid budget.
    pub remaining_budget_feet: f64,
    pub speed_feet: f64,
    pub current_action_points: u32,
    /// Points the drag would cost on top of what is already paid.
    pub additional_ap_needed: u32,
    /// Speed segments the turn total would occupy after the drag.
    pub segments_needed: u32,
    pub segments_already_paid: u32,
    /// True when committing the drag must go through player confirmation.
    pub needs_confirmation: bool,
    pub rejection: Option<MoveRejection>,
}

impl MoveValidation {
    fn rejected(rejection: MoveRejection) -> Self {
        Self {
            is_valid: false,
            rejection: Some(rejection),
            ..Self::default()
        }
    }

    /// Prompt-ready reason when the move is rejected.
    pub fn reason(&self) -> Option<&'static str> {
        self.rejection.map(|r| r.as_str())
    }
}

/// Checks a proposed drag and quotes its action-point cost.
///
/// Never errors on player mistakes: unknown tokens, missing stats, and
/// unaffordable moves all come back as rejected validations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidateMoveAction {
    pub token_id: TokenId,
    /// Where the token stood when the drag started.
    pub drag_start: Position,
    pub end_position: Position,
}

impl ActionTransition for ValidateMoveAction {
    type Error = MovementError;
    type Result = MoveValidation;

    fn apply(
        &self,
        state: &mut CombatState,
        env: &CombatEnv<'_>,
    ) -> Result<MoveValidation, Self::Error> {
        let Some(combatant) = state.combatant(&self.token_id).cloned() else {
            return Ok(MoveValidation::rejected(MoveRejection::TokenNotInCombat));
        };
        let Some(record) = env.combatant_creature(&combatant)? else {
            return Ok(MoveValidation::rejected(MoveRejection::CreatureNotFound));
        };

        // First validation of the turn pins where the token started.
        state
            .turn_start_positions
            .entry(self.token_id.clone())
            .or_insert(self.drag_start);

        let current_move_feet = movement_feet(self.drag_start, self.end_position);
        let used_before_feet = state.movement_used(&self.token_id);
        let total_after_feet = used_before_feet + current_move_feet;

        let speed_feet = record.speed();
        let current_action_points = combatant.current_action_points;

        let first_move =
            !state.is_movement_unlocked(&self.token_id) || used_before_feet == 0.0;
        let (additional_ap_needed, needs_confirmation) = if first_move {
            (1, true)
        } else {
            let unlocked = state.unlocked_movement(&self.token_id, speed_feet);
            if total_after_feet > unlocked {
                let excess = total_after_feet - unlocked;
                ((excess / speed_feet).ceil() as u32, true)
            } else {
                (0, false)
            }
        };

        let is_valid = current_action_points >= additional_ap_needed;
        let segments_already_paid = (used_before_feet / speed_feet).ceil() as u32;
        let segments_needed = (total_after_feet / speed_feet).ceil() as u32;

        Ok(MoveValidation {
            is_valid,
            current_move_feet,
            total_after_feet,
            used_before_feet,
            remaining_budget_feet: (f64::from(segments_already_paid) * speed_feet
                - used_before_feet)
                .max(0.0),
            speed_feet,
            current_action_points,
            additional_ap_needed,
            segments_needed,
            segments_already_paid,
            needs_confirmation,
            rejection: if is_valid {
                None
            } else {
                Some(MoveRejection::InsufficientActionPoints)
            },
        })
    }
}

/// Begins a drag gesture for range visualization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeginMovementAction {
    pub token_id: TokenId,
    pub start_position: Position,
}

impl ActionTransition for BeginMovementAction {
    type Error = NeverError;
    type Result = ();

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), NeverError> {
        state.active_movement = Some(ActiveMovement {
            token_id: self.token_id.clone(),
            start_position: self.start_position,
            current_position: self.start_position,
        });
        state
            .temp_movement_distance
            .insert(self.token_id.clone(), 0.0);
        Ok(())
    }
}

/// Updates the in-flight gesture's position and provisional distance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateMovementPreviewAction {
    pub token_id: TokenId,
    pub position: Position,
    pub distance_feet: f64,
}

impl ActionTransition for UpdateMovementPreviewAction {
    type Error = NeverError;
    type Result = ();

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), NeverError> {
        if let Some(active) = state.active_movement.as_mut() {
            if active.token_id == self.token_id {
                active.current_position = self.position;
            }
        }
        state
            .temp_movement_distance
            .insert(self.token_id.clone(), self.distance_feet);
        Ok(())
    }
}

/// Queues a proposed move for player approval.
///
/// Only one confirmation can be pending; a new request replaces the old.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestMoveConfirmationAction {
    pub confirmation: PendingMoveConfirmation,
}

impl ActionTransition for RequestMoveConfirmationAction {
    type Error = NeverError;
    type Result = ();

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), NeverError> {
        state.pending_confirmation = Some(self.confirmation.clone());
        Ok(())
    }
}

/// Commits a confirmed move.
///
/// The cost and the new cumulative distance are the ones quoted by the
/// validation the player just approved, so this transition trusts them:
/// it spends the points (flooring at zero), fixes the turn's committed
/// distance, unlocks movement, and clears the gesture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmMoveAction {
    pub token_id: TokenId,
    pub ap_cost: u32,
    pub total_distance_feet: f64,
}

/// Outcome of committing a move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveConfirmed {
    pub token_id: TokenId,
    pub ap_cost: u32,
    pub total_distance_feet: f64,
    pub remaining_action_points: u32,
}

impl ActionTransition for ConfirmMoveAction {
    type Error = NeverError;
    type Result = MoveConfirmed;

    fn apply(
        &self,
        state: &mut CombatState,
        _env: &CombatEnv<'_>,
    ) -> Result<MoveConfirmed, NeverError> {
        let remaining = match state.combatant_mut(&self.token_id) {
            Some(combatant) => {
                combatant.current_action_points =
                    combatant.current_action_points.saturating_sub(self.ap_cost);
                combatant.current_action_points
            }
            None => 0,
        };

        // Committed distance is replaced, not accumulated: the quote already
        // contains the whole turn's total.
        state
            .turn_movement_used
            .insert(self.token_id.clone(), self.total_distance_feet);
        state.movement_unlocked.insert(self.token_id.clone());
        state
            .temp_movement_distance
            .insert(self.token_id.clone(), 0.0);
        state.active_movement = None;
        state.pending_confirmation = None;

        Ok(MoveConfirmed {
            token_id: self.token_id.clone(),
            ap_cost: self.ap_cost,
            total_distance_feet: self.total_distance_feet,
            remaining_action_points: remaining,
        })
    }
}

/// Adds distance for a move that stayed inside the unlocked budget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordFreeMoveAction {
    pub token_id: TokenId,
    pub distance_feet: f64,
}

impl ActionTransition for RecordFreeMoveAction {
    type Error = NeverError;
    type Result = ();

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), NeverError> {
        *state
            .turn_movement_used
            .entry(self.token_id.clone())
            .or_insert(0.0) += self.distance_feet;
        Ok(())
    }
}

/// Abandons the gesture: clears the preview, any pending confirmation, and
/// the token's provisional distance. Committed movement is untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelMovementAction {
    pub token_id: TokenId,
}

impl ActionTransition for CancelMovementAction {
    type Error = NeverError;
    type Result = ();

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), NeverError> {
        state.active_movement = None;
        state.pending_confirmation = None;
        state.temp_movement_distance.remove(&self.token_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{
        ScriptedDice, StaticCreatures, TestOracles, creature, started_state, token,
    };
    use super::*;
    use crate::rules::TILE_SIZE_PX;

    fn tiles(x: i32, y: i32) -> Position {
        Position::new(f64::from(x) * TILE_SIZE_PX, f64::from(y) * TILE_SIZE_PX)
    }

    fn one_started() -> (TestOracles, CombatState) {
        let mut oracles = TestOracles::new();
        oracles.creatures = StaticCreatures::new().with("goblin", creature("Goblin", 14));
        // 16 total: three action points, speed 30.
        oracles.dice = ScriptedDice::new([14]);
        let state = started_state(&oracles, vec![token("a", "goblin")], 0);
        (oracles, state)
    }

    fn validate(
        state: &mut CombatState,
        oracles: &TestOracles,
        token_id: &str,
        from: Position,
        to: Position,
    ) -> MoveValidation {
        ValidateMoveAction {
            token_id: TokenId::from(token_id),
            drag_start: from,
            end_position: to,
        }
        .apply(state, &oracles.env())
        .unwrap()
    }

    #[test]
    fn first_move_costs_one_point_and_needs_confirmation() {
        let (oracles, mut state) = one_started();
        let validation = validate(&mut state, &oracles, "a", tiles(0, 0), tiles(3, 0));

        assert!(validation.is_valid);
        assert_eq!(validation.current_move_feet, 15.0);
        assert_eq!(validation.total_after_feet, 15.0);
        assert_eq!(validation.additional_ap_needed, 1);
        assert!(validation.needs_confirmation);
        assert_eq!(validation.rejection, None);
    }

    #[test]
    fn moves_inside_the_paid_budget_are_free() {
        let (oracles, mut state) = one_started();
        let a = TokenId::from("a");
        state.movement_unlocked.insert(a.clone());
        state.turn_movement_used.insert(a.clone(), 10.0);

        let validation = validate(&mut state, &oracles, "a", tiles(0, 0), tiles(3, 0));

        assert!(validation.is_valid);
        assert_eq!(validation.total_after_feet, 25.0);
        assert_eq!(validation.additional_ap_needed, 0);
        assert!(!validation.needs_confirmation);
        assert_eq!(validation.segments_already_paid, 1);
        assert_eq!(validation.segments_needed, 1);
        assert_eq!(validation.remaining_budget_feet, 20.0);
    }

    #[test]
    fn pushing_past_the_budget_asks_for_more_points() {
        let (oracles, mut state) = one_started();
        let a = TokenId::from("a");
        state.movement_unlocked.insert(a.clone());
        state.turn_movement_used.insert(a.clone(), 25.0);

        // 20 more feet: total 45 exceeds the 30-foot budget by 15.
        let validation = validate(&mut state, &oracles, "a", tiles(0, 0), tiles(0, 4));

        assert!(validation.is_valid);
        assert_eq!(validation.additional_ap_needed, 1);
        assert!(validation.needs_confirmation);
        assert_eq!(validation.segments_needed, 2);
        assert_eq!(validation.segments_already_paid, 1);
    }

    #[test]
    fn unaffordable_moves_are_rejected_in_band() {
        let (oracles, mut state) = one_started();
        state.turn_order[0].current_action_points = 0;

        let validation = validate(&mut state, &oracles, "a", tiles(0, 0), tiles(1, 0));

        assert!(!validation.is_valid);
        assert_eq!(validation.additional_ap_needed, 1);
        assert_eq!(validation.rejection, Some(MoveRejection::InsufficientActionPoints));
        assert_eq!(validation.reason(), Some("Insufficient Action Points"));
    }

    #[test]
    fn unknown_token_and_missing_creature_reject_without_erroring() {
        let (oracles, mut state) = one_started();

        let validation = validate(&mut state, &oracles, "ghost", tiles(0, 0), tiles(1, 0));
        assert_eq!(validation.rejection, Some(MoveRejection::TokenNotInCombat));
        assert_eq!(validation.reason(), Some("Token not in combat"));

        // Same roster, but the creature library lost the backing record.
        let empty_oracles = TestOracles::new();
        let validation = validate(&mut state, &empty_oracles, "a", tiles(0, 0), tiles(1, 0));
        assert_eq!(validation.rejection, Some(MoveRejection::CreatureNotFound));
        assert_eq!(validation.reason(), Some("Creature data not found"));
    }

    #[test]
    fn first_validation_pins_the_turn_start_position() {
        let (oracles, mut state) = one_started();
        let a = TokenId::from("a");

        validate(&mut state, &oracles, "a", tiles(2, 2), tiles(3, 2));
        assert_eq!(state.turn_start_positions.get(&a), Some(&tiles(2, 2)));

        // A later drag from elsewhere does not overwrite the pin.
        validate(&mut state, &oracles, "a", tiles(5, 5), tiles(6, 5));
        assert_eq!(state.turn_start_positions.get(&a), Some(&tiles(2, 2)));
    }

    #[test]
    fn zero_used_but_unlocked_is_treated_as_a_first_move() {
        let (oracles, mut state) = one_started();
        state.movement_unlocked.insert(TokenId::from("a"));

        let validation = validate(&mut state, &oracles, "a", tiles(0, 0), tiles(1, 0));
        assert_eq!(validation.additional_ap_needed, 1);
        assert!(validation.needs_confirmation);
    }

    #[test]
    fn confirm_replaces_distance_and_clears_the_gesture() {
        let (oracles, mut state) = one_started();
        let a = TokenId::from("a");

        BeginMovementAction { token_id: a.clone(), start_position: tiles(0, 0) }
            .apply(&mut state, &oracles.env())
            .unwrap();
        UpdateMovementPreviewAction {
            token_id: a.clone(),
            position: tiles(3, 0),
            distance_feet: 15.0,
        }
        .apply(&mut state, &oracles.env())
        .unwrap();
        assert_eq!(state.active_movement.as_ref().unwrap().current_position, tiles(3, 0));
        assert_eq!(state.temp_movement_distance.get(&a), Some(&15.0));

        let confirmed = ConfirmMoveAction {
            token_id: a.clone(),
            ap_cost: 1,
            total_distance_feet: 15.0,
        }
        .apply(&mut state, &oracles.env())
        .unwrap();

        assert_eq!(confirmed.remaining_action_points, 2);
        assert_eq!(state.turn_movement_used.get(&a), Some(&15.0));
        assert!(state.movement_unlocked.contains(&a));
        assert_eq!(state.temp_movement_distance.get(&a), Some(&0.0));
        assert!(state.active_movement.is_none());
        assert!(state.pending_confirmation.is_none());

        // A second confirm fixes the new total rather than adding to it.
        ConfirmMoveAction {
            token_id: a.clone(),
            ap_cost: 1,
            total_distance_feet: 40.0,
        }
        .apply(&mut state, &oracles.env())
        .unwrap();
        assert_eq!(state.turn_movement_used.get(&a), Some(&40.0));
    }

    #[test]
    fn free_moves_accumulate() {
        let (oracles, mut state) = one_started();
        let a = TokenId::from("a");

        RecordFreeMoveAction { token_id: a.clone(), distance_feet: 10.0 }
            .apply(&mut state, &oracles.env())
            .unwrap();
        RecordFreeMoveAction { token_id: a.clone(), distance_feet: 5.0 }
            .apply(&mut state, &oracles.env())
            .unwrap();

        assert_eq!(state.turn_movement_used.get(&a), Some(&15.0));
    }

    #[test]
    fn cancel_clears_ephemera_but_not_committed_distance() {
        let (oracles, mut state) = one_started();
        let a = TokenId::from("a");
        state.turn_movement_used.insert(a.clone(), 20.0);

        BeginMovementAction { token_id: a.clone(), start_position: tiles(0, 0) }
            .apply(&mut state, &oracles.env())
            .unwrap();
        RequestMoveConfirmationAction {
            confirmation: PendingMoveConfirmation {
                token_id: a.clone(),
                start_position: tiles(0, 0),
                target_position: tiles(4, 0),
                distance_feet: 20.0,
                total_after_feet: 40.0,
                required_ap: 1,
            },
        }
        .apply(&mut state, &oracles.env())
        .unwrap();
        assert!(state.pending_confirmation.is_some());

        CancelMovementAction { token_id: a.clone() }
            .apply(&mut state, &oracles.env())
            .unwrap();

        assert!(state.active_movement.is_none());
        assert!(state.pending_confirmation.is_none());
        assert!(!state.temp_movement_distance.contains_key(&a));
        assert_eq!(state.turn_movement_used.get(&a), Some(&20.0));
    }

    #[test]
    fn preview_ignores_positions_from_other_tokens() {
        let (oracles, mut state) = one_started();
        let a = TokenId::from("a");

        BeginMovementAction { token_id: a.clone(), start_position: tiles(0, 0) }
            .apply(&mut state, &oracles.env())
            .unwrap();
        UpdateMovementPreviewAction {
            token_id: TokenId::from("b"),
            position: tiles(9, 9),
            distance_feet: 5.0,
        }
        .apply(&mut state, &oracles.env())
        .unwrap();

        let active = state.active_movement.as_ref().unwrap();
        assert_eq!(active.current_position, tiles(0, 0));
        assert_eq!(state.temp_movement_distance.get(&TokenId::from("b")), Some(&5.0));
    }
}
