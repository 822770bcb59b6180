//! Action domain for the combat engine.
//!
//! Every mutation of [`CombatState`] is expressed as an [`Action`] value
//! routed through the engine's three-phase pipeline. Outcomes are typed
//! [`ActionResult`]s so hosts can publish events and notifications without
//! re-deriving what happened.

pub mod kinds;

pub use kinds::{
    ActionPointsSpent, BeginMovementAction, CancelMovementAction, CancelSelectionAction,
    CombatStarted, ConfirmMoveAction, EconomyError, EndCombatAction, ForceResetAction,
    InitiativeUpdated, MoveConfirmed, MoveRejection, MoveValidation, MovementError,
    NextTurnAction, OrderError, RecordFreeMoveAction, ReorderTurnOrderAction,
    RequestMoveConfirmationAction, SelectionError, SpendActionPointsAction, StartCombatAction,
    StartCombatError, StartSelectionAction, ToggleTokenSelectionAction, TokenRef, TurnAdvanced,
    TurnError,
    TurnSideEffects, UpdateInitiativeAction, UpdateMovementPreviewAction, ValidateMoveAction,
};

use serde::{Deserialize, Serialize};

use crate::env::CombatEnv;
use crate::state::{CombatState, TokenId};

/// Defines how a concrete action mutates combat state.
///
/// Implementations are pure with respect to their inputs: all randomness
/// comes through the environment's RNG oracle and all timing through
/// explicit timestamps on the action itself.
pub trait ActionTransition {
    type Error;
    type Result;

    /// Validates pre-conditions against the state before mutation.
    fn pre_validate(&self, _state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the combat state.
    fn apply(
        &self,
        state: &mut CombatState,
        env: &CombatEnv<'_>,
    ) -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions against the state after mutation.
    fn post_validate(&self, _state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Top-level action enum covering every state mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    StartCombat(StartCombatAction),
    NextTurn(NextTurnAction),
    EndCombat(EndCombatAction),
    ForceReset(ForceResetAction),
    StartSelection(StartSelectionAction),
    CancelSelection(CancelSelectionAction),
    ToggleTokenSelection(ToggleTokenSelectionAction),
    ReorderTurnOrder(ReorderTurnOrderAction),
    UpdateInitiative(UpdateInitiativeAction),
    SpendActionPoints(SpendActionPointsAction),
    BeginMovement(BeginMovementAction),
    UpdateMovementPreview(UpdateMovementPreviewAction),
    ValidateMove(ValidateMoveAction),
    RequestMoveConfirmation(RequestMoveConfirmationAction),
    ConfirmMove(ConfirmMoveAction),
    RecordFreeMove(RecordFreeMoveAction),
    CancelMovement(CancelMovementAction),
}

impl Action {
    /// snake_case name for logs and event payloads.
    pub fn as_snake_case(&self) -> &'static str {
        match self {
            Action::StartCombat(_) => "start_combat",
            Action::NextTurn(_) => "next_turn",
            Action::EndCombat(_) => "end_combat",
            Action::ForceReset(_) => "force_reset",
            Action::StartSelection(_) => "start_selection",
            Action::CancelSelection(_) => "cancel_selection",
            Action::ToggleTokenSelection(_) => "toggle_token_selection",
            Action::ReorderTurnOrder(_) => "reorder_turn_order",
            Action::UpdateInitiative(_) => "update_initiative",
            Action::SpendActionPoints(_) => "spend_action_points",
            Action::BeginMovement(_) => "begin_movement",
            Action::UpdateMovementPreview(_) => "update_movement_preview",
            Action::ValidateMove(_) => "validate_move",
            Action::RequestMoveConfirmation(_) => "request_move_confirmation",
            Action::ConfirmMove(_) => "confirm_move",
            Action::RecordFreeMove(_) => "record_free_move",
            Action::CancelMovement(_) => "cancel_movement",
        }
    }
}

/// One combatant's initiative roll, in notification-ready form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeRoll {
    pub token_id: TokenId,
    pub name: String,
    pub d20_roll: u32,
    pub modifier: i32,
    pub total: i32,
}

/// Typed outcome of executing an action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionResult {
    CombatStarted(CombatStarted),
    TurnAdvanced(TurnAdvanced),
    CombatEnded,
    CombatReset,
    /// Selection-mode changes carry no payload.
    Selection,
    TurnOrderChanged,
    InitiativeUpdated(InitiativeUpdated),
    ActionPointsSpent(ActionPointsSpent),
    /// Gesture bookkeeping (begin, preview, cancel, queue confirmation).
    MovementGesture,
    MoveValidated(MoveValidation),
    MoveConfirmed(MoveConfirmed),
}
