//! Three-phase transition driver.

use crate::action::{Action, ActionResult, ActionTransition};
use crate::env::CombatEnv;
use crate::state::CombatState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Drives one transition through pre-validate, apply, post-validate,
/// tagging any failure with the phase that produced it.
fn drive<T: ActionTransition>(
    action: &T,
    state: &mut CombatState,
    env: &CombatEnv<'_>,
) -> Result<T::Result, TransitionPhaseError<T::Error>> {
    action
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;
    let result = action
        .apply(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;
    action
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;
    Ok(result)
}

/// Routes an action value to its transition and wraps the outcome.
pub(super) fn execute_transition(
    action: &Action,
    state: &mut CombatState,
    env: &CombatEnv<'_>,
) -> Result<ActionResult, ExecuteError> {
    match action {
        Action::StartCombat(action) => drive(action, state, env)
            .map(ActionResult::CombatStarted)
            .map_err(ExecuteError::StartCombat),
        Action::NextTurn(action) => drive(action, state, env)
            .map(ActionResult::TurnAdvanced)
            .map_err(ExecuteError::NextTurn),
        Action::EndCombat(action) => drive(action, state, env)
            .map(|()| ActionResult::CombatEnded)
            .map_err(ExecuteError::EndCombat),
        Action::ForceReset(action) => drive(action, state, env)
            .map(|()| ActionResult::CombatReset)
            .map_err(ExecuteError::ForceReset),
        Action::StartSelection(action) => drive(action, state, env)
            .map(|()| ActionResult::Selection)
            .map_err(ExecuteError::StartSelection),
        Action::CancelSelection(action) => drive(action, state, env)
            .map(|()| ActionResult::Selection)
            .map_err(ExecuteError::CancelSelection),
        Action::ToggleTokenSelection(action) => drive(action, state, env)
            .map(|()| ActionResult::Selection)
            .map_err(ExecuteError::ToggleTokenSelection),
        Action::ReorderTurnOrder(action) => drive(action, state, env)
            .map(|()| ActionResult::TurnOrderChanged)
            .map_err(ExecuteError::ReorderTurnOrder),
        Action::UpdateInitiative(action) => drive(action, state, env)
            .map(ActionResult::InitiativeUpdated)
            .map_err(ExecuteError::UpdateInitiative),
        Action::SpendActionPoints(action) => drive(action, state, env)
            .map(ActionResult::ActionPointsSpent)
            .map_err(ExecuteError::SpendActionPoints),
        Action::BeginMovement(action) => drive(action, state, env)
            .map(|()| ActionResult::MovementGesture)
            .map_err(ExecuteError::BeginMovement),
        Action::UpdateMovementPreview(action) => drive(action, state, env)
            .map(|()| ActionResult::MovementGesture)
            .map_err(ExecuteError::UpdateMovementPreview),
        Action::ValidateMove(action) => drive(action, state, env)
            .map(ActionResult::MoveValidated)
            .map_err(ExecuteError::ValidateMove),
        Action::RequestMoveConfirmation(action) => drive(action, state, env)
            .map(|()| ActionResult::MovementGesture)
            .map_err(ExecuteError::RequestMoveConfirmation),
        Action::ConfirmMove(action) => drive(action, state, env)
            .map(ActionResult::MoveConfirmed)
            .map_err(ExecuteError::ConfirmMove),
        Action::RecordFreeMove(action) => drive(action, state, env)
            .map(|()| ActionResult::MovementGesture)
            .map_err(ExecuteError::RecordFreeMove),
        Action::CancelMovement(action) => drive(action, state, env)
            .map(|()| ActionResult::MovementGesture)
            .map_err(ExecuteError::CancelMovement),
    }
}
