//! Engine-level error types wrapping per-action failures.

use std::fmt;

use crate::action::{
    ActionTransition, BeginMovementAction, CancelMovementAction, CancelSelectionAction,
    ConfirmMoveAction, EndCombatAction, ForceResetAction, NextTurnAction, RecordFreeMoveAction,
    ReorderTurnOrderAction, RequestMoveConfirmationAction, SpendActionPointsAction,
    StartCombatAction, StartSelectionAction, ToggleTokenSelectionAction, UpdateInitiativeAction,
    UpdateMovementPreviewAction, ValidateMoveAction,
};
use crate::error::{CombatError, ErrorSeverity};

/// Phase of the transition pipeline where an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre-validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post-validate",
        }
    }
}

impl fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transition failure tagged with the phase that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: fmt::Display> fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} phase: {}", self.phase, self.error)
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for TransitionPhaseError<E> {}

/// Failure to execute an action, by action kind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("start combat action failed: {0}")]
    StartCombat(TransitionPhaseError<<StartCombatAction as ActionTransition>::Error>),
    #[error("next turn action failed: {0}")]
    NextTurn(TransitionPhaseError<<NextTurnAction as ActionTransition>::Error>),
    #[error("end combat action failed: {0}")]
    EndCombat(TransitionPhaseError<<EndCombatAction as ActionTransition>::Error>),
    #[error("force reset action failed: {0}")]
    ForceReset(TransitionPhaseError<<ForceResetAction as ActionTransition>::Error>),
    #[error("start selection action failed: {0}")]
    StartSelection(TransitionPhaseError<<StartSelectionAction as ActionTransition>::Error>),
    #[error("cancel selection action failed: {0}")]
    CancelSelection(TransitionPhaseError<<CancelSelectionAction as ActionTransition>::Error>),
    #[error("toggle token selection action failed: {0}")]
    ToggleTokenSelection(
        TransitionPhaseError<<ToggleTokenSelectionAction as ActionTransition>::Error>,
    ),
    #[error("reorder turn order action failed: {0}")]
    ReorderTurnOrder(TransitionPhaseError<<ReorderTurnOrderAction as ActionTransition>::Error>),
    #[error("update initiative action failed: {0}")]
    UpdateInitiative(TransitionPhaseError<<UpdateInitiativeAction as ActionTransition>::Error>),
    #[error("spend action points action failed: {0}")]
    SpendActionPoints(TransitionPhaseError<<SpendActionPointsAction as ActionTransition>::Error>),
    #[error("begin movement action failed: {0}")]
    BeginMovement(TransitionPhaseError<<BeginMovementAction as ActionTransition>::Error>),
    #[error("update movement preview action failed: {0}")]
    UpdateMovementPreview(
        TransitionPhaseError<<UpdateMovementPreviewAction as ActionTransition>::Error>,
    ),
    #[error("validate move action failed: {0}")]
    ValidateMove(TransitionPhaseError<<ValidateMoveAction as ActionTransition>::Error>),
    #[error("request move confirmation action failed: {0}")]
    RequestMoveConfirmation(
        TransitionPhaseError<<RequestMoveConfirmationAction as ActionTransition>::Error>,
    ),
    #[error("confirm move action failed: {0}")]
    ConfirmMove(TransitionPhaseError<<ConfirmMoveAction as ActionTransition>::Error>),
    #[error("record free move action failed: {0}")]
    RecordFreeMove(TransitionPhaseError<<RecordFreeMoveAction as ActionTransition>::Error>),
    #[error("cancel movement action failed: {0}")]
    CancelMovement(TransitionPhaseError<<CancelMovementAction as ActionTransition>::Error>),
}

impl ExecuteError {
    /// Pipeline phase that produced the failure.
    pub fn phase(&self) -> TransitionPhase {
        match self {
            ExecuteError::StartCombat(e) => e.phase,
            ExecuteError::NextTurn(e) => e.phase,
            ExecuteError::EndCombat(e) => e.phase,
            ExecuteError::ForceReset(e) => e.phase,
            ExecuteError::StartSelection(e) => e.phase,
            ExecuteError::CancelSelection(e) => e.phase,
            ExecuteError::ToggleTokenSelection(e) => e.phase,
            ExecuteError::ReorderTurnOrder(e) => e.phase,
            ExecuteError::UpdateInitiative(e) => e.phase,
            ExecuteError::SpendActionPoints(e) => e.phase,
            ExecuteError::BeginMovement(e) => e.phase,
            ExecuteError::UpdateMovementPreview(e) => e.phase,
            ExecuteError::ValidateMove(e) => e.phase,
            ExecuteError::RequestMoveConfirmation(e) => e.phase,
            ExecuteError::ConfirmMove(e) => e.phase,
            ExecuteError::RecordFreeMove(e) => e.phase,
            ExecuteError::CancelMovement(e) => e.phase,
        }
    }

    /// Severity of the underlying action error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ExecuteError::StartCombat(e) => e.error.severity(),
            ExecuteError::NextTurn(e) => e.error.severity(),
            ExecuteError::EndCombat(e) => e.error.severity(),
            ExecuteError::ForceReset(e) => e.error.severity(),
            ExecuteError::StartSelection(e) => e.error.severity(),
            ExecuteError::CancelSelection(e) => e.error.severity(),
            ExecuteError::ToggleTokenSelection(e) => e.error.severity(),
            ExecuteError::ReorderTurnOrder(e) => e.error.severity(),
            ExecuteError::UpdateInitiative(e) => e.error.severity(),
            ExecuteError::SpendActionPoints(e) => e.error.severity(),
            ExecuteError::BeginMovement(e) => e.error.severity(),
            ExecuteError::UpdateMovementPreview(e) => e.error.severity(),
            ExecuteError::ValidateMove(e) => e.error.severity(),
            ExecuteError::RequestMoveConfirmation(e) => e.error.severity(),
            ExecuteError::ConfirmMove(e) => e.error.severity(),
            ExecuteError::RecordFreeMove(e) => e.error.severity(),
            ExecuteError::CancelMovement(e) => e.error.severity(),
        }
    }
}
