//! Deterministic combat logic and data types shared across hosts.
//!
//! `combat-core` defines the canonical turn-order and action-economy rules
//! (actions, engine, session state) and exposes pure APIs that can be reused
//! by both the runtime and offline tools. All state mutation flows through
//! [`engine::CombatEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod action;
pub mod engine;
pub mod env;
pub mod error;
pub mod rules;
pub mod state;
pub use action::{
    Action, ActionPointsSpent, ActionResult, ActionTransition, BeginMovementAction,
    CancelMovementAction, CancelSelectionAction, CombatStarted, ConfirmMoveAction, EconomyError,
    EndCombatAction, ForceResetAction, InitiativeRoll, InitiativeUpdated, MoveConfirmed,
    MoveRejection, MoveValidation, MovementError, NextTurnAction, OrderError, RecordFreeMoveAction,
    ReorderTurnOrderAction, RequestMoveConfirmationAction, SelectionError, SpendActionPointsAction,
    StartCombatAction, StartCombatError, StartSelectionAction, ToggleTokenSelectionAction,
    TokenRef, TurnAdvanced, TurnError, TurnSideEffects, UpdateInitiativeAction,
    UpdateMovementPreviewAction, ValidateMoveAction,
};
pub use engine::{CombatEngine, ExecuteError, TransitionPhase, TransitionPhaseError};
pub use env::{
    CharacterOracle, CharacterSheet, CombatEnv, CreatureOracle, CreatureRecord,
    EffectDurationOracle, EffectError, Env, OracleError, OverTimeOracle, PcgRng, RegenApplied,
    RegenOracle, RngOracle, TickTrigger, compute_seed, token_entropy,
};
pub use error::{CombatError, ErrorContext, ErrorSeverity, NeverError};
pub use rules::{
    ability_modifier, action_points_for_initiative, movement_feet, restored_action_points,
    world_to_grid,
};
pub use state::{
    ActiveMovement, ApRestoration, CombatConfig, CombatState, Combatant, CreatureId, MovementInfo,
    PendingMoveConfirmation, Position, SessionSnapshot, TimelineEntry, TimerInfo, TokenId,
    TurnTimer, project_timeline,
};
