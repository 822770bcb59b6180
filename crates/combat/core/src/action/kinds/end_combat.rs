//! Session teardown.

use serde::{Deserialize, Serialize};

use crate::action::ActionTransition;
use crate::env::CombatEnv;
use crate::error::NeverError;
use crate::state::CombatState;

/// Ends the encounter and clears every session structure.
///
/// Idempotent: ending while no combat is running is a no-op that still
/// reports success.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndCombatAction;

impl ActionTransition for EndCombatAction {
    type Error = NeverError;
    type Result = ();

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), NeverError> {
        state.reset_session();
        Ok(())
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), NeverError> {
        debug_assert!(!state.is_in_combat);
        debug_assert!(state.turn_order.is_empty() && state.turn_timers.is_empty());
        Ok(())
    }
}

/// Unconditional recovery reset for degraded sessions.
///
/// Same teardown as [`EndCombatAction`]; hosts route it separately so it can
/// skip announcements and run even when ordinary actions are rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceResetAction;

impl ActionTransition for ForceResetAction {
    type Error = NeverError;
    type Result = ();

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), NeverError> {
        state.reset_session();
        Ok(())
    }
}
