//! Action execution pipeline.
//!
//! The [`CombatEngine`] is the authoritative reducer for [`CombatState`]:
//! every mutation flows through [`CombatEngine::execute`], which routes the
//! action through its three-phase transition and bumps the action nonce on
//! success so seed derivation marches forward.

mod errors;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::{Action, ActionResult};
use crate::env::CombatEnv;
use crate::state::CombatState;

/// Combat engine executing actions against a mutable session state.
pub struct CombatEngine<'a> {
    state: &'a mut CombatState,
}

impl<'a> CombatEngine<'a> {
    pub fn new(state: &'a mut CombatState) -> Self {
        Self { state }
    }

    /// Executes one action through pre-validate, apply, post-validate.
    ///
    /// The nonce increments only after success, so rejected actions never
    /// perturb later dice rolls.
    pub fn execute(
        &mut self,
        env: &CombatEnv<'_>,
        action: &Action,
    ) -> Result<ActionResult, ExecuteError> {
        let result = transition::execute_transition(action, self.state, env)?;
        self.state.action_nonce += 1;
        Ok(result)
    }

    /// Read access to the underlying state.
    pub fn state(&self) -> &CombatState {
        self.state
    }
}
