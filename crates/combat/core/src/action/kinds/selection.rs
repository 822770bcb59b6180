//! Pre-combat token selection mode.

use serde::{Deserialize, Serialize};

use crate::action::ActionTransition;
use crate::env::CombatEnv;
use crate::error::{CombatError, ErrorSeverity};
use crate::state::{CombatState, TokenId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("selection mode is unavailable while combat is in progress")]
    CombatInProgress,
}

impl CombatError for SelectionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

fn reject_during_combat(state: &CombatState) -> Result<(), SelectionError> {
    if state.is_in_combat {
        return Err(SelectionError::CombatInProgress);
    }
    Ok(())
}

/// Enters selection mode with an empty selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSelectionAction;

impl ActionTransition for StartSelectionAction {
    type Error = SelectionError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        reject_during_combat(state)
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        state.is_selection_mode = true;
        state.selected_tokens.clear();
        Ok(())
    }
}

/// Leaves selection mode, discarding the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelSelectionAction;

impl ActionTransition for CancelSelectionAction {
    type Error = SelectionError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        reject_during_combat(state)
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        state.is_selection_mode = false;
        state.selected_tokens.clear();
        Ok(())
    }
}

/// Adds or removes one token from the current selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleTokenSelectionAction {
    pub token_id: TokenId,
}

impl ActionTransition for ToggleTokenSelectionAction {
    type Error = SelectionError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        reject_during_combat(state)
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if !state.selected_tokens.remove(&self.token_id) {
            state.selected_tokens.insert(self.token_id.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ScriptedDice, StaticCreatures, TestOracles, creature, token};
    use super::*;

    #[test]
    fn toggling_flips_membership() {
        let oracles = TestOracles::new();
        let mut state = CombatState::new();
        let token = TokenId::from("t1");

        StartSelectionAction.apply(&mut state, &oracles.env()).unwrap();
        assert!(state.is_selection_mode);

        ToggleTokenSelectionAction { token_id: token.clone() }
            .apply(&mut state, &oracles.env())
            .unwrap();
        assert!(state.selected_tokens.contains(&token));

        ToggleTokenSelectionAction { token_id: token.clone() }
            .apply(&mut state, &oracles.env())
            .unwrap();
        assert!(!state.selected_tokens.contains(&token));
    }

    #[test]
    fn restarting_selection_clears_previous_picks() {
        let oracles = TestOracles::new();
        let mut state = CombatState::new();
        state.selected_tokens.insert(TokenId::from("stale"));

        StartSelectionAction.apply(&mut state, &oracles.env()).unwrap();
        assert!(state.selected_tokens.is_empty());
    }

    #[test]
    fn cancel_discards_the_selection() {
        let oracles = TestOracles::new();
        let mut state = CombatState::new();
        StartSelectionAction.apply(&mut state, &oracles.env()).unwrap();
        ToggleTokenSelectionAction { token_id: TokenId::from("t1") }
            .apply(&mut state, &oracles.env())
            .unwrap();

        CancelSelectionAction.apply(&mut state, &oracles.env()).unwrap();
        assert!(!state.is_selection_mode);
        assert!(state.selected_tokens.is_empty());
    }

    #[test]
    fn selection_is_rejected_mid_combat() {
        let mut oracles = TestOracles::new();
        oracles.creatures = StaticCreatures::new().with("goblin", creature("Goblin", 12));
        oracles.dice = ScriptedDice::new([10]);
        let state = super::super::testing::started_state(&oracles, vec![token("a", "goblin")], 0);

        let err = StartSelectionAction
            .pre_validate(&state, &oracles.env())
            .unwrap_err();
        assert_eq!(err, SelectionError::CombatInProgress);

        let err = ToggleTokenSelectionAction { token_id: TokenId::from("a") }
            .pre_validate(&state, &oracles.env())
            .unwrap_err();
        assert_eq!(err, SelectionError::CombatInProgress);

        let err = CancelSelectionAction
            .pre_validate(&state, &oracles.env())
            .unwrap_err();
        assert_eq!(err, SelectionError::CombatInProgress);
    }
}
