//! Manual turn-order maintenance: drag-reorder and initiative edits.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::action::ActionTransition;
use crate::env::CombatEnv;
use crate::error::{CombatError, ErrorContext, ErrorSeverity, NeverError};
use crate::state::{CombatState, TokenId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("token {token_id} is not in the turn order")]
    UnknownToken { token_id: TokenId },
}

impl CombatError for OrderError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<ErrorContext> {
        match self {
            OrderError::UnknownToken { token_id } => {
                Some(ErrorContext::new().with_token(token_id.clone()))
            }
        }
    }
}

/// Replaces the turn order with a caller-supplied arrangement of the
/// current combatants.
///
/// Ids that are not current members are ignored, as is a second mention of
/// the same id. A combatant the caller leaves out of `order` is removed from
/// the encounter. The current-turn marker follows the combatant who held it;
/// if that combatant was removed the marker falls back to the top of the
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderTurnOrderAction {
    pub order: Vec<TokenId>,
}

impl ActionTransition for ReorderTurnOrderAction {
    type Error = NeverError;
    type Result = ();

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let current_token = state.current_combatant().map(|c| c.token_id.clone());

        let mut seen = HashSet::with_capacity(self.order.len());
        let mut reordered = Vec::with_capacity(self.order.len());
        for token_id in &self.order {
            if !seen.insert(token_id) {
                continue;
            }
            if let Some(combatant) = state.combatant(token_id).cloned() {
                reordered.push(combatant);
            }
        }

        state.turn_order = reordered;
        state.current_turn_index = current_token
            .and_then(|token| state.turn_order.iter().position(|c| c.token_id == token))
            .unwrap_or(0);
        Ok(())
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        debug_assert!(
            state.turn_order.is_empty() || state.current_turn_index < state.turn_order.len(),
            "reorder must leave the turn index in range"
        );
        Ok(())
    }
}

/// Sets one combatant's initiative directly and re-sorts the order.
///
/// Used for GM corrections and late joins. The current-turn marker follows
/// the combatant who held it before the edit; the edited combatant keeps its
/// rolled d20 and modifier untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInitiativeAction {
    pub token_id: TokenId,
    pub initiative: i32,
}

/// Outcome of an initiative edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeUpdated {
    pub token_id: TokenId,
    pub initiative: i32,
    /// Index of the current turn after the re-sort.
    pub current_turn_index: usize,
}

impl ActionTransition for UpdateInitiativeAction {
    type Error = OrderError;
    type Result = InitiativeUpdated;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if state.combatant(&self.token_id).is_none() {
            return Err(OrderError::UnknownToken {
                token_id: self.token_id.clone(),
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut CombatState,
        _env: &CombatEnv<'_>,
    ) -> Result<InitiativeUpdated, Self::Error> {
        let current_token = state.current_combatant().map(|c| c.token_id.clone());

        let combatant = state
            .combatant_mut(&self.token_id)
            .ok_or_else(|| OrderError::UnknownToken {
                token_id: self.token_id.clone(),
            })?;
        combatant.initiative = self.initiative;

        // Stable sort keeps relative order among equal totals.
        state.turn_order.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        state.current_turn_index = current_token
            .and_then(|token| state.turn_order.iter().position(|c| c.token_id == token))
            .unwrap_or(0);

        Ok(InitiativeUpdated {
            token_id: self.token_id.clone(),
            initiative: self.initiative,
            current_turn_index: state.current_turn_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ScriptedDice, StaticCreatures, TestOracles, creature, token};
    use super::*;

    fn three_started() -> (TestOracles, CombatState) {
        let mut oracles = TestOracles::new();
        oracles.creatures = StaticCreatures::new()
            .with("goblin", creature("Goblin", 14))
            .with("wolf", creature("Wolf", 10))
            .with("ogre", creature("Ogre", 6));
        // Totals: goblin 17, wolf 11, ogre 3.
        oracles.dice = ScriptedDice::new([15, 11, 5]);
        let state = super::super::testing::started_state(
            &oracles,
            vec![token("a", "goblin"), token("b", "wolf"), token("c", "ogre")],
            0,
        );
        (oracles, state)
    }

    #[test]
    fn reorder_follows_the_current_combatant() {
        let (oracles, mut state) = three_started();
        // Advance so "b" holds the turn.
        oracles.dice.set([10]);
        super::super::NextTurnAction { now_ms: 10 }
            .apply(&mut state, &oracles.env())
            .unwrap();
        assert_eq!(state.current_turn_index, 1);

        ReorderTurnOrderAction {
            order: vec![TokenId::from("c"), TokenId::from("b"), TokenId::from("a")],
        }
        .apply(&mut state, &oracles.env())
        .unwrap();

        let order: Vec<_> = state.turn_order.iter().map(|c| c.token_id.as_str()).collect();
        assert_eq!(order, ["c", "b", "a"]);
        assert_eq!(state.current_turn_index, 1);
        assert_eq!(state.current_combatant().unwrap().token_id.as_str(), "b");
    }

    #[test]
    fn reorder_drops_combatants_left_out_of_the_order() {
        let (oracles, mut state) = three_started();
        assert_eq!(state.current_combatant().unwrap().token_id.as_str(), "a");

        // Leaving "a" out removes it; the marker falls back to the top.
        ReorderTurnOrderAction {
            order: vec![TokenId::from("c"), TokenId::from("b")],
        }
        .apply(&mut state, &oracles.env())
        .unwrap();

        let order: Vec<_> = state.turn_order.iter().map(|c| c.token_id.as_str()).collect();
        assert_eq!(order, ["c", "b"]);
        assert_eq!(state.current_turn_index, 0);
        assert_eq!(state.current_combatant().unwrap().token_id.as_str(), "c");
    }

    #[test]
    fn reorder_ignores_strangers_and_repeated_ids() {
        let (oracles, mut state) = three_started();

        ReorderTurnOrderAction {
            order: vec![
                TokenId::from("ghost"),
                TokenId::from("b"),
                TokenId::from("b"),
                TokenId::from("a"),
                TokenId::from("c"),
            ],
        }
        .apply(&mut state, &oracles.env())
        .unwrap();

        let order: Vec<_> = state.turn_order.iter().map(|c| c.token_id.as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
        assert_eq!(state.current_combatant().unwrap().token_id.as_str(), "a");
    }

    #[test]
    fn initiative_edit_resorts_and_keeps_the_current_turn() {
        let (oracles, mut state) = three_started();
        assert_eq!(state.current_combatant().unwrap().token_id.as_str(), "a");

        // Push the ogre to the top while "a" holds the turn.
        let updated = UpdateInitiativeAction {
            token_id: TokenId::from("c"),
            initiative: 25,
        }
        .apply(&mut state, &oracles.env())
        .unwrap();

        let order: Vec<_> = state.turn_order.iter().map(|c| c.token_id.as_str()).collect();
        assert_eq!(order, ["c", "a", "b"]);
        assert_eq!(updated.current_turn_index, 1);
        assert_eq!(state.current_combatant().unwrap().token_id.as_str(), "a");
        // The edit changes the total only, never the recorded roll.
        let ogre = state.combatant(&TokenId::from("c")).unwrap();
        assert_eq!(ogre.initiative, 25);
        assert_eq!(ogre.d20_roll, 5);
    }

    #[test]
    fn initiative_edit_on_the_current_combatant_follows_it() {
        let (oracles, mut state) = three_started();

        UpdateInitiativeAction {
            token_id: TokenId::from("a"),
            initiative: 1,
        }
        .apply(&mut state, &oracles.env())
        .unwrap();

        let order: Vec<_> = state.turn_order.iter().map(|c| c.token_id.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
        assert_eq!(state.current_turn_index, 2);
        assert_eq!(state.current_combatant().unwrap().token_id.as_str(), "a");
    }

    #[test]
    fn initiative_edit_rejects_unknown_tokens() {
        let (oracles, state) = three_started();
        let err = UpdateInitiativeAction {
            token_id: TokenId::from("ghost"),
            initiative: 10,
        }
        .pre_validate(&state, &oracles.env())
        .unwrap_err();
        assert!(matches!(err, OrderError::UnknownToken { .. }));
    }
}
