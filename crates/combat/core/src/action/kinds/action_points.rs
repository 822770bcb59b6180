//! Action-point spending.

use serde::{Deserialize, Serialize};

use crate::action::ActionTransition;
use crate::env::CombatEnv;
use crate::error::{CombatError, ErrorContext, ErrorSeverity};
use crate::state::{CombatState, TokenId};

/// Spends action points from a combatant's pool, flooring at zero.
///
/// Overspending is not an error: ability costs are validated upstream, and
/// the pool simply floors. Movement charges arrive through the confirm-move
/// path instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendActionPointsAction {
    pub token_id: TokenId,
    pub amount: u32,
}

/// Outcome of a spend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPointsSpent {
    pub token_id: TokenId,
    /// Amount requested, which may exceed what the pool held.
    pub amount: u32,
    pub remaining: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    #[error("token {token_id} is not in the turn order")]
    UnknownToken { token_id: TokenId },
}

impl CombatError for EconomyError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn context(&self) -> Option<ErrorContext> {
        let EconomyError::UnknownToken { token_id } = self;
        Some(ErrorContext::new().with_token(token_id.clone()))
    }
}

impl ActionTransition for SpendActionPointsAction {
    type Error = EconomyError;
    type Result = ActionPointsSpent;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if state.combatant(&self.token_id).is_none() {
            return Err(EconomyError::UnknownToken {
                token_id: self.token_id.clone(),
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut CombatState,
        _env: &CombatEnv<'_>,
    ) -> Result<ActionPointsSpent, Self::Error> {
        let combatant = state
            .combatant_mut(&self.token_id)
            .ok_or_else(|| EconomyError::UnknownToken {
                token_id: self.token_id.clone(),
            })?;
        combatant.current_action_points =
            combatant.current_action_points.saturating_sub(self.amount);

        Ok(ActionPointsSpent {
            token_id: self.token_id.clone(),
            amount: self.amount,
            remaining: combatant.current_action_points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ScriptedDice, StaticCreatures, TestOracles, creature, token};
    use super::*;

    fn one_started() -> (TestOracles, CombatState) {
        let mut oracles = TestOracles::new();
        oracles.creatures = StaticCreatures::new().with("goblin", creature("Goblin", 14));
        // 16 total: three action points.
        oracles.dice = ScriptedDice::new([14]);
        let state =
            super::super::testing::started_state(&oracles, vec![token("a", "goblin")], 0);
        (oracles, state)
    }

    #[test]
    fn spending_deducts_from_the_pool() {
        let (oracles, mut state) = one_started();
        let spent = SpendActionPointsAction {
            token_id: TokenId::from("a"),
            amount: 2,
        }
        .apply(&mut state, &oracles.env())
        .unwrap();

        assert_eq!(spent.amount, 2);
        assert_eq!(spent.remaining, 1);
        assert_eq!(state.turn_order[0].current_action_points, 1);
    }

    #[test]
    fn overspending_floors_at_zero() {
        let (oracles, mut state) = one_started();
        let spent = SpendActionPointsAction {
            token_id: TokenId::from("a"),
            amount: 99,
        }
        .apply(&mut state, &oracles.env())
        .unwrap();

        assert_eq!(spent.remaining, 0);
        assert_eq!(state.turn_order[0].current_action_points, 0);
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let (oracles, state) = one_started();
        let err = SpendActionPointsAction {
            token_id: TokenId::from("ghost"),
            amount: 1,
        }
        .pre_validate(&state, &oracles.env())
        .unwrap_err();
        assert_eq!(err, EconomyError::UnknownToken { token_id: TokenId::from("ghost") });
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }
}
