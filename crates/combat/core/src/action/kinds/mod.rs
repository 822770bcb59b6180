//! Concrete action transitions.

pub mod action_points;
pub mod end_combat;
pub mod movement;
pub mod next_turn;
pub mod selection;
pub mod start_combat;
pub mod turn_order;

pub use action_points::{ActionPointsSpent, EconomyError, SpendActionPointsAction};
pub use end_combat::{EndCombatAction, ForceResetAction};
pub use movement::{
    BeginMovementAction, CancelMovementAction, ConfirmMoveAction, MoveConfirmed, MoveRejection,
    MoveValidation, MovementError, RecordFreeMoveAction, RequestMoveConfirmationAction,
    UpdateMovementPreviewAction, ValidateMoveAction,
};
pub use next_turn::{NextTurnAction, TurnAdvanced, TurnError, TurnSideEffects};
pub use selection::{
    CancelSelectionAction, SelectionError, StartSelectionAction, ToggleTokenSelectionAction,
};
pub use start_combat::{CombatStarted, StartCombatAction, StartCombatError, TokenRef};
pub use turn_order::{InitiativeUpdated, OrderError, ReorderTurnOrderAction, UpdateInitiativeAction};

/// Shared oracle stubs for transition and engine tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use super::{StartCombatAction, TokenRef};
    use crate::action::ActionTransition;
    use crate::env::{
        CharacterOracle, CharacterSheet, CombatEnv, CreatureOracle, CreatureRecord,
        EffectDurationOracle, EffectError, Env, OverTimeOracle, RegenApplied, RegenOracle,
        RngOracle, TickTrigger,
    };
    use crate::state::{CombatState, CreatureId, TokenId};

    /// Creature oracle backed by a plain map.
    #[derive(Default)]
    pub struct StaticCreatures {
        records: HashMap<CreatureId, CreatureRecord>,
    }

    impl StaticCreatures {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, id: &str, record: CreatureRecord) -> Self {
            self.records.insert(CreatureId::from(id), record);
            self
        }
    }

    impl CreatureOracle for StaticCreatures {
        fn creature(&self, id: &CreatureId) -> Option<CreatureRecord> {
            self.records.get(id).cloned()
        }
    }

    pub fn creature(name: &str, agility: i32) -> CreatureRecord {
        CreatureRecord {
            name: name.to_owned(),
            agility,
            initiative_mod: None,
            speed_feet: Some(30),
            max_action_points: None,
            token_icon: None,
            token_border: None,
            max_hp: Some(30),
            max_mana: Some(10),
        }
    }

    /// Character oracle serving one optional fixed sheet.
    #[derive(Default)]
    pub struct LocalCharacter {
        pub sheet: Option<CharacterSheet>,
    }

    impl CharacterOracle for LocalCharacter {
        fn sheet(&self) -> Option<CharacterSheet> {
            self.sheet.clone()
        }
    }

    /// Effect oracle recording which tokens were ticked.
    #[derive(Default)]
    pub struct CountingEffects {
        pub calls: Mutex<Vec<TokenId>>,
        pub ticked: u32,
        pub fail: bool,
    }

    impl EffectDurationOracle for CountingEffects {
        fn decrement_round_durations(&self, token_id: &TokenId) -> Result<u32, EffectError> {
            self.calls.lock().unwrap().push(token_id.clone());
            if self.fail {
                return Err(EffectError::TickFailed("effect store offline".to_owned()));
            }
            Ok(self.ticked)
        }
    }

    /// Over-time oracle recording each tick request it receives.
    #[derive(Default)]
    pub struct TickingOverTime {
        pub calls: Mutex<Vec<(TokenId, TickTrigger)>>,
        pub cooldown_calls: Mutex<u32>,
        pub per_call: u32,
        pub cooldowns_pending: u32,
        pub fail: bool,
    }

    impl OverTimeOracle for TickingOverTime {
        fn process_over_time(
            &self,
            token_id: &TokenId,
            trigger: TickTrigger,
        ) -> Result<u32, EffectError> {
            self.calls.lock().unwrap().push((token_id.clone(), trigger));
            if self.fail {
                return Err(EffectError::TickFailed("over-time store offline".to_owned()));
            }
            Ok(self.per_call)
        }

        fn tick_cooldowns(&self) -> Result<u32, EffectError> {
            *self.cooldown_calls.lock().unwrap() += 1;
            if self.fail {
                return Err(EffectError::StoreUnavailable);
            }
            Ok(self.cooldowns_pending)
        }
    }

    /// Regen oracle answering with a fixed mirror value.
    #[derive(Default)]
    pub struct FixedRegen {
        pub applied: Option<RegenApplied>,
        pub fail: bool,
    }

    impl RegenOracle for FixedRegen {
        fn apply_turn_start_regen(
            &self,
            _token_id: &TokenId,
            _health: bool,
            _mana: bool,
        ) -> Result<Option<RegenApplied>, EffectError> {
            if self.fail {
                return Err(EffectError::StoreUnavailable);
            }
            Ok(self.applied)
        }
    }

    /// Dice that pop scripted d20 results in order, then roll ones.
    #[derive(Default)]
    pub struct ScriptedDice {
        rolls: Mutex<VecDeque<u32>>,
    }

    impl ScriptedDice {
        pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
            Self {
                rolls: Mutex::new(rolls.into_iter().collect()),
            }
        }

        /// Replaces any remaining scripted rolls.
        pub fn set(&self, rolls: impl IntoIterator<Item = u32>) {
            *self.rolls.lock().unwrap() = rolls.into_iter().collect();
        }
    }

    impl RngOracle for ScriptedDice {
        fn next_u32(&self, _seed: u64) -> u32 {
            // roll_die maps this through (value % sides) + 1.
            self.rolls
                .lock()
                .unwrap()
                .pop_front()
                .map_or(0, |roll| roll.saturating_sub(1))
        }
    }

    /// Bundle of concrete oracles that can lend a [`CombatEnv`].
    #[derive(Default)]
    pub struct TestOracles {
        pub creatures: StaticCreatures,
        pub character: LocalCharacter,
        pub buffs: CountingEffects,
        pub debuffs: CountingEffects,
        pub over_time: TickingOverTime,
        pub regen: FixedRegen,
        pub dice: ScriptedDice,
    }

    impl TestOracles {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn env(&self) -> CombatEnv<'_> {
            Env::with_all(
                &self.creatures,
                &self.character,
                &self.buffs,
                &self.debuffs,
                &self.over_time,
                &self.regen,
                &self.dice,
            )
            .into_combat_env()
        }
    }

    pub fn token(token_id: &str, creature_id: &str) -> TokenRef {
        TokenRef {
            token_id: TokenId::from(token_id),
            creature_id: Some(CreatureId::from(creature_id)),
            player_id: None,
            is_player_token: false,
        }
    }

    /// Applies a start-combat action and returns the post-start state.
    pub fn started_state(oracles: &TestOracles, tokens: Vec<TokenRef>, now_ms: u64) -> CombatState {
        let mut state = CombatState::with_seed(7);
        StartCombatAction { tokens, now_ms }
            .apply(&mut state, &oracles.env())
            .expect("combat should start");
        state
    }
}
