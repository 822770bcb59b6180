//! In-memory effect durations, over-time ticks, cooldowns, and turn-start
//! regeneration.

use std::collections::HashMap;
use std::sync::RwLock;

use combat_core::{
    EffectDurationOracle, EffectError, OverTimeOracle, RegenApplied, RegenOracle, TickTrigger,
    TokenId,
};

/// One tracked effect on a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedEffect {
    pub name: String,
    pub rounds_left: u32,
}

/// Round-based effect durations per token.
///
/// The session holds two of these, one for buffs and one for debuffs; the
/// engine ticks them at the start of the owning token's turn. Expired
/// effects drop out of the store on the tick that exhausts them.
pub struct EffectTracker {
    effects: RwLock<HashMap<TokenId, Vec<TrackedEffect>>>,
}

impl EffectTracker {
    pub fn new() -> Self {
        Self {
            effects: RwLock::new(HashMap::new()),
        }
    }

    /// Adds an effect lasting the given number of rounds.
    pub fn add(&self, token_id: TokenId, name: impl Into<String>, rounds: u32) {
        if rounds == 0 {
            return;
        }
        if let Ok(mut effects) = self.effects.write() {
            effects.entry(token_id).or_default().push(TrackedEffect {
                name: name.into(),
                rounds_left: rounds,
            });
        }
    }

    /// Effects currently on a token.
    pub fn active(&self, token_id: &TokenId) -> Vec<TrackedEffect> {
        self.effects
            .read()
            .ok()
            .and_then(|effects| effects.get(token_id).cloned())
            .unwrap_or_default()
    }

    /// Drops every effect on a token.
    pub fn clear(&self, token_id: &TokenId) {
        if let Ok(mut effects) = self.effects.write() {
            effects.remove(token_id);
        }
    }
}

impl Default for EffectTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectDurationOracle for EffectTracker {
    fn decrement_round_durations(&self, token_id: &TokenId) -> Result<u32, EffectError> {
        let mut effects = self
            .effects
            .write()
            .map_err(|_| EffectError::StoreUnavailable)?;
        let Some(rows) = effects.get_mut(token_id) else {
            return Ok(0);
        };

        let ticked = rows.len() as u32;
        for row in rows.iter_mut() {
            row.rounds_left = row.rounds_left.saturating_sub(1);
        }
        rows.retain(|row| row.rounds_left > 0);
        if rows.is_empty() {
            effects.remove(token_id);
        }
        Ok(ticked)
    }
}

/// One damage- or heal-over-time effect on a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverTimeEffect {
    pub name: String,
    pub trigger: TickTrigger,
    pub remaining_ticks: u32,
}

/// In-memory [`OverTimeOracle`] holding trigger-keyed over-time effects and
/// turn-based ability cooldowns.
///
/// An effect fires only when the engine ticks its own trigger; it expires on
/// the tick that exhausts it. Cooldowns step down once per hand-off and drop
/// out when they reach zero.
pub struct OverTimeProcessor {
    effects: RwLock<HashMap<TokenId, Vec<OverTimeEffect>>>,
    cooldowns: RwLock<HashMap<String, u32>>,
}

impl OverTimeProcessor {
    pub fn new() -> Self {
        Self {
            effects: RwLock::new(HashMap::new()),
            cooldowns: RwLock::new(HashMap::new()),
        }
    }

    /// Adds an over-time effect firing the given number of times.
    pub fn add(&self, token_id: TokenId, name: impl Into<String>, trigger: TickTrigger, ticks: u32) {
        if ticks == 0 {
            return;
        }
        if let Ok(mut effects) = self.effects.write() {
            effects.entry(token_id).or_default().push(OverTimeEffect {
                name: name.into(),
                trigger,
                remaining_ticks: ticks,
            });
        }
    }

    /// Over-time effects currently on a token.
    pub fn active(&self, token_id: &TokenId) -> Vec<OverTimeEffect> {
        self.effects
            .read()
            .ok()
            .and_then(|effects| effects.get(token_id).cloned())
            .unwrap_or_default()
    }

    /// Puts an ability on cooldown for the given number of turns.
    pub fn start_cooldown(&self, ability: impl Into<String>, turns: u32) {
        if turns == 0 {
            return;
        }
        if let Ok(mut cooldowns) = self.cooldowns.write() {
            cooldowns.insert(ability.into(), turns);
        }
    }

    /// Turns left on an ability's cooldown, if it is cooling down.
    pub fn cooldown_remaining(&self, ability: &str) -> Option<u32> {
        self.cooldowns.read().ok()?.get(ability).copied()
    }
}

impl Default for OverTimeProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl OverTimeOracle for OverTimeProcessor {
    fn process_over_time(
        &self,
        token_id: &TokenId,
        trigger: TickTrigger,
    ) -> Result<u32, EffectError> {
        let mut effects = self
            .effects
            .write()
            .map_err(|_| EffectError::StoreUnavailable)?;
        let Some(rows) = effects.get_mut(token_id) else {
            return Ok(0);
        };

        let mut fired = 0;
        for row in rows.iter_mut() {
            if row.trigger == trigger {
                fired += 1;
                row.remaining_ticks = row.remaining_ticks.saturating_sub(1);
            }
        }
        rows.retain(|row| row.remaining_ticks > 0);
        if rows.is_empty() {
            effects.remove(token_id);
        }
        Ok(fired)
    }

    fn tick_cooldowns(&self) -> Result<u32, EffectError> {
        let mut cooldowns = self
            .cooldowns
            .write()
            .map_err(|_| EffectError::StoreUnavailable)?;
        for turns in cooldowns.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        cooldowns.retain(|_, turns| *turns > 0);
        Ok(cooldowns.len() as u32)
    }
}

/// Regeneration rates and vitals for tokens that heal over turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VitalsEntry {
    pub current_hp: i32,
    pub max_hp: i32,
    pub hp_per_turn: i32,
    pub current_mana: i32,
    pub max_mana: i32,
    pub mana_per_turn: i32,
}

/// In-memory [`RegenOracle`] backed by per-token vitals rows.
///
/// Untracked tokens regenerate nothing, reported as `Ok(None)` so the engine
/// leaves their roster vitals alone.
pub struct RegenProvider {
    vitals: RwLock<HashMap<TokenId, VitalsEntry>>,
}

impl RegenProvider {
    pub fn new() -> Self {
        Self {
            vitals: RwLock::new(HashMap::new()),
        }
    }

    /// Registers or replaces a token's vitals row.
    pub fn track(&self, token_id: TokenId, entry: VitalsEntry) {
        if let Ok(mut vitals) = self.vitals.write() {
            vitals.insert(token_id, entry);
        }
    }

    /// Stops tracking a token.
    pub fn forget(&self, token_id: &TokenId) {
        if let Ok(mut vitals) = self.vitals.write() {
            vitals.remove(token_id);
        }
    }

    /// Current vitals row for a token.
    pub fn vitals(&self, token_id: &TokenId) -> Option<VitalsEntry> {
        self.vitals.read().ok()?.get(token_id).copied()
    }
}

impl Default for RegenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RegenOracle for RegenProvider {
    fn apply_turn_start_regen(
        &self,
        token_id: &TokenId,
        health: bool,
        mana: bool,
    ) -> Result<Option<RegenApplied>, EffectError> {
        let mut vitals = self
            .vitals
            .write()
            .map_err(|_| EffectError::StoreUnavailable)?;
        let Some(row) = vitals.get_mut(token_id) else {
            return Ok(None);
        };

        let mut applied = RegenApplied::default();
        if health && row.hp_per_turn != 0 && row.current_hp < row.max_hp {
            row.current_hp = (row.current_hp + row.hp_per_turn).min(row.max_hp);
            applied.new_hp = Some(row.current_hp);
        }
        if mana && row.mana_per_turn != 0 && row.current_mana < row.max_mana {
            row.current_mana = (row.current_mana + row.mana_per_turn).min(row.max_mana);
            applied.new_mana = Some(row.current_mana);
        }

        if applied.new_hp.is_none() && applied.new_mana.is_none() {
            return Ok(None);
        }
        Ok(Some(applied))
    }
}
