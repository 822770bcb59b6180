//! Runtime implementations of the engine's oracle traits.
//!
//! These in-memory providers back the `combat-core` oracle traits and bundle
//! into an [`OracleManager`] so the session worker can build a
//! [`combat_core::CombatEnv`] on demand. The host mutates them directly (a
//! token lands on the board, a sheet loads, an effect is applied); the
//! engine only ever reads through the trait seams.

mod directory;
mod effects;

use std::sync::Arc;

use combat_core::{CombatEnv, Env, PcgRng};

pub use directory::{CharacterProfile, CreatureDirectory};
pub use effects::{
    EffectTracker, OverTimeEffect, OverTimeProcessor, RegenProvider, TrackedEffect, VitalsEntry,
};

/// Bundles every oracle the engine consults.
#[derive(Clone)]
pub struct OracleManager {
    creatures: Arc<CreatureDirectory>,
    character: Arc<CharacterProfile>,
    buffs: Arc<EffectTracker>,
    debuffs: Arc<EffectTracker>,
    over_time: Arc<OverTimeProcessor>,
    regen: Arc<RegenProvider>,
    rng: PcgRng,
}

impl OracleManager {
    pub fn new(
        creatures: Arc<CreatureDirectory>,
        character: Arc<CharacterProfile>,
        buffs: Arc<EffectTracker>,
        debuffs: Arc<EffectTracker>,
        over_time: Arc<OverTimeProcessor>,
        regen: Arc<RegenProvider>,
    ) -> Self {
        Self {
            creatures,
            character,
            buffs,
            debuffs,
            over_time,
            regen,
            // PcgRng is stateless; sequencing lives in seed derivation.
            rng: PcgRng,
        }
    }

    /// Manager with fresh, empty in-memory providers.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(CreatureDirectory::new()),
            Arc::new(CharacterProfile::new()),
            Arc::new(EffectTracker::new()),
            Arc::new(EffectTracker::new()),
            Arc::new(OverTimeProcessor::new()),
            Arc::new(RegenProvider::new()),
        )
    }

    /// Builds the trait-object environment the engine executes against.
    pub fn as_combat_env(&self) -> CombatEnv<'_> {
        Env::with_all(
            self.creatures.as_ref(),
            self.character.as_ref(),
            self.buffs.as_ref(),
            self.debuffs.as_ref(),
            self.over_time.as_ref(),
            self.regen.as_ref(),
            &self.rng,
        )
        .into_combat_env()
    }

    pub fn creatures(&self) -> &CreatureDirectory {
        &self.creatures
    }

    pub fn character(&self) -> &CharacterProfile {
        &self.character
    }

    pub fn buffs(&self) -> &EffectTracker {
        &self.buffs
    }

    pub fn debuffs(&self) -> &EffectTracker {
        &self.debuffs
    }

    pub fn over_time(&self) -> &OverTimeProcessor {
        &self.over_time
    }

    pub fn regen(&self) -> &RegenProvider {
        &self.regen
    }
}

impl Default for OracleManager {
    fn default() -> Self {
        Self::in_memory()
    }
}
