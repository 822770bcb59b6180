//! Read-only and best-effort collaborators the engine reaches through.
//!
//! Oracles expose creature stat blocks, the local character sheet, buff and
//! debuff duration bookkeeping, over-time effect ticks and cooldowns,
//! regeneration, and dice. The [`Env`]
//! aggregate bundles optional references to each so transitions can reach
//! everything they need without coupling to concrete implementations; an
//! absent oracle surfaces as a typed [`OracleError`] only when a transition
//! actually asks for it.

mod creature;
mod effects;
mod rng;

pub use creature::{
    CharacterOracle, CharacterSheet, CreatureOracle, CreatureRecord, DEFAULT_CHARACTER_BORDER,
    DEFAULT_CHARACTER_ICON,
};
pub use effects::{
    EffectDurationOracle, EffectError, OverTimeOracle, RegenApplied, RegenOracle, TickTrigger,
};
pub use rng::{PcgRng, RngOracle, compute_seed, token_entropy};

use crate::error::{CombatError, ErrorSeverity};
use crate::state::Combatant;

/// Failure to reach an oracle the current action requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("creature oracle not available")]
    CreaturesNotAvailable,
    #[error("character oracle not available")]
    CharactersNotAvailable,
    #[error("buff duration oracle not available")]
    BuffsNotAvailable,
    #[error("debuff duration oracle not available")]
    DebuffsNotAvailable,
    #[error("over-time effect oracle not available")]
    OverTimeNotAvailable,
    #[error("regen oracle not available")]
    RegenNotAvailable,
    #[error("rng oracle not available")]
    RngNotAvailable,
}

impl CombatError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        // A missing oracle is a wiring bug in the host, not a player error.
        ErrorSeverity::Fatal
    }
}

/// Execution environment bundling every oracle the engine may consult.
pub struct Env<'a, C: ?Sized, H: ?Sized, E: ?Sized, O: ?Sized, G: ?Sized, R: ?Sized> {
    creatures: Option<&'a C>,
    characters: Option<&'a H>,
    buffs: Option<&'a E>,
    debuffs: Option<&'a E>,
    over_time: Option<&'a O>,
    regen: Option<&'a G>,
    rng: Option<&'a R>,
}

/// Trait-object environment used at the engine boundary.
pub type CombatEnv<'a> = Env<
    'a,
    dyn CreatureOracle + 'a,
    dyn CharacterOracle + 'a,
    dyn EffectDurationOracle + 'a,
    dyn OverTimeOracle + 'a,
    dyn RegenOracle + 'a,
    dyn RngOracle + 'a,
>;

impl<'a, C: ?Sized, H: ?Sized, E: ?Sized, O: ?Sized, G: ?Sized, R: ?Sized>
    Env<'a, C, H, E, O, G, R>
{
    pub fn new(
        creatures: Option<&'a C>,
        characters: Option<&'a H>,
        buffs: Option<&'a E>,
        debuffs: Option<&'a E>,
        over_time: Option<&'a O>,
        regen: Option<&'a G>,
        rng: Option<&'a R>,
    ) -> Self {
        Self {
            creatures,
            characters,
            buffs,
            debuffs,
            over_time,
            regen,
            rng,
        }
    }

    /// Environment with every oracle present.
    pub fn with_all(
        creatures: &'a C,
        characters: &'a H,
        buffs: &'a E,
        debuffs: &'a E,
        over_time: &'a O,
        regen: &'a G,
        rng: &'a R,
    ) -> Self {
        Self::new(
            Some(creatures),
            Some(characters),
            Some(buffs),
            Some(debuffs),
            Some(over_time),
            Some(regen),
            Some(rng),
        )
    }

    /// Environment with no oracles; every accessor fails.
    pub fn empty() -> Self {
        Self::new(None, None, None, None, None, None, None)
    }

    pub fn creatures(&self) -> Result<&'a C, OracleError> {
        self.creatures.ok_or(OracleError::CreaturesNotAvailable)
    }

    pub fn characters(&self) -> Result<&'a H, OracleError> {
        self.characters.ok_or(OracleError::CharactersNotAvailable)
    }

    pub fn buffs(&self) -> Result<&'a E, OracleError> {
        self.buffs.ok_or(OracleError::BuffsNotAvailable)
    }

    pub fn debuffs(&self) -> Result<&'a E, OracleError> {
        self.debuffs.ok_or(OracleError::DebuffsNotAvailable)
    }

    pub fn over_time(&self) -> Result<&'a O, OracleError> {
        self.over_time.ok_or(OracleError::OverTimeNotAvailable)
    }

    pub fn regen(&self) -> Result<&'a G, OracleError> {
        self.regen.ok_or(OracleError::RegenNotAvailable)
    }

    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, C, H, E, O, G, R> Env<'a, C, H, E, O, G, R>
where
    C: CreatureOracle + ?Sized,
    H: CharacterOracle + ?Sized,
    E: ?Sized,
    O: ?Sized,
    G: ?Sized,
    R: ?Sized,
{
    /// Resolves the stat block backing a combatant, falling back to the local
    /// character sheet for character tokens.
    pub fn combatant_creature(
        &self,
        combatant: &Combatant,
    ) -> Result<Option<CreatureRecord>, OracleError> {
        let record = self.creatures()?.creature(&combatant.creature_id);
        if record.is_some() {
            return Ok(record);
        }
        if combatant.is_character_token {
            return Ok(self
                .characters()?
                .sheet()
                .map(|sheet| sheet.to_creature_record()));
        }
        Ok(None)
    }
}

impl<'a, C, H, E, O, G, R> Env<'a, C, H, E, O, G, R>
where
    C: CreatureOracle + 'a,
    H: CharacterOracle + 'a,
    E: EffectDurationOracle + 'a,
    O: OverTimeOracle + 'a,
    G: RegenOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts a typed environment into the trait-object form.
    pub fn into_combat_env(self) -> CombatEnv<'a> {
        CombatEnv::new(
            self.creatures.map(|c| c as _),
            self.characters.map(|h| h as _),
            self.buffs.map(|e| e as _),
            self.debuffs.map(|e| e as _),
            self.over_time.map(|o| o as _),
            self.regen.map(|g| g as _),
            self.rng.map(|r| r as _),
        )
    }

    /// Borrowing conversion to the trait-object form.
    pub fn as_combat_env(&self) -> CombatEnv<'a> {
        CombatEnv::new(
            self.creatures.map(|c| c as _),
            self.characters.map(|h| h as _),
            self.buffs.map(|e| e as _),
            self.debuffs.map(|e| e as _),
            self.over_time.map(|o| o as _),
            self.regen.map(|g| g as _),
            self.rng.map(|r| r as _),
        )
    }
}
