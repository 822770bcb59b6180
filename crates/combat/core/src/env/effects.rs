//! Best-effort collaborators for effect durations and turn-start regen.
//!
//! Failures from these oracles are captured into the turn-change result for
//! host logging; they never stop a turn from advancing.

use serde::{Deserialize, Serialize};

use crate::state::TokenId;

/// Failures reported by effect-store collaborators.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("effect store unavailable")]
    StoreUnavailable,
    #[error("duration tick failed: {0}")]
    TickFailed(String),
}

/// Decrements round-based effect durations on a target.
///
/// The engine holds two of these per session, one for buffs and one for
/// debuffs.
pub trait EffectDurationOracle: Send + Sync {
    /// Ticks every round-based duration on the target down by one round and
    /// reports how many effects were ticked. Must succeed with zero when the
    /// target has none.
    fn decrement_round_durations(&self, token_id: &TokenId) -> Result<u32, EffectError>;
}

/// Moment in the turn cycle an over-time effect fires at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickTrigger {
    /// The target's own turn just ended.
    TurnEnd,
    /// The target's own turn is starting.
    TurnStart,
    /// A full round completed; fired once per combatant on the wrap.
    Round,
}

impl TickTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            TickTrigger::TurnEnd => "turn_end",
            TickTrigger::TurnStart => "turn_start",
            TickTrigger::Round => "round",
        }
    }
}

/// Fires damage- and heal-over-time effects and turn-based cooldowns.
///
/// Ticks apply in the backing stores; the engine only records how many
/// effects fired so the host can log them.
pub trait OverTimeOracle: Send + Sync {
    /// Fires every over-time effect on the target keyed to `trigger` and
    /// reports how many fired. Must succeed with zero when the target has
    /// none.
    fn process_over_time(
        &self,
        token_id: &TokenId,
        trigger: TickTrigger,
    ) -> Result<u32, EffectError>;

    /// Advances turn-based ability cooldowns by one step and reports how
    /// many are still counting down.
    fn tick_cooldowns(&self) -> Result<u32, EffectError>;
}

/// New vitals to mirror onto a combatant after turn-start regeneration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegenApplied {
    pub new_hp: Option<i32>,
    pub new_mana: Option<i32>,
}

/// Applies turn-start health and mana regeneration for a token.
pub trait RegenOracle: Send + Sync {
    /// Applies regeneration in the backing stores and reports the vitals the
    /// roster should mirror. `Ok(None)` means nothing needs mirroring, for
    /// example when the target regenerates through its own character sheet.
    fn apply_turn_start_regen(
        &self,
        token_id: &TokenId,
        health: bool,
        mana: bool,
    ) -> Result<Option<RegenApplied>, EffectError>;
}
