//! Stat-block oracles for creatures and the local player character.

use serde::{Deserialize, Serialize};

use crate::rules::{DEFAULT_SPEED_FEET, ability_modifier};
use crate::state::CreatureId;

/// Icon shown for character tokens without a custom one.
pub const DEFAULT_CHARACTER_ICON: &str = "inv_misc_questionmark";
/// Border color for character tokens without a custom one.
pub const DEFAULT_CHARACTER_BORDER: &str = "#4CAF50";

/// Combat-relevant view of a creature template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub name: String,
    pub agility: i32,
    /// Explicit initiative modifier; derived from agility when absent.
    pub initiative_mod: Option<i32>,
    /// Walking speed in feet; treated as 30 when absent or zero.
    pub speed_feet: Option<u32>,
    pub max_action_points: Option<u32>,
    pub token_icon: Option<String>,
    pub token_border: Option<String>,
    pub max_hp: Option<i32>,
    pub max_mana: Option<i32>,
}

impl CreatureRecord {
    /// Walking speed with the default applied.
    pub fn speed(&self) -> f64 {
        match self.speed_feet {
            Some(speed) if speed > 0 => f64::from(speed),
            _ => f64::from(DEFAULT_SPEED_FEET),
        }
    }

    /// Explicit initiative modifier, else derived from agility.
    pub fn initiative_modifier(&self) -> i32 {
        self.initiative_mod
            .unwrap_or_else(|| ability_modifier(self.agility))
    }
}

/// Resolves creature templates referenced by tokens.
pub trait CreatureOracle: Send + Sync {
    fn creature(&self, id: &CreatureId) -> Option<CreatureRecord>;
}

/// The local player's character sheet, used when a player token carries no
/// creature record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: Option<String>,
    pub agility: Option<i32>,
    pub move_speed_feet: Option<u32>,
    pub max_action_points: Option<u32>,
    pub custom_icon: Option<String>,
    pub border_color: Option<String>,
}

impl CharacterSheet {
    /// Synthesizes the stand-in creature record used for character tokens.
    pub fn to_creature_record(&self) -> CreatureRecord {
        let agility = self.agility.unwrap_or(10);
        CreatureRecord {
            name: self
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Character".to_owned()),
            agility,
            initiative_mod: Some(ability_modifier(agility)),
            speed_feet: self.move_speed_feet,
            max_action_points: self.max_action_points,
            token_icon: Some(
                self.custom_icon
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CHARACTER_ICON.to_owned()),
            ),
            token_border: Some(
                self.border_color
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CHARACTER_BORDER.to_owned()),
            ),
            max_hp: None,
            max_mana: None,
        }
    }
}

/// Provides the local character sheet, when one is loaded.
pub trait CharacterOracle: Send + Sync {
    fn sheet(&self) -> Option<CharacterSheet>;
}
