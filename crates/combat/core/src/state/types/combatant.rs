//! Roster entry for one participant in the turn order.

use serde::{Deserialize, Serialize};

use super::common::{CreatureId, TokenId};

/// Action-point ceiling assumed for player characters without an explicit one.
pub const CHARACTER_DEFAULT_MAX_AP: u32 = 3;
/// Action-point ceiling assumed for creatures without an explicit one.
pub const CREATURE_DEFAULT_MAX_AP: u32 = 6;

/// A participant in the turn order.
///
/// The initiative fields are re-rolled each time this combatant's turn
/// begins, not just once at combat start. `current_hp` and `current_mana`
/// mirror the owning token's vitals after regeneration so roster consumers
/// can render them without a second lookup; they stay `None` until regen
/// first reports values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub token_id: TokenId,
    pub creature_id: CreatureId,
    pub name: String,
    pub token_icon: Option<String>,
    pub token_border: Option<String>,
    pub d20_roll: u32,
    pub agility_mod: i32,
    pub initiative_mod: i32,
    pub initiative: i32,
    pub current_action_points: u32,
    pub max_action_points: u32,
    pub is_character_token: bool,
    #[serde(default)]
    pub current_hp: Option<i32>,
    #[serde(default)]
    pub current_mana: Option<i32>,
}
