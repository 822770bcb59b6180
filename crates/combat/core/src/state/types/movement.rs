//! Ephemeral movement-gesture state and movement summaries.

use serde::{Deserialize, Serialize};

use super::common::{Position, TokenId};

/// An in-flight drag gesture, tracked for range visualization only.
///
/// Never serialized: abandoning the session mid-drag must not leave a
/// phantom gesture behind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveMovement {
    pub token_id: TokenId,
    pub start_position: Position,
    pub current_position: Position,
}

/// A proposed move waiting on the player to approve its action-point cost.
///
/// At most one exists at a time; queuing a new one replaces the old.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingMoveConfirmation {
    pub token_id: TokenId,
    pub start_position: Position,
    pub target_position: Position,
    /// Feet this drag alone would cover.
    pub distance_feet: f64,
    /// Cumulative feet for the turn if the move is confirmed.
    pub total_after_feet: f64,
    /// Action points the move will cost on confirmation.
    pub required_ap: u32,
}

/// Tooltip-ready summary of a token's movement economy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementInfo {
    pub speed_feet: f64,
    pub current_action_points: u32,
    /// Committed feet plus any provisional drag distance.
    pub movement_used_feet: f64,
    pub is_unlocked: bool,
    pub remaining_feet: f64,
    pub unlocked_feet: f64,
    pub can_move: bool,
}
