//! Action-point banding derived from initiative totals.

use crate::state::{ApRestoration, CombatConfig};

/// Converts an initiative total into the action points granted for a turn.
///
/// Every five points of initiative buys one more action point, capped at
/// four. Totals at or below zero clamp to zero rather than wrapping.
pub fn action_points_for_initiative(total: i32) -> u32 {
    match total {
        i32::MIN..=5 => 0,
        6..=10 => 1,
        11..=15 => 2,
        16..=20 => 3,
        _ => 4,
    }
}

/// Action points restored when a combatant's turn begins, honoring the
/// session's restoration mode.
pub fn restored_action_points(config: &CombatConfig, initiative: i32, max_action_points: u32) -> u32 {
    match config.ap_restoration {
        ApRestoration::Max => max_action_points,
        ApRestoration::Set => config.ap_restoration_amount.min(max_action_points),
        ApRestoration::Initiative => action_points_for_initiative(initiative),
    }
}
