//! Pure rule tables shared by the action pipeline and state queries.
//!
//! Everything here is a total function of its inputs: no state, no clock,
//! no randomness. Transitions and queries call into these helpers so the
//! numeric rules live in exactly one place.
pub mod action_points;
pub mod movement_cost;

pub use action_points::{action_points_for_initiative, restored_action_points};
pub use movement_cost::{
    DEFAULT_SPEED_FEET, DIAGONAL_FEET_PER_TILE, FEET_PER_TILE, GridPos, TILE_SIZE_PX,
    movement_feet, world_to_grid,
};

/// Standard ability modifier: floor of `(score - 10) / 2`.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_modifier_floors_toward_negative_infinity() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(14), 2);
        assert_eq!(ability_modifier(15), 2);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(7), -2);
    }
}
