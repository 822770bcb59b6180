//! Tile-based movement distances.
//!
//! Drag gestures arrive in world-space pixels; cost is computed on the tile
//! grid so partial-tile wiggles never charge movement.

use serde::{Deserialize, Serialize};

use crate::state::Position;

/// Pixel width of one grid tile.
pub const TILE_SIZE_PX: f64 = 50.0;
/// Feet covered by one axis-aligned tile step.
pub const FEET_PER_TILE: f64 = 5.0;
/// Feet charged per diagonal tile step, averaging the 5/10 alternation.
pub const DIAGONAL_FEET_PER_TILE: f64 = 8.0;
/// Walking speed in feet assumed when a stat block has none.
pub const DEFAULT_SPEED_FEET: u32 = 30;

/// Discrete tile coordinate derived from a world-space position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

/// Snaps a world-space position to the nearest tile center.
pub fn world_to_grid(position: Position) -> GridPos {
    GridPos {
        x: (position.x / TILE_SIZE_PX).round() as i32,
        y: (position.y / TILE_SIZE_PX).round() as i32,
    }
}

/// Cost in feet of a straight drag between two world positions.
///
/// Axis-aligned travel costs [`FEET_PER_TILE`] per tile. Mixed travel
/// decomposes into diagonal steps at [`DIAGONAL_FEET_PER_TILE`] each plus
/// the leftover straight steps.
pub fn movement_feet(from: Position, to: Position) -> f64 {
    let start = world_to_grid(from);
    let end = world_to_grid(to);
    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();

    if dx == 0 || dy == 0 {
        f64::from(dx.max(dy)) * FEET_PER_TILE
    } else {
        let diagonal = dx.min(dy);
        let straight = (dx - dy).abs();
        f64::from(diagonal) * DIAGONAL_FEET_PER_TILE + f64::from(straight) * FEET_PER_TILE
    }
}
