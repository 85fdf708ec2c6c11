//! Geometric utility functions for distance calculations and map bounds.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};
use serde::{Deserialize, Serialize};

/// Integer grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Creates a position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position as a point in the plane, for distance queries and indexing.
    pub fn to_point(self) -> Point<f64> {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Euclidean distance between two grid positions.
///
/// # Arguments
///
/// * `a` - First position
/// * `b` - Second position
pub fn euclidean_distance(a: Position, b: Position) -> f64 {
    Euclidean.distance(a.to_point(), b.to_point())
}

/// Clamps a position into the map rectangle `[0, width-1] × [0, height-1]`.
///
/// # Arguments
///
/// * `pos` - Position to clamp
/// * `width` - Map width, must be positive
/// * `height` - Map height, must be positive
pub fn clamp_to_map(pos: Position, width: i32, height: i32) -> Position {
    Position {
        x: pos.x.clamp(0, width - 1),
        y: pos.y.clamp(0, height - 1),
    }
}

/// Checks whether a position lies inside the map rectangle.
pub fn in_bounds(pos: Position, width: i32, height: i32) -> bool {
    (0..width).contains(&pos.x) && (0..height).contains(&pos.y)
}
