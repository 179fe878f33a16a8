//! Hex Grid Geometry
//!
//! Offset coordinates on the bounded 23x21 sea, with cube-coordinate
//! conversion for distance math.
//!
//! ## Layout
//!
//! ```text
//!  row 0:  (0,0) (1,0) (2,0) ...
//!  row 1:     (0,1) (1,1) (2,1) ...     <- odd rows shifted right
//!  row 2:  (0,2) (1,2) (2,2) ...
//! ```
//!
//! Orientation 0 points east and increases counter-clockwise, so
//! orientation 1 is north-east and orientation 3 is west.
//!
//! Every function here is pure integer arithmetic: no floats, no caches,
//! identical results on every platform.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Map width in cells.
pub const MAP_WIDTH: i32 = 23;

/// Map height in cells.
pub const MAP_HEIGHT: i32 = 21;

/// Number of hex directions.
pub const DIRECTION_COUNT: u8 = 6;

/// Neighbor offsets for even rows, indexed by orientation.
pub const DIRECTIONS_EVEN: [(i32, i32); 6] = [
    (1, 0),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

/// Neighbor offsets for odd rows, indexed by orientation.
pub const DIRECTIONS_ODD: [(i32, i32); 6] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, 0),
    (0, 1),
    (1, 1),
];

// =============================================================================
// OFFSET COORDINATE
// =============================================================================

/// Offset coordinate on the hex grid.
///
/// May lie outside the map (fire targets, projected cells); use
/// [`inside_map`] to check.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighboring cell in the given orientation (taken mod 6).
    #[inline]
    pub fn neighbor(self, orientation: u8) -> Self {
        neighbor(self, orientation)
    }

    /// Hex distance to another cell.
    #[inline]
    pub fn distance_to(self, other: Self) -> i32 {
        distance(self, other)
    }

    /// Check if this cell is on the map.
    #[inline]
    pub fn is_inside_map(self) -> bool {
        inside_map(self)
    }

    /// Convert to cube coordinates.
    #[inline]
    pub fn to_cube(self) -> Cube {
        let (col, row) = (i64::from(self.x), i64::from(self.y));
        let x = col - (row - (row & 1)) / 2;
        let z = row;
        Cube { x, y: -(x + z), z }
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

// =============================================================================
// CUBE COORDINATE
// =============================================================================

/// Cube coordinate (x + y + z == 0).
///
/// Widened to i64 so any pair of `Coord`s converts and subtracts exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cube {
    /// X axis
    pub x: i64,
    /// Y axis
    pub y: i64,
    /// Z axis
    pub z: i64,
}

impl Cube {
    /// Manhattan-equivalent hex distance, saturating at `i32::MAX`.
    #[inline]
    pub fn distance_to(self, other: Self) -> i32 {
        let steps =
            ((self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()) / 2;
        i32::try_from(steps).unwrap_or(i32::MAX)
    }
}

// =============================================================================
// FREE FUNCTIONS
// =============================================================================

/// Cell adjacent to `coord` in `orientation`.
///
/// The direction table is selected by the parity of the row.
#[inline]
pub fn neighbor(coord: Coord, orientation: u8) -> Coord {
    let table = if coord.y & 1 == 1 {
        &DIRECTIONS_ODD
    } else {
        &DIRECTIONS_EVEN
    };
    let (dx, dy) = table[(orientation % DIRECTION_COUNT) as usize];
    Coord::new(coord.x + dx, coord.y + dy)
}

/// Hex distance between two offset coordinates.
#[inline]
pub fn distance(a: Coord, b: Coord) -> i32 {
    a.to_cube().distance_to(b.to_cube())
}

/// Bounds check against the fixed 23x21 map.
#[inline]
pub fn inside_map(coord: Coord) -> bool {
    coord.x >= 0 && coord.x < MAP_WIDTH && coord.y >= 0 && coord.y < MAP_HEIGHT
}

/// Orientation pointing the opposite way.
#[inline]
pub const fn opposite(orientation: u8) -> u8 {
    (orientation + 3) % DIRECTION_COUNT
}

/// Orientation after a port (counter-clockwise) turn.
#[inline]
pub const fn turn_port(orientation: u8) -> u8 {
    (orientation + 1) % DIRECTION_COUNT
}

/// Orientation after a starboard (clockwise) turn.
#[inline]
pub const fn turn_starboard(orientation: u8) -> u8 {
    (orientation + 5) % DIRECTION_COUNT
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_even_row() {
        let c = Coord::new(5, 4);
        assert_eq!(c.neighbor(0), Coord::new(6, 4));
        assert_eq!(c.neighbor(1), Coord::new(5, 3));
        assert_eq!(c.neighbor(2), Coord::new(4, 3));
        assert_eq!(c.neighbor(3), Coord::new(4, 4));
        assert_eq!(c.neighbor(4), Coord::new(4, 5));
        assert_eq!(c.neighbor(5), Coord::new(5, 5));
    }

    #[test]
    fn test_neighbor_odd_row() {
        let c = Coord::new(5, 5);
        assert_eq!(c.neighbor(0), Coord::new(6, 5));
        assert_eq!(c.neighbor(1), Coord::new(6, 4));
        assert_eq!(c.neighbor(2), Coord::new(5, 4));
        assert_eq!(c.neighbor(3), Coord::new(4, 5));
        assert_eq!(c.neighbor(4), Coord::new(5, 6));
        assert_eq!(c.neighbor(5), Coord::new(6, 6));
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        for y in 0..MAP_HEIGHT {
            for x in 0..MAP_WIDTH {
                let c = Coord::new(x, y);
                for o in 0..DIRECTION_COUNT {
                    let n = c.neighbor(o);
                    assert_eq!(distance(c, n), 1, "{:?} -> {:?}", c, n);
                    // Walking back the opposite way returns home
                    assert_eq!(n.neighbor(opposite(o)), c);
                }
            }
        }
    }

    #[test]
    fn test_distance_identity_and_symmetry() {
        let cells = [
            Coord::new(0, 0),
            Coord::new(22, 20),
            Coord::new(5, 5),
            Coord::new(10, 7),
            Coord::new(3, 18),
        ];
        for a in cells {
            assert_eq!(distance(a, a), 0);
            for b in cells {
                assert_eq!(distance(a, b), distance(b, a));
            }
        }
    }

    #[test]
    fn test_distance_along_row() {
        assert_eq!(distance(Coord::new(5, 5), Coord::new(10, 5)), 5);
        assert_eq!(distance(Coord::new(0, 0), Coord::new(0, 2)), 2);
        assert_eq!(distance(Coord::new(0, 0), Coord::new(0, 1)), 1);
        // (1, 1) is not adjacent to (0, 0): even rows lean left
        assert_eq!(distance(Coord::new(0, 0), Coord::new(1, 1)), 2);
        assert_eq!(distance(Coord::new(1, 1), Coord::new(1, 0)), 1);
    }

    #[test]
    fn test_distance_at_coordinate_extremes() {
        let far = Coord::new(i32::MAX, 0);
        assert_eq!(distance(Coord::new(0, 0), far), i32::MAX);
        let corner = Coord::new(i32::MIN, i32::MIN);
        assert_eq!(distance(corner, Coord::new(i32::MAX, i32::MAX)), i32::MAX);
        assert_eq!(distance(far, far), 0);
        assert_eq!(distance(Coord::new(i32::MAX - 3, 0), far), 3);
    }

    #[test]
    fn test_cube_invariant() {
        for y in -2..MAP_HEIGHT + 2 {
            for x in -2..MAP_WIDTH + 2 {
                let cube = Coord::new(x, y).to_cube();
                assert_eq!(cube.x + cube.y + cube.z, 0);
            }
        }
    }

    #[test]
    fn test_inside_map() {
        assert!(inside_map(Coord::new(0, 0)));
        assert!(inside_map(Coord::new(22, 20)));
        assert!(!inside_map(Coord::new(23, 0)));
        assert!(!inside_map(Coord::new(0, 21)));
        assert!(!inside_map(Coord::new(-1, 5)));
    }

    #[test]
    fn test_turns() {
        assert_eq!(turn_port(5), 0);
        assert_eq!(turn_starboard(0), 5);
        assert_eq!(opposite(4), 1);
        for o in 0..DIRECTION_COUNT {
            assert_eq!(turn_starboard(turn_port(o)), o);
        }
    }
}
