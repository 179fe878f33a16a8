//! Entity Definitions
//!
//! Ships, mines, cannonballs and rum barrels. All are plain owned values so
//! cloning a [`World`](crate::game::world::World) yields a fully independent
//! snapshot.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::hex::{distance, inside_map, opposite, Coord};
use crate::core::rules::{INITIAL_SHIP_HEALTH, MAX_SHIP_HEALTH, MAX_SHIP_SPEED};
use crate::game::action::Action;

// =============================================================================
// SIDE
// =============================================================================

/// Which fleet a ship belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// The fleet the caller plays (`my_ships`)
    Ally = 1,
    /// The opposing fleet (`enemy_ships`)
    Enemy = 0,
}

impl Side {
    /// The other fleet.
    pub fn opponent(self) -> Self {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }

    /// Get string name.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Ally => "ally",
            Side::Enemy => "enemy",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// HULL
// =============================================================================

/// The three cells a ship covers: center, bow and stern.
///
/// Used both for a ship's committed footprint and for the staged footprints
/// the movement and rotation steps propose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hull {
    /// Center cell
    pub pos: Coord,
    /// Cell ahead of the center
    pub bow: Coord,
    /// Cell behind the center
    pub stern: Coord,
}

impl Hull {
    /// Footprint of a ship centered on `pos` heading `orientation`.
    #[inline]
    pub fn new(pos: Coord, orientation: u8) -> Self {
        Self {
            pos,
            bow: pos.neighbor(orientation),
            stern: pos.neighbor(opposite(orientation)),
        }
    }

    /// All covered cells.
    #[inline]
    pub fn cells(&self) -> [Coord; 3] {
        [self.pos, self.bow, self.stern]
    }

    /// Check if any covered cell is `coord`.
    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        self.pos == coord || self.bow == coord || self.stern == coord
    }

    /// Check if this hull's bow lands on any cell of `other`.
    ///
    /// Only the bow is tested; movement collisions are bow-first.
    #[inline]
    pub fn bow_hits(&self, other: &Hull) -> bool {
        other.contains(self.bow)
    }

    /// Check if any cell of this hull coincides with any cell of `other`.
    #[inline]
    pub fn overlaps(&self, other: &Hull) -> bool {
        self.cells().iter().any(|c| other.contains(*c))
    }

    /// Check if every covered cell is on the map.
    #[inline]
    pub fn is_inside_map(&self) -> bool {
        self.cells().iter().all(|c| inside_map(*c))
    }

    /// Check if any covered cell is within `range` of `coord`.
    #[inline]
    pub fn is_within(&self, coord: Coord, range: i32) -> bool {
        self.cells().iter().any(|c| distance(*c, coord) <= range)
    }
}

// =============================================================================
// SHIP
// =============================================================================

/// State of a single ship.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    /// Entity id from the snapshot
    pub id: u32,

    /// Center cell
    pub pos: Coord,

    /// Heading (0..5)
    pub orientation: u8,

    /// Cells per turn (0..=MAX_SHIP_SPEED)
    pub speed: u8,

    /// Rum on board (0..=MAX_SHIP_HEALTH)
    pub health: u32,

    /// Owning fleet
    pub owner: Side,

    /// Pending action for this turn
    pub action: Action,

    /// Fire target (set together with `Action::Fire`)
    pub target: Option<Coord>,

    /// Turns until another mine can be laid
    pub mine_cooldown: u8,

    /// Turns until the cannon is ready
    pub cannon_cooldown: u8,

    /// Health after attrition at the start of the current turn
    pub initial_health: u32,

    /// Heading staged by PORT/STARBOARD, committed by rotation
    pub new_orientation: u8,
}

impl Ship {
    /// Create a ship at rest with full health.
    pub fn new(id: u32, pos: Coord, orientation: u8, owner: Side) -> Self {
        let orientation = orientation % 6;
        Self {
            id,
            pos,
            orientation,
            speed: 0,
            health: INITIAL_SHIP_HEALTH,
            owner,
            action: Action::Wait,
            target: None,
            mine_cooldown: 0,
            cannon_cooldown: 0,
            initial_health: INITIAL_SHIP_HEALTH,
            new_orientation: orientation,
        }
    }

    /// Set speed (clamped to the legal range).
    pub fn with_speed(mut self, speed: u8) -> Self {
        self.speed = speed.min(MAX_SHIP_SPEED);
        self
    }

    /// Set health (clamped to the legal range).
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health.min(MAX_SHIP_HEALTH);
        self.initial_health = self.health;
        self
    }

    /// Set cooldown counters.
    pub fn with_cooldowns(mut self, mine_cooldown: u8, cannon_cooldown: u8) -> Self {
        self.mine_cooldown = mine_cooldown;
        self.cannon_cooldown = cannon_cooldown;
        self
    }

    /// Cell ahead of the center.
    #[inline]
    pub fn bow(&self) -> Coord {
        self.pos.neighbor(self.orientation)
    }

    /// Cell behind the center.
    #[inline]
    pub fn stern(&self) -> Coord {
        self.pos.neighbor(opposite(self.orientation))
    }

    /// Current footprint.
    #[inline]
    pub fn hull(&self) -> Hull {
        Hull::new(self.pos, self.orientation)
    }

    /// Check if the ship covers `coord`.
    #[inline]
    pub fn at(&self, coord: Coord) -> bool {
        self.hull().contains(coord)
    }

    /// Remove rum, never below zero.
    #[inline]
    pub fn damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Add rum, capped at MAX_SHIP_HEALTH.
    #[inline]
    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(MAX_SHIP_HEALTH);
    }

    /// Check if the ship has run out of rum.
    #[inline]
    pub fn is_sunk(&self) -> bool {
        self.health == 0
    }

    /// Hash the persistent part of this ship.
    ///
    /// Pending orders and per-turn scratch fields are left out.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id);
        hasher.update_coord(self.pos);
        hasher.update_u8(self.orientation);
        hasher.update_u8(self.speed);
        hasher.update_u32(self.health);
        hasher.update_u8(self.owner as u8);
        hasher.update_u8(self.mine_cooldown);
        hasher.update_u8(self.cannon_cooldown);
    }
}

// =============================================================================
// MINE / CANNONBALL / BARREL
// =============================================================================

/// A mine floating on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mine {
    /// Cell
    pub pos: Coord,
}

impl Mine {
    /// Create a mine.
    pub const fn new(pos: Coord) -> Self {
        Self { pos }
    }
}

/// A cannonball in flight toward its target cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CannonBall {
    /// Target cell
    pub pos: Coord,
    /// Turns until impact
    pub remaining_turns: u32,
}

impl CannonBall {
    /// Create a cannonball.
    pub const fn new(pos: Coord, remaining_turns: u32) -> Self {
        Self { pos, remaining_turns }
    }
}

/// A rum barrel that heals the ship picking it up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RumBarrel {
    /// Cell
    pub pos: Coord,
    /// Rum inside
    pub value: u32,
}

impl RumBarrel {
    /// Create a barrel.
    pub const fn new(pos: Coord, value: u32) -> Self {
        Self { pos, value }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bow_and_stern() {
        let ship = Ship::new(0, Coord::new(5, 5), 0, Side::Ally);
        assert_eq!(ship.bow(), Coord::new(6, 5));
        assert_eq!(ship.stern(), Coord::new(4, 5));

        let ship = Ship::new(0, Coord::new(5, 5), 1, Side::Ally);
        assert_eq!(ship.bow(), Coord::new(6, 4));
        assert_eq!(ship.stern(), Coord::new(5, 6));
    }

    #[test]
    fn test_constructor_clamps() {
        let ship = Ship::new(0, Coord::new(5, 5), 7, Side::Enemy)
            .with_speed(9)
            .with_health(250);
        assert_eq!(ship.orientation, 1);
        assert_eq!(ship.speed, MAX_SHIP_SPEED);
        assert_eq!(ship.health, MAX_SHIP_HEALTH);
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut ship = Ship::new(0, Coord::new(5, 5), 0, Side::Ally).with_health(10);
        ship.damage(25);
        assert_eq!(ship.health, 0);
        assert!(ship.is_sunk());

        ship.heal(80);
        ship.heal(15);
        assert_eq!(ship.health, 95);
        ship.heal(20);
        assert_eq!(ship.health, MAX_SHIP_HEALTH);
    }

    #[test]
    fn test_hull_checks() {
        let a = Hull::new(Coord::new(5, 5), 0);
        let b = Hull::new(Coord::new(8, 5), 3);
        // b's stern is (9, 5), bow (7, 5); a's bow is (6, 5)
        assert!(!a.overlaps(&b));
        assert!(!a.bow_hits(&b));

        let c = Hull::new(Coord::new(7, 5), 3);
        // c's bow is (6, 5), a's bow too
        assert!(a.bow_hits(&c));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_hull_bounds_and_range() {
        let edge = Hull::new(Coord::new(22, 4), 0);
        assert!(!edge.is_inside_map());
        let inside = Hull::new(Coord::new(21, 4), 0);
        assert!(inside.is_inside_map());

        assert!(inside.is_within(Coord::new(23, 4), 1));
        assert!(!inside.is_within(Coord::new(17, 4), 1));
    }
}
