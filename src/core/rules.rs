//! Engine Rules
//!
//! Compile-time game constants and the [`RulesConfig`] value a world carries.
//! Nothing here is parsed at runtime; callers that want a variant build one
//! with struct update syntax over [`RulesConfig::default`].

use serde::{Serialize, Deserialize};

// =============================================================================
// GAME CONSTANTS
// =============================================================================

/// Cannon reload length. Snapshots may carry a loaded counter; the engine
/// only lets it decay and does not gate FIRE on it.
pub const COOLDOWN_CANNON: u8 = 2;

/// Turns a mine layer needs before it can drop another mine.
pub const COOLDOWN_MINE: u8 = 5;

/// Health a ship starts the game with.
pub const INITIAL_SHIP_HEALTH: u32 = 100;

/// Health cap (barrel pickups never heal above this).
pub const MAX_SHIP_HEALTH: u32 = 100;

/// Maximum ship speed (cells per turn, one micro-step each).
pub const MAX_SHIP_SPEED: u8 = 2;

/// Cap on the barrel left behind by a sunk ship.
pub const REWARD_RUM_BARREL_VALUE: u32 = 30;

/// Damage when a cannonball lands on a bow or stern.
pub const LOW_DAMAGE: u32 = 25;

/// Damage when a cannonball lands on a ship's center.
pub const HIGH_DAMAGE: u32 = 50;

/// Damage to the ship sitting on an exploding mine.
pub const MINE_DAMAGE: u32 = 25;

/// Splash damage to ships adjacent to an exploding mine.
pub const NEAR_MINE_DAMAGE: u32 = 10;

/// Health every ship loses at the start of each turn.
pub const ATTRITION_DAMAGE: u32 = 1;

/// Cannonball cells covered per turn of flight.
pub const CANNONBALL_CELLS_PER_TURN: i32 = 3;

// =============================================================================
// RULES CONFIG
// =============================================================================

/// Tunable rules carried by a [`World`](crate::game::world::World).
///
/// Defaults match the constants above.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// FIRE orders are honored (otherwise staged as WAIT)
    pub cannons_enabled: bool,
    /// MINE orders are honored (otherwise staged as WAIT)
    pub mines_enabled: bool,
    /// Cannonball hit on bow or stern
    pub low_damage: u32,
    /// Cannonball hit on center
    pub high_damage: u32,
    /// Direct mine hit
    pub mine_damage: u32,
    /// Mine splash
    pub near_mine_damage: u32,
    /// Per-turn rum loss
    pub attrition_damage: u32,
    /// Mine cooldown after laying
    pub mine_cooldown: u8,
    /// Reward barrel cap
    pub reward_barrel_cap: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            cannons_enabled: true,
            mines_enabled: true,
            low_damage: LOW_DAMAGE,
            high_damage: HIGH_DAMAGE,
            mine_damage: MINE_DAMAGE,
            near_mine_damage: NEAR_MINE_DAMAGE,
            attrition_damage: ATTRITION_DAMAGE,
            mine_cooldown: COOLDOWN_MINE,
            reward_barrel_cap: REWARD_RUM_BARREL_VALUE,
        }
    }
}

/// Flight time of a cannonball fired over `distance` cells.
///
/// `1 + round(distance / 3)`; the fraction is never exactly one half, so the
/// integer form `(distance + 1) / 3` matches.
#[inline]
pub fn cannonball_flight_turns(distance: i32) -> u32 {
    1 + (distance.max(0) as u32).saturating_add(1) / CANNONBALL_CELLS_PER_TURN as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_turns() {
        assert_eq!(cannonball_flight_turns(0), 1);
        assert_eq!(cannonball_flight_turns(1), 1);
        assert_eq!(cannonball_flight_turns(2), 2);
        assert_eq!(cannonball_flight_turns(4), 2);
        assert_eq!(cannonball_flight_turns(5), 3);
        assert_eq!(cannonball_flight_turns(10), 4);
        assert_eq!(cannonball_flight_turns(-4), 1);
        assert_eq!(cannonball_flight_turns(i32::MAX), 1 + (1 << 31) / 3);
    }

    #[test]
    fn test_defaults_match_constants() {
        let rules = RulesConfig::default();
        assert!(rules.cannons_enabled && rules.mines_enabled);
        assert_eq!(rules.low_damage, 25);
        assert_eq!(rules.high_damage, 50);
        assert_eq!(rules.reward_barrel_cap, 30);
    }
}
