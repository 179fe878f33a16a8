//! Ship Orders
//!
//! The seven actions a ship can take in a turn, their text form, and the
//! staging step that writes validated orders onto a roster.
//!
//! ## Text Form
//!
//! ```text
//! WAIT | FASTER | SLOWER | PORT | STARBOARD | MINE | FIRE <x> <y>
//! ```

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::hex::Coord;
use crate::core::rules::RulesConfig;
use crate::error::EngineError;
use crate::game::entity::Ship;

// =============================================================================
// ACTION
// =============================================================================

/// A ship action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Do nothing
    #[default]
    Wait = 0,
    /// Speed up by one
    Faster = 1,
    /// Slow down by one
    Slower = 2,
    /// Turn counter-clockwise
    Port = 3,
    /// Turn clockwise
    Starboard = 4,
    /// Fire a cannonball at a target cell
    Fire = 5,
    /// Drop a mine behind the stern
    Mine = 6,
}

impl Action {
    /// Every action, in tag order.
    pub const ALL: [Action; 7] = [
        Action::Wait,
        Action::Faster,
        Action::Slower,
        Action::Port,
        Action::Starboard,
        Action::Fire,
        Action::Mine,
    ];

    /// Get the action tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Wait => "WAIT",
            Action::Faster => "FASTER",
            Action::Slower => "SLOWER",
            Action::Port => "PORT",
            Action::Starboard => "STARBOARD",
            Action::Fire => "FIRE",
            Action::Mine => "MINE",
        }
    }

    /// Check if this action needs a target cell.
    pub fn needs_target(self) -> bool {
        matches!(self, Action::Fire)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| EngineError::InvalidAction(s.to_string()))
    }
}

// =============================================================================
// SHIP ORDER
// =============================================================================

/// One ship's order for a turn: an action and, for FIRE, a target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipOrder {
    /// What to do
    pub action: Action,
    /// Fire target
    pub target: Option<Coord>,
}

impl ShipOrder {
    /// Order without a target.
    pub const fn new(action: Action) -> Self {
        Self { action, target: None }
    }

    /// WAIT order.
    pub const fn wait() -> Self {
        Self::new(Action::Wait)
    }

    /// FASTER order.
    pub const fn faster() -> Self {
        Self::new(Action::Faster)
    }

    /// SLOWER order.
    pub const fn slower() -> Self {
        Self::new(Action::Slower)
    }

    /// PORT order.
    pub const fn port() -> Self {
        Self::new(Action::Port)
    }

    /// STARBOARD order.
    pub const fn starboard() -> Self {
        Self::new(Action::Starboard)
    }

    /// MINE order.
    pub const fn mine() -> Self {
        Self::new(Action::Mine)
    }

    /// FIRE order at `target`.
    pub const fn fire(target: Coord) -> Self {
        Self {
            action: Action::Fire,
            target: Some(target),
        }
    }

    /// Check the order is well formed.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.action.needs_target() && self.target.is_none() {
            return Err(EngineError::InvalidAction(format!(
                "{} requires a target",
                self.action
            )));
        }
        Ok(())
    }

    /// Order actually staged under `rules` (disabled features become WAIT).
    pub fn effective(&self, rules: &RulesConfig) -> ShipOrder {
        match self.action {
            Action::Fire if !rules.cannons_enabled => ShipOrder::wait(),
            Action::Mine if !rules.mines_enabled => ShipOrder::wait(),
            Action::Fire => *self,
            action => ShipOrder::new(action),
        }
    }

    /// Feed this order into a hasher.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.action as u8);
        hasher.update_opt_coord(self.target);
    }
}

impl From<Action> for ShipOrder {
    fn from(action: Action) -> Self {
        Self::new(action)
    }
}

impl fmt::Display for ShipOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Some(target) if self.action.needs_target() => write!(f, "{} {}", self.action, target),
            _ => write!(f, "{}", self.action),
        }
    }
}

impl FromStr for ShipOrder {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAction(s.to_string());
        let mut parts = s.split_whitespace();

        let action: Action = parts.next().ok_or_else(invalid)?.parse()?;
        let order = if action.needs_target() {
            let x = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
            let y = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
            ShipOrder::fire(Coord::new(x, y))
        } else {
            ShipOrder::new(action)
        };

        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(order)
    }
}

// =============================================================================
// STAGING
// =============================================================================

/// Write orders onto a roster.
///
/// Every order is validated before any ship is touched, so a failing call
/// leaves the roster unchanged. The caller checks the length.
pub(crate) fn stage_orders(
    ships: &mut [Ship],
    orders: &[ShipOrder],
    rules: &RulesConfig,
) -> Result<(), EngineError> {
    debug_assert_eq!(ships.len(), orders.len());

    for order in orders {
        order.validate()?;
    }

    for (ship, order) in ships.iter_mut().zip(orders) {
        let order = order.effective(rules);
        ship.action = order.action;
        ship.target = order.target;
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::Side;

    #[test]
    fn test_action_parse() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
        assert!(matches!("SAIL".parse::<Action>(), Err(EngineError::InvalidAction(_))));
        assert!("wait".parse::<Action>().is_err());
    }

    #[test]
    fn test_order_parse() {
        assert_eq!("FIRE 4 7".parse::<ShipOrder>(), Ok(ShipOrder::fire(Coord::new(4, 7))));
        assert_eq!(" PORT ".parse::<ShipOrder>(), Ok(ShipOrder::port()));
        assert_eq!("FIRE -1 30".parse::<ShipOrder>(), Ok(ShipOrder::fire(Coord::new(-1, 30))));

        assert!("FIRE".parse::<ShipOrder>().is_err());
        assert!("FIRE 4".parse::<ShipOrder>().is_err());
        assert!("FIRE a b".parse::<ShipOrder>().is_err());
        assert!("WAIT 1".parse::<ShipOrder>().is_err());
        assert!("".parse::<ShipOrder>().is_err());
    }

    #[test]
    fn test_order_display() {
        assert_eq!(ShipOrder::fire(Coord::new(4, 7)).to_string(), "FIRE 4 7");
        assert_eq!(ShipOrder::mine().to_string(), "MINE");
    }

    #[test]
    fn test_fire_without_target_rejected() {
        let order = ShipOrder::new(Action::Fire);
        assert!(matches!(order.validate(), Err(EngineError::InvalidAction(_))));
    }

    #[test]
    fn test_disabled_features_stage_wait() {
        let rules = RulesConfig {
            cannons_enabled: false,
            mines_enabled: false,
            ..RulesConfig::default()
        };
        assert_eq!(ShipOrder::fire(Coord::new(1, 1)).effective(&rules), ShipOrder::wait());
        assert_eq!(ShipOrder::mine().effective(&rules), ShipOrder::wait());
        assert_eq!(ShipOrder::port().effective(&rules), ShipOrder::port());
    }

    #[test]
    fn test_staging_is_all_or_nothing() {
        let mut ships = vec![
            Ship::new(0, Coord::new(3, 3), 0, Side::Ally),
            Ship::new(1, Coord::new(8, 3), 0, Side::Ally),
        ];
        let orders = [ShipOrder::faster(), ShipOrder::new(Action::Fire)];

        let result = stage_orders(&mut ships, &orders, &RulesConfig::default());
        assert!(result.is_err());
        assert_eq!(ships[0].action, Action::Wait);

        let orders = [ShipOrder::faster(), ShipOrder::fire(Coord::new(9, 9))];
        stage_orders(&mut ships, &orders, &RulesConfig::default()).unwrap();
        assert_eq!(ships[0].action, Action::Faster);
        assert_eq!(ships[1].target, Some(Coord::new(9, 9)));
    }
}
