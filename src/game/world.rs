//! World State
//!
//! The [`World`] owns every entity of one battle. It is the unit of copy for
//! search: `Clone` (or [`World::copy`]) is a deep snapshot that shares
//! nothing with its source.
//!
//! ## Calling Contract
//!
//! Once per simulated turn, in this order:
//!
//! ```text
//! prepare() -> set_actions(Ally, ..) -> set_actions(Enemy, ..) -> update()
//! ```
//!
//! Rosters are always iterated "my ships, then enemy ships", each in roster
//! order.

use serde::{Serialize, Deserialize};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::hex::Coord;
use crate::core::rules::RulesConfig;
use crate::error::EngineError;
use crate::game::action::{stage_orders, Action, ShipOrder};
use crate::game::entity::{CannonBall, Mine, RumBarrel, Ship, Side};
use crate::game::observer::{NoopObserver, TurnObserver};
use crate::game::turn::{resolve_turn, TurnResult};

/// Complete state of a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// Size of the ally roster
    pub(crate) my_ship_count: usize,

    /// Ally roster
    pub(crate) my_ships: Vec<Ship>,

    /// Enemy roster
    pub(crate) enemy_ships: Vec<Ship>,

    /// Mines afloat
    pub(crate) mines: Vec<Mine>,

    /// Cannonballs in flight
    pub(crate) cannon_balls: Vec<CannonBall>,

    /// Rum barrels afloat
    pub(crate) barrels: Vec<RumBarrel>,

    /// Rules in force
    pub(crate) rules: RulesConfig,

    /// Completed turns
    pub(crate) turn: u32,

    /// Cells where cannonballs land this turn
    #[serde(skip)]
    pub(crate) explosions: Vec<Coord>,
}

impl World {
    /// Create a world from typed entity collections with default rules.
    ///
    /// `my_ship_count` is the ally roster size reported by the feed. It is
    /// refreshed from the roster by `prepare()` and after every turn.
    pub fn new(
        my_ship_count: usize,
        barrels: Vec<RumBarrel>,
        cannon_balls: Vec<CannonBall>,
        mines: Vec<Mine>,
        my_ships: Vec<Ship>,
        enemy_ships: Vec<Ship>,
    ) -> Self {
        Self {
            my_ship_count,
            my_ships,
            enemy_ships,
            mines,
            cannon_balls,
            barrels,
            rules: RulesConfig::default(),
            turn: 0,
            explosions: Vec::new(),
        }
    }

    /// Replace the rules in force.
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Deep snapshot for a search branch.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    // =========================================================================
    // TURN CONTRACT
    // =========================================================================

    /// Clear pending orders and the explosion buffer.
    pub fn prepare(&mut self) {
        for ship in self.my_ships.iter_mut().chain(self.enemy_ships.iter_mut()) {
            ship.action = Action::Wait;
            ship.target = None;
        }
        self.explosions.clear();
        self.my_ship_count = self.my_ships.len();
    }

    /// Stage one side's orders, one per ship in roster order.
    ///
    /// Fails without touching the roster when the count is wrong or any
    /// order is malformed.
    pub fn set_actions(&mut self, side: Side, orders: &[ShipOrder]) -> Result<(), EngineError> {
        let rules = self.rules;
        let roster = self.fleet_mut(side);
        if roster.len() != orders.len() {
            return Err(EngineError::ActionCountMismatch {
                side,
                expected: roster.len(),
                actual: orders.len(),
            });
        }
        stage_orders(roster, orders, &rules)
    }

    /// Resolve one turn.
    ///
    /// Returns `Err(EngineError::GameOver { .. })` once a fleet is gone; the
    /// world is fully updated before that is reported.
    pub fn update(&mut self) -> Result<TurnResult, EngineError> {
        self.update_observed(&mut NoopObserver)
    }

    /// Resolve one turn, reporting progress to `observer`.
    pub fn update_observed(
        &mut self,
        observer: &mut dyn TurnObserver,
    ) -> Result<TurnResult, EngineError> {
        resolve_turn(self, observer)
    }

    // =========================================================================
    // OBSERVATION
    // =========================================================================

    /// Ally roster.
    pub fn my_ships(&self) -> &[Ship] {
        &self.my_ships
    }

    /// Enemy roster.
    pub fn enemy_ships(&self) -> &[Ship] {
        &self.enemy_ships
    }

    /// Roster of `side`.
    pub fn fleet(&self, side: Side) -> &[Ship] {
        match side {
            Side::Ally => &self.my_ships,
            Side::Enemy => &self.enemy_ships,
        }
    }

    fn fleet_mut(&mut self, side: Side) -> &mut [Ship] {
        match side {
            Side::Ally => &mut self.my_ships,
            Side::Enemy => &mut self.enemy_ships,
        }
    }

    /// Every ship, allies first.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> + '_ {
        self.my_ships.iter().chain(self.enemy_ships.iter())
    }

    /// Look up a ship by id.
    pub fn ship(&self, id: u32) -> Option<&Ship> {
        self.ships().find(|s| s.id == id)
    }

    /// Mines afloat.
    pub fn mines(&self) -> &[Mine] {
        &self.mines
    }

    /// Cannonballs in flight.
    pub fn cannon_balls(&self) -> &[CannonBall] {
        &self.cannon_balls
    }

    /// Rum barrels afloat.
    pub fn barrels(&self) -> &[RumBarrel] {
        &self.barrels
    }

    /// Ally roster size as of the last `prepare()` or turn.
    pub fn my_ship_count(&self) -> usize {
        self.my_ship_count
    }

    /// Completed turns.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Rules in force.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Check if either fleet is gone.
    pub fn is_game_over(&self) -> bool {
        self.my_ships.is_empty() || self.enemy_ships.is_empty()
    }

    /// Surviving fleet once the battle is over.
    ///
    /// `None` while both fleets sail, or when both sank together.
    pub fn winner(&self) -> Option<Side> {
        match (self.my_ships.is_empty(), self.enemy_ships.is_empty()) {
            (false, true) => Some(Side::Ally),
            (true, false) => Some(Side::Enemy),
            _ => None,
        }
    }

    // =========================================================================
    // HASHING & SNAPSHOTS
    // =========================================================================

    /// Digest of every persistent field, for branch comparison.
    pub fn state_hash(&self) -> StateHash {
        compute_state_hash(self.turn, |hasher| {
            hasher.update_len(self.my_ships.len());
            for ship in &self.my_ships {
                ship.hash_into(hasher);
            }

            hasher.update_len(self.enemy_ships.len());
            for ship in &self.enemy_ships {
                ship.hash_into(hasher);
            }

            hasher.update_len(self.mines.len());
            for mine in &self.mines {
                hasher.update_coord(mine.pos);
            }

            hasher.update_len(self.cannon_balls.len());
            for ball in &self.cannon_balls {
                hasher.update_coord(ball.pos);
                hasher.update_u32(ball.remaining_turns);
            }

            hasher.update_len(self.barrels.len());
            for barrel in &self.barrels {
                hasher.update_coord(barrel.pos);
                hasher.update_u32(barrel.value);
            }
        })
    }

    /// Compact binary snapshot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Restore a binary snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Pretty JSON for inspection.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================
