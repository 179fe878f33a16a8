//! Turn Resolution
//!
//! The fixed-order pipeline behind [`World::update`]. Every phase finishes
//! across all entities before the next begins:
//!
//! ```text
//! projectiles -> attrition -> snapshot -> actions
//!     -> movement -> rotation -> explosions -> cleanup -> game over?
//! ```
//!
//! Both rosters are resolved as one fleet, allies first, and split back
//! before cleanup.
//!
//! [`World::update`]: crate::game::world::World::update

use crate::core::hash::{StateHash, StateHasher};
use crate::core::hex::{distance, opposite, turn_port, turn_starboard, Coord};
use crate::core::rules::{cannonball_flight_turns, RulesConfig, MAX_SHIP_SPEED};
use crate::error::EngineError;
use crate::game::action::{Action, ShipOrder};
use crate::game::entity::{CannonBall, Mine, RumBarrel, Ship, Side};
use crate::game::events::{EventSink, GameEvent, GameEventData, TurnPhase};
use crate::game::hazard::resolve_explosions;
use crate::game::movement::resolve_movement;
use crate::game::observer::{EventLog, TurnObserver};
use crate::game::rotation::resolve_rotation;
use crate::game::world::World;

use serde::{Serialize, Deserialize};

/// Result of a resolved turn.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TurnResult {
    /// Turn counter after resolution
    pub turn: u32,
    /// Events generated this turn
    pub events: Vec<GameEvent>,
}

/// Resolve one turn of `world`.
///
/// # Determinism
///
/// Integer arithmetic only, `Vec` iteration only, no randomness. The same
/// world with the same staged orders always produces the same world and
/// the same events.
pub fn resolve_turn(
    world: &mut World,
    observer: &mut dyn TurnObserver,
) -> Result<TurnResult, EngineError> {
    let turn = world.turn;
    observer.turn_started(turn, world);

    let mut sink = EventSink::new(turn, observer);
    let World {
        my_ship_count,
        my_ships,
        enemy_ships,
        mines,
        cannon_balls,
        barrels,
        rules,
        explosions,
        ..
    } = world;
    let rules = *rules;

    let split = my_ships.len();
    let mut fleet = std::mem::take(my_ships);
    fleet.append(enemy_ships);

    // 1. Cannonballs count down
    sink.begin_phase(TurnPhase::Projectiles);
    advance_cannon_balls(cannon_balls, explosions);

    // 2. Attrition
    sink.begin_phase(TurnPhase::Attrition);
    for ship in fleet.iter_mut() {
        ship.damage(rules.attrition_damage);
    }

    // 3. Turn-initial health
    sink.begin_phase(TurnPhase::Snapshot);
    for ship in fleet.iter_mut() {
        ship.initial_health = ship.health;
    }

    // 4. Orders
    sink.begin_phase(TurnPhase::Actions);
    apply_actions(&mut fleet, mines, barrels, cannon_balls, &rules, &mut sink);

    // 5. Movement
    sink.begin_phase(TurnPhase::Movement);
    resolve_movement(&mut fleet, mines, barrels, &rules, &mut sink);

    // 6. Rotation
    sink.begin_phase(TurnPhase::Rotation);
    resolve_rotation(&mut fleet, mines, barrels, &rules, &mut sink);

    // 7. Explosions
    sink.begin_phase(TurnPhase::Explosions);
    resolve_explosions(explosions, &mut fleet, mines, barrels, &rules, &mut sink);

    // 8. Cleanup
    sink.begin_phase(TurnPhase::Cleanup);
    *enemy_ships = fleet.split_off(split);
    *my_ships = fleet;
    sink_ships(my_ships, barrels, &rules, &mut sink);
    sink_ships(enemy_ships, barrels, &rules, &mut sink);
    *my_ship_count = my_ships.len();

    // 9. Termination
    let game_over = my_ships.is_empty() || enemy_ships.is_empty();
    let winner = match (my_ships.is_empty(), enemy_ships.is_empty()) {
        (false, true) => Some(Side::Ally),
        (true, false) => Some(Side::Enemy),
        _ => None,
    };
    if game_over {
        sink.emit(GameEventData::GameOver { winner });
    }

    world.turn += 1;
    let (events, observer) = sink.finish();
    observer.turn_finished(world, &events);

    if game_over {
        return Err(EngineError::GameOver { winner });
    }

    Ok(TurnResult {
        turn: world.turn,
        events,
    })
}

/// Count down every cannonball; landed ones queue an explosion.
fn advance_cannon_balls(cannon_balls: &mut Vec<CannonBall>, explosions: &mut Vec<Coord>) {
    cannon_balls.retain_mut(|ball| {
        // A ball that already landed is dropped without exploding again
        if ball.remaining_turns == 0 {
            return false;
        }
        ball.remaining_turns -= 1;
        if ball.remaining_turns == 0 {
            explosions.push(ball.pos);
            false
        } else {
            true
        }
    });
}

/// Decay cooldowns and carry out every staged order.
fn apply_actions(
    ships: &mut [Ship],
    mines: &mut Vec<Mine>,
    barrels: &[RumBarrel],
    cannon_balls: &mut Vec<CannonBall>,
    rules: &RulesConfig,
    sink: &mut EventSink<'_>,
) {
    // Mine cells are cleared against the state before any order runs
    let mine_cells: Vec<Coord> = mines.iter().map(|m| m.pos).collect();

    for i in 0..ships.len() {
        let ship = &mut ships[i];
        ship.mine_cooldown = ship.mine_cooldown.saturating_sub(1);
        ship.cannon_cooldown = ship.cannon_cooldown.saturating_sub(1);
        ship.new_orientation = ship.orientation;

        let action = ship.action;
        match action {
            Action::Wait => {}
            Action::Faster => ship.speed = ship.speed.saturating_add(1).min(MAX_SHIP_SPEED),
            Action::Slower => ship.speed = ship.speed.saturating_sub(1),
            Action::Port => ship.new_orientation = turn_port(ship.orientation),
            Action::Starboard => ship.new_orientation = turn_starboard(ship.orientation),
            Action::Fire => {
                if let Some(target) = ship.target {
                    let flight_turns = cannonball_flight_turns(distance(ship.bow(), target));
                    cannon_balls.push(CannonBall::new(target, flight_turns));
                    sink.emit(GameEventData::CannonFired {
                        ship_id: ship.id,
                        target,
                        flight_turns,
                    });
                }
            }
            Action::Mine => lay_mine(ships, i, &mine_cells, mines, barrels, rules, sink),
        }
    }
}

/// Drop a mine behind ship `i` if it is reloaded and the cell is clear.
fn lay_mine(
    ships: &mut [Ship],
    i: usize,
    mine_cells: &[Coord],
    mines: &mut Vec<Mine>,
    barrels: &[RumBarrel],
    rules: &RulesConfig,
    sink: &mut EventSink<'_>,
) {
    let ship = &ships[i];
    if ship.mine_cooldown > 0 {
        return;
    }

    let target = ship.stern().neighbor(opposite(ship.orientation));
    let clear = target.is_inside_map()
        && barrels.iter().all(|b| b.pos != target)
        && !mine_cells.contains(&target)
        && ships
            .iter()
            .enumerate()
            .all(|(j, other)| j == i || !other.at(target));
    if !clear {
        return;
    }

    let ship = &mut ships[i];
    ship.mine_cooldown = rules.mine_cooldown;
    mines.push(Mine::new(target));
    sink.emit(GameEventData::MineLaid {
        ship_id: ship.id,
        position: target,
    });
}

/// Remove sunk ships from a roster, dropping reward barrels.
fn sink_ships(
    roster: &mut Vec<Ship>,
    barrels: &mut Vec<RumBarrel>,
    rules: &RulesConfig,
    sink: &mut EventSink<'_>,
) {
    roster.retain(|ship| {
        if !ship.is_sunk() {
            return true;
        }

        let value = ship.initial_health.min(rules.reward_barrel_cap);
        let reward = (value > 0).then_some(value);
        if let Some(value) = reward {
            barrels.push(RumBarrel::new(ship.pos, value));
        }
        sink.emit(GameEventData::ShipSunk {
            ship_id: ship.id,
            side: ship.owner,
            position: ship.pos,
            reward,
        });
        false
    });
}

// =============================================================================
// REPLAY
// =============================================================================

/// Both sides' orders for one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrders {
    /// Ally orders, in roster order
    pub ally: Vec<ShipOrder>,
    /// Enemy orders, in roster order
    pub enemy: Vec<ShipOrder>,
}

impl TurnOrders {
    /// Create a turn's orders.
    pub fn new(ally: Vec<ShipOrder>, enemy: Vec<ShipOrder>) -> Self {
        Self { ally, enemy }
    }

    /// Digest of both sides' orders, allies first.
    pub fn orders_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_orders();
        for orders in [&self.ally, &self.enemy] {
            hasher.update_len(orders.len());
            for order in orders {
                order.hash_into(&mut hasher);
            }
        }
        hasher.finalize()
    }
}

/// Result of replaying a sequence of turns.
#[derive(Clone, Debug)]
pub struct ReplayOutcome {
    /// World after the last played turn
    pub world: World,
    /// Every event, in order
    pub events: Vec<GameEvent>,
    /// Turns actually played
    pub turns_played: u32,
    /// Whether a fleet was destroyed
    pub game_over: bool,
    /// Surviving fleet, if the battle ended with one
    pub winner: Option<Side>,
}

/// Replay recorded orders from `initial`.
///
/// Runs `prepare -> set_actions x 2 -> update` per turn and stops early at
/// game over. Staging errors are returned as-is.
pub fn replay_turns(initial: World, turns: &[TurnOrders]) -> Result<ReplayOutcome, EngineError> {
    let mut world = initial;
    let mut log = EventLog::default();
    let mut turns_played = 0;
    let mut winner = None;
    let mut game_over = false;

    for orders in turns {
        world.prepare();
        world.set_actions(Side::Ally, &orders.ally)?;
        world.set_actions(Side::Enemy, &orders.enemy)?;

        turns_played += 1;
        match world.update_observed(&mut log) {
            Ok(_) => {}
            Err(EngineError::GameOver { winner: w }) => {
                game_over = true;
                winner = w;
                break;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(ReplayOutcome {
        world,
        events: log.into_events(),
        turns_played,
        game_over,
        winner,
    })
}

// =============================================================================
// TESTS
// =============================================================================
