//! Hazard Resolution
//!
//! Mines, barrels and landing cannonballs.
//!
//! A mine goes off in two ways:
//! - **Passive**: a ship's hull ends a movement step or a rotation on it.
//!   Ships take damage, the mine stays afloat.
//! - **Forced**: a cannonball lands on it. Ships take damage and the mine is
//!   removed.

use crate::core::hex::Coord;
use crate::core::rules::RulesConfig;
use crate::game::entity::{Mine, RumBarrel, Ship};
use crate::game::events::{DamageCause, EventSink, GameEventData, ImpactOutcome};

/// Set off a mine at `position`.
///
/// The first ship covering the cell is the victim and takes mine damage.
/// When forced or when a victim was found, every other ship with a hull cell
/// within one step of the mine takes splash damage. Returns the victim id.
pub(crate) fn trigger_mine(
    position: Coord,
    ships: &mut [Ship],
    forced: bool,
    rules: &RulesConfig,
    sink: &mut EventSink<'_>,
) -> Option<u32> {
    let victim = ships.iter().position(|s| s.at(position));

    sink.emit(GameEventData::MineTriggered {
        position,
        forced,
        victim: victim.map(|i| ships[i].id),
    });

    if let Some(i) = victim {
        let ship = &mut ships[i];
        ship.damage(rules.mine_damage);
        sink.emit(GameEventData::ShipDamaged {
            ship_id: ship.id,
            amount: rules.mine_damage,
            cause: DamageCause::Mine,
            new_health: ship.health,
        });
    }

    if forced || victim.is_some() {
        for (i, ship) in ships.iter_mut().enumerate() {
            if Some(i) == victim || !ship.hull().is_within(position, 1) {
                continue;
            }
            ship.damage(rules.near_mine_damage);
            sink.emit(GameEventData::ShipDamaged {
                ship_id: ship.id,
                amount: rules.near_mine_damage,
                cause: DamageCause::MineSplash,
                new_health: ship.health,
            });
        }
    }

    victim.map(|i| ships[i].id)
}

/// Hazard pass after a movement step or a rotation.
///
/// Visits ships in roster order. Each ship collects every barrel under its
/// hull, then passively sets off every mine under its hull.
pub(crate) fn resolve_hazards(
    ships: &mut [Ship],
    mines: &[Mine],
    barrels: &mut Vec<RumBarrel>,
    rules: &RulesConfig,
    sink: &mut EventSink<'_>,
) {
    for i in 0..ships.len() {
        let hull = ships[i].hull();

        let ship = &mut ships[i];
        barrels.retain(|barrel| {
            if !hull.contains(barrel.pos) {
                return true;
            }
            ship.heal(barrel.value);
            sink.emit(GameEventData::BarrelCollected {
                ship_id: ship.id,
                position: barrel.pos,
                value: barrel.value,
                new_health: ship.health,
            });
            false
        });

        for mine in mines.iter().filter(|m| hull.contains(m.pos)) {
            trigger_mine(mine.pos, ships, false, rules, sink);
        }
    }
}

/// Land every queued cannonball.
///
/// Per cell, the first match wins: a ship (glancing on bow or stern, direct
/// on the center), then a mine (forced and removed), then a barrel
/// (destroyed). Anything else splashes.
pub(crate) fn resolve_explosions(
    explosions: &mut Vec<Coord>,
    ships: &mut [Ship],
    mines: &mut Vec<Mine>,
    barrels: &mut Vec<RumBarrel>,
    rules: &RulesConfig,
    sink: &mut EventSink<'_>,
) {
    for position in explosions.drain(..) {
        if let Some(i) = ships.iter().position(|s| s.at(position)) {
            let ship = &mut ships[i];
            let (amount, cause) = if ship.pos == position {
                (rules.high_damage, DamageCause::CannonDirect)
            } else {
                (rules.low_damage, DamageCause::CannonGlancing)
            };
            sink.emit(GameEventData::CannonBallExploded {
                position,
                outcome: ImpactOutcome::Ship(ship.id),
            });
            ship.damage(amount);
            sink.emit(GameEventData::ShipDamaged {
                ship_id: ship.id,
                amount,
                cause,
                new_health: ship.health,
            });
        } else if mines.iter().any(|m| m.pos == position) {
            mines.retain(|m| m.pos != position);
            sink.emit(GameEventData::CannonBallExploded {
                position,
                outcome: ImpactOutcome::Mine,
            });
            trigger_mine(position, ships, true, rules, sink);
        } else if barrels.iter().any(|b| b.pos == position) {
            barrels.retain(|b| b.pos != position);
            sink.emit(GameEventData::CannonBallExploded {
                position,
                outcome: ImpactOutcome::Barrel,
            });
        } else {
            sink.emit(GameEventData::CannonBallExploded {
                position,
                outcome: ImpactOutcome::Splash,
            });
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::Side;
    use crate::game::events::GameEvent;
    use crate::game::observer::NoopObserver;

    fn ship(id: u32, x: i32, y: i32, orientation: u8) -> Ship {
        Ship::new(id, Coord::new(x, y), orientation, Side::Ally)
    }

    fn run<F>(f: F) -> Vec<GameEvent>
    where
        F: FnOnce(&mut EventSink<'_>),
    {
        let mut observer = NoopObserver;
        let mut sink = EventSink::new(0, &mut observer);
        f(&mut sink);
        sink.finish().0
    }

    #[test]
    fn test_passive_mine_damages_and_stays() {
        let rules = RulesConfig::default();
        // Mine under the bow of ship 0; the stern of ship 1 is adjacent to it
        let mut ships = vec![ship(0, 5, 5, 0), ship(1, 8, 6, 0)];
        let mines = vec![Mine::new(Coord::new(6, 5))];
        let mut barrels = vec![];

        run(|sink| resolve_hazards(&mut ships, &mines, &mut barrels, &rules, sink));

        assert_eq!(ships[0].health, 100 - rules.mine_damage);
        assert_eq!(ships[1].health, 100 - rules.near_mine_damage);
        assert_eq!(mines.len(), 1);
    }

    #[test]
    fn test_splash_hits_adjacent_ship() {
        let rules = RulesConfig::default();
        let mut ships = vec![ship(0, 5, 5, 0), ship(1, 6, 3, 0)];
        // (6, 4) is adjacent to (6, 3); not on either hull
        let events = run(|sink| {
            let victim = trigger_mine(Coord::new(6, 4), &mut ships, true, &rules, sink);
            assert_eq!(victim, None);
        });

        assert_eq!(ships[1].health, 100 - rules.near_mine_damage);
        // (6, 4) is adjacent to the bow (6, 5) of ship 0 as well
        assert_eq!(ships[0].health, 100 - rules.near_mine_damage);
        assert!(matches!(
            events[0].data,
            GameEventData::MineTriggered { forced: true, victim: None, .. }
        ));
    }

    #[test]
    fn test_unforced_mine_without_victim_is_inert() {
        let rules = RulesConfig::default();
        let mut ships = vec![ship(0, 5, 5, 0)];
        run(|sink| {
            trigger_mine(Coord::new(7, 5), &mut ships, false, &rules, sink);
        });
        assert_eq!(ships[0].health, 100);
    }

    #[test]
    fn test_barrel_pickup_heals_and_removes() {
        let rules = RulesConfig::default();
        let mut ships = vec![ship(0, 5, 5, 0).with_health(80)];
        let mut barrels = vec![
            RumBarrel::new(Coord::new(4, 5), 15),
            RumBarrel::new(Coord::new(12, 12), 10),
        ];

        run(|sink| resolve_hazards(&mut ships, &[], &mut barrels, &rules, sink));

        assert_eq!(ships[0].health, 95);
        assert_eq!(barrels, vec![RumBarrel::new(Coord::new(12, 12), 10)]);
    }

    #[test]
    fn test_explosion_priority() {
        let rules = RulesConfig::default();
        let mut ships = vec![ship(0, 5, 5, 0), ship(1, 10, 10, 0)];
        let mut mines = vec![Mine::new(Coord::new(15, 15))];
        let mut barrels = vec![RumBarrel::new(Coord::new(18, 2), 10)];
        let mut explosions = vec![
            Coord::new(5, 5),   // center of ship 0
            Coord::new(11, 10), // bow of ship 1
            Coord::new(15, 15), // mine
            Coord::new(18, 2),  // barrel
            Coord::new(0, 20),  // water
        ];

        let events = run(|sink| {
            resolve_explosions(&mut explosions, &mut ships, &mut mines, &mut barrels, &rules, sink)
        });

        assert!(explosions.is_empty());
        assert_eq!(ships[0].health, 100 - rules.high_damage);
        assert_eq!(ships[1].health, 100 - rules.low_damage);
        assert!(mines.is_empty());
        assert!(barrels.is_empty());

        let outcomes: Vec<ImpactOutcome> = events
            .iter()
            .filter_map(|e| match e.data {
                GameEventData::CannonBallExploded { outcome, .. } => Some(outcome),
                _ => None,
            })
            .collect();
        assert_eq!(
            outcomes,
            vec![
                ImpactOutcome::Ship(0),
                ImpactOutcome::Ship(1),
                ImpactOutcome::Mine,
                ImpactOutcome::Barrel,
                ImpactOutcome::Splash,
            ]
        );
    }

    #[test]
    fn test_ship_shields_mine_under_it() {
        let rules = RulesConfig::default();
        // A ship sits on a mine cell: the ship takes the shot, the mine survives
        let mut ships = vec![ship(0, 5, 5, 0)];
        let mut mines = vec![Mine::new(Coord::new(6, 5))];
        let mut explosions = vec![Coord::new(6, 5)];

        run(|sink| {
            resolve_explosions(&mut explosions, &mut ships, &mut mines, &mut vec![], &rules, sink)
        });

        assert_eq!(ships[0].health, 100 - rules.low_damage);
        assert_eq!(mines.len(), 1);
    }
}
