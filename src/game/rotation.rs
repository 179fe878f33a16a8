//! Rotation Resolution
//!
//! Every ship swings to its staged heading at once, keeping its center.
//! Unlike movement, collisions compare whole hulls both ways: a ship is
//! flagged when any of its staged cells coincides with any staged cell of
//! another ship, or when a turning ship's staged bow or stern would leave the
//! map. Flagged ships keep their original heading and stop. Passes repeat
//! until one flags nobody new; then headings are committed and the hazard
//! pass runs.

use crate::core::rules::RulesConfig;
use crate::game::entity::{Hull, Mine, RumBarrel, Ship};
use crate::game::events::{EventSink, GameEventData, Obstacle};
use crate::game::hazard::resolve_hazards;

/// Resolve heading changes for the turn.
pub(crate) fn resolve_rotation(
    ships: &mut [Ship],
    mines: &[Mine],
    barrels: &mut Vec<RumBarrel>,
    rules: &RulesConfig,
    sink: &mut EventSink<'_>,
) {
    let mut staged: Vec<Hull> = ships
        .iter()
        .map(|ship| Hull::new(ship.pos, ship.new_orientation))
        .collect();
    let mut flagged = vec![false; ships.len()];
    let mut _pass = 0u32;

    loop {
        let hits: Vec<(usize, Obstacle)> = (0..ships.len())
            .filter(|&i| !flagged[i])
            .filter_map(|i| blocked_by(&ships[i], i, &staged).map(|o| (i, o)))
            .collect();

        if hits.is_empty() {
            break;
        }

        #[cfg(feature = "debug-tracing")]
        tracing::trace!(pass = _pass, flagged = hits.len(), "Rotation collision pass");

        for (i, obstacle) in hits {
            let ship = &mut ships[i];
            ship.new_orientation = ship.orientation;
            ship.speed = 0;
            staged[i] = ship.hull();
            flagged[i] = true;
            sink.emit(GameEventData::ShipCollided {
                ship_id: ship.id,
                obstacle,
            });
        }
        _pass += 1;
    }

    for ship in ships.iter_mut() {
        ship.orientation = ship.new_orientation;
    }

    resolve_hazards(ships, mines, barrels, rules, sink);
}

/// What blocks staged hull `i`, if anything.
fn blocked_by(ship: &Ship, i: usize, staged: &[Hull]) -> Option<Obstacle> {
    let hull = &staged[i];

    // Only a ship actually turning can swing off the map
    if ship.new_orientation != ship.orientation && !hull.is_inside_map() {
        return Some(Obstacle::MapEdge);
    }

    let hit = staged
        .iter()
        .enumerate()
        .any(|(j, other)| j != i && (hull.overlaps(other) || other.overlaps(hull)));
    hit.then_some(Obstacle::Ship)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hex::{turn_port, turn_starboard, Coord};
    use crate::game::entity::Side;
    use crate::game::observer::NoopObserver;

    fn run(ships: &mut [Ship], mines: &[Mine]) {
        let mut observer = NoopObserver;
        let mut sink = EventSink::new(0, &mut observer);
        resolve_rotation(ships, mines, &mut vec![], &RulesConfig::default(), &mut sink);
    }

    fn turning(id: u32, x: i32, y: i32, orientation: u8, to: u8) -> Ship {
        let mut ship = Ship::new(id, Coord::new(x, y), orientation, Side::Ally).with_speed(1);
        ship.new_orientation = to;
        ship
    }

    #[test]
    fn test_free_rotation_commits() {
        let mut ships = vec![turning(0, 5, 5, 0, turn_port(0))];
        run(&mut ships, &[]);

        assert_eq!(ships[0].orientation, 1);
        assert_eq!(ships[0].speed, 1);
        assert_eq!(ships[0].bow(), Coord::new(6, 4));
    }

    #[test]
    fn test_overlapping_rotation_stops_both() {
        // Ship 0 turning port swings its bow onto (6, 4), the stern of ship 1.
        // The check is symmetric, so ship 1 is flagged as well.
        let mut ships = vec![
            turning(0, 5, 5, 0, 1),
            turning(1, 7, 4, 0, 0),
        ];
        run(&mut ships, &[]);

        assert_eq!(ships[0].orientation, 0);
        assert_eq!(ships[0].speed, 0);
        assert_eq!(ships[1].orientation, 0);
        assert_eq!(ships[1].speed, 0);
    }

    #[test]
    fn test_both_turning_into_each_other() {
        // Ship 0 swings its bow to (6, 4); ship 1 swings its stern there too
        let mut ships = vec![
            turning(0, 5, 5, 0, 1),
            turning(1, 6, 3, 0, 1),
            turning(2, 15, 15, 0, 1),
        ];
        run(&mut ships, &[]);

        assert_eq!(ships[0].orientation, 0);
        assert_eq!(ships[1].orientation, 0);
        assert_eq!(ships[0].speed, 0);
        assert_eq!(ships[1].speed, 0);
        // Unrelated ship turns freely
        assert_eq!(ships[2].orientation, 1);
        assert_eq!(ships[2].speed, 1);
    }

    #[test]
    fn test_rotation_off_map_reverts() {
        // On the top row, turning port would put the bow at y = -1
        let mut ships = vec![turning(0, 5, 0, 0, turn_port(0))];
        run(&mut ships, &[]);

        assert_eq!(ships[0].orientation, 0);
        assert_eq!(ships[0].speed, 0);
    }

    #[test]
    fn test_rotation_onto_mine_triggers() {
        let mut ships = vec![turning(0, 5, 5, 0, turn_starboard(0))];
        // Starboard from east points south-east: bow at (6, 6)
        let mines = vec![Mine::new(Coord::new(6, 6))];
        run(&mut ships, &mines);

        assert_eq!(ships[0].orientation, 5);
        assert_eq!(ships[0].health, 75);
    }
}
