//! Movement Resolution
//!
//! Ships advance one cell per micro-step, up to `MAX_SHIP_SPEED` steps.
//!
//! ## Micro-step
//!
//! 1. Every ship whose speed covers the step stages a hull one cell ahead.
//!    A ship whose staged center or bow would leave the map stops instead.
//! 2. Collision passes: a ship is flagged when its staged bow lands on any
//!    other ship's staged hull. Flagged ships fall back to their committed
//!    hull and stop. Passes repeat until one flags nobody new.
//! 3. Staged centers are committed and the hazard pass runs.
//!
//! Only the mover's bow is tested, so a ship can be rammed without being
//! flagged itself.

use crate::core::rules::{RulesConfig, MAX_SHIP_SPEED};
use crate::game::entity::{Hull, Mine, RumBarrel, Ship};
use crate::game::events::{EventSink, GameEventData, Obstacle};
use crate::game::hazard::resolve_hazards;

/// Resolve every movement micro-step for the turn.
pub(crate) fn resolve_movement(
    ships: &mut [Ship],
    mines: &[Mine],
    barrels: &mut Vec<RumBarrel>,
    rules: &RulesConfig,
    sink: &mut EventSink<'_>,
) {
    for step in 1..=MAX_SHIP_SPEED {
        let mut staged = stage_step(ships, step, sink);
        settle_collisions(ships, &mut staged, sink);

        for (ship, hull) in ships.iter_mut().zip(&staged) {
            ship.pos = hull.pos;
        }

        resolve_hazards(ships, mines, barrels, rules, sink);
    }
}

/// Stage one cell of forward movement for every ship fast enough.
fn stage_step(ships: &mut [Ship], step: u8, sink: &mut EventSink<'_>) -> Vec<Hull> {
    ships
        .iter_mut()
        .map(|ship| {
            let current = ship.hull();
            if step > ship.speed {
                return current;
            }

            let ahead = Hull::new(ship.bow(), ship.orientation);
            if ahead.pos.is_inside_map() && ahead.bow.is_inside_map() {
                ahead
            } else {
                ship.speed = 0;
                sink.emit(GameEventData::ShipCollided {
                    ship_id: ship.id,
                    obstacle: Obstacle::MapEdge,
                });
                current
            }
        })
        .collect()
}

/// Roll back bow collisions until a pass flags no new ship.
///
/// Every pass flags at least one ship not flagged before, so the loop runs
/// at most once per ship.
fn settle_collisions(ships: &mut [Ship], staged: &mut [Hull], sink: &mut EventSink<'_>) {
    let mut flagged = vec![false; ships.len()];
    let mut _pass = 0u32;

    loop {
        let hits: Vec<usize> = (0..ships.len())
            .filter(|&i| !flagged[i] && bow_collides(i, staged))
            .collect();

        if hits.is_empty() {
            break;
        }

        #[cfg(feature = "debug-tracing")]
        tracing::trace!(pass = _pass, flagged = hits.len(), "Movement collision pass");

        for i in hits {
            let ship = &mut ships[i];
            staged[i] = ship.hull();
            ship.speed = 0;
            flagged[i] = true;
            sink.emit(GameEventData::ShipCollided {
                ship_id: ship.id,
                obstacle: Obstacle::Ship,
            });
        }
        _pass += 1;
    }
}

/// Check if staged hull `i` rams any other staged hull.
#[inline]
fn bow_collides(i: usize, staged: &[Hull]) -> bool {
    staged
        .iter()
        .enumerate()
        .any(|(j, other)| j != i && staged[i].bow_hits(other))
}

// =============================================================================
// TESTS
// =============================================================================
