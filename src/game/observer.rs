//! Turn Observers
//!
//! Hook points a caller can attach to [`World::update_observed`]. Observers
//! only ever see shared references; resolution never depends on them.
//!
//! [`World::update_observed`]: crate::game::world::World::update_observed

use tracing::{debug, trace};

use crate::core::hash::short_hex;
use crate::game::events::{GameEvent, TurnPhase};
use crate::game::world::World;

/// Receives callbacks while a turn resolves. All hooks default to no-ops.
pub trait TurnObserver {
    /// Called before the first phase, with the world as staged.
    fn turn_started(&mut self, _turn: u32, _world: &World) {}

    /// Called when a phase begins.
    fn phase_started(&mut self, _turn: u32, _phase: TurnPhase) {}

    /// Called for every event, in resolution order.
    fn event(&mut self, _event: &GameEvent) {}

    /// Called after cleanup with the fully updated world.
    fn turn_finished(&mut self, _world: &World, _events: &[GameEvent]) {}
}

/// Observer that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TurnObserver for NoopObserver {}

/// Observer that keeps a copy of every event, across turns.
///
/// Captures the final turn's events too, which `update` reports only as
/// `EngineError::GameOver`.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Events seen so far.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the recorded events.
    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }
}

impl TurnObserver for EventLog {
    fn event(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}

/// Observer that forwards hooks to `tracing`.
///
/// Phase boundaries and events log at `trace`, turn summaries at `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl TurnObserver for TracingObserver {
    fn turn_started(&mut self, turn: u32, world: &World) {
        debug!(
            turn,
            ships = world.ships().count(),
            mines = world.mines().len(),
            cannon_balls = world.cannon_balls().len(),
            barrels = world.barrels().len(),
            "Turn started"
        );
    }

    fn phase_started(&mut self, turn: u32, phase: TurnPhase) {
        trace!(turn, phase = phase.as_str(), "Phase");
    }

    fn event(&mut self, event: &GameEvent) {
        trace!(turn = event.turn, phase = event.phase.as_str(), data = ?event.data, "Event");
    }

    fn turn_finished(&mut self, world: &World, events: &[GameEvent]) {
        debug!(
            turn = world.turn(),
            allies = world.my_ships().len(),
            enemies = world.enemy_ships().len(),
            events = events.len(),
            hash = %short_hex(&world.state_hash()),
            "Turn finished"
        );
    }
}
