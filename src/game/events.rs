//! Turn Events
//!
//! Events generated during turn resolution, in resolution order. Two
//! identical simulations produce identical event lists, so the list doubles
//! as a diagnostic trace and a replay check.

use serde::{Serialize, Deserialize};

use crate::core::hex::Coord;
use crate::game::entity::Side;
use crate::game::observer::TurnObserver;

/// Resolution phase of a turn, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TurnPhase {
    /// Cannonballs count down; landed ones queue explosions
    Projectiles = 0,
    /// Every ship loses rum
    Attrition = 1,
    /// Turn-initial health recorded
    Snapshot = 2,
    /// Cooldowns, speed changes, turns staged, mines laid, cannons fired
    Actions = 3,
    /// Forward micro-steps with collision rollback
    Movement = 4,
    /// Heading changes with collision rollback
    Rotation = 5,
    /// Queued explosions land
    Explosions = 6,
    /// Sunk ships removed, reward barrels dropped
    Cleanup = 7,
}

impl TurnPhase {
    /// Every phase, in execution order.
    pub const ALL: [TurnPhase; 8] = [
        TurnPhase::Projectiles,
        TurnPhase::Attrition,
        TurnPhase::Snapshot,
        TurnPhase::Actions,
        TurnPhase::Movement,
        TurnPhase::Rotation,
        TurnPhase::Explosions,
        TurnPhase::Cleanup,
    ];

    /// Get string name.
    pub fn as_str(self) -> &'static str {
        match self {
            TurnPhase::Projectiles => "projectiles",
            TurnPhase::Attrition => "attrition",
            TurnPhase::Snapshot => "snapshot",
            TurnPhase::Actions => "actions",
            TurnPhase::Movement => "movement",
            TurnPhase::Rotation => "rotation",
            TurnPhase::Explosions => "explosions",
            TurnPhase::Cleanup => "cleanup",
        }
    }
}

/// What stopped a ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Obstacle {
    /// Another ship's staged hull
    Ship,
    /// The edge of the map
    MapEdge,
}

/// Source of hull damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    /// Cannonball on bow or stern
    CannonGlancing,
    /// Cannonball on the center cell
    CannonDirect,
    /// Sitting on an exploding mine
    Mine,
    /// Next to an exploding mine
    MineSplash,
}

/// What a landing cannonball hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactOutcome {
    /// A ship took the hit
    Ship(u32),
    /// A mine was set off
    Mine,
    /// A barrel was destroyed
    Barrel,
    /// Open water
    Splash,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A cannonball was launched
    CannonFired {
        ship_id: u32,
        target: Coord,
        flight_turns: u32,
    },

    /// A mine was dropped behind a ship
    MineLaid {
        ship_id: u32,
        position: Coord,
    },

    /// A ship was stopped and rolled back
    ShipCollided {
        ship_id: u32,
        obstacle: Obstacle,
    },

    /// A ship picked up a barrel
    BarrelCollected {
        ship_id: u32,
        position: Coord,
        value: u32,
        new_health: u32,
    },

    /// A mine went off
    MineTriggered {
        position: Coord,
        forced: bool,
        victim: Option<u32>,
    },

    /// A ship lost rum to a weapon
    ShipDamaged {
        ship_id: u32,
        amount: u32,
        cause: DamageCause,
        new_health: u32,
    },

    /// A cannonball landed
    CannonBallExploded {
        position: Coord,
        outcome: ImpactOutcome,
    },

    /// A ship ran out of rum and was removed
    ShipSunk {
        ship_id: u32,
        side: Side,
        position: Coord,
        reward: Option<u32>,
    },

    /// A fleet has no ships left
    GameOver {
        winner: Option<Side>,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Turn being resolved (the turn counter before it advances)
    pub turn: u32,

    /// Phase that produced the event
    pub phase: TurnPhase,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(turn: u32, phase: TurnPhase, data: GameEventData) -> Self {
        Self { turn, phase, data }
    }

    /// Ship the event is about, if any.
    pub fn ship_id(&self) -> Option<u32> {
        match &self.data {
            GameEventData::CannonFired { ship_id, .. }
            | GameEventData::MineLaid { ship_id, .. }
            | GameEventData::ShipCollided { ship_id, .. }
            | GameEventData::BarrelCollected { ship_id, .. }
            | GameEventData::ShipDamaged { ship_id, .. }
            | GameEventData::ShipSunk { ship_id, .. } => Some(*ship_id),
            GameEventData::MineTriggered { victim, .. } => *victim,
            GameEventData::CannonBallExploded { outcome: ImpactOutcome::Ship(id), .. } => Some(*id),
            _ => None,
        }
    }

    /// Check if this event ends the battle.
    pub fn is_game_over(&self) -> bool {
        matches!(self.data, GameEventData::GameOver { .. })
    }
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Collects a turn's events and forwards each one to the observer.
pub struct EventSink<'a> {
    turn: u32,
    phase: TurnPhase,
    events: Vec<GameEvent>,
    observer: &'a mut dyn TurnObserver,
}

impl<'a> EventSink<'a> {
    /// Create a sink for `turn`.
    pub fn new(turn: u32, observer: &'a mut dyn TurnObserver) -> Self {
        Self {
            turn,
            phase: TurnPhase::Projectiles,
            events: Vec::new(),
            observer,
        }
    }

    /// Enter a new phase.
    pub fn begin_phase(&mut self, phase: TurnPhase) {
        self.phase = phase;
        self.observer.phase_started(self.turn, phase);
    }

    /// Current phase.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Record an event.
    pub fn emit(&mut self, data: GameEventData) {
        let event = GameEvent::new(self.turn, self.phase, data);
        self.observer.event(&event);
        self.events.push(event);
    }

    /// Give the observer back along with the collected events.
    pub fn finish(self) -> (Vec<GameEvent>, &'a mut dyn TurnObserver) {
        (self.events, self.observer)
    }
}

// =============================================================================
// TESTS
// =============================================================================
