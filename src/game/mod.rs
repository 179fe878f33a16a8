//! Game Logic Module
//!
//! All battle simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `entity`: Ships, mines, cannonballs, rum barrels
//! - `action`: Ship orders, parsing and staging
//! - `world`: Battle state and the per-turn calling contract
//! - `turn`: Fixed-order turn pipeline and order replay
//! - `movement`: Forward micro-steps with collision rollback
//! - `rotation`: Heading changes with collision rollback
//! - `hazard`: Barrel pickup, mine triggers, explosions
//! - `events`: Turn events for diagnostics and replay checks
//! - `observer`: Hooks into turn resolution

pub mod entity;
pub mod action;
pub mod world;
pub mod turn;
pub mod movement;
pub mod rotation;
pub mod hazard;
pub mod events;
pub mod observer;

// Re-export key types
pub use entity::{CannonBall, Hull, Mine, RumBarrel, Ship, Side};
pub use action::{Action, ShipOrder};
pub use world::World;
pub use turn::{replay_turns, ReplayOutcome, TurnOrders, TurnResult};
pub use events::{DamageCause, GameEvent, GameEventData, ImpactOutcome, Obstacle, TurnPhase};
pub use observer::{EventLog, NoopObserver, TracingObserver, TurnObserver};
