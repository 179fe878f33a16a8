//! # Broadside Engine
//!
//! Deterministic turn resolution for a hex-grid naval battle, built to be
//! copied and stepped thousands of times per second by search agents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BROADSIDE ENGINE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── hex.rs      - Offset hex grid, directions, distance     │
//! │  ├── rules.rs    - Rule constants and toggles                │
//! │  ├── rng.rs      - Seeded Xorshift128+ order picker          │
//! │  └── hash.rs     - World state hashing                       │
//! │                                                              │
//! │  game/           - Battle logic (deterministic)              │
//! │  ├── entity.rs   - Ships, mines, cannonballs, barrels        │
//! │  ├── action.rs   - Orders and staging                        │
//! │  ├── world.rs    - Battle state, calling contract            │
//! │  ├── turn.rs     - Turn pipeline                             │
//! │  ├── movement.rs - Forward micro-steps                       │
//! │  ├── rotation.rs - Heading changes                           │
//! │  ├── hazard.rs   - Barrels, mines, explosions                │
//! │  ├── events.rs   - Turn events                               │
//! │  └── observer.rs - Resolution hooks                          │
//! │                                                              │
//! │  replay/         - Transcripts and verification              │
//! │  ├── transcript.rs                                           │
//! │  └── verify.rs                                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - Integer arithmetic only
//! - No HashMap (rosters and collections are `Vec`s in a fixed order)
//! - No system time dependencies
//! - No randomness inside a turn
//!
//! Given an identical world and identical orders, `update()` produces an
//! **identical world and event list** on any platform.
//!
//! ## Example
//!
//! ```
//! use broadside::{Coord, Ship, ShipOrder, Side, World};
//!
//! let mut world = World::new(
//!     1,
//!     vec![],
//!     vec![],
//!     vec![],
//!     vec![Ship::new(0, Coord::new(5, 10), 0, Side::Ally)],
//!     vec![Ship::new(1, Coord::new(17, 10), 3, Side::Enemy)],
//! );
//!
//! world.prepare();
//! world.set_actions(Side::Ally, &[ShipOrder::faster()]).unwrap();
//! world.set_actions(Side::Enemy, &[ShipOrder::wait()]).unwrap();
//! world.update().unwrap();
//!
//! assert_eq!(world.my_ships()[0].pos, Coord::new(6, 10));
//! assert_eq!(world.my_ships()[0].health, 99);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod game;
pub mod replay;

// Re-export commonly used types
pub use core::hex::{Coord, MAP_HEIGHT, MAP_WIDTH};
pub use core::hash::StateHash;
pub use core::rules::RulesConfig;
pub use core::rng::DeterministicRng;
pub use error::EngineError;
pub use game::action::{Action, ShipOrder};
pub use game::entity::{CannonBall, Mine, RumBarrel, Ship, Side};
pub use game::events::{GameEvent, GameEventData, TurnPhase};
pub use game::observer::{EventLog, TracingObserver, TurnObserver};
pub use game::turn::{replay_turns, TurnOrders, TurnResult};
pub use game::world::World;
pub use replay::{verify_transcript, BattleTranscript, VerificationResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
