//! Core deterministic primitives.
//!
//! Hex geometry, rule constants, hashing and seeded randomness. Everything in
//! this module is integer-only and platform-independent.

pub mod hex;
pub mod rules;
pub mod rng;
pub mod hash;

// Re-export core types
pub use hex::{Coord, distance, inside_map, MAP_WIDTH, MAP_HEIGHT};
pub use rules::RulesConfig;
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
