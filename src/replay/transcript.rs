//! Battle Transcript Recording
//!
//! Records everything needed to re-simulate a battle and check it: the
//! starting world, both sides' orders for every turn, and the state hash
//! reached after each turn.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::hash::StateHash;
use crate::error::EngineError;
use crate::game::entity::Side;
use crate::game::turn::TurnOrders;
use crate::game::world::World;

/// Current transcript version.
pub const TRANSCRIPT_VERSION: u8 = 1;

/// Complete battle record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleTranscript {
    /// Version for forward compatibility.
    pub version: u8,

    /// World before the first recorded turn.
    pub initial_world: World,

    /// Hash of `initial_world`.
    pub initial_hash: StateHash,

    /// One record per resolved turn.
    pub turns: Vec<TurnRecord>,

    /// Final result, once the recording is closed.
    pub outcome: Option<BattleOutcome>,
}

/// Orders of one turn and the state they led to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn counter after resolution.
    pub turn: u32,

    /// Orders staged for the turn.
    pub orders: TurnOrders,

    /// Digest of `orders`.
    pub orders_hash: StateHash,

    /// World hash after resolution.
    pub state_hash: StateHash,
}

/// Final result of a recorded battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// Turn counter at the end of the recording.
    pub final_turn: u32,

    /// Surviving fleet, if the battle ended with one.
    pub winner: Option<Side>,

    /// World hash at the end of the recording.
    pub final_state_hash: StateHash,
}

impl BattleTranscript {
    /// Start a transcript from the world about to be played.
    pub fn new(initial_world: &World) -> Self {
        Self {
            version: TRANSCRIPT_VERSION,
            initial_world: initial_world.copy(),
            initial_hash: initial_world.state_hash(),
            turns: Vec::new(),
            outcome: None,
        }
    }

    /// Record a resolved turn: the orders given and the world they produced.
    pub fn record_turn(&mut self, orders: TurnOrders, world: &World) {
        self.turns.push(TurnRecord {
            turn: world.turn(),
            orders_hash: orders.orders_hash(),
            orders,
            state_hash: world.state_hash(),
        });
    }

    /// Close the transcript with the final world.
    pub fn finish(&mut self, world: &World) {
        self.outcome = Some(BattleOutcome {
            final_turn: world.turn(),
            winner: world.winner(),
            final_state_hash: world.state_hash(),
        });
    }

    /// Play `turns` from `initial` and record them.
    ///
    /// Stops after the turn that ends the battle; later orders are dropped.
    /// The transcript is always finished.
    pub fn record(initial: &World, turns: &[TurnOrders]) -> Result<Self, EngineError> {
        let mut transcript = Self::new(initial);
        let mut world = initial.copy();

        for orders in turns {
            world.prepare();
            world.set_actions(Side::Ally, &orders.ally)?;
            world.set_actions(Side::Enemy, &orders.enemy)?;

            let result = world.update();
            transcript.record_turn(orders.clone(), &world);
            match result {
                Ok(_) => {}
                Err(e) if e.is_game_over() => break,
                Err(e) => return Err(e),
            }
        }

        transcript.finish(&world);
        Ok(transcript)
    }

    /// Check if the transcript has been closed.
    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    /// Number of recorded turns.
    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    /// Serialize to bytes using bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TranscriptError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TranscriptError> {
        let transcript: Self = bincode::deserialize(data)?;
        transcript.check_version()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, TranscriptError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(data: &str) -> Result<Self, TranscriptError> {
        let transcript: Self = serde_json::from_str(data)?;
        transcript.check_version()
    }

    fn check_version(self) -> Result<Self, TranscriptError> {
        if self.version != TRANSCRIPT_VERSION {
            return Err(TranscriptError::VersionMismatch {
                expected: TRANSCRIPT_VERSION,
                got: self.version,
            });
        }
        Ok(self)
    }
}

/// Errors that can occur with transcripts.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Binary encoding failed.
    #[error("binary transcript encoding failed: {0}")]
    Binary(#[from] bincode::Error),

    /// JSON encoding failed.
    #[error("json transcript encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Version mismatch.
    #[error("transcript version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Supported version
        expected: u8,
        /// Version found
        got: u8,
    },
}
