//! Verification API
//!
//! Verify a battle by deterministic re-simulation of its transcript.

use thiserror::Error;

use crate::core::hash::{short_hex, StateHash};
use crate::error::EngineError;
use crate::game::entity::Side;
use crate::replay::transcript::{BattleTranscript, TRANSCRIPT_VERSION};

/// Verification result.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// Did verification pass?
    pub valid: bool,

    /// Turns re-simulated before stopping.
    pub turns_checked: u32,

    /// Last hash computed during replay.
    pub computed_final_hash: StateHash,

    /// Final hash claimed by the transcript.
    pub expected_final_hash: StateHash,

    /// Per-turn checkpoint results, in order.
    pub checkpoint_results: Vec<CheckpointResult>,

    /// First failure, if any.
    pub error: Option<VerificationError>,
}

/// Result of verifying a single turn checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointResult {
    /// Turn counter after the checked turn.
    pub turn: u32,
    /// Hash recorded in the transcript.
    pub expected: StateHash,
    /// Hash computed by replay.
    pub computed: StateHash,
    /// Did this checkpoint match?
    pub valid: bool,
}

/// Errors that can occur during verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Transcript version mismatch.
    #[error("transcript version mismatch: expected {expected}, got {got}")]
    VersionMismatch {
        /// Supported version.
        expected: u8,
        /// Version found.
        got: u8,
    },

    /// Recorded initial hash does not match the recorded initial world.
    #[error("initial state hash mismatch: expected {}, computed {}", short_hex(.expected), short_hex(.computed))]
    InitialStateMismatch {
        /// Hash in the transcript.
        expected: StateHash,
        /// Hash of the initial world.
        computed: StateHash,
    },

    /// Recorded orders do not match their digest.
    #[error("orders for turn {turn} do not match their digest")]
    OrdersMismatch {
        /// Turn whose orders were altered.
        turn: u32,
    },

    /// Checkpoint hash mismatch.
    #[error("checkpoint mismatch at turn {turn}: expected {}, computed {}", short_hex(.expected), short_hex(.computed))]
    CheckpointMismatch {
        /// Turn where the mismatch occurred.
        turn: u32,
        /// Hash in the transcript.
        expected: StateHash,
        /// Hash computed by replay.
        computed: StateHash,
    },

    /// Final state hash mismatch.
    #[error("final state hash mismatch: expected {}, computed {}", short_hex(.expected), short_hex(.computed))]
    FinalStateMismatch {
        /// Hash in the transcript.
        expected: StateHash,
        /// Hash computed by replay.
        computed: StateHash,
    },

    /// Recorded winner or final turn differs from the replay.
    #[error("battle outcome mismatch at turn {final_turn}")]
    OutcomeMismatch {
        /// Final turn reached by replay.
        final_turn: u32,
        /// Winner recorded in the transcript.
        expected: Option<Side>,
        /// Winner reached by replay.
        computed: Option<Side>,
    },

    /// Battle ended before the recorded turns ran out.
    #[error("battle ended at turn {turn} but more turns were recorded")]
    UnexpectedGameOver {
        /// Turn that ended the battle.
        turn: u32,
    },

    /// Recorded orders were rejected by the engine.
    #[error("turn {turn} rejected: {source}")]
    Engine {
        /// Turn being staged.
        turn: u32,
        /// Engine error.
        source: EngineError,
    },

    /// Transcript is incomplete.
    #[error("transcript is incomplete")]
    IncompleteTranscript,
}

impl VerificationResult {
    fn failed(
        turns_checked: u32,
        computed: StateHash,
        expected: StateHash,
        checkpoint_results: Vec<CheckpointResult>,
        error: VerificationError,
    ) -> Self {
        Self {
            valid: false,
            turns_checked,
            computed_final_hash: computed,
            expected_final_hash: expected,
            checkpoint_results,
            error: Some(error),
        }
    }

    /// First failing turn, if the failure is tied to one.
    pub fn failed_turn(&self) -> Option<u32> {
        match self.error.as_ref()? {
            VerificationError::OrdersMismatch { turn }
            | VerificationError::CheckpointMismatch { turn, .. }
            | VerificationError::UnexpectedGameOver { turn }
            | VerificationError::Engine { turn, .. } => Some(*turn),
            _ => None,
        }
    }
}

/// Verify a battle transcript by full replay.
///
/// Replays every recorded turn from the initial world and compares each
/// post-turn hash with its checkpoint. Stops at the first mismatch.
pub fn verify_transcript(transcript: &BattleTranscript) -> VerificationResult {
    // 1. Version and completeness
    if transcript.version != TRANSCRIPT_VERSION {
        return VerificationResult::failed(
            0,
            [0; 32],
            [0; 32],
            vec![],
            VerificationError::VersionMismatch {
                expected: TRANSCRIPT_VERSION,
                got: transcript.version,
            },
        );
    }

    let outcome = match &transcript.outcome {
        Some(outcome) => *outcome,
        None => {
            return VerificationResult::failed(
                0,
                [0; 32],
                [0; 32],
                vec![],
                VerificationError::IncompleteTranscript,
            );
        }
    };
    let expected_final = outcome.final_state_hash;

    // 2. Initial world
    let mut world = transcript.initial_world.copy();
    let initial_hash = world.state_hash();
    if initial_hash != transcript.initial_hash {
        return VerificationResult::failed(
            0,
            initial_hash,
            expected_final,
            vec![],
            VerificationError::InitialStateMismatch {
                expected: transcript.initial_hash,
                computed: initial_hash,
            },
        );
    }

    // 3. Turn by turn
    let mut checkpoint_results = Vec::with_capacity(transcript.turns.len());
    let mut turns_checked = 0;
    let mut computed = initial_hash;
    let last = transcript.turns.len();

    for (index, record) in transcript.turns.iter().enumerate() {
        let turn = world.turn() + 1;

        if record.orders.orders_hash() != record.orders_hash {
            return VerificationResult::failed(
                turns_checked,
                computed,
                expected_final,
                checkpoint_results,
                VerificationError::OrdersMismatch { turn },
            );
        }

        world.prepare();
        let staged = world
            .set_actions(Side::Ally, &record.orders.ally)
            .and_then(|()| world.set_actions(Side::Enemy, &record.orders.enemy));
        if let Err(source) = staged {
            return VerificationResult::failed(
                turns_checked,
                computed,
                expected_final,
                checkpoint_results,
                VerificationError::Engine { turn, source },
            );
        }

        let ended = match world.update() {
            Ok(_) => false,
            Err(e) if e.is_game_over() => true,
            Err(source) => {
                return VerificationResult::failed(
                    turns_checked,
                    computed,
                    expected_final,
                    checkpoint_results,
                    VerificationError::Engine { turn, source },
                );
            }
        };

        turns_checked += 1;
        computed = world.state_hash();
        let valid = record.turn == world.turn() && computed == record.state_hash;
        checkpoint_results.push(CheckpointResult {
            turn: world.turn(),
            expected: record.state_hash,
            computed,
            valid,
        });

        if !valid {
            return VerificationResult::failed(
                turns_checked,
                computed,
                expected_final,
                checkpoint_results,
                VerificationError::CheckpointMismatch {
                    turn: world.turn(),
                    expected: record.state_hash,
                    computed,
                },
            );
        }

        if ended && index + 1 < last {
            return VerificationResult::failed(
                turns_checked,
                computed,
                expected_final,
                checkpoint_results,
                VerificationError::UnexpectedGameOver { turn: world.turn() },
            );
        }
    }

    // 4. Outcome
    if computed != expected_final {
        return VerificationResult::failed(
            turns_checked,
            computed,
            expected_final,
            checkpoint_results,
            VerificationError::FinalStateMismatch {
                expected: expected_final,
                computed,
            },
        );
    }

    if outcome.final_turn != world.turn() || outcome.winner != world.winner() {
        return VerificationResult::failed(
            turns_checked,
            computed,
            expected_final,
            checkpoint_results,
            VerificationError::OutcomeMismatch {
                final_turn: world.turn(),
                expected: outcome.winner,
                computed: world.winner(),
            },
        );
    }

    VerificationResult {
        valid: true,
        turns_checked,
        computed_final_hash: computed,
        expected_final_hash: expected_final,
        checkpoint_results,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hex::Coord;
    use crate::game::action::ShipOrder;
    use crate::game::entity::Ship;
    use crate::game::turn::TurnOrders;
    use crate::game::world::World;

    fn duel() -> World {
        World::new(
            1,
            vec![],
            vec![],
            vec![],
            vec![Ship::new(0, Coord::new(5, 10), 0, Side::Ally)],
            vec![Ship::new(1, Coord::new(17, 10), 3, Side::Enemy)],
        )
    }

    fn recorded() -> BattleTranscript {
        let turns = vec![
            TurnOrders::new(vec![ShipOrder::faster()], vec![ShipOrder::faster()]),
            TurnOrders::new(vec![ShipOrder::fire(Coord::new(14, 10))], vec![ShipOrder::mine()]),
            TurnOrders::new(vec![ShipOrder::port()], vec![ShipOrder::slower()]),
        ];
        BattleTranscript::record(&duel(), &turns).unwrap()
    }

    #[test]
    fn test_recorded_transcript_verifies() {
        let result = verify_transcript(&recorded());

        assert!(result.valid, "{:?}", result.error);
        assert_eq!(result.turns_checked, 3);
        assert_eq!(result.checkpoint_results.len(), 3);
        assert!(result.checkpoint_results.iter().all(|c| c.valid));
        assert_eq!(result.computed_final_hash, result.expected_final_hash);
        assert_eq!(result.failed_turn(), None);
    }

    #[test]
    fn test_incomplete_transcript() {
        let mut transcript = recorded();
        transcript.outcome = None;

        let result = verify_transcript(&transcript);
        assert!(!result.valid);
        assert_eq!(result.error, Some(VerificationError::IncompleteTranscript));
    }

    #[test]
    fn test_tampered_checkpoint_reports_turn() {
        let mut transcript = recorded();
        transcript.turns[1].state_hash = [0xAB; 32];

        let result = verify_transcript(&transcript);
        assert!(!result.valid);
        assert_eq!(result.turns_checked, 2);
        assert_eq!(result.failed_turn(), Some(2));
        assert!(matches!(
            result.error,
            Some(VerificationError::CheckpointMismatch { turn: 2, .. })
        ));
    }

    #[test]
    fn test_tampered_orders_detected() {
        let mut transcript = recorded();
        transcript.turns[2].orders.ally[0] = ShipOrder::starboard();

        let result = verify_transcript(&transcript);
        assert_eq!(result.error, Some(VerificationError::OrdersMismatch { turn: 3 }));
        assert_eq!(result.turns_checked, 2);
    }

    #[test]
    fn test_tampered_initial_world_detected() {
        let mut transcript = recorded();
        transcript.initial_world.my_ships[0].health = 50;

        let result = verify_transcript(&transcript);
        assert!(matches!(
            result.error,
            Some(VerificationError::InitialStateMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_winner_detected() {
        let mut transcript = recorded();
        if let Some(outcome) = transcript.outcome.as_mut() {
            outcome.winner = Some(Side::Enemy);
        }

        let result = verify_transcript(&transcript);
        assert!(matches!(
            result.error,
            Some(VerificationError::OutcomeMismatch { expected: Some(Side::Enemy), computed: None, .. })
        ));
    }

    #[test]
    fn test_error_message_shows_hash_prefix() {
        let err = VerificationError::CheckpointMismatch {
            turn: 7,
            expected: [0x11; 32],
            computed: [0x22; 32],
        };
        assert_eq!(
            err.to_string(),
            "checkpoint mismatch at turn 7: expected 1111111111111111, computed 2222222222222222"
        );
    }
}
