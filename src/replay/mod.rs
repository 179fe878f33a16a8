//! Battle Replay
//!
//! Record a battle and prove it re-simulates to the same states.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    REPLAY                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  transcript.rs   - Initial world, orders and turn hashes    │
//! │  verify.rs       - Verification by re-simulation            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Plain order replay without checkpoints lives in
//! [`replay_turns`](crate::game::turn::replay_turns).

pub mod transcript;
pub mod verify;

// Re-export key types
pub use transcript::{
    BattleOutcome, BattleTranscript, TranscriptError, TurnRecord, TRANSCRIPT_VERSION,
};
pub use verify::{verify_transcript, CheckpointResult, VerificationError, VerificationResult};
