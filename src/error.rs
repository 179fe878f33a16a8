//! Engine Errors

use thiserror::Error;

use crate::game::entity::Side;

/// Errors returned by action staging and turn resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Order list length differs from the roster size.
    #[error("{side} fleet has {expected} ships but {actual} orders were given")]
    ActionCountMismatch {
        /// Fleet the orders were meant for
        side: Side,
        /// Roster size
        expected: usize,
        /// Orders supplied
        actual: usize,
    },

    /// Unrecognized action tag or malformed order.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// A fleet has no ships left. The world is fully updated; this is the
    /// normal end of a battle, not a defect.
    #[error("game over, winner: {}", winner_name(.winner))]
    GameOver {
        /// Surviving fleet, or `None` when both sank on the same turn
        winner: Option<Side>,
    },
}

fn winner_name(winner: &Option<Side>) -> &'static str {
    winner.map(Side::as_str).unwrap_or("none")
}

impl EngineError {
    /// Check if this is the end-of-battle signal rather than a failure.
    pub fn is_game_over(&self) -> bool {
        matches!(self, EngineError::GameOver { .. })
    }

    /// Winner carried by a game-over signal.
    pub fn winner(&self) -> Option<Side> {
        match self {
            EngineError::GameOver { winner } => *winner,
            _ => None,
        }
    }
}
