use std::error::Error;
use std::fmt;

use crate::game_state::chess_types::Coord;

pub type ChessResult<T> = Result<T, ChessError>;

/// Represents all possible error types that can occur in the chess engine.
/// Used throughout the codebase for error handling and reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// A coordinate outside the 8x8 board reached the engine boundary.
    OutOfRange { file: i8, rank: i8 },
    /// A submitted move whose destination is missing from the generated
    /// legal set; the caller and engine have desynchronized.
    IllegalMove { from: Coord, to: Coord },
    /// A malformed position record field.
    Format { field: &'static str, message: String },
    /// The game has already ended.
    GameOver,
    /// A pawn promotion is awaiting its piece choice.
    PromotionPending,
    /// A promotion choice with no promotion in flight, or naming a kind a
    /// pawn cannot become.
    InvalidPromotion,
}

impl fmt::Display for ChessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessError::OutOfRange { file, rank } => {
                write!(f, "coordinate ({file}, {rank}) is outside the board")
            }
            ChessError::IllegalMove { from, to } => {
                write!(f, "move {from} -> {to} is not in the legal move set")
            }
            ChessError::Format { field, message } => {
                write!(f, "malformed position record ({field}): {message}")
            }
            ChessError::GameOver => write!(f, "the game is already over"),
            ChessError::PromotionPending => {
                write!(f, "a pawn promotion is awaiting a piece choice")
            }
            ChessError::InvalidPromotion => write!(f, "promotion choice is not available"),
        }
    }
}

impl Error for ChessError {}
