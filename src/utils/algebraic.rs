//! Square-name parsing for algebraic coordinates.
//!
//! Converts human-readable square names (e.g. `e4`) into board coordinates;
//! the reverse direction is `Coord`'s `Display` impl, reused by the record
//! and PGN writers.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Coord;

/// Parse a square name (for example: "e4") into a coordinate.
pub fn algebraic_to_coord(square: &str) -> ChessResult<Coord> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::Format {
            field: "square",
            message: format!("invalid square name '{square}'"),
        });
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(ChessError::Format {
            field: "square",
            message: format!("invalid file letter '{}'", file as char),
        });
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::Format {
            field: "square",
            message: format!("invalid rank digit '{}'", rank as char),
        });
    }

    Coord::new((file - b'a') as i8, (rank - b'1') as i8)
}
