//! Full legal move generation pipeline.
//!
//! Walks piece-wise pseudo-legal geometry, applies pawn occupancy rules,
//! filters every candidate through the check-safety simulation, and appends
//! castling and en-passant destinations where eligible.

use std::collections::BTreeMap;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Coord, LastMove, Piece, PieceKind};
use crate::move_generation::legal_move_checks::is_position_safe_after_move;
use crate::move_generation::special_moves::{
    can_castle, en_passant_destination, KINGSIDE_CASTLE_FILE, QUEENSIDE_CASTLE_FILE,
};

/// Legal destinations keyed by origin square, ordered for deterministic
/// traversal.
pub type LegalMoveMap = BTreeMap<Coord, Vec<Coord>>;

/// Count every destination in a legal move map.
pub fn total_moves(moves: &LegalMoveMap) -> usize {
    moves.values().map(Vec::len).sum()
}

/// Generate the full legal move set for `side`.
///
/// The board is mutated during check-safety simulation and always restored
/// before this function returns.
pub fn generate_legal_moves(
    board: &mut Board,
    side: Color,
    last_move: Option<&LastMove>,
) -> LegalMoveMap {
    let mut moves = LegalMoveMap::new();

    let origins: Vec<(Coord, Piece)> = board
        .pieces()
        .filter(|(_, piece)| piece.color == side)
        .collect();

    for (from, piece) in origins {
        let mut destinations = Vec::new();

        for &(df, dr) in piece.direction_vectors() {
            if piece.kind.is_sliding() {
                let mut target = from.offset(df, dr);
                while let Some(to) = target {
                    match board.get(to) {
                        Some(occupant) => {
                            if occupant.color != side
                                && is_position_safe_after_move(board, side, from, to)
                            {
                                destinations.push(to);
                            }
                            break;
                        }
                        None => {
                            if is_position_safe_after_move(board, side, from, to) {
                                destinations.push(to);
                            }
                            target = to.offset(df, dr);
                        }
                    }
                }
            } else {
                let Some(to) = from.offset(df, dr) else {
                    continue;
                };
                let occupant = board.get(to);
                if occupant.is_some_and(|p| p.color == side) {
                    continue;
                }
                if piece.kind == PieceKind::Pawn
                    && !pawn_step_allowed(board, from, df, dr, occupant)
                {
                    continue;
                }
                if is_position_safe_after_move(board, side, from, to) {
                    destinations.push(to);
                }
            }
        }

        if piece.kind == PieceKind::King {
            let home = side.home_rank();
            if can_castle(board, side, true) {
                destinations.push(Coord::from_grid(KINGSIDE_CASTLE_FILE, home));
            }
            if can_castle(board, side, false) {
                destinations.push(Coord::from_grid(QUEENSIDE_CASTLE_FILE, home));
            }
        }

        if piece.kind == PieceKind::Pawn {
            if let Some(to) = en_passant_destination(board, from, piece, last_move) {
                destinations.push(to);
            }
        }

        if !destinations.is_empty() {
            moves.insert(from, destinations);
        }
    }

    moves
}

/// Pawn occupancy rules: pushes need empty squares, diagonals need a capture.
fn pawn_step_allowed(board: &Board, from: Coord, df: i8, dr: i8, occupant: Option<Piece>) -> bool {
    if df == 0 {
        if dr.abs() == 2 {
            let Some(intermediate) = from.offset(0, dr / 2) else {
                return false;
            };
            return occupant.is_none() && board.get(intermediate).is_none();
        }
        return occupant.is_none();
    }

    // Diagonal steps are captures only; the friendly-occupancy filter already
    // ran, so any occupant here is an enemy.
    occupant.is_some()
}
