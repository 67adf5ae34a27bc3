//! Check detection over the mailbox board.
//!
//! Scans every opposing piece's direction vectors to decide whether a king is
//! attacked; shared by the legality filter, castling gates, and the
//! game-state tracker.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{CheckState, Color, Coord, PieceKind};

/// True when `color`'s king is attacked in the current position.
#[inline]
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    attacked_king_square(board, color).is_some()
}

/// Current check state for `color`, with the attacked king's square recorded
/// for display.
pub fn check_state(board: &Board, color: Color) -> CheckState {
    match attacked_king_square(board, color) {
        Some(king) => CheckState::InCheck { king },
        None => CheckState::Clear,
    }
}

/// Locate `color`'s king if any opposing piece reaches it.
///
/// Pawns threaten along their diagonal vectors only; the forward vectors are
/// skipped during the attack scan.
pub fn attacked_king_square(board: &Board, color: Color) -> Option<Coord> {
    for (from, piece) in board.pieces() {
        if piece.color == color {
            continue;
        }

        for &(df, dr) in piece.direction_vectors() {
            if piece.kind == PieceKind::Pawn && df == 0 {
                continue;
            }

            if piece.kind.is_sliding() {
                let mut target = from.offset(df, dr);
                while let Some(square) = target {
                    match board.get(square) {
                        Some(occupant) => {
                            if occupant.kind == PieceKind::King && occupant.color == color {
                                return Some(square);
                            }
                            break;
                        }
                        None => target = square.offset(df, dr),
                    }
                }
            } else if let Some(square) = from.offset(df, dr) {
                if let Some(occupant) = board.get(square) {
                    if occupant.kind == PieceKind::King && occupant.color == color {
                        return Some(square);
                    }
                }
            }
        }
    }

    None
}

/// Speculatively play `from -> to` and report whether `color`'s king stays
/// safe.
///
/// Both touched cells are restored to their exact prior contents before
/// returning, whatever the verdict; nothing leaks into the caller-visible
/// position.
pub fn is_position_safe_after_move(board: &mut Board, color: Color, from: Coord, to: Coord) -> bool {
    let Some(piece) = board.get(from) else {
        return false;
    };
    let displaced = board.get(to);
    if displaced.is_some_and(|occupant| occupant.color == piece.color) {
        return false;
    }

    board.set(from, None);
    board.set(to, Some(piece));
    let safe = !is_king_in_check(board, color);
    board.set(from, Some(piece));
    board.set(to, displaced);

    safe
}
