//! Castling, en passant, and promotion rules.
//!
//! Eligibility checks feed the legal move generator; the execution helpers
//! are invoked from move application once a special move is committed.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Coord, LastMove, Piece, PieceKind};
use crate::move_generation::legal_move_checks::{is_king_in_check, is_position_safe_after_move};

pub const KING_START_FILE: u8 = 4;
pub const KINGSIDE_ROOK_FILE: u8 = 7;
pub const QUEENSIDE_ROOK_FILE: u8 = 0;
pub const KINGSIDE_CASTLE_FILE: u8 = 6;
pub const QUEENSIDE_CASTLE_FILE: u8 = 2;
const QUEENSIDE_KNIGHT_FILE: u8 = 1;

/// Piece kinds a pawn may promote to.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

/// Castling eligibility for `color` on the given side.
///
/// Requires an unmoved king on its home square, an unmoved same-color rook on
/// the matching corner, no current check, empty squares between them (plus
/// the b-file square on the queenside), and a king path that never crosses or
/// lands on an attacked square.
pub fn can_castle(board: &mut Board, color: Color, kingside: bool) -> bool {
    let home = color.home_rank();
    let king_square = Coord::from_grid(KING_START_FILE, home);
    let Some(king) = board.get(king_square) else {
        return false;
    };
    if king.kind != PieceKind::King || king.color != color || king.has_moved {
        return false;
    }

    let rook_file = if kingside {
        KINGSIDE_ROOK_FILE
    } else {
        QUEENSIDE_ROOK_FILE
    };
    match board.get(Coord::from_grid(rook_file, home)) {
        Some(rook) if rook.kind == PieceKind::Rook && rook.color == color && !rook.has_moved => {}
        _ => return false,
    }

    if is_king_in_check(board, color) {
        return false;
    }

    let step = if kingside { 1 } else { -1 };
    let (Some(one_step), Some(two_step)) =
        (king_square.offset(step, 0), king_square.offset(2 * step, 0))
    else {
        return false;
    };
    if board.get(one_step).is_some() || board.get(two_step).is_some() {
        return false;
    }

    // The queenside knight square must also be clear, even though the king
    // never crosses it.
    if !kingside && board.get(Coord::from_grid(QUEENSIDE_KNIGHT_FILE, home)).is_some() {
        return false;
    }

    is_position_safe_after_move(board, color, king_square, one_step)
        && is_position_safe_after_move(board, color, king_square, two_step)
}

/// True when `from -> to` is a two-square king move, i.e. a castle.
#[inline]
pub fn is_castling_move(piece: Piece, from: Coord, to: Coord) -> bool {
    piece.kind == PieceKind::King && (to.file() as i8 - from.file() as i8).abs() == 2
}

/// Relocate the castling rook beside the king's new square and mark it moved.
pub fn execute_castle(board: &mut Board, color: Color, kingside: bool) {
    let home = color.home_rank();
    let (rook_from, rook_to) = if kingside {
        (
            Coord::from_grid(KINGSIDE_ROOK_FILE, home),
            Coord::from_grid(KINGSIDE_CASTLE_FILE - 1, home),
        )
    } else {
        (
            Coord::from_grid(QUEENSIDE_ROOK_FILE, home),
            Coord::from_grid(QUEENSIDE_CASTLE_FILE + 1, home),
        )
    };

    if let Some(mut rook) = board.get(rook_from) {
        rook.mark_moved();
        board.set(rook_from, None);
        board.set(rook_to, Some(rook));
    }
}

/// En-passant destination for the pawn on `from`, when the capture is open.
///
/// Eligible only immediately after an opposing pawn double-step landing on
/// the same rank, one file over. The landed pawn is lifted off the board
/// while the relocation is safety-tested, then put back.
pub fn en_passant_destination(
    board: &mut Board,
    from: Coord,
    pawn: Piece,
    last_move: Option<&LastMove>,
) -> Option<Coord> {
    let last = last_move?;
    if !last.is_pawn_double_step() || last.piece.color == pawn.color {
        return None;
    }
    if last.to.rank() != from.rank() {
        return None;
    }
    let df = last.to.file() as i8 - from.file() as i8;
    if df.abs() != 1 {
        return None;
    }

    let to = from.offset(df, pawn.color.forward())?;

    let landed = board.get(last.to);
    board.set(last.to, None);
    let safe = is_position_safe_after_move(board, pawn.color, from, to);
    board.set(last.to, landed);

    safe.then_some(to)
}

/// True when `from -> to` executes this position's en-passant capture.
pub fn is_en_passant_capture(
    piece: Piece,
    from: Coord,
    to: Coord,
    last_move: Option<&LastMove>,
) -> bool {
    let Some(last) = last_move else {
        return false;
    };
    piece.kind == PieceKind::Pawn
        && last.is_pawn_double_step()
        && from.rank() == last.to.rank()
        && to.file() == last.to.file()
}

/// True when relocating `piece` to `to` parks it on its promotion rank.
#[inline]
pub fn is_promotion_square(piece: Piece, to: Coord) -> bool {
    piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank()
}
