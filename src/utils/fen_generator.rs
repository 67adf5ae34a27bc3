//! GameState-to-record writer.
//!
//! Emits the six space-separated fields of a position record: board layout
//! with empty-square runs collapsed, side to move, castling rights derived
//! from moved-flags, the conditional en-passant target, and both clocks.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Coord, GameState, LastMove, PieceKind};

pub fn generate_fen(game: &GameState) -> String {
    let board = generate_board_field(game.board());
    let side_to_move = match game.side_to_move() {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = generate_castling_field(game.board());
    let en_passant = generate_en_passant_field(game.board(), game.last_move());

    format!(
        "{} {} {} {} {} {}",
        board,
        side_to_move,
        castling,
        en_passant,
        game.halfmove_clock(),
        game.fullmove_number()
    )
}

fn generate_board_field(board: &Board) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            match board.get(Coord::from_grid(file, rank)) {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if rank > 0 {
            out.push('/');
        }
    }

    out
}

/// A right is present iff the king and the same-side rook both still carry an
/// unset moved-flag on their home squares.
fn generate_castling_field(board: &Board) -> String {
    let mut out = String::new();

    for (color, kingside_char, queenside_char) in
        [(Color::White, 'K', 'Q'), (Color::Black, 'k', 'q')]
    {
        let home = color.home_rank();
        let king_intact = board
            .get(Coord::from_grid(4, home))
            .is_some_and(|piece| {
                piece.kind == PieceKind::King && piece.color == color && !piece.has_moved
            });
        if !king_intact {
            continue;
        }

        let rook_intact = |file: u8| {
            board.get(Coord::from_grid(file, home)).is_some_and(|piece| {
                piece.kind == PieceKind::Rook && piece.color == color && !piece.has_moved
            })
        };

        if rook_intact(7) {
            out.push(kingside_char);
        }
        if rook_intact(0) {
            out.push(queenside_char);
        }
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

/// The target square behind a fresh double-step, emitted only when an
/// opposing pawn stands adjacent on the landing rank, able to capture there.
fn generate_en_passant_field(board: &Board, last_move: Option<LastMove>) -> String {
    let Some(last) = last_move else {
        return "-".to_owned();
    };
    if !last.is_pawn_double_step() {
        return "-".to_owned();
    }

    let capturable = [-1i8, 1i8].iter().any(|&df| {
        last.to.offset(df, 0).is_some_and(|adjacent| {
            board.get(adjacent).is_some_and(|piece| {
                piece.kind == PieceKind::Pawn && piece.color != last.piece.color
            })
        })
    });
    if !capturable {
        return "-".to_owned();
    }

    match last.to.offset(0, -last.piece.color.forward()) {
        Some(target) => target.to_string(),
        None => "-".to_owned(),
    }
}
