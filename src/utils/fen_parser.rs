//! Record-to-GameState parser.
//!
//! Builds a fully populated game from a six-field Forsyth-Edwards Notation
//! record: board layout, side to move, reconstructed moved-flags from the
//! castling field, the en-passant window, and both clocks. Parsing is
//! atomic: it assembles a fresh value and fails without side effects.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Coord, GameState, LastMove, Piece, PieceKind};
use crate::utils::algebraic::algebraic_to_coord;

pub fn parse_fen(fen: &str) -> ChessResult<GameState> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| missing("board"))?;
    let side_part = parts.next().ok_or_else(|| missing("side to move"))?;
    let castling_part = parts.next().ok_or_else(|| missing("castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| missing("en passant"))?;
    let halfmove_part = parts.next().ok_or_else(|| missing("halfmove clock"))?;
    let fullmove_part = parts.next().ok_or_else(|| missing("fullmove number"))?;

    if parts.next().is_some() {
        return Err(ChessError::Format {
            field: "record",
            message: "extra trailing fields".to_owned(),
        });
    }

    let mut board = parse_board(board_part)?;
    let side_to_move = parse_side_to_move(side_part)?;

    infer_pawn_moved_flags(&mut board);
    apply_castling_rights(&mut board, castling_part)?;
    let last_move = parse_en_passant(en_passant_part, side_to_move, &board)?;

    let halfmove_clock = halfmove_part.parse::<u16>().map_err(|_| ChessError::Format {
        field: "halfmove clock",
        message: format!("invalid counter '{halfmove_part}'"),
    })?;
    let fullmove_number = fullmove_part.parse::<u16>().map_err(|_| ChessError::Format {
        field: "fullmove number",
        message: format!("invalid counter '{fullmove_part}'"),
    })?;

    Ok(GameState::from_decoded_parts(
        board,
        side_to_move,
        last_move,
        halfmove_clock,
        fullmove_number,
    ))
}

fn missing(field: &'static str) -> ChessError {
    ChessError::Format {
        field,
        message: "field is missing".to_owned(),
    }
}

fn parse_board(board_part: &str) -> ChessResult<Board> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::Format {
            field: "board",
            message: format!("expected 8 ranks, found {}", ranks.len()),
        });
    }

    let mut board = Board::empty();

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        // The record lists rank 8 first.
        let rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::Format {
                        field: "board",
                        message: format!("invalid empty-square count '{ch}'"),
                    });
                }
                file += empty_count as u8;
                continue;
            }

            let piece = Piece::from_fen_char(ch).ok_or_else(|| ChessError::Format {
                field: "board",
                message: format!("invalid piece character '{ch}'"),
            })?;

            if file >= 8 {
                return Err(ChessError::Format {
                    field: "board",
                    message: "rank has too many files".to_owned(),
                });
            }

            board.set(Coord::from_grid(file, rank), Some(piece));
            file += 1;
        }

        if file != 8 {
            return Err(ChessError::Format {
                field: "board",
                message: "rank does not sum to 8 files".to_owned(),
            });
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ChessError::Format {
            field: "side to move",
            message: format!("expected 'w' or 'b', found '{side_part}'"),
        }),
    }
}

/// Pawns away from their starting rank have necessarily moved; restoring the
/// flag keeps the double-step rule correct after a decode.
fn infer_pawn_moved_flags(board: &mut Board) {
    let moved_pawns: Vec<Coord> = board
        .pieces()
        .filter(|(coord, piece)| {
            piece.kind == PieceKind::Pawn && coord.rank() != piece.color.pawn_rank()
        })
        .map(|(coord, _)| coord)
        .collect();

    for coord in moved_pawns {
        board.mark_moved(coord);
    }
}

/// Translate the castling field back into moved-flags so that re-encoding
/// reproduces it: a missing right marks the corresponding rook (and, when a
/// side has none, its king) as moved.
fn apply_castling_rights(board: &mut Board, castling_part: &str) -> ChessResult<()> {
    if castling_part != "-" {
        for ch in castling_part.chars() {
            if !"KQkq".contains(ch) {
                return Err(ChessError::Format {
                    field: "castling rights",
                    message: format!("invalid character '{ch}'"),
                });
            }
        }
    }

    for color in [Color::White, Color::Black] {
        let (kingside_char, queenside_char) = match color {
            Color::White => ('K', 'Q'),
            Color::Black => ('k', 'q'),
        };
        let kingside = castling_part.contains(kingside_char);
        let queenside = castling_part.contains(queenside_char);
        let home = color.home_rank();

        if !kingside && !queenside {
            mark_if_owned(board, Coord::from_grid(4, home), PieceKind::King, color);
        }
        if !kingside {
            mark_if_owned(board, Coord::from_grid(7, home), PieceKind::Rook, color);
        }
        if !queenside {
            mark_if_owned(board, Coord::from_grid(0, home), PieceKind::Rook, color);
        }
    }

    Ok(())
}

fn mark_if_owned(board: &mut Board, coord: Coord, kind: PieceKind, color: Color) {
    if board
        .get(coord)
        .is_some_and(|piece| piece.kind == kind && piece.color == color)
    {
        board.mark_moved(coord);
    }
}

/// Rebuild the last move from the en-passant target so the capture window
/// survives a decode.
fn parse_en_passant(
    en_passant_part: &str,
    side_to_move: Color,
    board: &Board,
) -> ChessResult<Option<LastMove>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let target = algebraic_to_coord(en_passant_part).map_err(|_| ChessError::Format {
        field: "en passant",
        message: format!("invalid target square '{en_passant_part}'"),
    })?;

    // The target sits directly behind the pawn that just double-stepped.
    let mover = side_to_move.opposite();
    let (Some(landed), Some(from)) = (
        target.offset(0, mover.forward()),
        target.offset(0, -mover.forward()),
    ) else {
        return Err(ChessError::Format {
            field: "en passant",
            message: format!("target '{en_passant_part}' is not behind a double-step"),
        });
    };

    let piece = board
        .get(landed)
        .filter(|piece| piece.kind == PieceKind::Pawn && piece.color == mover)
        .ok_or_else(|| ChessError::Format {
            field: "en passant",
            message: format!("no {mover} pawn in front of target '{en_passant_part}'"),
        })?;

    Ok(Some(LastMove {
        from,
        to: landed,
        piece,
    }))
}
