//! Core value types shared across the engine.
//!
//! Pieces are plain tagged values (kind, color, moved flag) with kind-indexed
//! direction tables instead of a class hierarchy, which keeps them copyable
//! and comparable.

use std::fmt;

use crate::errors::ChessError;
use crate::game_state::chess_rules::{
    pawn_directions, BISHOP_DIRECTIONS, KING_DIRECTIONS, KNIGHT_DIRECTIONS, QUEEN_DIRECTIONS,
    ROOK_DIRECTIONS,
};

pub use crate::game_state::game_state::GameState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Sign of this color's pawn advance along the rank axis.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank index of this color's back rank (0 == rank 1).
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank index a pawn of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Rank index this color's pawns start on.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Piece kind (color is carried separately on [`Piece`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Sliding pieces extend each direction vector until blocked.
    #[inline]
    pub const fn is_sliding(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Notation letter; pawns have none.
    #[inline]
    pub const fn letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }
}

/// A single piece on the board.
///
/// `has_moved` is meaningful for pawns (double-step availability), rooks and
/// kings (castling rights); it flips false -> true exactly once and is never
/// reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
        }
    }

    /// One-way flag flip; a pawn's double-step vector never comes back.
    #[inline]
    pub fn mark_moved(&mut self) {
        self.has_moved = true;
    }

    /// Direction vectors for this piece in its current state.
    pub fn direction_vectors(self) -> &'static [(i8, i8)] {
        match self.kind {
            PieceKind::Pawn => pawn_directions(self.color, self.has_moved),
            PieceKind::Knight => &KNIGHT_DIRECTIONS,
            PieceKind::Bishop => &BISHOP_DIRECTIONS,
            PieceKind::Rook => &ROOK_DIRECTIONS,
            PieceKind::Queen => &QUEEN_DIRECTIONS,
            PieceKind::King => &KING_DIRECTIONS,
        }
    }

    /// Record-notation letter: uppercase for White, lowercase for Black.
    pub fn fen_char(self) -> char {
        let base = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => base.to_ascii_uppercase(),
            Color::Black => base,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else if ch.is_ascii_lowercase() {
            Color::Black
        } else {
            return None;
        };

        let kind = match ch.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };

        Some(Piece::new(kind, color))
    }
}

/// Board coordinate, `file` and `rank` both in `0..8` (rank 0 == rank 1).
///
/// The constructor is the bounds gate: no out-of-range coordinate is
/// representable, so downstream board access never re-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    file: u8,
    rank: u8,
}

impl Coord {
    pub fn new(file: i8, rank: i8) -> Result<Self, ChessError> {
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            return Err(ChessError::OutOfRange { file, rank });
        }
        Ok(Self {
            file: file as u8,
            rank: rank as u8,
        })
    }

    /// Crate-internal constructor for callers whose loop bounds already
    /// guarantee in-range indices.
    #[inline]
    pub(crate) const fn from_grid(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8 && rank < 8);
        Self { file, rank }
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Shift by a direction vector; `None` when the result leaves the board.
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Self> {
        Self::new(self.file as i8 + df, self.rank as i8 + dr).ok()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.file),
            char::from(b'1' + self.rank)
        )
    }
}

/// Whether the side to move's king is currently attacked, and from where it
/// should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Clear,
    InCheck { king: Coord },
}

impl CheckState {
    #[inline]
    pub const fn is_in_check(self) -> bool {
        matches!(self, CheckState::InCheck { .. })
    }
}

/// The most recently applied move plus the piece that made it; drives the
/// en-passant window and record serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub from: Coord,
    pub to: Coord,
    pub piece: Piece,
}

impl LastMove {
    /// True when this move was a pawn double-step, the en-passant trigger.
    #[inline]
    pub fn is_pawn_double_step(&self) -> bool {
        self.piece.kind == PieceKind::Pawn
            && (self.to.rank() as i8 - self.from.rank() as i8).abs() == 2
    }
}

/// Interaction state machine; `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected {
        origin: Coord,
    },
    /// A pawn reached its final rank; the board already shows it relocated,
    /// but the turn does not advance until a piece choice arrives.
    AwaitingPromotionChoice {
        from: Coord,
        to: Coord,
        captured: bool,
    },
    GameOver,
}

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
}

#[cfg(test)]
mod tests {
    use super::{Color, Coord, LastMove, Piece, PieceKind};
    use crate::errors::ChessError;

    #[test]
    fn coordinate_constructor_rejects_out_of_range_input() {
        assert!(Coord::new(0, 0).is_ok());
        assert!(Coord::new(7, 7).is_ok());
        assert_eq!(
            Coord::new(-1, 3),
            Err(ChessError::OutOfRange { file: -1, rank: 3 })
        );
        assert_eq!(
            Coord::new(2, 8),
            Err(ChessError::OutOfRange { file: 2, rank: 8 })
        );
    }

    #[test]
    fn offset_leaving_the_board_is_none() {
        let corner = Coord::new(0, 0).expect("a1 should be valid");
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(1, 1), Coord::new(1, 1).ok());
    }

    #[test]
    fn coordinates_display_as_square_names() {
        assert_eq!(Coord::new(0, 0).expect("valid").to_string(), "a1");
        assert_eq!(Coord::new(4, 3).expect("valid").to_string(), "e4");
        assert_eq!(Coord::new(7, 7).expect("valid").to_string(), "h8");
    }

    #[test]
    fn marking_a_pawn_moved_removes_its_double_step() {
        let mut pawn = Piece::new(PieceKind::Pawn, Color::White);
        assert!(pawn.direction_vectors().contains(&(0, 2)));
        pawn.mark_moved();
        assert!(!pawn.direction_vectors().contains(&(0, 2)));
        assert_eq!(pawn.direction_vectors().len(), 3);
    }

    #[test]
    fn fen_char_round_trips_every_piece() {
        for color in [Color::White, Color::Black] {
            for kind in PieceKind::ALL {
                let piece = Piece::new(kind, color);
                let parsed = Piece::from_fen_char(piece.fen_char())
                    .expect("emitted characters should parse back");
                assert_eq!(parsed.kind, kind);
                assert_eq!(parsed.color, color);
            }
        }
        assert_eq!(Piece::from_fen_char('x'), None);
        assert_eq!(Piece::from_fen_char('3'), None);
    }

    #[test]
    fn double_step_detection_uses_rank_distance() {
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        let double = LastMove {
            from: Coord::new(4, 1).expect("valid"),
            to: Coord::new(4, 3).expect("valid"),
            piece: pawn,
        };
        assert!(double.is_pawn_double_step());

        let single = LastMove {
            from: Coord::new(4, 1).expect("valid"),
            to: Coord::new(4, 2).expect("valid"),
            piece: pawn,
        };
        assert!(!single.is_pawn_double_step());
    }
}
