//! Core game-state tracker.
//!
//! `GameState` is the central model for the engine: it owns the one mutable
//! position, enforces turn order, applies moves (delegating special-move
//! rules), and keeps the derived check/legal-move/outcome data current for
//! the presentation layer. All mutation is caller-driven; the engine holds no
//! locks and no background state, so each game gets its own instance.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::{
    CheckState, Color, Coord, GameOutcome, LastMove, Phase, Piece, PieceKind,
};
use crate::move_generation::legal_move_checks::check_state;
use crate::move_generation::legal_move_generator::{generate_legal_moves, LegalMoveMap};
use crate::move_generation::special_moves::{
    execute_castle, is_castling_move, is_en_passant_capture, is_promotion_square, PROMOTION_KINDS,
};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) phase: Phase,
    pub(crate) last_move: Option<LastMove>,
    pub(crate) legal_moves: LegalMoveMap,
    pub(crate) check_state: CheckState,
    pub(crate) move_history: Vec<String>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) outcome: Option<GameOutcome>,
    pub(crate) initial_fen: String,
}

impl GameState {
    /// Fresh game from the standard starting position.
    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting position record should always parse")
    }

    /// Decode a position record into a fresh game.
    ///
    /// Decoding is atomic: on any format error nothing observable changes,
    /// the caller simply keeps its previous state.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    /// Encode the current position as a six-field record.
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Assemble a decoded position; used by the record parser.
    pub(crate) fn from_decoded_parts(
        board: Board,
        side_to_move: Color,
        last_move: Option<LastMove>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> Self {
        let mut game = Self {
            board,
            side_to_move,
            phase: Phase::AwaitingSelection,
            last_move,
            legal_moves: LegalMoveMap::new(),
            check_state: CheckState::Clear,
            move_history: Vec::new(),
            halfmove_clock,
            fullmove_number,
            outcome: None,
            initial_fen: String::new(),
        };
        game.refresh_derived_state();
        game.initial_fen = game.get_fen();
        game
    }

    // --- Read access for the presentation layer ---

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn check_state(&self) -> CheckState {
        self.check_state
    }

    #[inline]
    pub fn game_outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[inline]
    pub fn move_history(&self) -> &[String] {
        &self.move_history
    }

    #[inline]
    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Normalized record of the position this game started from.
    #[inline]
    pub fn initial_fen(&self) -> &str {
        &self.initial_fen
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Kind/color grid for rendering, indexed `[rank][file]`.
    pub fn board_snapshot(&self) -> [[Option<(PieceKind, Color)>; 8]; 8] {
        let mut grid = [[None; 8]; 8];
        for (coord, piece) in self.board.pieces() {
            grid[coord.rank() as usize][coord.file() as usize] = Some((piece.kind, piece.color));
        }
        grid
    }

    /// The full legal move map for the side to move.
    #[inline]
    pub fn legal_moves(&self) -> &LegalMoveMap {
        &self.legal_moves
    }

    /// Legal destinations for the piece on `origin`; empty when the square
    /// holds nothing movable.
    pub fn legal_destinations(&self, origin: Coord) -> &[Coord] {
        self.legal_moves
            .get(&origin)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn selected_square(&self) -> Option<Coord> {
        match self.phase {
            Phase::PieceSelected { origin } => Some(origin),
            _ => None,
        }
    }

    /// Origin and destination of the pawn move awaiting a promotion choice.
    #[inline]
    pub fn pending_promotion(&self) -> Option<(Coord, Coord)> {
        match self.phase {
            Phase::AwaitingPromotionChoice { from, to, .. } => Some((from, to)),
            _ => None,
        }
    }

    // --- State transitions ---

    /// Select a square. Empty squares, opponent pieces, a finished game, and
    /// a pending promotion are expected refusals and stay silent;
    /// re-selecting the selected square clears the selection.
    pub fn select(&mut self, origin: Coord) {
        match self.phase {
            Phase::GameOver | Phase::AwaitingPromotionChoice { .. } => return,
            Phase::AwaitingSelection | Phase::PieceSelected { .. } => {}
        }

        let Some(piece) = self.board.get(origin) else {
            return;
        };
        if piece.color != self.side_to_move {
            return;
        }

        if let Phase::PieceSelected { origin: selected } = self.phase {
            if selected == origin {
                self.phase = Phase::AwaitingSelection;
                return;
            }
        }

        self.phase = Phase::PieceSelected { origin };
    }

    /// Apply `from -> to`.
    ///
    /// The destination must be a member of the previously generated legal
    /// set for `from`; anything else means the caller and engine have
    /// desynchronized and fails loudly.
    pub fn attempt_move(&mut self, from: Coord, to: Coord) -> ChessResult<()> {
        match self.phase {
            Phase::GameOver => return Err(ChessError::GameOver),
            Phase::AwaitingPromotionChoice { .. } => return Err(ChessError::PromotionPending),
            Phase::AwaitingSelection | Phase::PieceSelected { .. } => {}
        }

        if !self
            .legal_moves
            .get(&from)
            .is_some_and(|destinations| destinations.contains(&to))
        {
            return Err(ChessError::IllegalMove { from, to });
        }

        let piece = self
            .board
            .get(from)
            .expect("legal move origins always hold a piece");
        self.apply_move(piece, from, to);
        Ok(())
    }

    /// Replace the promoted pawn with the chosen kind and run the deferred
    /// post-move bookkeeping.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> ChessResult<()> {
        let Phase::AwaitingPromotionChoice { from, to, captured } = self.phase else {
            return Err(ChessError::InvalidPromotion);
        };
        if !PROMOTION_KINDS.contains(&kind) {
            return Err(ChessError::InvalidPromotion);
        }

        let promoted = Piece::new(kind, self.side_to_move);
        self.board.set(to, Some(promoted));
        self.finish_move(promoted, PieceKind::Pawn, from, to, captured, None);
        Ok(())
    }

    fn apply_move(&mut self, mut piece: Piece, from: Coord, to: Coord) {
        let mut captured = self.board.get(to).is_some();
        let mut castled = None;

        if is_castling_move(piece, from, to) {
            let kingside = to.file() > from.file();
            execute_castle(&mut self.board, piece.color, kingside);
            castled = Some(kingside);
        }

        if is_en_passant_capture(piece, from, to, self.last_move.as_ref()) {
            if let Some(last) = self.last_move {
                // The captured pawn sits beside the destination, not on it.
                self.board.set(last.to, None);
                captured = true;
            }
        }

        piece.mark_moved();
        self.board.set(from, None);
        self.board.set(to, Some(piece));

        if is_promotion_square(piece, to) {
            // The turn does not advance until a piece choice arrives.
            self.phase = Phase::AwaitingPromotionChoice { from, to, captured };
            return;
        }

        self.finish_move(piece, piece.kind, from, to, captured, castled);
    }

    fn finish_move(
        &mut self,
        piece: Piece,
        moved_kind: PieceKind,
        from: Coord,
        to: Coord,
        captured: bool,
        castled: Option<bool>,
    ) {
        self.last_move = Some(LastMove { from, to, piece });

        if moved_kind == PieceKind::Pawn || captured {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if self.side_to_move == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.side_to_move = self.side_to_move.opposite();
        self.phase = Phase::AwaitingSelection;
        self.refresh_derived_state();

        let notation = self.notation_for(moved_kind, to, captured, castled);
        self.move_history.push(notation);
    }

    /// Recompute check state, the legal move map, and the game-over verdict
    /// for the side to move. The map is always rebuilt from scratch, never
    /// patched.
    fn refresh_derived_state(&mut self) {
        self.check_state = check_state(&self.board, self.side_to_move);
        self.legal_moves =
            generate_legal_moves(&mut self.board, self.side_to_move, self.last_move.as_ref());
        self.outcome = self.evaluate_outcome();
        if self.outcome.is_some() {
            self.phase = Phase::GameOver;
        }
    }

    /// Game-over conditions in order: the deliberately narrow bare-kings
    /// material rule, then an exhausted legal move set.
    fn evaluate_outcome(&self) -> Option<GameOutcome> {
        if self.board.pieces().count() == 2 {
            return Some(GameOutcome::InsufficientMaterial);
        }

        if self.legal_moves.is_empty() {
            if self.check_state.is_in_check() {
                return Some(GameOutcome::Checkmate {
                    winner: self.side_to_move.opposite(),
                });
            }
            return Some(GameOutcome::Stalemate);
        }

        None
    }

    /// Algebraic-style record of a completed move, written against the
    /// position it produced.
    fn notation_for(
        &self,
        moved_kind: PieceKind,
        to: Coord,
        captured: bool,
        castled: Option<bool>,
    ) -> String {
        let mut notation = match castled {
            Some(true) => "O-O".to_owned(),
            Some(false) => "O-O-O".to_owned(),
            None => {
                let mut out = String::new();
                if let Some(letter) = moved_kind.letter() {
                    out.push(letter);
                }
                if captured {
                    out.push('x');
                }
                out.push_str(&to.to_string());
                out
            }
        };

        if matches!(self.outcome, Some(GameOutcome::Checkmate { .. })) {
            notation.push('#');
        } else if self.check_state.is_in_check() {
            notation.push('+');
        }

        notation
    }
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{
        CheckState, Color, Coord, GameOutcome, Phase, PieceKind,
    };
    use crate::move_generation::legal_move_checks::is_king_in_check;
    use crate::move_generation::legal_move_generator::total_moves;
    use crate::utils::algebraic::algebraic_to_coord;

    fn sq(name: &str) -> Coord {
        algebraic_to_coord(name).expect("test squares should parse")
    }

    fn play(game: &mut GameState, moves: &[(&str, &str)]) {
        for (from, to) in moves {
            game.attempt_move(sq(from), sq(to))
                .unwrap_or_else(|err| panic!("{from} -> {to} should be legal: {err}"));
        }
    }

    #[test]
    fn new_game_matches_the_starting_record() {
        let game = GameState::new_game();
        assert_eq!(game.get_fen(), STARTING_POSITION_FEN);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.check_state(), CheckState::Clear);
        assert_eq!(game.game_outcome(), None);
        assert!(game.move_history().is_empty());
        assert_eq!(total_moves(game.legal_moves()), 20);
    }

    #[test]
    fn black_also_has_twenty_replies_after_the_kings_pawn() {
        let mut game = GameState::new_game();
        play(&mut game, &[("e2", "e4")]);
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(total_moves(game.legal_moves()), 20);
    }

    #[test]
    fn selection_follows_the_expected_refusal_rules() {
        let mut game = GameState::new_game();

        // Empty square and opponent piece: silent no-ops.
        game.select(sq("e4"));
        assert_eq!(game.selected_square(), None);
        game.select(sq("e7"));
        assert_eq!(game.selected_square(), None);

        game.select(sq("e2"));
        assert_eq!(game.selected_square(), Some(sq("e2")));

        // Switching to another own piece moves the selection.
        game.select(sq("d2"));
        assert_eq!(game.selected_square(), Some(sq("d2")));

        // Tapping the selected square again clears it.
        game.select(sq("d2"));
        assert_eq!(game.selected_square(), None);
    }

    #[test]
    fn moves_outside_the_generated_set_fail_loudly() {
        let mut game = GameState::new_game();
        let before = game.get_fen();

        assert_eq!(
            game.attempt_move(sq("e2"), sq("e5")),
            Err(ChessError::IllegalMove {
                from: sq("e2"),
                to: sq("e5")
            })
        );
        assert_eq!(
            game.attempt_move(sq("e7"), sq("e5")),
            Err(ChessError::IllegalMove {
                from: sq("e7"),
                to: sq("e5")
            })
        );
        assert_eq!(game.get_fen(), before);
    }

    #[test]
    fn quiet_moves_update_clocks_history_and_turn() {
        let mut game = GameState::new_game();
        play(&mut game, &[("e2", "e4")]);

        let last = game.last_move().expect("a move was applied");
        assert_eq!((last.from, last.to), (sq("e2"), sq("e4")));
        assert!(last.piece.has_moved);
        assert_eq!(game.halfmove_clock(), 0);
        assert_eq!(game.fullmove_number(), 1);
        assert_eq!(game.move_history(), ["e4"]);

        play(&mut game, &[("g8", "f6")]);
        assert_eq!(game.halfmove_clock(), 1);
        assert_eq!(game.fullmove_number(), 2);
        assert_eq!(game.move_history(), ["e4", "Nf6"]);
    }

    #[test]
    fn captures_get_the_infix_and_reset_the_clock() {
        let mut game = GameState::new_game();
        play(&mut game, &[("e2", "e4"), ("d7", "d5"), ("e4", "d5")]);
        assert_eq!(game.move_history().last().map(String::as_str), Some("xd5"));
        assert_eq!(game.halfmove_clock(), 0);
    }

    #[test]
    fn scholars_mate_ends_the_game_for_white() {
        let mut game = GameState::new_game();
        play(
            &mut game,
            &[
                ("e2", "e4"),
                ("e7", "e5"),
                ("f1", "c4"),
                ("b8", "c6"),
                ("d1", "h5"),
                ("g8", "f6"),
                ("h5", "f7"),
            ],
        );

        assert_eq!(
            game.game_outcome(),
            Some(GameOutcome::Checkmate {
                winner: Color::White
            })
        );
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(
            game.move_history(),
            ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"]
        );
        assert_eq!(game.fullmove_number(), 4);

        assert_eq!(
            game.attempt_move(sq("e8"), sq("f7")),
            Err(ChessError::GameOver)
        );
        game.select(sq("e8"));
        assert_eq!(game.selected_square(), None);
    }

    #[test]
    fn cornered_king_with_no_moves_is_stalemate() {
        // Classic corner stalemate: the pawn gives no check but its capture
        // square and the king cover every escape.
        let game = GameState::from_fen("8/8/8/8/8/k7/p7/K7 w - - 0 1")
            .expect("stalemate fixture should parse");

        assert_eq!(game.check_state(), CheckState::Clear);
        assert!(game.legal_moves().is_empty());
        assert_eq!(game.game_outcome(), Some(GameOutcome::Stalemate));
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn bare_kings_draw_immediately() {
        let game = GameState::from_fen("k7/8/8/8/8/8/8/K7 w - - 0 1")
            .expect("bare-kings fixture should parse");
        assert_eq!(game.game_outcome(), Some(GameOutcome::InsufficientMaterial));
    }

    #[test]
    fn king_and_bishop_still_plays_on() {
        // The material rule is deliberately narrow: anything beyond the two
        // bare kings continues play, even classic dead draws.
        let game = GameState::from_fen("k7/8/8/8/8/8/8/KB6 w - - 0 1")
            .expect("king-and-bishop fixture should parse");
        assert_eq!(game.game_outcome(), None);
    }

    #[test]
    fn en_passant_window_lasts_exactly_one_move() {
        let mut game = GameState::new_game();
        play(
            &mut game,
            &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")],
        );
        assert!(game.legal_destinations(sq("e5")).contains(&sq("d6")));

        // Taking the capture removes the landed pawn from its own square.
        let mut capture_branch = game.clone();
        capture_branch
            .attempt_move(sq("e5"), sq("d6"))
            .expect("en passant should be accepted");
        assert_eq!(capture_branch.board().get(sq("d5")), None);
        assert_eq!(
            capture_branch.move_history().last().map(String::as_str),
            Some("xd6")
        );

        // Any other move closes the window even though d5/e5 stay put.
        play(&mut game, &[("b1", "c3"), ("h7", "h6")]);
        assert!(!game.legal_destinations(sq("e5")).contains(&sq("d6")));
    }

    #[test]
    fn promotion_defers_until_a_piece_is_chosen() {
        let mut game = GameState::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1")
            .expect("promotion fixture should parse");

        play(&mut game, &[("a7", "a8")]);
        assert_eq!(game.pending_promotion(), Some((sq("a7"), sq("a8"))));
        assert_eq!(game.side_to_move(), Color::White);
        assert!(game.move_history().is_empty());
        assert_eq!(
            game.attempt_move(sq("h1"), sq("h2")),
            Err(ChessError::PromotionPending)
        );

        // Kings and pawns are not promotion choices.
        assert_eq!(
            game.resolve_promotion(PieceKind::King),
            Err(ChessError::InvalidPromotion)
        );

        game.resolve_promotion(PieceKind::Queen)
            .expect("queen promotion should be accepted");
        let queen = game.board().get(sq("a8")).expect("promoted piece placed");
        assert_eq!(queen.kind, PieceKind::Queen);
        assert_eq!(queen.color, Color::White);
        assert_eq!(game.side_to_move(), Color::Black);
        assert_eq!(game.move_history(), ["a8+"]);
        assert!(game.check_state().is_in_check());
    }

    #[test]
    fn promoting_by_capture_keeps_the_infix() {
        let mut game = GameState::from_fen("1r5k/P7/8/8/8/8/8/K7 w - - 0 1")
            .expect("capture-promotion fixture should parse");

        play(&mut game, &[("a7", "b8")]);
        game.resolve_promotion(PieceKind::Queen)
            .expect("queen promotion should be accepted");
        assert_eq!(game.move_history(), ["xb8+"]);
    }

    #[test]
    fn resolving_a_promotion_nobody_asked_for_is_refused() {
        let mut game = GameState::new_game();
        assert_eq!(
            game.resolve_promotion(PieceKind::Queen),
            Err(ChessError::InvalidPromotion)
        );
    }

    #[test]
    fn castling_moves_both_pieces_and_records_o_o() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("castling fixture should parse");

        play(&mut game, &[("e1", "g1")]);
        assert_eq!(
            game.board().get(sq("g1")).map(|p| p.kind),
            Some(PieceKind::King)
        );
        assert_eq!(
            game.board().get(sq("f1")).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
        assert_eq!(game.board().get(sq("h1")), None);
        assert_eq!(game.move_history(), ["O-O"]);

        play(&mut game, &[("e8", "c8")]);
        assert_eq!(
            game.board().get(sq("d8")).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
        assert_eq!(game.move_history(), ["O-O", "O-O-O"]);
        assert!(game.get_fen().contains(" - "));
    }

    #[test]
    fn the_fifty_move_counter_never_ends_the_game_by_itself() {
        let mut game = GameState::from_fen("k7/8/8/8/8/8/8/KN6 w - - 99 70")
            .expect("counter fixture should parse");
        play(&mut game, &[("b1", "c3")]);
        assert_eq!(game.halfmove_clock(), 100);
        assert_eq!(game.game_outcome(), None);
    }

    #[test]
    fn no_generated_move_leaves_the_mover_in_check() {
        let mut positions = vec![GameState::new_game()];
        positions.push(
            GameState::from_fen("r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6")
                .expect("tactical middlegame should parse"),
        );

        for game in positions {
            let mover = game.side_to_move();
            let moves: Vec<(Coord, Vec<Coord>)> = game
                .legal_moves()
                .iter()
                .map(|(from, tos)| (*from, tos.clone()))
                .collect();
            for (from, destinations) in moves {
                for to in destinations {
                    let mut branch = game.clone();
                    branch
                        .attempt_move(from, to)
                        .expect("generated moves should be accepted");
                    if branch.pending_promotion().is_some() {
                        branch
                            .resolve_promotion(PieceKind::Queen)
                            .expect("promotion should resolve");
                    }
                    assert!(
                        !is_king_in_check(branch.board(), mover),
                        "{from} -> {to} left the mover in check"
                    );
                }
            }
        }
    }
}
