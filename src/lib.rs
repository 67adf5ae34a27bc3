//! Crate root module declarations for the Walnut Chess rules engine.
//!
//! This file exposes the board/game-state model, legal move generation, and
//! the position-record utilities so binaries, tests, and external front ends
//! can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod move_generation {
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod special_moves;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod pgn;
    pub mod render_game_state;
}
