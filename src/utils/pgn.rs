//! PGN export of the recorded move history.
//!
//! Serializes headers and numbered movetext from the engine's recorded
//! notations so finished games can be handed to standard chess tooling.

use std::collections::BTreeMap;

use chrono::Local;

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::{Color, GameOutcome, GameState};

/// Render the game's recorded history as a PGN document.
pub fn write_pgn(game: &GameState) -> String {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Walnut Chess Game".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert(
        "Date".to_owned(),
        Local::now().format("%Y.%m.%d").to_string(),
    );
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), result_token(game).to_owned());

    if game.initial_fen() != STARTING_POSITION_FEN {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), game.initial_fen().to_owned());
    }

    let mut out = String::new();
    for (key, value) in &headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut movetext = Vec::<String>::with_capacity(game.move_history().len() + 1);
    for (index, notation) in game.move_history().iter().enumerate() {
        if index % 2 == 0 {
            movetext.push(format!("{}.", index / 2 + 1));
        }
        movetext.push(notation.clone());
    }
    movetext.push(result_token(game).to_owned());
    out.push_str(&movetext.join(" "));
    out.push('\n');

    out
}

fn result_token(game: &GameState) -> &'static str {
    match game.game_outcome() {
        Some(GameOutcome::Checkmate {
            winner: Color::White,
        }) => "1-0",
        Some(GameOutcome::Checkmate {
            winner: Color::Black,
        }) => "0-1",
        Some(GameOutcome::Stalemate) | Some(GameOutcome::InsufficientMaterial) => "1/2-1/2",
        None => "*",
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
