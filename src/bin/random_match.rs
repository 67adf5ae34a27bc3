//! Random self-play exerciser.
//!
//! Plays bounded games of uniformly random legal moves through the public
//! move path, re-checking the king-safety invariant after every move, and
//! prints an outcome tally. Usage: `random_match [games] [max-plies]`.

use std::env;

use rand::prelude::IndexedRandom;

use walnut_chess::game_state::chess_types::{Coord, GameOutcome, GameState};
use walnut_chess::move_generation::legal_move_checks::is_king_in_check;
use walnut_chess::move_generation::special_moves::PROMOTION_KINDS;

fn main() {
    let mut args = env::args().skip(1);
    let games: u32 = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(10);
    let max_plies: u32 = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(300);

    let mut rng = rand::rng();
    let mut checkmates = 0u32;
    let mut stalemates = 0u32;
    let mut material_draws = 0u32;
    let mut unfinished = 0u32;
    let mut total_plies = 0u64;

    for game_index in 0..games {
        let mut game = GameState::new_game();
        let mut plies = 0u32;

        while game.game_outcome().is_none() && plies < max_plies {
            let mover = game.side_to_move();
            let candidates: Vec<(Coord, Coord)> = game
                .legal_moves()
                .iter()
                .flat_map(|(from, destinations)| {
                    destinations.iter().map(move |to| (*from, *to))
                })
                .collect();
            let &(from, to) = candidates
                .choose(&mut rng)
                .expect("a running game always has a legal move");

            game.attempt_move(from, to)
                .expect("generated moves should be accepted");
            if game.pending_promotion().is_some() {
                let &kind = PROMOTION_KINDS
                    .choose(&mut rng)
                    .expect("the promotion kind list is never empty");
                game.resolve_promotion(kind)
                    .expect("promotion choices should resolve");
            }

            assert!(
                !is_king_in_check(game.board(), mover),
                "game {game_index}: {from} -> {to} left the mover in check"
            );
            plies += 1;
        }

        total_plies += u64::from(plies);
        match game.game_outcome() {
            Some(GameOutcome::Checkmate { .. }) => checkmates += 1,
            Some(GameOutcome::Stalemate) => stalemates += 1,
            Some(GameOutcome::InsufficientMaterial) => material_draws += 1,
            None => unfinished += 1,
        }
    }

    println!(
        "games {games}  checkmates {checkmates}  stalemates {stalemates}  \
         material-draws {material_draws}  unfinished {unfinished}  plies {total_plies}"
    );
}
