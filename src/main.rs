//! Interactive terminal front end.
//!
//! A minimal presentation collaborator for the engine: it only ever selects
//! squares, offers moves drawn from the generated destination sets, resolves
//! promotions, and re-renders from the returned snapshots.

use std::io::{self, BufRead, Write};

use walnut_chess::game_state::chess_types::{GameOutcome, GameState, PieceKind};
use walnut_chess::utils::algebraic::algebraic_to_coord;
use walnut_chess::utils::pgn::write_pgn;
use walnut_chess::utils::render_game_state::render_game_state;

fn main() {
    let mut game = GameState::new_game();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{}\n", render_game_state(&game));
    print_help();

    loop {
        if let Some(outcome) = game.game_outcome() {
            announce(outcome);
            println!("\n{}", write_pgn(&game));
            break;
        }

        if let Some((from, to)) = game.pending_promotion() {
            print!("promote {from}{to} to [q/r/b/n] > ");
            io::stdout().flush().ok();
            let Some(Ok(line)) = lines.next() else {
                break;
            };
            match promotion_kind(line.trim()) {
                Some(kind) => {
                    if let Err(err) = game.resolve_promotion(kind) {
                        println!("{err}");
                    } else {
                        println!("{}\n", render_game_state(&game));
                    }
                }
                None => println!("pick one of q, r, b, n"),
            }
            continue;
        }

        print!("{} > ", game.side_to_move());
        io::stdout().flush().ok();

        let Some(Ok(line)) = lines.next() else {
            break;
        };

        match line.trim() {
            "" => {}
            "quit" | "exit" => break,
            "help" => print_help(),
            "board" => println!("{}\n", render_game_state(&game)),
            "fen" => println!("{}", game.get_fen()),
            "pgn" => print!("{}", write_pgn(&game)),
            "history" => println!("{}", game.move_history().join(" ")),
            input => handle_squares(&mut game, input),
        }
    }
}

fn handle_squares(game: &mut GameState, input: &str) {
    if input.len() == 2 {
        match algebraic_to_coord(input) {
            Ok(origin) => {
                game.select(origin);
                let destinations = game.legal_destinations(origin);
                if destinations.is_empty() {
                    println!("no moves from {origin}");
                } else {
                    let names: Vec<String> =
                        destinations.iter().map(ToString::to_string).collect();
                    println!("{origin}: {}", names.join(" "));
                }
            }
            Err(err) => println!("{err}"),
        }
        return;
    }

    if input.len() == 4 {
        let (from, to) = input.split_at(2);
        match (algebraic_to_coord(from), algebraic_to_coord(to)) {
            (Ok(from), Ok(to)) => match game.attempt_move(from, to) {
                Ok(()) => {
                    if game.pending_promotion().is_none() {
                        println!("{}\n", render_game_state(game));
                    }
                }
                Err(err) => println!("{err}"),
            },
            _ => println!("squares look like e2 or moves like e2e4"),
        }
        return;
    }

    println!("unrecognized input '{input}'; try 'help'");
}

fn promotion_kind(input: &str) -> Option<PieceKind> {
    match input {
        "q" | "Q" => Some(PieceKind::Queen),
        "r" | "R" => Some(PieceKind::Rook),
        "b" | "B" => Some(PieceKind::Bishop),
        "n" | "N" => Some(PieceKind::Knight),
        _ => None,
    }
}

fn announce(outcome: GameOutcome) {
    match outcome {
        GameOutcome::Checkmate { winner } => println!("checkmate, {winner} wins"),
        GameOutcome::Stalemate => println!("stalemate, draw"),
        GameOutcome::InsufficientMaterial => println!("insufficient material, draw"),
    }
}

fn print_help() {
    println!("e2      select a square and list its legal destinations");
    println!("e2e4    play a move");
    println!("board   redraw the position");
    println!("fen     print the position record");
    println!("pgn     print the recorded game");
    println!("history print the move list");
    println!("quit    leave");
}
