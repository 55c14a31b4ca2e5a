use rushhour_solver::engine::{Direction, PuzzleState};
use rushhour_solver::utils::parse_puzzle_line;
use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

// ..B...
// ..B...
// AAB...
// ...C..
// ...C..
// ..DD..
const DEFAULT_PUZZLE: &str = "..B.....B...AAB......C.....C....DD..";

fn main() -> ExitCode {
    // The puzzle may be given as arguments: the board followed by fuel tokens.
    let args: Vec<String> = env::args().skip(1).collect();
    let line = if args.is_empty() {
        DEFAULT_PUZZLE.to_string()
    } else {
        args.join(" ")
    };

    let mut history: Vec<PuzzleState> = match parse_puzzle_line(&line) {
        Ok(puzzle) => vec![puzzle],
        Err(e) => {
            eprintln!("Invalid puzzle: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("Welcome to Rush Hour!");

    loop {
        let Some(state) = history.last() else {
            break;
        };
        println!("---------------------");
        println!("Moves: {}", history.len() - 1);
        println!("{}", state.board());
        let fuel: Vec<String> = state
            .fuel_map()
            .iter()
            .map(|(v, amount)| format!("{}:{}", v, amount))
            .collect();
        println!("Fuel: {}", fuel.join(" "));

        if state.is_goal() {
            println!();
            println!("---------------------");
            println!("The target vehicle is out!");
            println!("Total moves: {}", history.len() - 1);
            println!("---------------------");
            break;
        }

        print!("Enter your move (vehicle direction distance), or 'u' to undo, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if trimmed_input == "u" {
            if history.len() > 1 {
                history.pop();
                println!("Move undone.");
            } else {
                println!("Cannot undo further (already at the initial state).");
            }
            continue;
        }

        let parts: Vec<&str> = trimmed_input.split_whitespace().collect();
        if parts.len() != 3 {
            println!(
                "Invalid input format. Use 'vehicle direction distance' (e.g. 'B down 3'), \
                 'u', or 'q'."
            );
            continue;
        }

        let mut vehicle_chars = parts[0].chars();
        let (Some(vehicle), None) = (vehicle_chars.next(), vehicle_chars.next()) else {
            println!("Invalid vehicle: use a single character such as 'B'.");
            continue;
        };
        let direction = match parts[1].parse::<Direction>() {
            Ok(direction) => direction,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        let Ok(distance) = parts[2].parse::<usize>() else {
            println!("Invalid distance: please enter a whole number.");
            continue;
        };

        match state.apply(vehicle, direction, distance) {
            Some(next) => {
                history.push(next);
                println!("Move processed.");
            }
            None => println!(
                "Illegal move: {} cannot move {} {} \
                 (blocked, off the board, wrong orientation, or out of fuel).",
                vehicle, direction, distance
            ),
        }
    }

    ExitCode::SUCCESS
}
