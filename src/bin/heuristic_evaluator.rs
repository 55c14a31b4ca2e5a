use clap::Parser;
use log::{info, warn, LevelFilter};
use rushhour_solver::engine::PuzzleState;
use rushhour_solver::solver::{SearchEngine, Strategy};
use rushhour_solver::utils::parse_puzzle_list;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

// Starting layout that random puzzles are scrambled from.
//
// BB.C.O
// ...C.O
// AA.C.O
// E.....
// E.FF..
// E..GG.
const BASE_LAYOUT: &str = "BB.C.O...C.OAA.C.OE.....E.FF..E..GG.";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Puzzle file to evaluate; when omitted, random puzzles are generated
    puzzle_file: Option<PathBuf>,

    /// Number of random puzzles to generate
    #[clap(long, default_value_t = 20)]
    random: usize,

    /// Seed of the first random puzzle
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Number of random moves used to scramble each random puzzle
    #[clap(long, default_value_t = 30)]
    scramble: usize,

    /// Increase logging verbosity (can be repeated)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Default)]
struct Totals {
    solved: usize,
    total_length: usize,
    total_expanded: usize,
    total_seconds: f64,
}

fn load_puzzles(args: &Args) -> Result<Vec<(String, PuzzleState)>, String> {
    match &args.puzzle_file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
            let mut puzzles = Vec::new();
            for (line_number, parsed) in parse_puzzle_list(&content) {
                match parsed {
                    Ok(puzzle) => puzzles.push((format!("line {}", line_number), puzzle)),
                    Err(e) => warn!("Skipping puzzle on line {}: {}", line_number, e),
                }
            }
            Ok(puzzles)
        }
        None => {
            let base = PuzzleState::from_description(BASE_LAYOUT)
                .map_err(|e| format!("Invalid base layout: {}", e))?;
            Ok((0..args.random as u64)
                .map(|i| {
                    let seed = args.seed + i;
                    (format!("seed {}", seed), base.random_walk_with_seed(args.scramble, seed))
                })
                .collect())
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let puzzles = match load_puzzles(&args) {
        Ok(puzzles) => puzzles,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let strategies = Strategy::all();
    let mut totals: HashMap<Strategy, Totals> = HashMap::new();

    println!("Starting heuristic evaluation for {} puzzles...", puzzles.len());

    for (label, puzzle) in &puzzles {
        println!("\nEvaluating puzzle ({}): {}", label, puzzle.canonical());

        for &strategy in &strategies {
            let mut engine = SearchEngine::new(puzzle.clone(), strategy);
            let result = engine.run();
            println!(
                "  Strategy: {:<10} Solved: {:<5} Length: {:<4} Expanded: {:<7} Time: {:.4}s",
                engine.strategy().to_string(),
                result.is_solved(),
                result.solution_length(),
                result.states_expanded,
                result.elapsed_seconds()
            );

            let entry = totals.entry(engine.strategy()).or_default();
            if result.is_solved() {
                entry.solved += 1;
                entry.total_length += result.solution_length();
            }
            entry.total_expanded += result.states_expanded;
            entry.total_seconds += result.elapsed_seconds();
        }
    }
    info!("Evaluated {} strategies", strategies.len());

    println!("\n--- Evaluation Complete ---");
    println!("Number of puzzles evaluated: {}", puzzles.len());
    println!("\n--- Averages ---");

    for strategy in &strategies {
        let Some(entry) = totals.get(strategy) else {
            println!("Strategy {}: No runs recorded.", strategy);
            continue;
        };
        let avg_length = if entry.solved > 0 {
            entry.total_length as f64 / entry.solved as f64
        } else {
            0.0
        };
        let runs = puzzles.len().max(1) as f64;
        println!(
            "Strategy {:<10}: Solved {:>3}/{:<3} Avg length = {:>6.2} Avg expanded = {:>9.1} Avg time = {:.4}s",
            strategy.to_string(),
            entry.solved,
            puzzles.len(),
            avg_length,
            entry.total_expanded as f64 / runs,
            entry.total_seconds / runs
        );
    }

    ExitCode::SUCCESS
}
