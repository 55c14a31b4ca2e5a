use clap::{Parser, ValueEnum};
use env_logger::TimestampPrecision;
use log::{info, warn, LevelFilter};
use rushhour_solver::heuristics::Heuristic;
use rushhour_solver::solver::{SearchEngine, SearchOutcome, Strategy};
use rushhour_solver::utils::parse_puzzle_list;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    /// Uniform-cost search, ordered by path cost
    Ucs,
    /// Greedy best-first search, ordered by the heuristic
    Gbfs,
    /// A-style search, ordered by path cost plus heuristic
    Astar,
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search algorithm to run
    #[clap(short, long, value_enum, default_value = "ucs")]
    algorithm: Algorithm,

    /// Heuristic used by gbfs and astar
    #[clap(long, value_enum, default_value = "h1")]
    heuristic: Heuristic,

    /// Increase logging verbosity (can be repeated)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the puzzle file (one puzzle per line, '#' starts a comment)
    puzzle_file: PathBuf,
}

impl Args {
    fn strategy(&self) -> Strategy {
        match self.algorithm {
            Algorithm::Ucs => Strategy::UniformCost,
            Algorithm::Gbfs => Strategy::GreedyBestFirst(self.heuristic),
            Algorithm::Astar => Strategy::AStar(self.heuristic),
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
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let content = match fs::read_to_string(&args.puzzle_file) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.puzzle_file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let strategy = args.strategy();
    info!("Solving puzzles from {} with {}", args.puzzle_file.display(), strategy);

    for (line_number, parsed) in parse_puzzle_list(&content) {
        let puzzle = match parsed {
            Ok(puzzle) => puzzle,
            Err(e) => {
                warn!("Skipping puzzle on line {}: {}", line_number, e);
                continue;
            }
        };

        println!("Puzzle on line {} ({}):", line_number, strategy);
        println!("{}\n", puzzle.board());

        let mut engine = SearchEngine::new(puzzle.clone(), strategy);
        let result = engine.run();

        match &result.outcome {
            SearchOutcome::Solved(moves) => {
                println!("Solution ({} moves):", moves.len());
                if moves.is_empty() {
                    println!("  Already solved.");
                }
                let mut state = puzzle;
                for (i, record) in moves.iter().enumerate() {
                    println!("  Move {}: {}", i + 1, record);
                    if let Some(next) = state.apply(record.vehicle, record.direction, record.distance) {
                        state = next;
                    }
                }
                println!("\nFinal board state:\n{}", state.board());
            }
            SearchOutcome::Exhausted => println!("No solution."),
        }
        println!(
            "Search path length: {} states, runtime: {:.3}s\n",
            result.states_expanded,
            result.elapsed_seconds()
        );
    }

    ExitCode::SUCCESS
}
