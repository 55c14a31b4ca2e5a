//! # Rush Hour Solver Library
//!
//! This library models the 6x6 Rush Hour sliding-vehicle puzzle with per-vehicle
//! fuel, and searches its state space for a sequence of moves that drives the
//! target vehicle `A` out through the right edge of row 2.
//!
//! It is used by three binaries:
//! - `rush_solver`: Solves every puzzle in a file with one search strategy and
//!   prints the moves found.
//! - `heuristic_evaluator`: Runs every strategy/heuristic combination over a set of
//!   puzzles and compares solution lengths, expansions and timings.
//! - `human_player`: Allows interactive play of a single puzzle.
//!
//! ## Modules
//! - `engine`: The board (`Board`), vehicle moves (`Move`, `Direction`) and the
//!   puzzle state (`PuzzleState`) with move legality, move application and the goal test.
//! - `heuristics`: The five corridor-based estimators `h1`..`h5`.
//! - `solver`: The frontier-based `SearchEngine` shared by uniform-cost, greedy
//!   best-first and A-style search.
//! - `utils`: Parsing of puzzle lines and fuel override tokens.

pub mod engine;
pub mod heuristics;
pub mod solver;
pub mod utils;

pub use engine::{ConfigurationError, Direction, Move, PuzzleConfig, PuzzleState};
pub use heuristics::Heuristic;
pub use solver::{solve, SearchEngine, SearchOutcome, SearchResult, Strategy};
