//! Distance-to-goal estimators for the informed search strategies.
//!
//! Every estimator looks only at the exit corridor: the cells of `TARGET_ROW`
//! strictly to the right of the target vehicle. None of them is guaranteed to be
//! admissible; they exist to compare how the greedy and A-style strategies
//! behave under different guidance.
use crate::engine::{Cell, PuzzleState, BOARD_SIZE, TARGET_ROW, TARGET_VEHICLE};
use std::collections::HashSet;
use std::fmt;

/// Returns the cells between the target vehicle and the right edge of the board.
///
/// The corridor is empty when the target already touches the last column (or is
/// absent from the board).
///
/// # Arguments
/// * `state`: The state to inspect.
///
/// # Returns
/// An iterator over the corridor cells, from left to right.
pub fn corridor(state: &PuzzleState) -> impl Iterator<Item = Cell> + '_ {
    let start = state
        .vehicle_cells(TARGET_VEHICLE)
        .iter()
        .map(|&(_, c)| c + 1)
        .max()
        .unwrap_or(BOARD_SIZE);
    (start..BOARD_SIZE).map(move |c| state.board().get_cell(TARGET_ROW, c))
}

/// `h1`: the number of distinct vehicles standing in the corridor.
pub fn blocking_vehicles(state: &PuzzleState) -> u32 {
    let blockers: HashSet<char> = corridor(state).filter_map(|cell| cell.vehicle()).collect();
    blockers.len() as u32
}

/// `h2`: the number of occupied corridor cells. A long vehicle lying along the
/// corridor counts once per cell it covers.
pub fn blocked_positions(state: &PuzzleState) -> u32 {
    corridor(state).filter(|cell| !cell.is_empty()).count() as u32
}

/// `h3`: twice the number of blocking vehicles.
pub fn doubled_blocking_vehicles(state: &PuzzleState) -> u32 {
    2 * blocking_vehicles(state)
}

/// `h4`: the number of empty corridor cells.
pub fn open_positions(state: &PuzzleState) -> u32 {
    corridor(state).filter(|cell| cell.is_empty()).count() as u32
}

/// `h5`: blocking vehicles plus blocked positions.
pub fn blocking_sum(state: &PuzzleState) -> u32 {
    blocking_vehicles(state) + blocked_positions(state)
}

/// Selects one of the five estimators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Heuristic {
    /// Distinct vehicles blocking the corridor.
    #[value(name = "h1")]
    BlockingVehicles,
    /// Occupied corridor cells.
    #[value(name = "h2")]
    BlockedPositions,
    /// Twice the blocking vehicles.
    #[value(name = "h3")]
    DoubledBlockingVehicles,
    /// Empty corridor cells.
    #[value(name = "h4")]
    OpenPositions,
    /// Blocking vehicles plus occupied corridor cells.
    #[value(name = "h5")]
    BlockingSum,
}

impl Heuristic {
    pub const ALL: [Heuristic; 5] = [
        Heuristic::BlockingVehicles,
        Heuristic::BlockedPositions,
        Heuristic::DoubledBlockingVehicles,
        Heuristic::OpenPositions,
        Heuristic::BlockingSum,
    ];

    /// Short name used in reports, `h1` through `h5`.
    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::BlockingVehicles => "h1",
            Heuristic::BlockedPositions => "h2",
            Heuristic::DoubledBlockingVehicles => "h3",
            Heuristic::OpenPositions => "h4",
            Heuristic::BlockingSum => "h5",
        }
    }

    /// Scores `state` with the selected estimator.
    pub fn evaluate(&self, state: &PuzzleState) -> u32 {
        match self {
            Heuristic::BlockingVehicles => blocking_vehicles(state),
            Heuristic::BlockedPositions => blocked_positions(state),
            Heuristic::DoubledBlockingVehicles => doubled_blocking_vehicles(state),
            Heuristic::OpenPositions => open_positions(state),
            Heuristic::BlockingSum => blocking_sum(state),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
