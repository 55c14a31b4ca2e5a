//! Core state-transition model for the 6x6 Rush Hour puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Cell`: A single board square, either empty or occupied by a vehicle.
//! - `Direction` / `Orientation` / `Move`: The vocabulary of vehicle displacements.
//! - `Board`: The 6x6 grid, its canonical string encoding and vehicle lookups.
//! - `PuzzleState`: A board plus per-vehicle fuel, with move legality, move
//!   application (including the exit rule) and the goal test.
//!
//! States are never mutated once built: applying a move always yields a new,
//! independent `PuzzleState`.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 6;

/// The row the target vehicle must occupy, and through whose right edge it escapes.
pub const TARGET_ROW: usize = 2;

/// Identifier reserved for the target vehicle.
pub const TARGET_VEHICLE: char = 'A';

/// Fuel given to every vehicle that has no explicit override.
pub const DEFAULT_FUEL: u32 = 100;

const EMPTY_MARKER: char = '.';

/// Represents the content of a single board square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// An unoccupied square.
    Empty,
    /// A square covered by the vehicle with the given identifier.
    Vehicle(char),
}

impl Cell {
    /// Builds a cell from its character form. `.` is empty, anything else is a vehicle.
    ///
    /// # Examples
    ///
    /// ```
    /// use rushhour_solver::engine::Cell;
    /// assert_eq!(Cell::from_char('.'), Cell::Empty);
    /// assert_eq!(Cell::from_char('B'), Cell::Vehicle('B'));
    /// ```
    pub fn from_char(c: char) -> Self {
        if c == EMPTY_MARKER {
            Cell::Empty
        } else {
            Cell::Vehicle(c)
        }
    }

    /// Converts the cell to its character representation.
    pub fn to_char(&self) -> char {
        match self {
            Cell::Empty => EMPTY_MARKER,
            Cell::Vehicle(id) => *id,
        }
    }

    pub fn vehicle(&self) -> Option<char> {
        match self {
            Cell::Empty => None,
            Cell::Vehicle(id) => Some(*id),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }
}

/// The axis a vehicle is allowed to slide along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A direction of travel on the board.
///
/// The declaration order (`Up`, `Right`, `Down`, `Left`) is the order in which
/// moves are enumerated during search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All four directions in enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The vehicle orientation required to travel in this direction.
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::Vertical,
            Direction::Right | Direction::Left => Orientation::Horizontal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }

    /// Returns the square `distance` steps away from `(r, c)` in this direction,
    /// or `None` if it falls off the board.
    pub fn offset(self, (r, c): (usize, usize), distance: usize) -> Option<(usize, usize)> {
        let (nr, nc) = match self {
            Direction::Up => (r.checked_sub(distance)?, c),
            Direction::Down => (r.checked_add(distance)?, c),
            Direction::Left => (r, c.checked_sub(distance)?),
            Direction::Right => (r, c.checked_add(distance)?),
        };
        if nr < BOARD_SIZE && nc < BOARD_SIZE {
            Some((nr, nc))
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a direction name cannot be recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized direction '{0}', expected one of up, right, down, left")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "right" | "r" => Ok(Direction::Right),
            "down" | "d" => Ok(Direction::Down),
            "left" | "l" => Ok(Direction::Left),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

/// An atomic displacement of one vehicle along its own axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub vehicle: char,
    pub direction: Direction,
    pub distance: usize,
}

impl Move {
    pub fn new(vehicle: char, direction: Direction, distance: usize) -> Self {
        Move {
            vehicle,
            direction,
            distance,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.vehicle, self.direction, self.distance)
    }
}

/// Errors raised while building a `PuzzleState` from a description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Puzzle description must have {expected} cells, found {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("Target vehicle '{}' is not on the board", TARGET_VEHICLE)]
    MissingTarget,
    #[error("Target vehicle must lie on row {}, found it on rows {rows:?}", TARGET_ROW)]
    TargetOffRow { rows: Vec<usize> },
    #[error("Vehicle '{0}' does not occupy a contiguous straight line of cells")]
    MalformedVehicle(char),
}

/// Represents the 6x6 grid of cells.
///
/// The grid is indexed as `grid[row][column]`, with row 0 at the top and
/// column 0 on the left.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a board where every cell is `Cell::Empty`.
    pub fn new_empty() -> Self {
        Board {
            grid: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Parses a board from its 36-character row-major description.
    ///
    /// This is the inverse of [`Board::to_canonical`].
    ///
    /// # Arguments
    /// * `description`: One character per cell, row by row, `.` for empty.
    ///
    /// # Returns
    /// * `Ok(Board)` if the description has exactly `BOARD_SIZE * BOARD_SIZE` characters.
    /// * `Err(ConfigurationError::InvalidLength)` otherwise.
    ///
    /// # Examples
    /// ```
    /// use rushhour_solver::engine::{Board, Cell};
    /// let board = Board::parse("..B.....B...AAB.....................").unwrap();
    /// assert_eq!(board.get_cell(2, 0), Cell::Vehicle('A'));
    /// assert_eq!(board.get_cell(0, 2), Cell::Vehicle('B'));
    /// assert!(Board::parse("AA").is_err());
    /// ```
    pub fn parse(description: &str) -> Result<Self, ConfigurationError> {
        let found = description.chars().count();
        if found != BOARD_SIZE * BOARD_SIZE {
            return Err(ConfigurationError::InvalidLength {
                expected: BOARD_SIZE * BOARD_SIZE,
                found,
            });
        }

        let mut board = Board::new_empty();
        for (index, c) in description.chars().enumerate() {
            board.grid[index / BOARD_SIZE][index % BOARD_SIZE] = Cell::from_char(c);
        }
        Ok(board)
    }

    /// Returns the cell at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is outside the board.
    pub fn get_cell(&self, r: usize, c: usize) -> Cell {
        self.grid[r][c]
    }

    pub fn set_cell(&mut self, r: usize, c: usize, cell: Cell) {
        self.grid[r][c] = cell;
    }

    /// The canonical encoding: every cell in row-major order.
    ///
    /// Two boards are the same search state iff their canonical strings are equal.
    pub fn to_canonical(&self) -> String {
        self.grid
            .iter()
            .flat_map(|row| row.iter().map(Cell::to_char))
            .collect()
    }

    /// Returns the `(row, column)` of every cell covered by `vehicle`, in row-major order.
    pub fn cells_of(&self, vehicle: char) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                if self.grid[r][c] == Cell::Vehicle(vehicle) {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    /// Returns every vehicle identifier on the board, in order of first appearance
    /// in a row-major scan.
    pub fn vehicles(&self) -> Vec<char> {
        let mut ids = Vec::new();
        for cell in self.grid.iter().flatten() {
            if let Some(id) = cell.vehicle() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

impl fmt::Display for Board {
    /// Formats the board as six lines of six characters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.grid.iter().enumerate() {
            let line: String = row.iter().map(Cell::to_char).collect();
            if r + 1 < BOARD_SIZE {
                writeln!(f, "{}", line)?;
            } else {
                write!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

/// Fuel settings applied when a puzzle is constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleConfig {
    /// Fuel for any vehicle without an override.
    pub default_fuel: u32,
    /// Per-vehicle fuel, replacing `default_fuel`.
    pub fuel_overrides: BTreeMap<char, u32>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        PuzzleConfig {
            default_fuel: DEFAULT_FUEL,
            fuel_overrides: BTreeMap::new(),
        }
    }
}

impl PuzzleConfig {
    pub fn with_fuel(mut self, vehicle: char, amount: u32) -> Self {
        self.fuel_overrides.insert(vehicle, amount);
        self
    }
}

/// A snapshot of the puzzle: the board, the remaining fuel of every vehicle and
/// the board's canonical string.
///
/// Equality and hashing only consider the canonical string, so two states with
/// the same layout but different fuel compare equal.
///
/// # Examples
/// ```
/// use rushhour_solver::engine::{Direction, PuzzleState};
/// let state = PuzzleState::from_description(
///     "............AA......................",
/// ).unwrap();
/// assert!(!state.is_goal());
/// let next = state.apply('A', Direction::Right, 4).unwrap();
/// assert!(next.is_goal());
/// assert_eq!(next.fuel('A'), Some(96));
/// ```
#[derive(Clone, Debug)]
pub struct PuzzleState {
    board: Board,
    fuel: BTreeMap<char, u32>,
    canonical: String,
}

impl PuzzleState {
    /// Builds the initial state of a puzzle.
    ///
    /// Every vehicle on the board starts with `config.default_fuel`; entries in
    /// `config.fuel_overrides` then replace those amounts (and are kept even for
    /// identifiers that are not on the board).
    ///
    /// # Arguments
    /// * `description`: The 36-character row-major board description.
    /// * `config`: Fuel settings.
    ///
    /// # Returns
    /// * `Ok(PuzzleState)` on success.
    /// * `Err(ConfigurationError)` if the description has the wrong length, a vehicle
    ///   is not a straight contiguous segment, or the target vehicle is missing or not
    ///   confined to `TARGET_ROW`.
    pub fn new(description: &str, config: &PuzzleConfig) -> Result<Self, ConfigurationError> {
        let board = Board::parse(description)?;

        let vehicles = board.vehicles();
        for &id in &vehicles {
            if !is_straight_segment(&board.cells_of(id)) {
                return Err(ConfigurationError::MalformedVehicle(id));
            }
        }

        let target_cells = board.cells_of(TARGET_VEHICLE);
        if target_cells.is_empty() {
            return Err(ConfigurationError::MissingTarget);
        }
        if target_cells.iter().any(|&(r, _)| r != TARGET_ROW) {
            let mut rows: Vec<usize> = target_cells.iter().map(|&(r, _)| r).collect();
            rows.dedup();
            return Err(ConfigurationError::TargetOffRow { rows });
        }

        let mut fuel: BTreeMap<char, u32> = vehicles
            .into_iter()
            .map(|id| (id, config.default_fuel))
            .collect();
        fuel.extend(config.fuel_overrides.iter().map(|(&id, &amount)| (id, amount)));

        Ok(PuzzleState::from_parts(board, fuel))
    }

    /// Builds a state using the default fuel configuration.
    pub fn from_description(description: &str) -> Result<Self, ConfigurationError> {
        PuzzleState::new(description, &PuzzleConfig::default())
    }

    fn from_parts(board: Board, fuel: BTreeMap<char, u32>) -> Self {
        let canonical = board.to_canonical();
        PuzzleState {
            board,
            fuel,
            canonical,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The canonical string identifying this state for duplicate detection.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Remaining fuel of `vehicle`, or `None` if it was never part of the puzzle.
    pub fn fuel(&self, vehicle: char) -> Option<u32> {
        self.fuel.get(&vehicle).copied()
    }

    pub fn fuel_map(&self) -> &BTreeMap<char, u32> {
        &self.fuel
    }

    /// Vehicles currently on the board, in move-enumeration order.
    pub fn vehicles(&self) -> Vec<char> {
        self.board.vehicles()
    }

    pub fn vehicle_cells(&self, vehicle: char) -> Vec<(usize, usize)> {
        self.board.cells_of(vehicle)
    }

    /// The orientation of `vehicle`, inferred from its cells.
    ///
    /// Returns `None` if the vehicle is not on the board or covers a single cell,
    /// since a one-cell vehicle has no orientation of its own.
    pub fn orientation(&self, vehicle: char) -> Option<Orientation> {
        let cells = self.board.cells_of(vehicle);
        if cells.len() < 2 {
            return None;
        }
        if cells.iter().all(|&(_, c)| c == cells[0].1) {
            Some(Orientation::Vertical)
        } else {
            Some(Orientation::Horizontal)
        }
    }

    /// Checks whether `vehicle` may slide `distance` cells in `direction`.
    ///
    /// A move is legal when all of the following hold:
    /// 1. The vehicle is known, is on the board and `distance >= 1`.
    /// 2. The vehicle has at least `distance` fuel left.
    /// 3. The direction matches the vehicle's orientation (single-cell vehicles match any).
    /// 4. The vehicle's leading cell can advance `distance` cells without leaving the board.
    /// 5. Every one of those `distance` cells is empty.
    ///
    /// Illegality is an ordinary outcome and is reported as `false`, never as an error.
    pub fn is_legal(&self, vehicle: char, direction: Direction, distance: usize) -> bool {
        if distance < 1 {
            return false;
        }
        let Some(fuel) = self.fuel(vehicle) else {
            return false;
        };
        if (fuel as usize) < distance {
            return false;
        }

        let cells = self.board.cells_of(vehicle);
        let Some(lead) = leading_cell(&cells, direction) else {
            return false;
        };
        if !fits_orientation(&cells, direction) {
            return false;
        }

        (1..=distance).all(|step| match direction.offset(lead, step) {
            Some((r, c)) => self.board.get_cell(r, c).is_empty(),
            None => false,
        })
    }

    /// Applies a move, returning the resulting state or `None` if the move is illegal.
    ///
    /// The receiver is left untouched. After a `right` move, a vehicle other than
    /// the target that ends entirely on `TARGET_ROW` with its rightmost cell in
    /// the last column exits the board and is removed. Its fuel entry is kept.
    ///
    /// # Arguments
    /// * `vehicle`: Identifier of the vehicle to move.
    /// * `direction`: Direction of travel.
    /// * `distance`: Number of cells to travel.
    ///
    /// # Returns
    /// `Some(PuzzleState)` with the vehicle displaced and its fuel reduced by
    /// `distance`, or `None` if [`PuzzleState::is_legal`] does not hold.
    pub fn apply(&self, vehicle: char, direction: Direction, distance: usize) -> Option<Self> {
        if !self.is_legal(vehicle, direction, distance) {
            return None;
        }

        let cells = self.board.cells_of(vehicle);
        let moved = cells
            .iter()
            .map(|&cell| direction.offset(cell, distance))
            .collect::<Option<Vec<_>>>()?;

        let mut board = self.board.clone();
        for &(r, c) in &cells {
            board.set_cell(r, c, Cell::Empty);
        }
        for &(r, c) in &moved {
            board.set_cell(r, c, Cell::Vehicle(vehicle));
        }

        let exits = direction == Direction::Right
            && vehicle != TARGET_VEHICLE
            && moved.iter().all(|&(r, _)| r == TARGET_ROW)
            && moved.iter().any(|&(_, c)| c == BOARD_SIZE - 1);
        if exits {
            for &(r, c) in &moved {
                board.set_cell(r, c, Cell::Empty);
            }
        }

        let mut fuel = self.fuel.clone();
        if let Some(remaining) = fuel.get_mut(&vehicle) {
            *remaining -= distance as u32;
        }

        Some(PuzzleState::from_parts(board, fuel))
    }

    pub fn apply_move(&self, mv: &Move) -> Option<Self> {
        self.apply(mv.vehicle, mv.direction, mv.distance)
    }

    /// True iff the target vehicle's rightmost cell is in the last column.
    pub fn is_goal(&self) -> bool {
        self.board
            .cells_of(TARGET_VEHICLE)
            .iter()
            .map(|&(_, c)| c)
            .max()
            == Some(BOARD_SIZE - 1)
    }

    /// Enumerates every legal move from this state.
    ///
    /// The order is fixed: vehicles in first-appearance order, then `Direction::ALL`,
    /// then increasing distance. For each vehicle and direction, distances are tried
    /// from 1 upwards until the first illegal one, since legality is monotonic in
    /// distance.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for vehicle in self.vehicles() {
            for direction in Direction::ALL {
                let mut distance = 1;
                while self.is_legal(vehicle, direction, distance) {
                    moves.push(Move::new(vehicle, direction, distance));
                    distance += 1;
                }
            }
        }
        moves
    }

    /// Plays up to `steps` uniformly random legal moves, stopping early if no move
    /// is available.
    pub fn random_walk(&self, steps: usize, rng: &mut impl Rng) -> Self {
        let mut state = self.clone();
        for _ in 0..steps {
            let moves = state.legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            match state.apply_move(&mv) {
                Some(next) => state = next,
                None => break,
            }
        }
        state
    }

    /// Same as [`PuzzleState::random_walk`] with a `SmallRng` seeded from `seed`,
    /// so the same seed always produces the same walk.
    pub fn random_walk_with_seed(&self, steps: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.random_walk(steps, &mut rng)
    }
}

impl PartialEq for PuzzleState {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for PuzzleState {}

impl Hash for PuzzleState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

/// The vehicle's extreme cell in the direction of travel.
fn leading_cell(cells: &[(usize, usize)], direction: Direction) -> Option<(usize, usize)> {
    let iter = cells.iter().copied();
    match direction {
        Direction::Up => iter.min_by_key(|&(r, _)| r),
        Direction::Down => iter.max_by_key(|&(r, _)| r),
        Direction::Left => iter.min_by_key(|&(_, c)| c),
        Direction::Right => iter.max_by_key(|&(_, c)| c),
    }
}

fn fits_orientation(cells: &[(usize, usize)], direction: Direction) -> bool {
    if cells.len() == 1 {
        return true;
    }
    match direction.orientation() {
        Orientation::Vertical => cells.iter().all(|&(_, c)| c == cells[0].1),
        Orientation::Horizontal => cells.iter().all(|&(r, _)| r == cells[0].0),
    }
}

/// Cells must be in row-major order.
fn is_straight_segment(cells: &[(usize, usize)]) -> bool {
    let Some(&(r0, c0)) = cells.first() else {
        return false;
    };
    if cells.iter().all(|&(r, _)| r == r0) {
        cells.iter().enumerate().all(|(i, &(_, c))| c == c0 + i)
    } else if cells.iter().all(|&(_, c)| c == c0) {
        cells.iter().enumerate().all(|(i, &(r, _))| r == r0 + i)
    } else {
        false
    }
}
