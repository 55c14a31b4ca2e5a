//! Frontier-based search over puzzle states.
//!
//! One engine serves all three strategies. They differ only in the node attribute
//! the open list is ordered by: `g` for uniform-cost search, `h` for greedy
//! best-first search and `f = g + h` for A-style search.
use crate::engine::{Direction, Move, PuzzleState};
use crate::heuristics::Heuristic;
use log::{debug, trace};
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Index of a node in the engine's node arena.
pub type NodeId = usize;

/// Which priority key orders the open list, and which heuristic (if any) feeds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Uninformed search ordered by path cost `g`.
    UniformCost,
    /// Greedy best-first search ordered by the heuristic value `h`.
    GreedyBestFirst(Heuristic),
    /// Search ordered by `f = g + h`.
    AStar(Heuristic),
}

impl Strategy {
    /// Every strategy/heuristic combination: uniform-cost first, then greedy and
    /// A-style search with each heuristic in turn.
    pub fn all() -> Vec<Strategy> {
        let mut strategies = vec![Strategy::UniformCost];
        strategies.extend(Heuristic::ALL.iter().map(|&h| Strategy::GreedyBestFirst(h)));
        strategies.extend(Heuristic::ALL.iter().map(|&h| Strategy::AStar(h)));
        strategies
    }

    pub fn heuristic(&self) -> Option<Heuristic> {
        match self {
            Strategy::UniformCost => None,
            Strategy::GreedyBestFirst(h) | Strategy::AStar(h) => Some(*h),
        }
    }

    /// Short algorithm name used in reports.
    pub fn algorithm(&self) -> &'static str {
        match self {
            Strategy::UniformCost => "UCS",
            Strategy::GreedyBestFirst(_) => "GBFS",
            Strategy::AStar(_) => "A/A*",
        }
    }

    /// The value of `node` under this strategy's priority key. Lower is better.
    pub fn priority(&self, node: &SearchNode) -> u32 {
        match self {
            Strategy::UniformCost => node.g,
            Strategy::GreedyBestFirst(_) => node.h,
            Strategy::AStar(_) => node.f,
        }
    }

    fn estimate(&self, state: &PuzzleState) -> u32 {
        self.heuristic().map_or(0, |h| h.evaluate(state))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.heuristic() {
            Some(h) => write!(f, "{}-{}", self.algorithm(), h),
            None => f.write_str(self.algorithm()),
        }
    }
}

/// A node of the explicit search tree.
///
/// The parent link is an arena index used only to rebuild the solution path.
#[derive(Clone, Debug)]
pub struct SearchNode {
    state: PuzzleState,
    parent: Option<NodeId>,
    producing_move: Option<Move>,
    g: u32,
    h: u32,
    f: u32,
}

impl SearchNode {
    fn new(
        state: PuzzleState,
        parent: Option<NodeId>,
        producing_move: Option<Move>,
        g: u32,
        h: u32,
    ) -> Self {
        SearchNode {
            state,
            parent,
            producing_move,
            g,
            h,
            f: g + h,
        }
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The move that produced this node; `None` for the root.
    pub fn producing_move(&self) -> Option<Move> {
        self.producing_move
    }

    /// Path cost: number of moves from the root.
    pub fn g(&self) -> u32 {
        self.g
    }

    /// Heuristic estimate, 0 for uninformed search.
    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.f
    }
}

/// One step of a solution path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub vehicle: char,
    pub direction: Direction,
    pub distance: usize,
    /// Fuel the vehicle has left after this move.
    pub fuel_remaining: u32,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} (fuel {})",
            self.vehicle, self.direction, self.distance, self.fuel_remaining
        )
    }
}

/// How a search run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A goal state was reached; holds the moves from the root, root excluded.
    Solved(Vec<MoveRecord>),
    /// The open list ran dry without reaching a goal.
    Exhausted,
}

/// Summary of a search run.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    /// Number of nodes moved to the closed list.
    pub states_expanded: usize,
    pub elapsed: Duration,
}

impl SearchResult {
    pub fn is_solved(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Solved(_))
    }

    /// Number of moves in the solution, 0 when unsolved.
    pub fn solution_length(&self) -> usize {
        self.moves().len()
    }

    /// The solution moves, empty when unsolved.
    pub fn moves(&self) -> &[MoveRecord] {
        match &self.outcome {
            SearchOutcome::Solved(moves) => moves.as_slice(),
            SearchOutcome::Exhausted => &[],
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// The search engine. Owns the node arena and the open, closed and visited
/// collections of a single run.
///
/// # Examples
/// ```
/// use rushhour_solver::engine::PuzzleState;
/// use rushhour_solver::solver::{SearchEngine, Strategy};
///
/// let root = PuzzleState::from_description("............AA......................").unwrap();
/// let mut engine = SearchEngine::new(root, Strategy::UniformCost);
/// let result = engine.run();
/// assert!(result.is_solved());
/// assert_eq!(result.solution_length(), 1);
/// ```
#[derive(Debug)]
pub struct SearchEngine {
    strategy: Strategy,
    nodes: Vec<SearchNode>,
    open: Vec<NodeId>,
    closed: Vec<NodeId>,
    visited: HashSet<String>,
}

impl SearchEngine {
    /// Creates an engine whose open list holds only the root node built from `root`.
    pub fn new(root: PuzzleState, strategy: Strategy) -> Self {
        let h = strategy.estimate(&root);
        SearchEngine {
            strategy,
            nodes: vec![SearchNode::new(root, None, None, 0, h)],
            open: vec![0],
            closed: Vec::new(),
            visited: HashSet::new(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Restores the engine to its initial state: open = [root], closed and visited empty.
    pub fn reset(&mut self) {
        self.nodes.truncate(1);
        self.open = vec![0];
        self.closed.clear();
        self.visited.clear();
    }

    /// Expanded nodes, in expansion order.
    pub fn closed(&self) -> impl Iterator<Item = &SearchNode> + '_ {
        self.closed.iter().map(move |&id| &self.nodes[id])
    }

    /// Nodes currently waiting in the open list, best first.
    pub fn open(&self) -> impl Iterator<Item = &SearchNode> + '_ {
        self.open.iter().map(move |&id| &self.nodes[id])
    }

    /// Runs the search until a goal is reached or the open list is empty.
    ///
    /// Each iteration looks at the best open node:
    /// 1. If it is a goal, the run is solved and the path is rebuilt from parent links.
    /// 2. If it is a duplicate (already visited, or another open node holds the same
    ///    state with a priority no worse), it is dropped without expansion.
    /// 3. Otherwise it moves to the closed list, its children that are not visited
    ///    are appended to the open list, and the open list is stably re-sorted.
    ///
    /// Because the expanded node is closed before its children are sorted in, the
    /// expansion counts of the informed strategies differ from a loop that closes
    /// the new best node after re-sorting.
    ///
    /// Calling `run` again continues from where the previous call stopped; use
    /// [`SearchEngine::reset`] to start over.
    pub fn run(&mut self) -> SearchResult {
        let start = Instant::now();
        debug!("Starting {} search", self.strategy);

        let outcome = loop {
            let Some(&best) = self.open.first() else {
                break SearchOutcome::Exhausted;
            };

            if self.nodes[best].state.is_goal() {
                break SearchOutcome::Solved(self.reconstruct_path(best));
            }

            self.open.remove(0);
            if self.is_duplicate(best) {
                continue;
            }

            self.closed.push(best);
            self.visited.insert(self.nodes[best].state.canonical().to_string());
            self.expand(best);

            let strategy = self.strategy;
            let nodes = &self.nodes;
            self.open.sort_by_key(|&id| strategy.priority(&nodes[id]));
        };

        let result = SearchResult {
            outcome,
            states_expanded: self.closed.len(),
            elapsed: start.elapsed(),
        };
        debug!(
            "{} search finished: solved={}, length={}, expanded={}, {:.3}s",
            self.strategy,
            result.is_solved(),
            result.solution_length(),
            result.states_expanded,
            result.elapsed_seconds()
        );
        result
    }

    /// `node` must already have been removed from the front of the open list.
    fn is_duplicate(&self, node: NodeId) -> bool {
        let candidate = &self.nodes[node];
        if self.visited.contains(candidate.state.canonical()) {
            return true;
        }
        let key = self.strategy.priority(candidate);
        self.open.iter().any(|&other| {
            let other = &self.nodes[other];
            other.state == candidate.state && self.strategy.priority(other) <= key
        })
    }

    fn expand(&mut self, parent_id: NodeId) {
        let parent = &self.nodes[parent_id];
        trace!(
            "Expanding {} (g={}, h={}, f={})",
            parent.state.canonical(),
            parent.g,
            parent.h,
            parent.f
        );

        let g = parent.g + 1;
        let children: Vec<SearchNode> = parent
            .state
            .legal_moves()
            .into_iter()
            .filter_map(|mv| {
                let child = parent.state.apply_move(&mv)?;
                if child == parent.state || self.visited.contains(child.canonical()) {
                    return None;
                }
                let h = self.strategy.estimate(&child);
                Some(SearchNode::new(child, Some(parent_id), Some(mv), g, h))
            })
            .collect();

        for child in children {
            self.open.push(self.nodes.len());
            self.nodes.push(child);
        }
    }

    fn reconstruct_path(&self, goal: NodeId) -> Vec<MoveRecord> {
        let mut path = Vec::new();
        let mut cursor = Some(goal);
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            if let Some(mv) = node.producing_move {
                path.push(MoveRecord {
                    vehicle: mv.vehicle,
                    direction: mv.direction,
                    distance: mv.distance,
                    fuel_remaining: node.state.fuel(mv.vehicle).unwrap_or(0),
                });
            }
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

/// Solves `puzzle` with a fresh engine.
pub fn solve(puzzle: &PuzzleState, strategy: Strategy) -> SearchResult {
    SearchEngine::new(puzzle.clone(), strategy).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PuzzleConfig;
    use std::collections::{HashMap, VecDeque};

    fn state(description: &str) -> PuzzleState {
        PuzzleState::from_description(description).unwrap()
    }

    /// Shortest solution length by plain breadth-first enumeration.
    fn brute_force_length(root: &PuzzleState) -> Option<usize> {
        let mut depth: HashMap<String, usize> = HashMap::new();
        let mut queue = VecDeque::new();
        depth.insert(root.canonical().to_string(), 0);
        queue.push_back(root.clone());
        while let Some(current) = queue.pop_front() {
            let d = depth[current.canonical()];
            if current.is_goal() {
                return Some(d);
            }
            for mv in current.legal_moves() {
                if let Some(next) = current.apply_move(&mv) {
                    if !depth.contains_key(next.canonical()) {
                        depth.insert(next.canonical().to_string(), d + 1);
                        queue.push_back(next);
                    }
                }
            }
        }
        None
    }

    // ......
    // ......
    // AA....
    // ......
    // ......
    // ......
    const OPEN_ROAD: &str = "............AA......................";

    // ..B...
    // ..B...
    // AAB...
    // ......
    // ......
    // ......
    const ONE_BLOCKER: &str = "..B.....B...AAB.....................";

    // ......
    // ......
    // AA.C..
    // ...C..
    // ...C..
    // ..EE..
    const CHAIN: &str = "............AA.C.....C.....C....EE..";

    // ......
    // ..B...
    // AAB...
    // ..B..C
    // .....C
    // ......
    const BOXED_IN: &str = "........B...AAB.....B..C.....C......";

    #[test]
    fn test_open_road_is_one_move() {
        let result = solve(&state(OPEN_ROAD), Strategy::UniformCost);
        assert_eq!(result.solution_length(), 1);
        assert_eq!(
            result.moves(),
            &[MoveRecord {
                vehicle: 'A',
                direction: Direction::Right,
                distance: 4,
                fuel_remaining: 96,
            }]
        );
    }

    #[test]
    fn test_root_goal_has_empty_path() {
        let result = solve(&state("................AA.................."), Strategy::UniformCost);
        assert!(result.is_solved());
        assert_eq!(result.solution_length(), 0);
        assert_eq!(result.states_expanded, 0);
    }

    #[test]
    fn test_boxed_in_target_is_exhausted() {
        let config = PuzzleConfig::default().with_fuel('B', 0);
        let root = PuzzleState::new(BOXED_IN, &config).unwrap();
        for strategy in Strategy::all() {
            let result = solve(&root, strategy);
            assert_eq!(result.outcome, SearchOutcome::Exhausted, "{} should exhaust", strategy);
            assert_eq!(result.solution_length(), 0);
            assert!(result.states_expanded > 1, "C should still be able to move");
        }
    }

    #[test]
    fn test_single_blocker_solution() {
        let result = solve(&state(ONE_BLOCKER), Strategy::UniformCost);
        let moves: Vec<(char, Direction, usize)> = result
            .moves()
            .iter()
            .map(|m| (m.vehicle, m.direction, m.distance))
            .collect();
        assert_eq!(moves, vec![('B', Direction::Down, 3), ('A', Direction::Right, 4)]);
        assert_eq!(result.moves()[0].fuel_remaining, 97);
    }

    #[test]
    fn test_uniform_cost_matches_brute_force() {
        let fixtures = [OPEN_ROAD, ONE_BLOCKER, CHAIN];
        let expected = [1, 2, 3];
        for (description, expected) in fixtures.iter().zip(expected) {
            let root = state(description);
            let result = solve(&root, Strategy::UniformCost);
            assert_eq!(brute_force_length(&root), Some(expected));
            assert_eq!(result.solution_length(), expected, "wrong length for {}", description);
        }
    }

    #[test]
    fn test_uniform_cost_matches_brute_force_on_scrambled_puzzles() {
        // BB.C..
        // ...C..
        // AA.C..
        // E.....
        // E.FF..
        // E.....
        let base = state("BB.C.....C..AA.C..E.....E.FF..E.....");
        for seed in 0..6 {
            let root = base.random_walk_with_seed(6, seed);
            let expected = brute_force_length(&root);
            let result = solve(&root, Strategy::UniformCost);
            match expected {
                Some(length) => assert_eq!(result.solution_length(), length, "seed {}", seed),
                None => assert_eq!(result.outcome, SearchOutcome::Exhausted, "seed {}", seed),
            }
        }
    }

    #[test]
    fn test_informed_strategies_find_valid_solutions() {
        let root = state(CHAIN);
        for strategy in Strategy::all() {
            let result = solve(&root, strategy);
            assert!(result.is_solved(), "{} failed to solve", strategy);

            let mut replay = root.clone();
            for record in result.moves() {
                replay = replay
                    .apply(record.vehicle, record.direction, record.distance)
                    .expect("solution move should be legal");
                assert_eq!(replay.fuel(record.vehicle), Some(record.fuel_remaining));
            }
            assert!(replay.is_goal(), "{} path does not reach the goal", strategy);
        }
    }

    #[test]
    fn test_closed_list_never_repeats_a_state() {
        let mut engine = SearchEngine::new(state(CHAIN), Strategy::AStar(Heuristic::BlockingSum));
        for _ in 0..2 {
            let result = engine.run();
            let mut seen = HashSet::new();
            for node in engine.closed() {
                assert!(seen.insert(node.state().canonical().to_string()), "state closed twice");
            }
            assert_eq!(seen.len(), result.states_expanded);
            engine.reset();
        }
    }

    #[test]
    fn test_reset_reproduces_run() {
        let strategy = Strategy::GreedyBestFirst(Heuristic::BlockedPositions);
        let mut engine = SearchEngine::new(state(CHAIN), strategy);
        assert_eq!(engine.strategy(), strategy);
        let first = engine.run();
        engine.reset();
        assert_eq!(engine.closed().count(), 0);
        assert_eq!(engine.open().count(), 1);
        let second = engine.run();
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.states_expanded, second.states_expanded);
    }

    #[test]
    fn test_node_priorities() {
        let strategy = Strategy::AStar(Heuristic::BlockingVehicles);
        let mut engine = SearchEngine::new(state(ONE_BLOCKER), strategy);
        engine.run();
        for node in engine.closed().chain(engine.open()) {
            assert_eq!(node.f(), node.g() + node.h());
            assert_eq!(node.h(), Heuristic::BlockingVehicles.evaluate(node.state()));
        }
        let root = engine.closed().next().unwrap();
        assert_eq!(root.g(), 0);
        assert!(root.parent().is_none());
        assert!(root.producing_move().is_none());
    }

    #[test]
    fn test_uniform_cost_ignores_heuristic() {
        let mut engine = SearchEngine::new(state(ONE_BLOCKER), Strategy::UniformCost);
        engine.run();
        assert!(engine.closed().all(|node| node.h() == 0));
    }

    #[test]
    fn test_open_twin_with_no_worse_priority_is_duplicate() {
        let root = state(ONE_BLOCKER);
        let mv = Move::new('B', Direction::Down, 1);
        let child = root.apply_move(&mv).unwrap();
        for strategy in [Strategy::UniformCost, Strategy::AStar(Heuristic::BlockingVehicles)] {
            let mut engine = SearchEngine::new(root.clone(), strategy);
            let h = strategy.estimate(&child);
            engine.open.clear();
            engine.nodes.push(SearchNode::new(child.clone(), Some(0), Some(mv), 1, h));
            engine.nodes.push(SearchNode::new(child.clone(), Some(0), Some(mv), 1, h));
            engine.nodes.push(SearchNode::new(child.clone(), Some(0), Some(mv), 2, h));

            // Node 1 has been popped; node 2 holds the same state at the same priority.
            engine.open = vec![2, 3];
            assert!(engine.is_duplicate(1), "{}: equal-priority twin in open", strategy);

            // Only a strictly worse twin remains.
            engine.open = vec![3];
            assert!(!engine.is_duplicate(1), "{}: worse twin in open", strategy);
            assert!(!engine.is_duplicate(2), "{}: worse twin in open", strategy);

            // A better twin is still waiting.
            engine.open = vec![1, 2];
            assert!(engine.is_duplicate(3), "{}: better twin in open", strategy);

            engine.open.clear();
            assert!(!engine.is_duplicate(1));
            engine.visited.insert(child.canonical().to_string());
            assert!(engine.is_duplicate(1), "{}: visited state", strategy);
        }
    }

    #[test]
    fn test_uniform_cost_closes_the_last_equal_cost_twin() {
        // In CHAIN, "A right 1" and "E left 1" commute, so their common successor
        // enters the open list twice at g = 2. Earlier twins are dropped while a
        // later one is still open, so only the most recently generated twin at the
        // lowest cost is ever closed.
        let mut engine = SearchEngine::new(state(CHAIN), Strategy::UniformCost);
        let result = engine.run();
        assert_eq!(result.solution_length(), 3);

        let mut twins_seen = 0;
        for &closed_id in &engine.closed {
            let closed_state = &engine.nodes[closed_id].state;
            let same_state: Vec<NodeId> = (0..engine.nodes.len())
                .filter(|&id| engine.nodes[id].state == *closed_state)
                .collect();
            let lowest_g = same_state.iter().map(|&id| engine.nodes[id].g).min().unwrap();
            let cheapest: Vec<NodeId> = same_state
                .into_iter()
                .filter(|&id| engine.nodes[id].g == lowest_g)
                .collect();
            if cheapest.len() > 1 {
                twins_seen += 1;
            }
            assert_eq!(Some(&closed_id), cheapest.last(), "{}", closed_state.canonical());
        }
        assert!(twins_seen > 0, "fixture should produce equal-cost twins");
    }
    #[test]
    fn test_strategy_names() {
        let names: Vec<String> = Strategy::all().iter().map(|s| s.to_string()).collect();
        assert_eq!(names.len(), 11);
        assert_eq!(names[0], "UCS");
        assert_eq!(names[1], "GBFS-h1");
        assert_eq!(names[10], "A/A*-h5");
    }
}
