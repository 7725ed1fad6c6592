#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Toroidal A* pathfinding system that steers the snake toward its goal.
//!
//! [`PathFinder`] answers a single question per call: given a snapshot of the
//! snake's body and the goal cell, what is the shortest route and which
//! direction should the head take next. Every call runs a full search from
//! scratch; no bookkeeping survives between calls.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap, HashSet},
};

use snake_pilot_core::{Board, CellCoord, ConfigurationError, Direction, Path, SnakeBody};
use tracing::{debug, trace};

/// Order in which directions are tested when decoding the first path step.
pub const STEP_DECODE_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Up,
];

/// Order in which directions are tried when no usable path exists.
pub const FALLBACK_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

/// Pure planner that searches a toroidal board for the snake's next move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathFinder {
    board: Board,
}

impl PathFinder {
    /// Creates a planner for a board with the provided dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigurationError> {
        Board::new(width, height).map(Self::from_board)
    }

    /// Creates a planner for an already validated board.
    #[must_use]
    pub const fn from_board(board: Board) -> Self {
        Self { board }
    }

    /// Board the planner searches.
    #[must_use]
    pub const fn board(&self) -> Board {
        self.board
    }

    /// Estimated remaining cost between two cells.
    ///
    /// Wrap-aware Manhattan distance. It equals the true cost on an empty
    /// board, so it never overestimates and the search stays optimal.
    #[must_use]
    pub fn heuristic(&self, from: CellCoord, to: CellCoord) -> u32 {
        self.board.distance(from, to)
    }

    /// Finds a shortest path from the snake's head to `goal`.
    ///
    /// Every body cell except the tail is treated as an obstacle. Returns
    /// `None` when the goal cannot be reached; a goal equal to the head
    /// yields the single-cell path.
    #[must_use]
    pub fn find_path(&self, body: &SnakeBody, goal: CellCoord) -> Option<Path> {
        let obstacles = body.obstacles();
        let mut search = Search::new(self, body.head(), goal);
        let path = search.run(&obstacles);

        trace!(
            start = %body.head(),
            goal = %goal,
            expansions = search.expansions,
            visited = search.records.len(),
            steps = path.as_ref().map(Path::steps),
            "path search finished"
        );

        path
    }

    /// Chooses the direction the head should move on the next tick.
    ///
    /// Follows the first step of the shortest path when one exists. Otherwise
    /// falls back to the first direction in [`FALLBACK_ORDER`] that does not
    /// run into the body, and to [`Direction::Up`] when every move collides.
    #[must_use]
    pub fn get_next_move(&self, body: &SnakeBody, goal: CellCoord) -> Direction {
        let head = body.head();

        match self.find_path(body, goal).and_then(|path| path.first_step()) {
            Some(next) => {
                if let Some(direction) = self.direction_between(head, next) {
                    return direction;
                }
                debug!(%head, %next, "first path step is not adjacent to the head");
            }
            None => debug!(%head, %goal, "no path to goal, using fallback move"),
        }

        self.fallback_move(body)
    }

    /// Direction whose wrapped step leads from `from` to `to`.
    ///
    /// Candidates are tested in [`STEP_DECODE_ORDER`], so on boards where two
    /// directions reach the same cell the earlier one wins.
    #[must_use]
    pub fn direction_between(&self, from: CellCoord, to: CellCoord) -> Option<Direction> {
        STEP_DECODE_ORDER
            .into_iter()
            .find(|direction| self.board.step(from, *direction) == to)
    }

    /// First direction in [`FALLBACK_ORDER`] that keeps the head off the body.
    #[must_use]
    pub fn fallback_move(&self, body: &SnakeBody) -> Direction {
        let obstacles = body.obstacles();
        let head = body.head();

        FALLBACK_ORDER
            .into_iter()
            .find(|direction| !obstacles.contains(&self.board.step(head, *direction)))
            .unwrap_or_else(|| {
                debug!(%head, "every move collides with the body");
                Direction::Up
            })
    }
}

#[derive(Clone, Copy, Debug)]
struct SearchRecord {
    cost: u32,
    estimate: u32,
    parent: Option<CellCoord>,
}

/// Bookkeeping for a single A* run.
#[derive(Debug)]
struct Search<'a> {
    finder: &'a PathFinder,
    goal: CellCoord,
    frontier: BinaryHeap<Reverse<(u32, CellCoord)>>,
    records: HashMap<CellCoord, SearchRecord>,
    expansions: usize,
}

impl<'a> Search<'a> {
    fn new(finder: &'a PathFinder, start: CellCoord, goal: CellCoord) -> Self {
        let estimate = finder.heuristic(start, goal);
        let mut records = HashMap::new();
        let _ = records.insert(
            start,
            SearchRecord {
                cost: 0,
                estimate,
                parent: None,
            },
        );
        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((estimate, start)));

        Self {
            finder,
            goal,
            frontier,
            records,
            expansions: 0,
        }
    }

    fn run(&mut self, obstacles: &HashSet<CellCoord>) -> Option<Path> {
        while let Some(Reverse((estimate, current))) = self.frontier.pop() {
            let Some(record) = self.records.get(&current).copied() else {
                continue;
            };

            // Superseded by a cheaper entry that was already expanded.
            if estimate > record.estimate {
                continue;
            }

            self.expansions += 1;

            if current == self.goal {
                return self.reconstruct(current);
            }

            let tentative = record.cost.saturating_add(1);
            for neighbor in self.finder.board.neighbors(current) {
                if obstacles.contains(&neighbor) {
                    continue;
                }

                let improves = self
                    .records
                    .get(&neighbor)
                    .map_or(true, |existing| tentative < existing.cost);
                if !improves {
                    continue;
                }

                let estimate =
                    tentative.saturating_add(self.finder.heuristic(neighbor, self.goal));
                let _ = self.records.insert(
                    neighbor,
                    SearchRecord {
                        cost: tentative,
                        estimate,
                        parent: Some(current),
                    },
                );
                self.frontier.push(Reverse((estimate, neighbor)));
            }
        }

        None
    }

    fn reconstruct(&self, goal: CellCoord) -> Option<Path> {
        let mut cells = vec![goal];
        let mut current = goal;

        while let Some(parent) = self.records.get(&current).and_then(|record| record.parent) {
            cells.push(parent);
            current = parent;
        }

        cells.reverse();
        Path::from_cells(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(cells: &[(u32, u32)]) -> SnakeBody {
        SnakeBody::new(
            cells
                .iter()
                .map(|&(column, row)| CellCoord::new(column, row))
                .collect(),
        )
        .expect("non-empty body")
    }

    #[test]
    fn construction_rejects_zero_dimensions() {
        assert_eq!(PathFinder::new(0, 3), Err(ConfigurationError::ZeroWidth));
        assert_eq!(PathFinder::new(3, 0), Err(ConfigurationError::ZeroHeight));
    }

    #[test]
    fn straight_line_path_has_heuristic_length() {
        let finder = PathFinder::new(10, 10).expect("valid board");
        let path = finder
            .find_path(&body(&[(0, 0)]), CellCoord::new(3, 0))
            .expect("path exists");

        assert_eq!(path.len(), 4);
        assert_eq!(path.steps(), 3);
        assert_eq!(path.start(), CellCoord::new(0, 0));
        assert_eq!(path.goal(), CellCoord::new(3, 0));
    }

    #[test]
    fn wraps_instead_of_walking_the_long_way() {
        let finder = PathFinder::new(5, 5).expect("valid board");
        let path = finder
            .find_path(&body(&[(4, 0)]), CellCoord::new(0, 0))
            .expect("path exists");

        assert_eq!(path.cells(), &[CellCoord::new(4, 0), CellCoord::new(0, 0)]);
    }

    #[test]
    fn goal_at_head_yields_single_cell_path() {
        let finder = PathFinder::new(4, 4).expect("valid board");
        let snake = body(&[(2, 2), (2, 3)]);
        let path = finder.find_path(&snake, CellCoord::new(2, 2)).expect("path exists");

        assert_eq!(path.cells(), &[CellCoord::new(2, 2)]);
    }

    #[test]
    fn goal_inside_body_is_unreachable() {
        let finder = PathFinder::new(6, 6).expect("valid board");
        let snake = body(&[(1, 1), (2, 1), (3, 1)]);

        assert!(finder.find_path(&snake, CellCoord::new(2, 1)).is_none());
    }

    #[test]
    fn tail_cell_is_traversable() {
        let finder = PathFinder::new(6, 6).expect("valid board");
        let snake = body(&[(1, 1), (1, 2), (2, 2), (2, 1)]);
        let path = finder.find_path(&snake, CellCoord::new(2, 1)).expect("path exists");

        assert_eq!(path.cells(), &[CellCoord::new(1, 1), CellCoord::new(2, 1)]);
    }

    #[test]
    fn decodes_steps_with_wrap() {
        let finder = PathFinder::new(20, 15).expect("valid board");
        let head = CellCoord::new(10, 10);

        assert_eq!(
            finder.direction_between(head, CellCoord::new(11, 10)),
            Some(Direction::Right)
        );
        assert_eq!(
            finder.direction_between(head, CellCoord::new(9, 10)),
            Some(Direction::Left)
        );
        assert_eq!(
            finder.direction_between(head, CellCoord::new(10, 11)),
            Some(Direction::Down)
        );
        assert_eq!(
            finder.direction_between(head, CellCoord::new(10, 9)),
            Some(Direction::Up)
        );
        assert_eq!(
            finder.direction_between(CellCoord::new(19, 10), CellCoord::new(0, 10)),
            Some(Direction::Right)
        );
        assert_eq!(
            finder.direction_between(CellCoord::new(0, 10), CellCoord::new(19, 10)),
            Some(Direction::Left)
        );
        assert_eq!(
            finder.direction_between(CellCoord::new(3, 14), CellCoord::new(3, 0)),
            Some(Direction::Down)
        );
        assert_eq!(
            finder.direction_between(CellCoord::new(3, 0), CellCoord::new(3, 14)),
            Some(Direction::Up)
        );
        assert_eq!(finder.direction_between(head, CellCoord::new(12, 10)), None);
        assert_eq!(finder.direction_between(head, head), None);
    }

    #[test]
    fn two_wide_board_prefers_right() {
        let finder = PathFinder::new(2, 2).expect("valid board");
        assert_eq!(
            finder.direction_between(CellCoord::new(0, 0), CellCoord::new(1, 0)),
            Some(Direction::Right)
        );
    }

    #[test]
    fn fallback_used_when_already_at_goal() {
        let finder = PathFinder::new(5, 5).expect("valid board");
        let snake = body(&[(2, 2), (2, 1), (2, 0)]);

        // Up is blocked by the neck, so Down is the first free direction.
        assert_eq!(finder.get_next_move(&snake, CellCoord::new(2, 2)), Direction::Down);
    }
}
