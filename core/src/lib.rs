#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Pilot workspace.
//!
//! This crate defines the value types exchanged between the pathfinding
//! system and the adapters that embed it. The [`Board`] owns the toroidal
//! topology, a [`SnakeBody`] describes the agent head-to-tail, and a [`Path`]
//! captures the result of a search. None of these types carry behaviour that
//! outlives a single query.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as column and row coordinates.
///
/// The column is the `x` axis and grows to the right; the row is the `y` axis
/// and grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal movement commands available to the snake's head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Canonical upper-case name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "UP" => Ok(Self::Up),
            "DOWN" => Ok(Self::Down),
            "LEFT" => Ok(Self::Left),
            "RIGHT" => Ok(Self::Right),
            _ => Err(ParseDirectionError(value.to_owned())),
        }
    }
}

/// Raised when a string does not name one of the four directions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a direction; expected UP, DOWN, LEFT or RIGHT")]
pub struct ParseDirectionError(String);

/// Reasons a board configuration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The board was configured with zero columns.
    #[error("board width must be positive")]
    ZeroWidth,
    /// The board was configured with zero rows.
    #[error("board height must be positive")]
    ZeroHeight,
}

/// Reasons a snake body may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BodyError {
    /// The body contained no cells, so there is no head to search from.
    #[error("snake body must contain at least a head cell")]
    Empty,
}

/// Dimensions of the toroidal board the snake moves across.
///
/// Every step wraps at the edges: leaving the last column re-enters the
/// first and leaving the first row re-enters the last. Dimensions are
/// validated once at construction so that callers never re-check them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: u32,
    height: u32,
}

impl Board {
    /// Creates a board with the provided dimensions.
    pub const fn new(width: u32, height: u32) -> Result<Self, ConfigurationError> {
        if width == 0 {
            return Err(ConfigurationError::ZeroWidth);
        }
        if height == 0 {
            return Err(ConfigurationError::ZeroHeight);
        }

        Ok(Self { width, height })
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Reports whether the cell lies within the board bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Cell reached by moving one step from `cell` in `direction`.
    #[must_use]
    pub fn step(&self, cell: CellCoord, direction: Direction) -> CellCoord {
        let column = u64::from(cell.column());
        let row = u64::from(cell.row());
        let width = u64::from(self.width);
        let height = u64::from(self.height);

        match direction {
            Direction::Up => CellCoord::new(cell.column(), wrap(row + height - 1, self.height)),
            Direction::Down => CellCoord::new(cell.column(), wrap(row + 1, self.height)),
            Direction::Left => CellCoord::new(wrap(column + width - 1, self.width), cell.row()),
            Direction::Right => CellCoord::new(wrap(column + 1, self.width), cell.row()),
        }
    }

    /// Fewest moves between two cells on an empty board.
    ///
    /// Manhattan distance where each axis takes the shorter of the direct and
    /// the wrapped route.
    #[must_use]
    pub fn distance(&self, from: CellCoord, to: CellCoord) -> u32 {
        let columns = from.column().abs_diff(to.column());
        let rows = from.row().abs_diff(to.row());
        let columns = columns.min(self.width.saturating_sub(columns));
        let rows = rows.min(self.height.saturating_sub(rows));
        columns.saturating_add(rows)
    }

    /// The four wrapped neighbours of `cell`, ordered `+x`, `-x`, `+y`, `-y`.
    #[must_use]
    pub fn neighbors(&self, cell: CellCoord) -> [CellCoord; 4] {
        [
            self.step(cell, Direction::Right),
            self.step(cell, Direction::Left),
            self.step(cell, Direction::Down),
            self.step(cell, Direction::Up),
        ]
    }

    /// Iterator over every cell on the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |column| CellCoord::new(column, row)))
    }
}

fn wrap(value: u64, modulus: u32) -> u32 {
    // The remainder is strictly below a `u32` modulus.
    (value % u64::from(modulus)) as u32
}

/// Ordered cells occupied by the snake, head first and tail last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnakeBody {
    cells: Vec<CellCoord>,
}

impl SnakeBody {
    /// Creates a body from head-to-tail cells.
    pub fn new(cells: Vec<CellCoord>) -> Result<Self, BodyError> {
        if cells.is_empty() {
            return Err(BodyError::Empty);
        }

        Ok(Self { cells })
    }

    /// Cell occupied by the head.
    #[must_use]
    pub fn head(&self) -> CellCoord {
        self.cells[0]
    }

    /// Cell occupied by the tail. Equals the head for a single-cell body.
    #[must_use]
    pub fn tail(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }

    /// Head-to-tail cells of the body.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells in the body.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a body holds at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells the head must not enter on the next tick.
    ///
    /// The tail is excluded because it vacates the cell on the same tick the
    /// head would move into it.
    #[must_use]
    pub fn obstacles(&self) -> HashSet<CellCoord> {
        self.cells[..self.cells.len() - 1].iter().copied().collect()
    }

    /// Consumes the body, yielding the head-to-tail cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<CellCoord> {
        self.cells
    }
}

/// Ordered cells from a search start to its goal, both inclusive.
///
/// Consecutive cells are toroidal neighbours. A path always holds at least
/// one cell; when the start already equals the goal it holds only that cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellCoord>,
}

impl Path {
    /// Wraps the provided start-to-goal cells, or `None` when empty.
    #[must_use]
    pub fn from_cells(cells: Vec<CellCoord>) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { cells })
        }
    }

    /// Start-to-goal cells of the path.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of cells in the path, including start and goal.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a path holds at least its start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves needed to walk the path.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }

    /// First cell of the path.
    #[must_use]
    pub fn start(&self) -> CellCoord {
        self.cells[0]
    }

    /// Last cell of the path.
    #[must_use]
    pub fn goal(&self) -> CellCoord {
        self.cells[self.cells.len() - 1]
    }

    /// Cell entered by the first move, if the path has one.
    #[must_use]
    pub fn first_step(&self) -> Option<CellCoord> {
        self.cells.get(1).copied()
    }

    /// Consumes the path, yielding its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<CellCoord> {
        self.cells
    }
}
