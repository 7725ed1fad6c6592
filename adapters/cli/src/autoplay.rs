use std::fmt;

use anyhow::{ensure, Context, Result};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_pilot_core::{Board, CellCoord, Direction, SnakeBody};
use snake_pilot_system_pathfinding::PathFinder;
use tracing::{debug, info, trace};

/// Head-first cells of the snake when a game starts.
const SNAKE_START: [CellCoord; 2] = [CellCoord::new(8, 7), CellCoord::new(8, 8)];
/// Cell holding the first apple of a game.
const APPLE_START: CellCoord = CellCoord::new(8, 3);

/// Headless game loop that lets the pathfinder steer the snake.
#[derive(Debug)]
pub(crate) struct Game {
    finder: PathFinder,
    snake: Vec<CellCoord>,
    apple: CellCoord,
    score: u32,
    ticks: u32,
    rng: ChaCha8Rng,
}

impl Game {
    /// Starts a game on `board` with the canonical opening layout.
    pub(crate) fn new(board: Board, seed: u64) -> Result<Self> {
        ensure!(
            SNAKE_START
                .iter()
                .chain(std::iter::once(&APPLE_START))
                .all(|cell| board.contains(*cell)),
            "autoplay needs a board of at least 9x9 cells, got {}x{}",
            board.width(),
            board.height()
        );

        Ok(Self::with_state(
            PathFinder::from_board(board),
            SNAKE_START.to_vec(),
            APPLE_START,
            seed,
        ))
    }

    /// Resumes a game from an explicit snake and apple placement.
    pub(crate) fn with_state(
        finder: PathFinder,
        snake: Vec<CellCoord>,
        apple: CellCoord,
        seed: u64,
    ) -> Self {
        Self {
            finder,
            snake,
            apple,
            score: 0,
            ticks: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Advances the game by a single tick.
    pub(crate) fn tick(&mut self) -> Result<TickOutcome> {
        let body = SnakeBody::new(self.snake.clone()).context("snake lost its head")?;
        let direction = self.finder.get_next_move(&body, self.apple);
        let head = self.finder.board().step(body.head(), direction);
        let eats = head == self.apple;
        self.ticks += 1;

        // The tail only vacates its cell when the snake does not grow.
        let solid = if eats {
            &self.snake[..]
        } else {
            &self.snake[..self.snake.len() - 1]
        };
        if solid.contains(&head) {
            debug!(tick = self.ticks, %head, %direction, "snake collided with itself");
            return Ok(TickOutcome::Collided { at: head });
        }

        self.snake.insert(0, head);
        if !eats {
            let _ = self.snake.pop();
            return Ok(TickOutcome::Moved { direction });
        }

        self.score += 1;
        debug!(tick = self.ticks, score = self.score, %head, "snake ate the apple");

        match self.spawn_apple() {
            Some(apple) => {
                self.apple = apple;
                Ok(TickOutcome::Ate { direction })
            }
            None => Ok(TickOutcome::BoardFilled),
        }
    }

    /// Runs until the game ends or `max_ticks` ticks have elapsed.
    pub(crate) fn run(mut self, max_ticks: u32) -> Result<Summary> {
        let outcome = loop {
            if self.ticks >= max_ticks {
                break Outcome::TickLimit;
            }

            match self.tick()? {
                TickOutcome::Moved { direction } | TickOutcome::Ate { direction } => {
                    trace!(tick = self.ticks, %direction, "snake advanced");
                }
                TickOutcome::Collided { at } => break Outcome::Collided { at },
                TickOutcome::BoardFilled => break Outcome::BoardFilled,
            }
        };

        let summary = Summary {
            ticks: self.ticks,
            score: self.score,
            length: self.snake.len(),
            outcome,
        };
        info!(
            ticks = summary.ticks,
            score = summary.score,
            length = summary.length,
            outcome = %summary.outcome,
            "autoplay finished"
        );

        Ok(summary)
    }

    fn spawn_apple(&mut self) -> Option<CellCoord> {
        let free: Vec<_> = self
            .finder
            .board()
            .cells()
            .filter(|cell| !self.snake.contains(cell))
            .collect();
        free.choose(&mut self.rng).copied()
    }
}

/// Result of advancing a game by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// The snake moved without eating.
    Moved {
        /// Direction chosen by the pathfinder.
        direction: Direction,
    },
    /// The snake ate the apple and grew by one cell.
    Ate {
        /// Direction chosen by the pathfinder.
        direction: Direction,
    },
    /// The head ran into the body.
    Collided {
        /// Cell where the collision happened.
        at: CellCoord,
    },
    /// The snake covers every cell, so no apple can be placed.
    BoardFilled,
}

/// Reason a game stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The head ran into the body.
    Collided {
        /// Cell where the collision happened.
        at: CellCoord,
    },
    /// The snake filled the board.
    BoardFilled,
    /// The tick budget ran out.
    TickLimit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collided { at } => write!(f, "collided at {at}"),
            Self::BoardFilled => write!(f, "board filled"),
            Self::TickLimit => write!(f, "tick limit reached"),
        }
    }
}

/// Final statistics of an autoplay run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    /// Number of ticks played.
    pub(crate) ticks: u32,
    /// Number of apples eaten.
    pub(crate) score: u32,
    /// Length of the snake when the game stopped.
    pub(crate) length: usize,
    /// Reason the game stopped.
    pub(crate) outcome: Outcome,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ticks: {}, score: {}, length: {}, outcome: {}",
            self.ticks, self.score, self.length, self.outcome
        )
    }
}
