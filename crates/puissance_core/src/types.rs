//! Core domain types for connect-four.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows on the board (row 0 is the top row).
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLUMNS: usize = 7;

/// Number of aligned tokens needed to win.
pub const WIN_LENGTH: usize = 4;

/// Player in the game.
///
/// Red is always the human, Yellow is always the scripted opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Player {
    /// The human player (red tokens).
    Red,
    /// The scripted opponent (yellow tokens).
    Yellow,
}

impl Player {
    /// Returns the other player.
    #[instrument]
    pub fn other(self) -> Self {
        match self {
            Player::Red => Player::Yellow,
            Player::Yellow => Player::Red,
        }
    }

    /// Single-character symbol used in text renderings of the grid.
    pub fn symbol(self) -> char {
        match self {
            Player::Red => 'R',
            Player::Yellow => 'Y',
        }
    }
}

/// A cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No token.
    #[default]
    Empty,
    /// Holds a token of the given player.
    Occupied(Player),
}

impl Cell {
    /// Checks if the cell holds no token.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Returns the owner of the token in this cell, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }
}

/// A (row, column) pair on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row index, 0 at the top.
    pub row: usize,
    /// Column index, 0 at the left.
    pub column: usize,
}

impl Coord {
    /// Creates a new coordinate.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, column): (usize, usize)) -> Self {
        Self::new(row, column)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Geometric direction of an alignment, in win-detection priority order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Direction {
    /// Four tokens stacked in one column.
    Vertical,
    /// Four tokens side by side in one row.
    Horizontal,
    /// Bottom-left to top-right.
    RightDiagonal,
    /// Bottom-right to top-left.
    LeftDiagonal,
}

/// Four aligned, contiguous coordinates sharing one player's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinLine {
    direction: Direction,
    coords: [Coord; WIN_LENGTH],
}

impl WinLine {
    /// Creates a win line from coordinates in scan order.
    pub fn new(direction: Direction, coords: [Coord; WIN_LENGTH]) -> Self {
        Self { direction, coords }
    }

    /// Returns the direction of the alignment.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the four coordinates in the order the scanner found them.
    pub fn coords(&self) -> &[Coord; WIN_LENGTH] {
        &self.coords
    }

    /// Checks if the coordinate is part of this line.
    pub fn contains(&self, coord: Coord) -> bool {
        self.coords.contains(&coord)
    }
}

/// Classification of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Nobody has won and empty cells remain.
    InProgress,
    /// A player aligned four tokens.
    Win {
        /// The winner.
        player: Player,
        /// The first alignment found.
        line: WinLine,
    },
    /// The grid is full without any alignment.
    Draw,
}

impl Verdict {
    /// Returns true while the game can continue.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Verdict::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Verdict::Win { player, .. } => Some(*player),
            _ => None,
        }
    }

    /// Returns the winning line if there is one.
    pub fn line(&self) -> Option<&WinLine> {
        match self {
            Verdict::Win { line, .. } => Some(line),
            _ => None,
        }
    }

    /// Converts a terminal verdict into an outcome.
    pub fn outcome(&self) -> Option<Outcome> {
        match *self {
            Verdict::InProgress => None,
            Verdict::Win { player, line } => Some(Outcome::Win { player, line }),
            Verdict::Draw => Some(Outcome::Draw),
        }
    }
}

/// Outcome of a finished game.
///
/// Unlike [`Verdict`] this has no in-progress variant, so a finished
/// phase always carries a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A player won with the given line.
    Win {
        /// The winner.
        player: Player,
        /// The winning line.
        line: WinLine,
    },
    /// Full grid, no winner.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Win { player, .. } => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the game was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win { player, line } => {
                write!(f, "{} wins ({})", player, line.direction())
            }
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Phase of a game, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No starter chosen yet.
    AwaitingStart,
    /// The given player is to move.
    TurnOf(Player),
    /// The game is over.
    Finished(Outcome),
}

impl Phase {
    /// Returns true once a starter has been chosen.
    pub fn has_started(&self) -> bool {
        !matches!(self, Phase::AwaitingStart)
    }
}
