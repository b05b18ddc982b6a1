//! Moves and the errors raised while placing them.
//!
//! A move is only meaningful relative to the grid it was played on:
//! the landing row is resolved by gravity at placement time.

use super::{Coord, Player};
use serde::{Deserialize, Serialize};

/// A token placed by a player, with its resolved landing cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player who placed the token.
    pub player: Player,
    /// Column the token was dropped into.
    pub column: usize,
    /// Row the token settled in.
    pub row: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: Player, column: usize, row: usize) -> Self {
        Self {
            player,
            column,
            row,
        }
    }

    /// Returns the landing cell.
    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.column)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> column {} (row {})", self.player, self.column, self.row)
    }
}

/// Error raised by the placement primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// The column has no empty cell left.
    #[display("Column {} is full", _0)]
    ColumnFull(usize),

    /// The column index is outside the grid.
    #[display("Column {} is outside the grid", _0)]
    InvalidColumn(usize),

    /// A parsed token sits above an empty cell.
    #[display("Token at {} is floating above an empty cell", _0)]
    FloatingToken(Coord),

    /// A parsed grid has the wrong shape or an unknown symbol.
    #[display("Malformed grid: {}", _0)]
    Malformed(&'static str),
}

impl std::error::Error for BoardError {}

/// Error that can occur when applying a move to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// No starter has been chosen yet.
    #[display("No active player, choose who starts first")]
    NoActivePlayer,

    /// The game is already over.
    #[display("Game is already over")]
    GameAlreadyOver,

    /// It's not this player's turn.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Player),

    /// The column index is outside the grid.
    #[display("Column {} is outside the grid", _0)]
    InvalidColumn(usize),
}

impl std::error::Error for MoveError {}
