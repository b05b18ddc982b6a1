//! Puissance core - pure connect-four game logic
//!
//! Everything here is a pure function over immutable values. The
//! controller crate owns the live game and drives these functions.
//!
//! # Architecture
//!
//! - **Board**: 6x7 grid value and the gravity-drop primitive
//! - **Rules**: directional win scanners, draw check, `evaluate`
//! - **Engine**: move validation and application, win simulation
//! - **Strategy**: the opponent's win / block / random heuristic
//!
//! # Example
//!
//! ```
//! use puissance_core::{GameState, MoveResult, Player, engine};
//!
//! let game = GameState::started(Player::Red);
//! let MoveResult::Placed(game) = engine::apply(&game, 3, Player::Red)? else {
//!     unreachable!("an empty column always has room");
//! };
//! assert_eq!(game.current_player(), Some(Player::Yellow));
//! # Ok::<(), puissance_core::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
pub mod engine;
pub mod rules;
pub mod strategy;
mod types;

pub use action::{BoardError, Move, MoveError};
pub use board::Grid;
pub use engine::{GameState, MoveResult};
pub use strategy::{Decision, StrategyError, Tier};
pub use types::{
    COLUMNS, Cell, Coord, Direction, Outcome, Phase, Player, ROWS, Verdict, WIN_LENGTH, WinLine,
};
