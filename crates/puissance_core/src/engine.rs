//! Move engine: validates a move, applies it and classifies the result.
//!
//! Game states are values. [`apply`] never mutates its input; it returns
//! the next state for the caller to keep or discard.

use super::action::{BoardError, Move, MoveError};
use super::{Grid, Phase, Player, Verdict, rules};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Complete game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The grid.
    grid: Grid,
    /// Player to move, `None` until a starter is chosen.
    current_player: Option<Player>,
    /// Classification of the grid.
    verdict: Verdict,
    /// Last token placed.
    last_move: Option<Move>,
}

impl GameState {
    /// Creates a neutral state: empty grid, nobody to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            current_player: None,
            verdict: Verdict::InProgress,
            last_move: None,
        }
    }

    /// Creates a fresh game with `first` to move.
    #[instrument]
    pub fn started(first: Player) -> Self {
        Self {
            current_player: Some(first),
            ..Self::new()
        }
    }

    /// Resumes a game from an existing grid with `to_move` on turn.
    ///
    /// The verdict is recomputed from the grid, so a grid that already
    /// holds a line resumes as a finished game.
    #[instrument(skip(grid))]
    pub fn resume(grid: Grid, to_move: Player) -> Self {
        Self {
            grid,
            current_player: Some(to_move),
            verdict: rules::evaluate(&grid),
            last_move: None,
        }
    }

    /// Returns the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Option<Player> {
        self.current_player
    }

    /// Returns the verdict.
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Returns the last move.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Returns true once the verdict is a win or a draw.
    pub fn is_over(&self) -> bool {
        !self.verdict.is_in_progress()
    }

    /// Derives the phase of the game.
    pub fn phase(&self) -> Phase {
        if let Some(outcome) = self.verdict.outcome() {
            return Phase::Finished(outcome);
        }
        match self.current_player {
            None => Phase::AwaitingStart,
            Some(player) => Phase::TurnOf(player),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a well-formed move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The token was placed; this is the next state.
    Placed(GameState),
    /// The column had no room. The move is ignored and the state unchanged.
    ColumnFull,
}

/// Applies `mover`'s token in `column`.
///
/// # Errors
///
/// - [`MoveError::NoActivePlayer`] before a starter is chosen
/// - [`MoveError::GameAlreadyOver`] once the verdict is terminal
/// - [`MoveError::NotYourTurn`] if `mover` is not the current player
/// - [`MoveError::InvalidColumn`] for an off-grid column
///
/// A full column is not an error: it yields [`MoveResult::ColumnFull`].
#[instrument(skip(state), fields(current = ?state.current_player))]
pub fn apply(state: &GameState, column: usize, mover: Player) -> Result<MoveResult, MoveError> {
    let current = state.current_player.ok_or(MoveError::NoActivePlayer)?;

    if state.is_over() {
        return Err(MoveError::GameAlreadyOver);
    }
    if mover != current {
        return Err(MoveError::NotYourTurn(mover));
    }

    let (grid, placed) = match state.grid.drop_token(column, mover) {
        Ok(dropped) => dropped,
        Err(BoardError::ColumnFull(_)) => {
            debug!(column, "Column full, move ignored");
            return Ok(MoveResult::ColumnFull);
        }
        Err(_) => return Err(MoveError::InvalidColumn(column)),
    };

    let verdict = rules::evaluate(&grid);
    let next_player = if verdict.is_in_progress() {
        mover.other()
    } else {
        mover
    };
    debug!(%placed, ?verdict, "Move applied");

    Ok(MoveResult::Placed(GameState {
        grid,
        current_player: Some(next_player),
        verdict,
        last_move: Some(placed),
    }))
}

/// Checks whether dropping `player`'s token in `column` would win.
///
/// Works on a scratch copy; `grid` is never altered.
///
/// # Errors
///
/// Returns [`BoardError::ColumnFull`] (or `InvalidColumn`) exactly like
/// [`Grid::drop_token`]. Callers treat that as "not a winning move".
#[instrument(skip(grid))]
pub fn simulate_drop(grid: &Grid, column: usize, player: Player) -> Result<bool, BoardError> {
    let (scratch, _) = grid.drop_token(column, player)?;
    Ok(rules::evaluate(&scratch).winner() == Some(player))
}
