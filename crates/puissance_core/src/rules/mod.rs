//! Game rules for connect-four.
//!
//! This module contains pure functions for evaluating a grid. Rules are
//! separated from grid storage so the move engine and the opponent's
//! look-ahead share one definition of a win.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::find_winner;

use super::{Grid, Verdict};
use tracing::instrument;

/// Classifies a grid: a win in priority order, then a draw, else in progress.
#[instrument(skip(grid))]
pub fn evaluate(grid: &Grid) -> Verdict {
    if let Some((player, line)) = find_winner(grid) {
        return Verdict::Win { player, line };
    }
    if is_full(grid) {
        return Verdict::Draw;
    }
    Verdict::InProgress
}
