//! Draw detection logic for connect-four.

use super::super::Grid;
use tracing::instrument;

/// Checks if the grid is full (every cell holds a token).
///
/// A full grid with no winner is a draw.
#[instrument(skip(grid))]
pub fn is_full(grid: &Grid) -> bool {
    grid.rows().iter().flatten().all(|cell| !cell.is_empty())
}
