//! The 6x7 grid and the gravity-drop placement primitive.

use super::action::{BoardError, Move};
use super::types::{COLUMNS, Cell, Coord, Player, ROWS};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Immutable 6x7 connect-four grid.
///
/// Row 0 is the top row, row 5 the bottom row. Cells are only ever
/// filled through [`Grid::drop_token`], so non-empty cells in a column
/// are always contiguous from the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Cell; COLUMNS]; ROWS],
}

impl Grid {
    /// Creates an empty grid.
    #[instrument]
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLUMNS]; ROWS],
        }
    }

    /// Returns the cell at the given coordinate, or `None` if off-grid.
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.cells
            .get(coord.row)
            .and_then(|row| row.get(coord.column))
            .copied()
    }

    /// Returns the cell at (row, column).
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is off-grid. Scanners only call this
    /// with in-range indices.
    pub fn cell(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    /// Returns all rows, top to bottom.
    pub fn rows(&self) -> &[[Cell; COLUMNS]; ROWS] {
        &self.cells
    }

    /// Row where a token dropped into `column` would land.
    fn landing_row(&self, column: usize) -> Option<usize> {
        (0..ROWS).rev().find(|&row| self.cells[row][column].is_empty())
    }

    /// Drops a token into a column, returning the new grid and the move.
    ///
    /// The column is scanned from the bottom row upward and the first
    /// empty cell receives the token. `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnFull`] if the column has no empty cell
    /// and [`BoardError::InvalidColumn`] if it is off-grid.
    #[instrument(skip(self))]
    pub fn drop_token(&self, column: usize, player: Player) -> Result<(Grid, Move), BoardError> {
        if column >= COLUMNS {
            return Err(BoardError::InvalidColumn(column));
        }

        let row = self
            .landing_row(column)
            .ok_or(BoardError::ColumnFull(column))?;

        let mut next = *self;
        next.cells[row][column] = Cell::Occupied(player);
        trace!(row, column, %player, "Token landed");

        Ok((next, Move::new(player, column, row)))
    }

    /// Checks if a token can still be dropped into the column.
    pub fn is_playable(&self, column: usize) -> bool {
        column < COLUMNS && self.cells[0][column].is_empty()
    }

    /// Columns whose top cell is empty, in ascending order.
    #[instrument(skip(self))]
    pub fn playable_columns(&self) -> Vec<usize> {
        (0..COLUMNS).filter(|&column| self.is_playable(column)).collect()
    }

    /// Number of empty cells left.
    pub fn empty_cells(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_empty())
            .count()
    }

    /// Checks if every cell holds a token.
    pub fn is_full(&self) -> bool {
        self.empty_cells() == 0
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses six rows of `.`, `R` and `Y`, top row first.
///
/// Tokens are replayed through [`Grid::drop_token`] bottom-up, so a grid
/// with a floating token is rejected rather than constructed.
impl std::str::FromStr for Grid {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect())
            .collect();

        if rows.len() != ROWS {
            return Err(BoardError::Malformed("expected 6 rows"));
        }
        if rows.iter().any(|row| row.len() != COLUMNS) {
            return Err(BoardError::Malformed("expected 7 cells per row"));
        }

        let mut grid = Grid::new();
        for column in 0..COLUMNS {
            let mut seen_gap = false;
            for row in (0..ROWS).rev() {
                let player = match rows[row][column] {
                    '.' => {
                        seen_gap = true;
                        continue;
                    }
                    'R' | 'r' => Player::Red,
                    'Y' | 'y' => Player::Yellow,
                    _ => return Err(BoardError::Malformed("unknown cell symbol")),
                };
                if seen_gap {
                    return Err(BoardError::FloatingToken(Coord::new(row, column)));
                }
                grid = grid.drop_token(column, player)?.0;
            }
        }

        Ok(grid)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            let line = row
                .iter()
                .map(|cell| cell.player().map_or('.', Player::symbol).to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        let labels = (1..=COLUMNS)
            .map(|column| column.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", labels)
    }
}
