//! Win detection logic for connect-four.
//!
//! Four directional scanners, each walking the grid in a fixed order and
//! reporting the first alignment it meets. [`find_winner`] applies them in
//! priority order: vertical, horizontal, right diagonal, left diagonal.

use super::super::{COLUMNS, Cell, Coord, Direction, Grid, Player, ROWS, WIN_LENGTH, WinLine};
use std::ops::Range;
use tracing::instrument;

/// Maps an anchor cell and an offset along the line to a coordinate.
type Step = fn(usize, usize, usize) -> Coord;

/// Returns the owner of the four coordinates if they all hold the same token.
fn aligned(grid: &Grid, coords: &[Coord; WIN_LENGTH]) -> Option<Player> {
    let first = grid.cell(coords[0].row, coords[0].column).player()?;
    coords[1..]
        .iter()
        .all(|c| grid.cell(c.row, c.column) == Cell::Occupied(first))
        .then_some(first)
}

/// Row-major scan over the anchor cells, first match wins.
fn scan(
    grid: &Grid,
    direction: Direction,
    rows: Range<usize>,
    columns: Range<usize>,
    step: Step,
) -> Option<(Player, WinLine)> {
    for row in rows {
        for column in columns.clone() {
            let coords = std::array::from_fn(|i| step(row, column, i));
            if let Some(player) = aligned(grid, &coords) {
                return Some((player, WinLine::new(direction, coords)));
            }
        }
    }
    None
}

/// Four tokens stacked in a column, reported from the anchor upward.
#[instrument(skip(grid))]
pub fn check_vertical(grid: &Grid) -> Option<(Player, WinLine)> {
    scan(
        grid,
        Direction::Vertical,
        WIN_LENGTH - 1..ROWS,
        0..COLUMNS,
        |row, column, i| Coord::new(row - i, column),
    )
}

/// Four tokens side by side in a row, reported left to right.
#[instrument(skip(grid))]
pub fn check_horizontal(grid: &Grid) -> Option<(Player, WinLine)> {
    scan(
        grid,
        Direction::Horizontal,
        0..ROWS,
        0..COLUMNS - WIN_LENGTH + 1,
        |row, column, i| Coord::new(row, column + i),
    )
}

/// Diagonal rising from bottom-left to top-right.
#[instrument(skip(grid))]
pub fn check_right_diagonal(grid: &Grid) -> Option<(Player, WinLine)> {
    scan(
        grid,
        Direction::RightDiagonal,
        WIN_LENGTH - 1..ROWS,
        0..COLUMNS - WIN_LENGTH + 1,
        |row, column, i| Coord::new(row - i, column + i),
    )
}

/// Diagonal rising from bottom-right to top-left.
#[instrument(skip(grid))]
pub fn check_left_diagonal(grid: &Grid) -> Option<(Player, WinLine)> {
    scan(
        grid,
        Direction::LeftDiagonal,
        WIN_LENGTH - 1..ROWS,
        WIN_LENGTH - 1..COLUMNS,
        |row, column, i| Coord::new(row - i, column - i),
    )
}

/// Checks if there is a winner on the grid.
///
/// When one grid holds alignments in several directions only the
/// highest-priority direction is reported.
#[instrument(skip(grid))]
pub fn find_winner(grid: &Grid) -> Option<(Player, WinLine)> {
    check_vertical(grid)
        .or_else(|| check_horizontal(grid))
        .or_else(|| check_right_diagonal(grid))
        .or_else(|| check_left_diagonal(grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(cells: [(usize, usize); 4]) -> [Coord; 4] {
        cells.map(Coord::from)
    }

    #[test]
    fn test_no_winner_empty_grid() {
        assert_eq!(find_winner(&Grid::new()), None);
    }

    #[test]
    fn test_vertical_reported_from_bottom() {
        let grid: Grid = "
            .......
            .......
            ..R....
            ..R....
            ..R....
            ..R....
        "
        .parse()
        .unwrap();

        let (player, line) = check_vertical(&grid).expect("Vertical line");
        assert_eq!(player, Player::Red);
        assert_eq!(line.direction(), Direction::Vertical);
        assert_eq!(line.coords(), &coords([(5, 2), (4, 2), (3, 2), (2, 2)]));
    }

    #[test]
    fn test_three_stacked_is_not_a_win() {
        let grid: Grid = "
            .......
            .......
            .......
            ......Y
            ......Y
            ......Y
        "
        .parse()
        .unwrap();
        assert_eq!(find_winner(&grid), None);
    }

    #[test]
    fn test_horizontal_left_to_right() {
        let grid: Grid = "
            .......
            .......
            .......
            .......
            .......
            ...YYYY
        "
        .parse()
        .unwrap();

        let (player, line) = check_horizontal(&grid).expect("Horizontal line");
        assert_eq!(player, Player::Yellow);
        assert_eq!(line.coords(), &coords([(5, 3), (5, 4), (5, 5), (5, 6)]));
    }

    #[test]
    fn test_right_diagonal() {
        let grid: Grid = "
            .......
            .......
            ...R...
            ..RY...
            .RYY...
            RYYR...
        "
        .parse()
        .unwrap();

        let (player, line) = find_winner(&grid).expect("Diagonal line");
        assert_eq!(player, Player::Red);
        assert_eq!(line.direction(), Direction::RightDiagonal);
        assert_eq!(line.coords(), &coords([(5, 0), (4, 1), (3, 2), (2, 3)]));
        assert_eq!(check_left_diagonal(&grid), None);
    }

    #[test]
    fn test_left_diagonal() {
        let grid: Grid = "
            .......
            .......
            ...Y...
            ...RY..
            ...RRY.
            ...RRRY
        "
        .parse()
        .unwrap();

        let (player, line) = find_winner(&grid).expect("Diagonal line");
        assert_eq!(player, Player::Yellow);
        assert_eq!(line.direction(), Direction::LeftDiagonal);
        assert_eq!(line.coords(), &coords([(5, 6), (4, 5), (3, 4), (2, 3)]));
    }

    #[test]
    fn test_vertical_takes_priority_over_horizontal() {
        // Red holds both a column and a row through (2, 0)
        let grid: Grid = "
            .......
            .......
            RRRR...
            RYYY...
            RYYR...
            RYYY...
        "
        .parse()
        .unwrap();

        let (_, line) = find_winner(&grid).expect("Winner");
        assert_eq!(line.direction(), Direction::Vertical);
        assert!(check_horizontal(&grid).is_some());
    }

    #[test]
    fn test_horizontal_scan_is_row_major() {
        // Two horizontal lines; the upper row is scanned first
        let grid: Grid = "
            .......
            .......
            .......
            .......
            YYYY...
            RRRRYRY
        "
        .parse()
        .unwrap();

        let (player, line) = check_horizontal(&grid).expect("Horizontal line");
        assert_eq!(player, Player::Yellow);
        assert_eq!(line.coords()[0], Coord::new(4, 0));
    }
}
