//! Opponent move selection.
//!
//! A deterministic three-tier heuristic with one ply of look-ahead:
//! win now if possible, otherwise block the other player's immediate win,
//! otherwise play a uniformly random playable column.

use super::engine::simulate_drop;
use super::{Grid, Player};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Which tier of the heuristic produced a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Tier {
    /// The column wins the game immediately.
    WinNow,
    /// The column denies the other player an immediate win.
    Block,
    /// No tactical column exists; chosen at random.
    Random,
}

/// A chosen column and the tier that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Column to play.
    pub column: usize,
    /// Tier that selected the column.
    pub tier: Tier,
}

/// Error raised when no column can be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum StrategyError {
    /// Every column is full.
    #[display("No playable column left")]
    NoPlayableColumn,
}

impl std::error::Error for StrategyError {}

/// First playable column where `player` would win, in ascending order.
fn first_winning_column(grid: &Grid, playable: &[usize], player: Player) -> Option<usize> {
    playable
        .iter()
        .copied()
        .find(|&column| simulate_drop(grid, column, player).unwrap_or(false))
}

/// Chooses a column for `me`.
///
/// Only the fallback tier consumes randomness, so with a seeded `rng`
/// the whole decision is reproducible.
///
/// # Errors
///
/// Returns [`StrategyError::NoPlayableColumn`] if the grid is full.
#[instrument(skip(grid, rng))]
pub fn choose_column(
    grid: &Grid,
    me: Player,
    rng: &mut impl Rng,
) -> Result<Decision, StrategyError> {
    let playable = grid.playable_columns();
    if playable.is_empty() {
        return Err(StrategyError::NoPlayableColumn);
    }

    let decision = if let Some(column) = first_winning_column(grid, &playable, me) {
        Decision {
            column,
            tier: Tier::WinNow,
        }
    } else if let Some(column) = first_winning_column(grid, &playable, me.other()) {
        Decision {
            column,
            tier: Tier::Block,
        }
    } else {
        let column = *playable
            .choose(rng)
            .ok_or(StrategyError::NoPlayableColumn)?;
        Decision {
            column,
            tier: Tier::Random,
        }
    };

    debug!(column = decision.column, tier = %decision.tier, "Opponent decided");
    Ok(decision)
}
