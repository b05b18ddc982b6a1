//! Messages sent from the game controller to its collaborators.

use derive_getters::Getters;
use puissance_core::{GameState, Grid, Move, Phase, Verdict, WinLine};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Immutable view of the game, published after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Snapshot {
    /// The grid.
    grid: Grid,
    /// Current phase.
    phase: Phase,
    /// Classification of the grid.
    verdict: Verdict,
    /// Cells to highlight, present only after a win.
    winning_line: Option<WinLine>,
    /// Last token placed.
    last_move: Option<Move>,
}

impl Snapshot {
    /// Captures the view-relevant parts of a game state.
    #[instrument(skip(state))]
    pub fn of(state: &GameState) -> Self {
        Self {
            grid: *state.grid(),
            phase: state.phase(),
            verdict: *state.verdict(),
            winning_line: state.verdict().line().copied(),
            last_move: state.last_move(),
        }
    }
}

/// User-facing status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Notice {
    /// Shown while no starter is selected.
    #[display("Select who plays first.")]
    ChooseStarter,
    /// A column was played before a starter was selected.
    #[display("Choose who starts first!")]
    ChooseStarterFirst,
    /// A column was played after the game ended.
    #[display("Press reset to start a new game.")]
    ResetToPlayAgain,
    /// The human played during the opponent's turn.
    #[display("Wait for your turn.")]
    NotYourTurn,
    /// The column index was off the grid.
    #[display("There is no column {}.", _0 + 1)]
    InvalidColumn(usize),
    /// The human won.
    #[display("You won!!!")]
    HumanWon,
    /// The opponent won.
    #[display("You lost!!!")]
    OpponentWon,
    /// Nobody won.
    #[display("Draw.")]
    Draw,
}

/// Events emitted by the controller, in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum GameEvent {
    /// Game state updated.
    StateChanged(Snapshot),
    /// A token landed.
    TokenPlaced(Move),
    /// The opponent's delayed move is scheduled.
    OpponentThinking,
    /// The human completed a line.
    HumanWon(WinLine),
    /// The opponent completed a line.
    OpponentWon(WinLine),
    /// The grid filled with no line.
    Draw,
    /// Ambient music must stop.
    StopAmbientAudio,
    /// Status message for the view.
    Notice(Notice),
}

#[cfg(test)]
mod tests {
    use super::*;
    use puissance_core::{MoveResult, Player, engine};

    #[test]
    fn test_snapshot_of_neutral_state() {
        let snapshot = Snapshot::of(&GameState::new());
        assert_eq!(*snapshot.phase(), Phase::AwaitingStart);
        assert_eq!(*snapshot.verdict(), Verdict::InProgress);
        assert!(snapshot.winning_line().is_none());
        assert!(snapshot.last_move().is_none());
    }

    #[test]
    fn test_snapshot_tracks_last_move() {
        let state = GameState::started(Player::Red);
        let Ok(MoveResult::Placed(state)) = engine::apply(&state, 4, Player::Red) else {
            panic!("Move should land");
        };
        let snapshot = Snapshot::of(&state);
        assert_eq!(*snapshot.last_move(), Some(Move::new(Player::Red, 4, 5)));
        assert_eq!(*snapshot.phase(), Phase::TurnOf(Player::Yellow));
    }

    #[test]
    fn test_invalid_column_notice_is_one_based() {
        assert_eq!(Notice::InvalidColumn(7).to_string(), "There is no column 8.");
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(GameEvent::Notice(Notice::Draw)).unwrap();
        assert_eq!(json["event"], "Notice");
        assert_eq!(json["data"], "Draw");
    }
}
