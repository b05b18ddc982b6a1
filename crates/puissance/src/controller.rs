//! Live game controller.
//!
//! The controller is the only writer of the game state. Commands and the
//! opponent's timer wake-ups are processed one at a time, so a human move
//! and an opponent move never interleave.
//!
//! Entering the opponent's turn spawns a timer task that sleeps for the
//! configured delay and then posts a wake-up tagged with a turn number.
//! The task is aborted on reset and whenever the game leaves that turn,
//! and a wake-up whose tag does not match the pending turn is discarded.

use crate::config::GameConfig;
use crate::events::{GameEvent, Notice, Snapshot};
use crate::{HUMAN, OPPONENT};
use puissance_core::{GameState, MoveError, MoveResult, Outcome, Phase, Player, engine, strategy};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Wake-up posted by the opponent timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpponentDue {
    turn: u64,
}

/// The scheduled opponent move.
#[derive(Debug)]
struct PendingOpponentMove {
    turn: u64,
    handle: JoinHandle<()>,
}

/// Commands accepted by a running controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Choose who plays first.
    SelectStarter(Player),
    /// Human drops a token in a column (0-based).
    Play(usize),
    /// Abandon the current game.
    Reset,
    /// Stop the controller.
    Shutdown,
}

/// Error returned when the controller task is no longer running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Game controller has stopped")]
pub struct ControllerStopped;

/// Cloneable sender for controller commands.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl ControllerHandle {
    fn send(&self, command: Command) -> Result<(), ControllerStopped> {
        self.commands.send(command).map_err(|_| ControllerStopped)
    }

    /// Chooses who plays first.
    pub fn select_starter(&self, player: Player) -> Result<(), ControllerStopped> {
        self.send(Command::SelectStarter(player))
    }

    /// Plays a human move.
    pub fn play(&self, column: usize) -> Result<(), ControllerStopped> {
        self.send(Command::Play(column))
    }

    /// Resets the game.
    pub fn reset(&self) -> Result<(), ControllerStopped> {
        self.send(Command::Reset)
    }

    /// Stops the controller.
    pub fn shutdown(&self) -> Result<(), ControllerStopped> {
        self.send(Command::Shutdown)
    }
}

/// Owns the live game and drives the opponent.
pub struct GameController {
    state: GameState,
    rng: StdRng,
    opponent_delay: Duration,
    events: mpsc::UnboundedSender<GameEvent>,
    wake_tx: mpsc::UnboundedSender<OpponentDue>,
    wake_rx: mpsc::UnboundedReceiver<OpponentDue>,
    pending: Option<PendingOpponentMove>,
    turn: u64,
}

impl GameController {
    /// Creates a controller awaiting a starter.
    pub fn new(
        opponent_delay: Duration,
        rng: StdRng,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        let (wake_tx, wake_rx) = mpsc::unbounded_channel();
        Self {
            state: GameState::new(),
            rng,
            opponent_delay,
            events,
            wake_tx,
            wake_rx,
            pending: None,
            turn: 0,
        }
    }

    /// Creates a controller from configuration.
    ///
    /// The opponent's random source is seeded from the config when a seed
    /// is set, from entropy otherwise.
    #[instrument(skip_all, fields(delay_ms = config.opponent_delay_ms(), seed = ?config.seed()))]
    pub fn from_config(config: &GameConfig, events: mpsc::UnboundedSender<GameEvent>) -> Self {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(*seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config.opponent_delay(), rng, events)
    }

    /// Returns a snapshot of the game.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.state)
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Returns true while an opponent move is scheduled.
    pub fn has_pending_opponent_move(&self) -> bool {
        self.pending.is_some()
    }

    /// Chooses who plays first. Ignored once a game has started.
    #[instrument(skip(self))]
    pub fn select_starter(&mut self, starter: Player) {
        if self.state.phase() != Phase::AwaitingStart {
            debug!(phase = ?self.state.phase(), "Starter already chosen, ignoring");
            return;
        }

        self.state = GameState::started(starter);
        info!(%starter, "Game started");
        self.publish_state();
        self.schedule_opponent_if_due();
    }

    /// Returns to the neutral state, cancelling any scheduled opponent move.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.state = GameState::new();
        info!("Game reset");
        self.publish_state();
        self.emit(GameEvent::Notice(Notice::ChooseStarter));
    }

    /// Plays a human move in `column` (0-based).
    #[instrument(skip(self))]
    pub fn play(&mut self, column: usize) {
        self.play_as(HUMAN, column);
    }

    fn play_as(&mut self, mover: Player, column: usize) {
        match engine::apply(&self.state, column, mover) {
            Ok(MoveResult::Placed(next)) => self.advance(next),
            Ok(MoveResult::ColumnFull) => {
                debug!(%mover, column, "Column full, move ignored");
            }
            Err(MoveError::NoActivePlayer) => {
                self.emit(GameEvent::Notice(Notice::ChooseStarterFirst));
            }
            Err(MoveError::GameAlreadyOver) => {
                self.emit(GameEvent::StopAmbientAudio);
                self.emit(GameEvent::Notice(Notice::ResetToPlayAgain));
            }
            Err(MoveError::NotYourTurn(_)) => {
                debug!(%mover, "Move out of turn rejected");
                self.emit(GameEvent::Notice(Notice::NotYourTurn));
            }
            Err(MoveError::InvalidColumn(column)) => {
                self.emit(GameEvent::Notice(Notice::InvalidColumn(column)));
            }
        }
    }

    fn advance(&mut self, next: GameState) {
        // Any scheduled move belonged to the turn that just ended
        self.cancel_pending();
        self.state = next;

        if let Some(placed) = self.state.last_move() {
            self.emit(GameEvent::TokenPlaced(placed));
        }
        self.publish_state();

        match self.state.phase() {
            Phase::Finished(outcome) => self.finish(outcome),
            _ => self.schedule_opponent_if_due(),
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        info!(%outcome, "Game over");
        self.emit(GameEvent::StopAmbientAudio);
        match outcome {
            Outcome::Win { player, line } if player == HUMAN => {
                self.emit(GameEvent::HumanWon(line));
                self.emit(GameEvent::Notice(Notice::HumanWon));
            }
            Outcome::Win { line, .. } => {
                self.emit(GameEvent::OpponentWon(line));
                self.emit(GameEvent::Notice(Notice::OpponentWon));
            }
            Outcome::Draw => {
                self.emit(GameEvent::Draw);
                self.emit(GameEvent::Notice(Notice::Draw));
            }
        }
    }

    fn schedule_opponent_if_due(&mut self) {
        if self.state.phase() != Phase::TurnOf(OPPONENT) {
            return;
        }

        self.cancel_pending();
        self.turn += 1;
        let turn = self.turn;
        let deadline = Instant::now() + self.opponent_delay;
        let wake = self.wake_tx.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if wake.send(OpponentDue { turn }).is_err() {
                debug!(turn, "Controller gone, wake-up dropped");
            }
        });

        debug!(turn, delay_ms = self.opponent_delay.as_millis() as u64, "Opponent move scheduled");
        self.pending = Some(PendingOpponentMove { turn, handle });
        self.emit(GameEvent::OpponentThinking);
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(turn = pending.turn, "Cancelling scheduled opponent move");
            pending.handle.abort();
        }
    }

    fn on_opponent_due(&mut self, due: OpponentDue) {
        match &self.pending {
            Some(pending) if pending.turn == due.turn => {}
            _ => {
                debug!(turn = due.turn, "Discarding stale opponent wake-up");
                return;
            }
        }
        self.pending = None;

        if self.state.phase() != Phase::TurnOf(OPPONENT) {
            warn!(phase = ?self.state.phase(), "Opponent woke outside its turn");
            return;
        }

        match strategy::choose_column(self.state.grid(), OPPONENT, &mut self.rng) {
            Ok(decision) => {
                info!(column = decision.column, tier = %decision.tier, "Opponent plays");
                self.play_as(OPPONENT, decision.column);
            }
            Err(e) => error!(error = %e, "Opponent has no move"),
        }
    }

    /// Waits for the scheduled opponent move and plays it.
    ///
    /// Returns false when nothing was scheduled. Used by drivers that own
    /// the controller directly instead of running it as a task.
    pub async fn wait_for_opponent(&mut self) -> bool {
        while self.pending.is_some() {
            let Some(due) = self.wake_rx.recv().await else {
                return false;
            };
            let current = self.pending.as_ref().is_some_and(|p| p.turn == due.turn);
            self.on_opponent_due(due);
            if current {
                return true;
            }
        }
        false
    }

    fn publish_state(&self) {
        self.emit(GameEvent::StateChanged(self.snapshot()));
    }

    fn emit(&self, event: GameEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }

    /// Spawns the controller as a task and returns its command handle.
    pub fn start(self) -> (ControllerHandle, JoinHandle<()>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(commands_rx));
        (
            ControllerHandle {
                commands: commands_tx,
            },
            task,
        )
    }

    /// Processes commands and opponent wake-ups until shutdown.
    ///
    /// Publishes the initial state and the starter prompt first.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        info!("Controller running");
        self.publish_state();
        self.emit(GameEvent::Notice(Notice::ChooseStarter));

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::SelectStarter(player)) => self.select_starter(player),
                    Some(Command::Play(column)) => self.play(column),
                    Some(Command::Reset) => self.reset(),
                    Some(Command::Shutdown) | None => break,
                },
                Some(due) = self.wake_rx.recv() => self.on_opponent_due(due),
            }
        }

        self.cancel_pending();
        info!("Controller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puissance_core::{Cell, Grid, Move};

    fn controller() -> (GameController, mpsc::UnboundedReceiver<GameEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller =
            GameController::new(Duration::from_millis(1000), StdRng::seed_from_u64(1), tx);
        (controller, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn resume(controller: &mut GameController, grid: &str, to_move: Player) {
        let grid: Grid = grid.parse().unwrap();
        controller.state = GameState::resume(grid, to_move);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_before_starter_prompts_for_starter() {
        let (mut controller, mut rx) = controller();
        controller.play(3);
        assert_eq!(controller.phase(), Phase::AwaitingStart);
        assert_eq!(
            drain(&mut rx),
            vec![GameEvent::Notice(Notice::ChooseStarterFirst)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_move_schedules_opponent() {
        let (mut controller, mut rx) = controller();
        controller.select_starter(HUMAN);
        assert!(!controller.has_pending_opponent_move());

        controller.play(3);
        assert_eq!(controller.phase(), Phase::TurnOf(OPPONENT));
        assert!(controller.has_pending_opponent_move());

        let events = drain(&mut rx);
        assert!(matches!(events[0], GameEvent::StateChanged(_)));
        assert_eq!(events[1], GameEvent::TokenPlaced(Move::new(HUMAN, 3, 5)));
        assert!(matches!(events[2], GameEvent::StateChanged(_)));
        assert_eq!(events[3], GameEvent::OpponentThinking);

        assert!(controller.wait_for_opponent().await);
        assert_eq!(controller.phase(), Phase::TurnOf(HUMAN));
        assert!(!controller.has_pending_opponent_move());
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_rejected_during_opponent_turn() {
        let (mut controller, mut rx) = controller();
        controller.select_starter(OPPONENT);
        drain(&mut rx);

        controller.play(0);
        assert_eq!(drain(&mut rx), vec![GameEvent::Notice(Notice::NotYourTurn)]);
        assert_eq!(controller.snapshot().grid().empty_cells(), 42);
        assert!(controller.has_pending_opponent_move());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_opponent() {
        let (mut controller, mut rx) = controller();
        controller.select_starter(OPPONENT);
        assert!(controller.has_pending_opponent_move());

        controller.reset();
        assert!(!controller.has_pending_opponent_move());
        assert!(!controller.wait_for_opponent().await);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(controller.phase(), Phase::AwaitingStart);
        assert!(controller.wake_rx.try_recv().is_err());
        assert!(
            !drain(&mut rx)
                .iter()
                .any(|e| matches!(e, GameEvent::TokenPlaced(_)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_wake_up_is_discarded() {
        let (mut controller, _rx) = controller();
        controller.select_starter(OPPONENT);
        let stale = OpponentDue {
            turn: controller.turn,
        };
        controller.reset();
        controller.select_starter(OPPONENT);

        controller.on_opponent_due(stale);
        assert_eq!(controller.snapshot().grid().empty_cells(), 42);
        assert!(controller.has_pending_opponent_move());

        assert!(controller.wait_for_opponent().await);
        assert_eq!(controller.snapshot().grid().empty_cells(), 41);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_column_is_ignored() {
        let (mut controller, mut rx) = controller();
        resume(
            &mut controller,
            "
            R......
            Y......
            R......
            Y......
            R......
            Y......
            ",
            HUMAN,
        );
        let before = controller.snapshot();

        controller.play(0);
        assert_eq!(controller.snapshot(), before);
        assert!(drain(&mut rx).is_empty());
        assert!(!controller.has_pending_opponent_move());
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_win_event_order() {
        let (mut controller, mut rx) = controller();
        resume(
            &mut controller,
            "
            .......
            .......
            .......
            ..R....
            ..R....
            ..R.YY.
            ",
            HUMAN,
        );

        controller.play(2);
        let events = drain(&mut rx);
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], GameEvent::TokenPlaced(_)));
        assert!(matches!(events[1], GameEvent::StateChanged(_)));
        assert_eq!(events[2], GameEvent::StopAmbientAudio);
        assert!(matches!(events[3], GameEvent::HumanWon(_)));
        assert_eq!(events[4], GameEvent::Notice(Notice::HumanWon));
        assert!(!controller.has_pending_opponent_move());
    }

    #[tokio::test(start_paused = true)]
    async fn test_opponent_completes_its_line() {
        let (mut controller, mut rx) = controller();
        resume(
            &mut controller,
            "
            .......
            .......
            .......
            .......
            R......
            RR.YYY.
            ",
            HUMAN,
        );

        // Red stacks a third token instead of blocking the bottom row
        controller.play(0);
        assert!(controller.wait_for_opponent().await);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.grid().cell(5, 2), Cell::Occupied(OPPONENT));
        assert!(matches!(
            snapshot.phase(),
            Phase::Finished(Outcome::Win { player, .. }) if *player == OPPONENT
        ));

        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(e, GameEvent::OpponentWon(_))));
        assert_eq!(
            events.last(),
            Some(&GameEvent::Notice(Notice::OpponentWon))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_after_finish_reminds_reset() {
        let (mut controller, mut rx) = controller();
        resume(
            &mut controller,
            "
            .......
            .......
            .......
            .......
            .......
            RRRR...
            ",
            HUMAN,
        );

        controller.play(5);
        assert_eq!(
            drain(&mut rx),
            vec![
                GameEvent::StopAmbientAudio,
                GameEvent::Notice(Notice::ResetToPlayAgain)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_starter_ignored_mid_game() {
        let (mut controller, _rx) = controller();
        controller.select_starter(HUMAN);
        controller.play(3);
        controller.select_starter(HUMAN);
        assert_eq!(controller.phase(), Phase::TurnOf(OPPONENT));
        assert_eq!(controller.snapshot().grid().empty_cells(), 41);
    }
}
