//! Line-based terminal front end.

use crate::audio::SoundBoard;
use crate::config::Starter;
use crate::controller::ControllerHandle;
use crate::events::{GameEvent, Notice, Snapshot};
use anyhow::{Context, Result};
use puissance_core::{COLUMNS, Coord, Phase, ROWS};
use std::str::FromStr;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// How to play, shown on request.
pub const RULES: &str = "\
Goal: line up 4 tokens of your colour (horizontally, vertically or
diagonally) before the computer.

Play: choose who starts, then drop your tokens in turn. The computer
(yellow tokens) will try to block you!

End: if the grid fills up with no line of four, the game is a draw.
Press reset to try your luck again.";

/// A parsed line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Drop a token in a column (0-based).
    Column(usize),
    /// Choose who starts.
    Starter(Starter),
    /// Start over.
    Reset,
    /// Turn the token sound on or off.
    ToggleTokenSound,
    /// Start or pause the ambient music.
    ToggleMusic,
    /// Print the rules.
    Rules,
    /// Leave the game.
    Quit,
}

/// Error for input lines that mean nothing.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Unrecognized input: {:?}", input)]
pub struct InputError {
    /// The offending line, trimmed.
    pub input: String,
}

impl FromStr for Input {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let input = match trimmed.to_ascii_lowercase().as_str() {
            "h" | "human" | "me" => Input::Starter(Starter::Human),
            "o" | "opponent" | "cpu" => Input::Starter(Starter::Opponent),
            "r" | "reset" => Input::Reset,
            "s" | "sound" => Input::ToggleTokenSound,
            "m" | "music" => Input::ToggleMusic,
            "?" | "rules" | "help" => Input::Rules,
            "q" | "quit" | "exit" => Input::Quit,
            other => match other.parse::<usize>() {
                // Columns are numbered from 1 for people
                Ok(column) if column >= 1 => Input::Column(column - 1),
                _ => {
                    return Err(InputError {
                        input: trimmed.to_string(),
                    });
                }
            },
        };
        Ok(input)
    }
}

/// Renders a snapshot as text.
///
/// Winning cells are bracketed and the last token is parenthesized.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for row in 0..ROWS {
        for column in 0..COLUMNS {
            let coord = Coord::new(row, column);
            let symbol = snapshot
                .grid()
                .cell(row, column)
                .player()
                .map_or('.', |p| p.symbol());
            let winning = snapshot
                .winning_line()
                .is_some_and(|line| line.contains(coord));
            let last = snapshot.last_move().is_some_and(|m| m.coord() == coord);

            let cell = if winning {
                format!("[{}]", symbol)
            } else if last {
                format!("({})", symbol)
            } else {
                format!(" {} ", symbol)
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    for column in 1..=COLUMNS {
        out.push_str(&format!(" {} ", column));
    }
    out
}

/// Prompt for the given phase.
///
/// Starter choice is offered only before a game starts; reset and sound
/// controls only once it has.
pub fn prompt(phase: &Phase) -> &'static str {
    match phase {
        Phase::AwaitingStart => "Who starts? [h] me  [o] the computer   ([?] rules, [q] quit)",
        Phase::TurnOf(player) if *player == crate::HUMAN => {
            "Your move: column 1-7   ([r] reset, [s] token sound, [m] music, [?] rules, [q] quit)"
        }
        Phase::TurnOf(_) => "The computer is thinking...",
        Phase::Finished(_) => "[r] reset to play again   ([s] token sound, [m] music, [q] quit)",
    }
}

/// Text front end state: sound board and output mode.
#[derive(Debug)]
pub struct TerminalView {
    sound: SoundBoard,
    json_events: bool,
    phase: Phase,
}

impl TerminalView {
    /// Creates a view.
    pub fn new(token_sound: bool, json_events: bool) -> Self {
        Self {
            sound: SoundBoard::new(token_sound),
            json_events,
            phase: Phase::AwaitingStart,
        }
    }

    /// Returns the sound board.
    pub fn sound(&self) -> &SoundBoard {
        &self.sound
    }

    /// Returns the last phase seen.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Renders one event to output lines.
    ///
    /// Every event passes through the sound board. In JSON mode each event
    /// is one JSON line; otherwise only state changes and notices print.
    #[instrument(skip_all)]
    pub fn render_event(&mut self, event: &GameEvent) -> Result<Vec<String>> {
        let cue = self.sound.handle(event);
        if let GameEvent::StateChanged(snapshot) = event {
            self.phase = *snapshot.phase();
        }

        if self.json_events {
            let line = serde_json::to_string(event).context("Failed to encode event")?;
            return Ok(vec![line]);
        }

        let mut lines = Vec::new();
        match event {
            GameEvent::StateChanged(snapshot) => {
                lines.push(render_snapshot(snapshot));
                lines.push(prompt(snapshot.phase()).to_string());
            }
            GameEvent::Notice(notice) => lines.push(format!(">> {}", notice)),
            _ => {}
        }
        if let Some(cue) = cue {
            debug!(%cue, "Cue for terminal");
        }
        Ok(lines)
    }

    /// Applies a local input, returning lines to print.
    ///
    /// Inputs that concern the game are forwarded to the controller.
    #[instrument(skip(self, handle))]
    pub fn apply_input(&mut self, input: Input, handle: &ControllerHandle) -> Result<Vec<String>> {
        let lines = match input {
            Input::Column(column) => {
                handle.play(column)?;
                Vec::new()
            }
            Input::Starter(starter) => {
                handle.select_starter(starter.player())?;
                Vec::new()
            }
            Input::Reset => {
                handle.reset()?;
                Vec::new()
            }
            Input::ToggleTokenSound if self.phase.has_started() => {
                let on = self.sound.toggle_token_sound();
                vec![format!("Token sound {}", if on { "on" } else { "off" })]
            }
            Input::ToggleMusic if self.phase.has_started() => {
                let on = self.sound.toggle_ambient();
                vec![format!("Music {}", if on { "on" } else { "off" })]
            }
            Input::ToggleTokenSound | Input::ToggleMusic => {
                vec![Notice::ChooseStarterFirst.to_string()]
            }
            Input::Rules => vec![RULES.to_string()],
            Input::Quit => {
                handle.shutdown()?;
                Vec::new()
            }
        };
        Ok(lines)
    }
}

/// Reads stdin lines on a dedicated thread.
///
/// A detached thread keeps a pending blocking read from holding up runtime
/// shutdown after the user quits.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Runs the terminal loop until the user quits or input ends.
#[instrument(skip_all)]
pub async fn run(
    mut view: TerminalView,
    handle: ControllerHandle,
    mut events: mpsc::UnboundedReceiver<GameEvent>,
) -> Result<()> {
    let mut lines = spawn_stdin_reader();
    info!("Terminal ready");

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("Input closed");
                    handle.shutdown()?;
                    break;
                };
                let line = line.context("Failed to read input")?;
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Input>() {
                    Ok(Input::Quit) => {
                        view.apply_input(Input::Quit, &handle)?;
                        break;
                    }
                    Ok(input) => {
                        for out in view.apply_input(input, &handle)? {
                            println!("{}", out);
                        }
                    }
                    Err(e) => {
                        println!("{}", e);
                        println!("{}", prompt(&view.phase()));
                    }
                }
            }
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                for out in view.render_event(&event)? {
                    println!("{}", out);
                }
            }
        }
    }

    info!("Terminal closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use puissance_core::{GameState, MoveResult, Player, engine};

    #[test]
    fn test_parse_columns_are_one_based() {
        assert_eq!("1".parse::<Input>(), Ok(Input::Column(0)));
        assert_eq!(" 7 ".parse::<Input>(), Ok(Input::Column(6)));
        // Off-grid columns are left for the controller to reject
        assert_eq!("9".parse::<Input>(), Ok(Input::Column(8)));
        assert!("0".parse::<Input>().is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("H".parse::<Input>(), Ok(Input::Starter(Starter::Human)));
        assert_eq!("opponent".parse::<Input>(), Ok(Input::Starter(Starter::Opponent)));
        assert_eq!("r".parse::<Input>(), Ok(Input::Reset));
        assert_eq!("s".parse::<Input>(), Ok(Input::ToggleTokenSound));
        assert_eq!("m".parse::<Input>(), Ok(Input::ToggleMusic));
        assert_eq!("rules".parse::<Input>(), Ok(Input::Rules));
        assert_eq!("q".parse::<Input>(), Ok(Input::Quit));
    }

    #[test]
    fn test_parse_rejects_noise() {
        let err = "banana".parse::<Input>().unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized input: \"banana\"");
    }

    #[test]
    fn test_prompt_offers_starter_only_before_start() {
        assert!(prompt(&Phase::AwaitingStart).contains("Who starts"));
        assert!(!prompt(&Phase::AwaitingStart).contains("reset"));
        let playing = prompt(&Phase::TurnOf(Player::Red));
        assert!(playing.contains("reset"));
        assert!(!playing.contains("Who starts"));
    }

    #[test]
    fn test_render_marks_last_move() {
        let state = GameState::started(Player::Red);
        let Ok(MoveResult::Placed(state)) = engine::apply(&state, 0, Player::Red) else {
            panic!("Move should land");
        };
        let text = render_snapshot(&Snapshot::of(&state));
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), ROWS + 1);
        assert!(rows[5].starts_with("(R)"));
        assert_eq!(rows[6].trim(), "1  2  3  4  5  6  7");
    }

    #[test]
    fn test_render_brackets_winning_line() {
        let grid = "
            .......
            .......
            .......
            .......
            .......
            YYYY...
        "
        .parse()
        .unwrap();
        let state = GameState::resume(grid, Player::Red);
        let text = render_snapshot(&Snapshot::of(&state));
        assert!(text.lines().nth(5).unwrap().starts_with("[Y][Y][Y][Y] . "));
    }

    #[test]
    fn test_json_mode_emits_one_line_per_event() {
        let mut view = TerminalView::new(true, true);
        let lines = view
            .render_event(&GameEvent::Notice(Notice::ChooseStarter))
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ChooseStarter"));
    }

    #[test]
    fn test_text_mode_tracks_phase() {
        let mut view = TerminalView::new(true, false);
        let state = GameState::started(Player::Yellow);
        let lines = view
            .render_event(&GameEvent::StateChanged(Snapshot::of(&state)))
            .unwrap();
        assert_eq!(view.phase(), Phase::TurnOf(Player::Yellow));
        assert_eq!(lines[1], "The computer is thinking...");
        assert!(view.render_event(&GameEvent::OpponentThinking).unwrap().is_empty());
    }
}
