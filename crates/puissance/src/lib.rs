//! Puissance - connect-four against a scripted opponent
//!
//! Wires the pure game logic from `puissance_core` to a live session:
//!
//! - [`controller`]: the state machine that owns the game, with the
//!   delayed, cancellable opponent move
//! - [`events`]: snapshots and semantic events published to collaborators
//! - [`audio`]: maps events to sound cues
//! - [`terminal`]: a line-based front end
//! - [`config`]: TOML settings

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod audio;
pub mod config;
pub mod controller;
pub mod events;
pub mod terminal;

pub use audio::{Cue, SoundBoard};
pub use config::{ConfigError, GameConfig, Starter};
pub use controller::{Command, ControllerHandle, ControllerStopped, GameController};
pub use events::{GameEvent, Notice, Snapshot};

use puissance_core::Player;

/// The human always plays red.
pub const HUMAN: Player = Player::Red;

/// The scripted opponent always plays yellow.
pub const OPPONENT: Player = Player::Yellow;
