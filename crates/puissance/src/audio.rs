//! Sound cues for game events.
//!
//! The sound board decides what should be heard from the event variant
//! alone. It has no audio device; cues are reported through tracing and
//! returned to the caller.

use crate::events::{GameEvent, Notice};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A one-shot sound effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Cue {
    /// A token landing.
    Token,
    /// The human winning.
    Winning,
    /// A draw, a loss, or a click on a finished game.
    DrawOrFailure,
}

/// Maps game events to sound cues and tracks the ambient music.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundBoard {
    token_sound: bool,
    ambient_playing: bool,
}

impl SoundBoard {
    /// Creates a sound board with the token sound on or off.
    pub fn new(token_sound: bool) -> Self {
        Self {
            token_sound,
            ambient_playing: false,
        }
    }

    /// Returns true if token placement makes a sound.
    pub fn token_sound(&self) -> bool {
        self.token_sound
    }

    /// Flips the token sound flag and returns the new value.
    #[instrument(skip(self))]
    pub fn toggle_token_sound(&mut self) -> bool {
        self.token_sound = !self.token_sound;
        info!(enabled = self.token_sound, "Token sound toggled");
        self.token_sound
    }

    /// Returns true while the ambient music plays.
    pub fn ambient_playing(&self) -> bool {
        self.ambient_playing
    }

    /// Starts or pauses the ambient music and returns the new state.
    #[instrument(skip(self))]
    pub fn toggle_ambient(&mut self) -> bool {
        self.ambient_playing = !self.ambient_playing;
        info!(playing = self.ambient_playing, "Ambient music toggled");
        self.ambient_playing
    }

    /// Returns the cue for an event, if any.
    ///
    /// Only the event variant is consulted. A click on a finished game
    /// surfaces as the reset reminder, which plays the failure cue.
    #[instrument(skip_all)]
    pub fn handle(&mut self, event: &GameEvent) -> Option<Cue> {
        let cue = match event {
            GameEvent::TokenPlaced(_) if self.token_sound => Some(Cue::Token),
            GameEvent::HumanWon(_) => Some(Cue::Winning),
            GameEvent::OpponentWon(_) | GameEvent::Draw => Some(Cue::DrawOrFailure),
            GameEvent::Notice(Notice::ResetToPlayAgain) => Some(Cue::DrawOrFailure),
            GameEvent::StopAmbientAudio => {
                if self.ambient_playing {
                    info!("Ambient music stopped");
                }
                self.ambient_playing = false;
                None
            }
            GameEvent::TokenPlaced(_)
            | GameEvent::StateChanged(_)
            | GameEvent::OpponentThinking
            | GameEvent::Notice(_) => None,
        };

        if let Some(cue) = cue {
            debug!(%cue, "Playing cue");
        }
        cue
    }
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self::new(true)
    }
}
