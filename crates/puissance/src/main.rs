//! Puissance - terminal connect four

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use puissance::terminal::{self, TerminalView};
use puissance::{GameConfig, GameController, Starter};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so the board on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            seed,
            delay_ms,
            starter,
            json_events,
        } => play(config, seed, delay_ms, starter, json_events).await,
        Command::Rules => {
            println!("{}", terminal::RULES);
            Ok(())
        }
    }
}

/// Builds the configuration from the file and command-line overrides.
#[instrument]
fn load_config(
    path: Option<PathBuf>,
    seed: Option<u64>,
    delay_ms: Option<u64>,
    starter: Option<Starter>,
) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if let Some(delay_ms) = delay_ms {
        config = config.with_opponent_delay_ms(delay_ms);
    }
    if let Some(starter) = starter {
        config = config.with_starter(starter);
    }
    Ok(config)
}

/// Runs an interactive game.
async fn play(
    path: Option<PathBuf>,
    seed: Option<u64>,
    delay_ms: Option<u64>,
    starter: Option<Starter>,
    json_events: bool,
) -> Result<()> {
    let config = load_config(path, seed, delay_ms, starter)?;
    info!(?config, "Starting game");

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let controller = GameController::from_config(&config, event_tx);
    let (handle, controller_task) = controller.start();

    if let Some(starter) = config.starter() {
        handle.select_starter(starter.player())?;
    }

    let view = TerminalView::new(*config.token_sound(), json_events);
    terminal::run(view, handle, event_rx).await?;

    controller_task.await.context("Controller task failed")?;
    info!("Goodbye");
    Ok(())
}
