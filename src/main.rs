mod game;
mod term;

use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use simplelog::WriteLogger;

use snake_arcade::config::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs go to a file
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("creating log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level.into(), simplelog::Config::default(), log_file)
        .context("initialising logger")?;

    let config = cli.config();
    info!("starting with {:?}", config);

    let mut game = game::SnakeGame::new(config)?;
    game.initialize()?;

    // Always hand the terminal back, even when the game loop failed
    let played = game.play();
    game.restore()?;

    if let Err(err) = &played {
        error!("{:#}", err);
    }
    played
}
