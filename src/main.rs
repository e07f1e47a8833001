mod game;
mod term;

use anyhow::Result;
use clap::Parser;

use snake::config::{Args, GameConfig};
use snake::{log, logger};

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, notes) = GameConfig::resolve(&args);

    if let Err(e) = logger::init_logger(&config.log_path) {
        eprintln!("Logging disabled: {:#}", e);
    }
    for note in &notes {
        log!("{}", note);
    }

    let (w, h) = config.grid_cells();
    log!("Starting on a {}x{} board, {}ms per tick", w, h, config.base_interval_ms);

    let mut game = game::SnakeGame::new(&config)?;
    let result = game.run();

    // Always try to restore the terminal, even when the game failed
    let _ = game.restore();
    if let Err(e) = &result {
        log!("Exiting with error: {:#}", e);
    }
    result
}
