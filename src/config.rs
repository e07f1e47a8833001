use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::engine::{EngineSettings, DEFAULT_INTERVAL_MS};

pub const DEFAULT_BOARD_PX: i32 = 400;
pub const DEFAULT_TILE_SIZE: i32 = 20;
const MIN_CELLS: i32 = 6;
const MAX_CELLS: i32 = 200;

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Parser, Debug, Default)]
#[command(name = "snake", about = "Grid snake with growth, penalty and bonus food")]
pub struct Args {
    /// YAML file with a `GameConfig`
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Board width in pixels
    #[arg(long)]
    pub width: Option<i32>,
    /// Board height in pixels
    #[arg(long)]
    pub height: Option<i32>,
    /// Base tick interval in milliseconds
    #[arg(long)]
    pub interval: Option<u64>,
    /// Where `name: score` records are appended
    #[arg(long)]
    pub scores: Option<PathBuf>,
    #[arg(long)]
    pub log: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width_px: i32,
    pub board_height_px: i32,
    pub tile_size: i32,
    pub base_interval_ms: u64,
    pub scores_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width_px: DEFAULT_BOARD_PX,
            board_height_px: DEFAULT_BOARD_PX,
            tile_size: DEFAULT_TILE_SIZE,
            base_interval_ms: DEFAULT_INTERVAL_MS,
            scores_path: PathBuf::from("score.txt"),
            log_path: PathBuf::from("snake.log"),
        }
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.tile_size <= 0 {
            return Err("tile_size must be positive".to_string());
        }
        let (w, h) = self.grid_cells();
        if w < MIN_CELLS || h < MIN_CELLS {
            return Err(format!("board must be at least {0}x{0} cells, got {1}x{2}", MIN_CELLS, w, h));
        }
        if w > MAX_CELLS || h > MAX_CELLS {
            return Err(format!("board must not exceed {0}x{0} cells, got {1}x{2}", MAX_CELLS, w, h));
        }
        if !(50..=5000).contains(&self.base_interval_ms) {
            return Err("base_interval_ms must be between 50 and 5000".to_string());
        }
        Ok(())
    }
}

impl GameConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).context("Failed to deserialize config")
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).context("Failed to serialize config")
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml_str(&content).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    /// Defaults, then the config file, then command-line flags. Anything that fails to
    /// load or validate is dropped in favour of the defaults; the returned notes say what
    /// happened so the caller can log them once logging is up.
    pub fn resolve(args: &Args) -> (Self, Vec<String>) {
        let mut notes = Vec::new();
        let mut config = Self::default();

        if let Some(path) = &args.config {
            match Self::load(path) {
                Ok(Some(loaded)) => match loaded.validate() {
                    Ok(()) => config = loaded,
                    Err(e) => notes.push(format!("Ignoring {}: {}", path.display(), e)),
                },
                Ok(None) => notes.push(format!("Config file {} not found, using defaults", path.display())),
                Err(e) => notes.push(format!("Ignoring {}: {:#}", path.display(), e)),
            }
        }

        let fallback = config.clone();

        if let Some(width) = args.width {
            config.board_width_px = width;
        }
        if let Some(height) = args.height {
            config.board_height_px = height;
        }
        if let Some(interval) = args.interval {
            config.base_interval_ms = interval;
        }
        if let Some(scores) = &args.scores {
            config.scores_path = scores.clone();
        }
        if let Some(log) = &args.log {
            config.log_path = log.clone();
        }

        if let Err(e) = config.validate() {
            notes.push(format!("Invalid board settings ({}), using {}x{} px at {}ms",
                e, fallback.board_width_px, fallback.board_height_px, fallback.base_interval_ms));
            config = GameConfig {
                scores_path: config.scores_path,
                log_path: config.log_path,
                ..fallback
            };
        }

        (config, notes)
    }

    pub fn grid_cells(&self) -> (i32, i32) {
        if self.tile_size <= 0 {
            return (0, 0);
        }
        (self.board_width_px / self.tile_size, self.board_height_px / self.tile_size)
    }

    pub fn engine_settings(&self) -> Result<EngineSettings> {
        let (w, h) = self.grid_cells();
        EngineSettings::new(w, h, self.base_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn get_temp_file_path() -> PathBuf {
        let mut path = std::env::temp_dir();
        let random_number: u32 = rand::random();
        path.push(format!("temp_snake_config_{}.yaml", random_number));
        path
    }

    #[test]
    fn defaults_give_a_20_by_20_board() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_cells(), (20, 20));

        let settings = config.engine_settings().unwrap();
        assert_eq!(settings.grid.width(), 20);
        assert_eq!(settings.base_interval, Duration::from_millis(100));
    }

    #[test]
    fn yaml_round_trip_and_partial_files() {
        let config = GameConfig { board_width_px: 600, ..GameConfig::default() };
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(GameConfig::from_yaml_str(&yaml).unwrap(), config);

        let partial = GameConfig::from_yaml_str("board_height_px: 240\n").unwrap();
        assert_eq!(partial.board_height_px, 240);
        assert_eq!(partial.board_width_px, DEFAULT_BOARD_PX);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        assert_eq!(GameConfig::load(&get_temp_file_path()).unwrap(), None);
    }

    #[test]
    fn cli_overrides_file() {
        let path = get_temp_file_path();
        std::fs::write(&path, "board_width_px: 300\nbase_interval_ms: 150\n").unwrap();

        let args = Args::try_parse_from([
            "snake", "--config", path.to_str().unwrap(), "--interval", "120",
        ]).unwrap();
        let (config, notes) = GameConfig::resolve(&args);
        let _ = std::fs::remove_file(&path);

        assert!(notes.is_empty());
        assert_eq!(config.grid_cells(), (15, 20));
        assert_eq!(config.base_interval_ms, 120);
    }

    #[test]
    fn invalid_size_falls_back_to_defaults() {
        let args = Args::try_parse_from(["snake", "--width", "40", "--scores", "mine.txt"]).unwrap();
        let (config, notes) = GameConfig::resolve(&args);

        assert_eq!(notes.len(), 1);
        assert_eq!(config.board_width_px, DEFAULT_BOARD_PX);
        assert_eq!(config.scores_path, PathBuf::from("mine.txt"));
    }

    #[test]
    fn garbage_file_is_ignored() {
        let path = get_temp_file_path();
        std::fs::write(&path, "board_width_px: [not, a, number]\n").unwrap();

        let args = Args { config: Some(path.clone()), ..Args::default() };
        let (config, notes) = GameConfig::resolve(&args);
        let _ = std::fs::remove_file(&path);

        assert_eq!(notes.len(), 1);
        assert_eq!(config, GameConfig::default());
    }
}
