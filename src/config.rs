//! Game configuration.
//!
//! Defaults reproduce the stock board: 25 × 19 cells of 32 px, player on
//! (12, 9), three question NPCs. A JSON file may override any field.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::challenge::{Challenge, default_challenges};
use crate::grid::{GridBounds, GridPosition};

/// Largest board edge, in cells.
pub const MAX_GRID_EDGE: u32 = 512;
/// Largest window edge, in pixels.
pub const MAX_WINDOW_EDGE: u32 = 16_384;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("bad command line: {0}")]
    Args(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub title: String,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Pixel edge of one cell.
    pub tile_size: u32,
    pub start: GridPosition,
    /// Movement cooldown in milliseconds.
    pub cooldown_ms: u64,
    /// Minimum distance, in cells, between an NPC and the board edge.
    pub spawn_margin: u32,
    /// NPCs to spawn; `None` spawns one per challenge.
    pub npc_count: Option<usize>,
    pub updates_per_second: u32,
    pub challenges: Vec<Challenge>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "gridquiz".into(),
            grid_width: 25,
            grid_height: 19,
            tile_size: 32,
            start: GridPosition::new(12, 9),
            cooldown_ms: 150,
            spawn_margin: 3,
            npc_count: None,
            updates_per_second: 60,
            challenges: default_challenges(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config = Self::from_json(&json)?;
        info!("[config] loaded {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid("grid dimensions must be positive".into()));
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Invalid("tile_size must be positive".into()));
        }
        if self.grid_width > MAX_GRID_EDGE || self.grid_height > MAX_GRID_EDGE {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} exceeds {MAX_GRID_EDGE} cells per edge",
                self.grid_width, self.grid_height
            )));
        }
        for (cells, axis) in [(self.grid_width, "width"), (self.grid_height, "height")] {
            let pixels = cells.checked_mul(self.tile_size).filter(|px| *px <= MAX_WINDOW_EDGE);
            if pixels.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "window {axis} of {cells} cells x {} px exceeds {MAX_WINDOW_EDGE} px",
                    self.tile_size
                )));
            }
        }
        if !self.bounds().contains(self.start) {
            return Err(ConfigError::Invalid(format!(
                "start ({}, {}) lies outside the {}x{} grid",
                self.start.x, self.start.y, self.grid_width, self.grid_height
            )));
        }
        if self.bounds().inner_cells(self.spawn_margin).is_empty() {
            return Err(ConfigError::Invalid(format!(
                "spawn_margin {} leaves no room for NPCs", self.spawn_margin
            )));
        }
        if self.challenges.is_empty() {
            return Err(ConfigError::Invalid("at least one challenge is required".into()));
        }
        if self.updates_per_second == 0 {
            return Err(ConfigError::Invalid("updates_per_second must be positive".into()));
        }
        Ok(())
    }

    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.grid_width, self.grid_height, self.tile_size)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn npc_count(&self) -> usize {
        self.npc_count.unwrap_or(self.challenges.len())
    }

    /// Window size in pixels: exactly the board.
    pub fn window_size(&self) -> (u32, u32) {
        self.bounds().pixel_size()
    }
}

/// What the binary was asked to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaunchOptions {
    pub config: Option<PathBuf>,
    /// Fixed RNG seed for NPC placement.
    pub seed: Option<u64>,
}

impl LaunchOptions {
    /// Parse `--config <path>` and `--seed <u64>` from arguments that
    /// exclude the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut opts = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| ConfigError::Args("--config needs a path".into()))?;
                    opts.config = Some(PathBuf::from(path));
                }
                "--seed" => {
                    let raw = args
                        .next()
                        .ok_or_else(|| ConfigError::Args("--seed needs a value".into()))?;
                    let seed = raw
                        .parse()
                        .map_err(|_| ConfigError::Args(format!("--seed: '{raw}' is not a u64")))?;
                    opts.seed = Some(seed);
                }
                other => return Err(ConfigError::Args(format!("unknown argument '{other}'"))),
            }
        }
        Ok(opts)
    }

    /// The configured file, or the defaults when none was given.
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        match &self.config {
            Some(path) => GameConfig::load(path),
            None => Ok(GameConfig::default()),
        }
    }
}
