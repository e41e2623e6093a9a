use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty presets mapping to the base tick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Base tick interval in milliseconds for this preset
    pub fn tick_interval_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Medium => 100,
            Difficulty::Hard => 50,
        }
    }
}

/// Errors detected when validating a configuration before an episode starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidGrid { width: usize, height: usize },
    #[error("tick interval must be positive")]
    InvalidInterval,
    #[error("initial snake length must be at least 3 and fit in the grid, got {length}")]
    InvalidSnakeLength { length: usize },
}

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Base tick interval in milliseconds (before any speed effect)
    pub tick_interval_ms: u64,
    /// Whether hitting a wall ends the episode; when false the grid wraps
    pub wall_collision: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 24,
            grid_height: 24,
            initial_snake_length: 3,
            tick_interval_ms: Difficulty::Easy.tick_interval_ms(),
            wall_collision: false,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Base tick interval as a `Duration`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Reject configurations no episode could run on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::InvalidGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        // The snake spawns as a horizontal line ending at the grid center.
        if self.initial_snake_length < 3 || self.initial_snake_length > self.grid_width / 2 {
            return Err(ConfigError::InvalidSnakeLength {
                length: self.initial_snake_length,
            });
        }
        Ok(())
    }
}
