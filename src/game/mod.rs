//! Core game logic module for Snake
//!
//! Everything in here is free of I/O and rendering dependencies: the
//! engine advances a `GameState` one tick at a time and leaves scheduling,
//! input decoding, drawing, and high-score storage to its callers.

pub mod action;
pub mod config;
pub mod effect;
pub mod engine;
pub mod food;
pub mod score;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, Difficulty, GameConfig};
pub use effect::EffectState;
pub use engine::{GameEngine, StepOutcome};
pub use food::{FoodItem, FoodKind, FoodSpawner, SpawnError};
pub use score::ScoreTracker;
pub use state::{CollisionType, GameState, Phase, Position, Snake};
