//! Snake Arcade - a terminal snake game with timed food kinds
//!
//! This library provides:
//! - Core simulation logic (game module): movement, collisions, the
//!   food-spawn policy, the speed-boost effect, and scoring
//! - Input decoding (input module)
//! - TUI rendering (render module)
//! - High-score storage (persistence module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod render;
