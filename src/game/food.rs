use std::time::{Duration, Instant};

use rand::Rng;
use thiserror::Error;

use super::state::{Position, Snake};

/// How long a Bonus item stays on the board before it is replaced
pub const BONUS_LIFETIME: Duration = Duration::from_secs(5);
/// Minimum gap between Golden spawns
pub const GOLDEN_INTERVAL: Duration = Duration::from_secs(15);
/// Minimum gap between Bonus spawns
pub const BONUS_INTERVAL: Duration = Duration::from_secs(20);

/// Category of a food item, determining points and special behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    Normal,
    Golden,
    Bonus,
    Speed,
}

impl FoodKind {
    /// Points awarded when a food of this kind is eaten
    pub fn points(&self) -> u32 {
        match self {
            FoodKind::Golden => 5,
            FoodKind::Bonus => 3,
            FoodKind::Speed | FoodKind::Normal => 1,
        }
    }

    /// Short label shown in the status line
    pub fn description(&self) -> &'static str {
        match self {
            FoodKind::Golden => "Golden Apple - 5 points!",
            FoodKind::Bonus => "Bonus Diamond - 3 points, eat it quickly!",
            FoodKind::Speed => "Speed Boost - faster movement!",
            FoodKind::Normal => "Apple - 1 point",
        }
    }
}

/// A food item on the board; replaced, never mutated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodItem {
    pub position: Position,
    pub kind: FoodKind,
    pub spawned_at: Instant,
}

impl FoodItem {
    pub fn new(position: Position, kind: FoodKind, now: Instant) -> Self {
        Self {
            position,
            kind,
            spawned_at: now,
        }
    }

    /// Only Bonus items expire; everything else stays until eaten
    pub fn is_expired(&self, now: Instant) -> bool {
        self.kind == FoodKind::Bonus && now.duration_since(self.spawned_at) >= BONUS_LIFETIME
    }

    /// Time left before a Bonus item disappears, zero for other kinds
    pub fn remaining(&self, now: Instant) -> Duration {
        if self.kind != FoodKind::Bonus {
            return Duration::ZERO;
        }
        BONUS_LIFETIME.saturating_sub(now.duration_since(self.spawned_at))
    }
}

/// Food placement found no free cell within the attempt bound
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("no free cell available for food placement")]
    NoSpaceAvailable,
}

/// Picks food kinds on a time-gated policy and places them on free cells
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    grid_width: usize,
    grid_height: usize,
    last_golden: Instant,
    last_bonus: Instant,
}

impl FoodSpawner {
    pub fn new(grid_width: usize, grid_height: usize, now: Instant) -> Self {
        Self {
            grid_width,
            grid_height,
            last_golden: now,
            last_bonus: now,
        }
    }

    /// Restart both kind timers, called at episode start
    pub fn reset_timers(&mut self, now: Instant) {
        self.last_golden = now;
        self.last_bonus = now;
    }

    /// Select the kind for the next spawn. Bonus takes priority over
    /// Golden when both timers are due; otherwise Speed has a 1-in-10
    /// chance and Normal is the fallback.
    pub fn next_kind(&mut self, now: Instant, rng: &mut impl Rng) -> FoodKind {
        if now.duration_since(self.last_bonus) >= BONUS_INTERVAL {
            self.last_bonus = now;
            return FoodKind::Bonus;
        }
        if now.duration_since(self.last_golden) >= GOLDEN_INTERVAL {
            self.last_golden = now;
            return FoodKind::Golden;
        }
        if rng.gen_range(0..10) == 0 {
            return FoodKind::Speed;
        }
        FoodKind::Normal
    }

    /// Place a food item on a random cell not occupied by the snake.
    /// The number of attempts is bounded by the cell count; exhaustion
    /// is reported instead of looping forever on a full board.
    pub fn spawn(
        &self,
        snake: &Snake,
        kind: FoodKind,
        now: Instant,
        rng: &mut impl Rng,
    ) -> Result<FoodItem, SpawnError> {
        let max_attempts = self.grid_width * self.grid_height;
        for _ in 0..max_attempts {
            let pos = Position::new(
                rng.gen_range(0..self.grid_width as i32),
                rng.gen_range(0..self.grid_height as i32),
            );
            if !snake.occupies(pos) {
                return Ok(FoodItem::new(pos, kind, now));
            }
        }
        Err(SpawnError::NoSpaceAvailable)
    }
}
