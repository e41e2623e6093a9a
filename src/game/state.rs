use super::action::Direction;
use super::effect::EffectState;
use super::food::FoodItem;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one grid unit in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Wrap coordinates onto a toroidal grid of the given size
    pub fn wrapped(&self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.rem_euclid(width as i32),
            y: self.y.rem_euclid(height as i32),
        }
    }
}

/// The snake body, with head at index 0
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    /// Create a new snake with given head position, laid out opposite
    /// to the direction of travel
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// All cells occupied by the snake, head first
    pub fn cells(&self) -> &[Position] {
        &self.body
    }

    /// Check if a position collides with the body (excluding the head)
    pub fn body_hits(&self, pos: Position) -> bool {
        self.body[1..].contains(&pos)
    }

    /// Check if any segment occupies the position
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Prepend a new head; the caller decides whether the tail is dropped
    pub fn grow_head(&mut self, pos: Position) {
        self.body.insert(0, pos);
    }

    /// Remove the tail segment (no growth this tick)
    pub fn drop_tail(&mut self) {
        self.body.pop();
    }

    /// Replace the head position in place (wrap-around normalization)
    pub fn set_head(&mut self, pos: Position) {
        self.body[0] = pos;
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that ended an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle phase of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Complete game state, owned by the caller and mutated only through
/// the engine
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub direction: Direction,
    pub food: FoodItem,
    pub effect: EffectState,
    pub score: u32,
    pub wall_collision: bool,
    pub phase: Phase,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl GameState {
    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// The tick interval currently in effect (base or boosted)
    pub fn current_interval(&self) -> std::time::Duration {
        self.effect.current_interval()
    }
}
