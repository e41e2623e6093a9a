use std::time::Instant;

use rand::rngs::ThreadRng;
use tracing::debug;

use super::{
    action::Direction,
    config::{ConfigError, GameConfig},
    effect::EffectState,
    food::{FoodItem, FoodKind, FoodSpawner, SpawnError},
    score::ScoreTracker,
    state::{CollisionType, GameState, Phase, Position, Snake},
};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepOutcome {
    /// Kind of food eaten this tick, if any
    pub ate_food: Option<FoodKind>,
    /// Collision that ended the episode, if any
    pub collision: Option<CollisionType>,
    /// True on the single tick where the stored high score is first beaten
    pub new_high_score: bool,
}

/// The episode controller: owns the spawn policy, the score tracker and
/// the rng, and advances a `GameState` one tick at a time. The caller
/// owns the state and the schedule; the engine never blocks.
pub struct GameEngine {
    config: GameConfig,
    rng: ThreadRng,
    spawner: FoodSpawner,
    score: ScoreTracker,
}

impl GameEngine {
    /// Create an engine, rejecting configurations no episode could run on
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawner = FoodSpawner::new(config.grid_width, config.grid_height, Instant::now());
        Ok(Self {
            config,
            rng: rand::thread_rng(),
            spawner,
            score: ScoreTracker::new(0),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed the tracker with the persisted high score
    pub fn set_high_score(&mut self, high_score: u32) {
        self.score = ScoreTracker::new(high_score);
    }

    pub fn high_score(&self) -> u32 {
        self.score.high_score()
    }

    /// Whether the current episode has beaten the stored record
    pub fn record_this_episode(&self) -> bool {
        self.score.record_this_episode()
    }

    /// Change the base tick interval; takes effect at the next episode
    pub fn set_base_interval_ms(&mut self, interval_ms: u64) -> Result<(), ConfigError> {
        if interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        self.config.tick_interval_ms = interval_ms;
        Ok(())
    }

    /// Toggle wall collisions; takes effect at the next episode
    pub fn set_wall_collision(&mut self, enabled: bool) {
        self.config.wall_collision = enabled;
    }

    /// State shown before the first episode starts (welcome screen)
    pub fn initial_state(&mut self, now: Instant) -> GameState {
        self.build_state(now, Phase::NotStarted)
    }

    /// Full reset: fresh centered snake, direction Right, score zero,
    /// Normal food, effect cleared, both food timers restarted.
    pub fn start_episode(&mut self, now: Instant) -> GameState {
        self.score.start_episode();
        self.build_state(now, Phase::Running)
    }

    fn build_state(&mut self, now: Instant, phase: Phase) -> GameState {
        let center = Position::new(
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        );
        let snake = Snake::new(center, Direction::Right, self.config.initial_snake_length);

        self.spawner.reset_timers(now);
        let food = self
            .spawner
            .spawn(&snake, FoodKind::Normal, now, &mut self.rng)
            // A validated grid always has free cells left
            .unwrap_or_else(|_| FoodItem::new(center, FoodKind::Normal, now));

        GameState {
            snake,
            direction: Direction::Right,
            food,
            effect: EffectState::new(self.config.tick_interval()),
            score: 0,
            wall_collision: self.config.wall_collision,
            phase,
            grid_width: self.config.grid_width,
            grid_height: self.config.grid_height,
        }
    }

    /// Apply a direction change, ignoring exact reversals. Takes effect
    /// on the next tick's movement.
    pub fn request_direction(&self, state: &mut GameState, direction: Direction) {
        if !state.direction.is_opposite(direction) {
            state.direction = direction;
        }
    }

    /// Suspend ticking without mutating any simulation state
    pub fn pause(&self, state: &mut GameState) {
        if state.phase == Phase::Running {
            state.phase = Phase::Paused;
        }
    }

    /// Resume at the last-known interval
    pub fn resume(&self, state: &mut GameState) {
        if state.phase == Phase::Paused {
            state.phase = Phase::Running;
        }
    }

    /// Advance the simulation by one tick. The caller re-reads
    /// `state.current_interval()` afterwards and reprograms its scheduler
    /// when the interval changed.
    pub fn step(&mut self, state: &mut GameState, now: Instant) -> StepOutcome {
        if state.phase != Phase::Running {
            return StepOutcome::default();
        }

        let mut outcome = StepOutcome::default();

        // Movement: prepend the new head, keep or drop the tail below
        let new_head = state.snake.head().moved_in_direction(state.direction);
        state.snake.grow_head(new_head);

        if new_head == state.food.position {
            let kind = state.food.kind;
            outcome.ate_food = Some(kind);

            state.score = self.score.on_food_consumed(state.score, kind);
            outcome.new_high_score = self.score.check_high_score(state.score);

            if kind == FoodKind::Speed {
                state.effect.activate(now);
            }

            self.respawn_food(state, now);
        } else {
            state.snake.drop_tail();
        }

        if let Some(collision) = self.check_collision(state) {
            outcome.collision = Some(collision);
            state.phase = Phase::GameOver;
            return outcome;
        }

        state.effect.tick(now);

        if state.food.is_expired(now) {
            self.respawn_food(state, now);
        }

        outcome
    }

    /// Self-collision first, then walls. With walls disabled the head is
    /// wrapped onto the torus instead.
    fn check_collision(&self, state: &mut GameState) -> Option<CollisionType> {
        let head = state.snake.head();
        if state.snake.body_hits(head) {
            return Some(CollisionType::SelfCollision);
        }

        if state.wall_collision {
            if !state.is_in_bounds(head) {
                return Some(CollisionType::Wall);
            }
        } else {
            state
                .snake
                .set_head(head.wrapped(state.grid_width, state.grid_height));
        }

        None
    }

    fn respawn_food(&mut self, state: &mut GameState, now: Instant) {
        let kind = self.spawner.next_kind(now, &mut self.rng);
        match self.spawner.spawn(&state.snake, kind, now, &mut self.rng) {
            Ok(food) => state.food = food,
            Err(SpawnError::NoSpaceAvailable) => {
                debug!("no free cell for food placement, keeping previous item");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn engine() -> GameEngine {
        GameEngine::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(GameEngine::new(GameConfig::new(0, 24)).is_err());

        let mut config = GameConfig::default();
        config.tick_interval_ms = 0;
        assert!(GameEngine::new(config).is_err());
    }

    #[test]
    fn test_settings_apply_at_next_episode() {
        let mut engine = engine();
        engine.set_base_interval_ms(100).unwrap();
        engine.set_wall_collision(true);
        assert!(engine.set_base_interval_ms(0).is_err());

        let state = engine.start_episode(Instant::now());
        assert_eq!(state.current_interval(), Duration::from_millis(100));
        assert!(state.wall_collision);
    }

    #[test]
    fn test_start_episode() {
        let mut engine = engine();
        let state = engine.start_episode(Instant::now());

        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(12, 12));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.food.kind, FoodKind::Normal);
        assert!(!state.snake.occupies(state.food.position));
        assert!(!state.effect.is_active());
    }

    #[test]
    fn test_movement_without_food() {
        let mut engine = engine();
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);
        // Park the food out of the snake's path
        state.food = FoodItem::new(Position::new(0, 0), FoodKind::Normal, t0);

        let outcome = engine.step(&mut state, t0 + Duration::from_millis(150));

        assert_eq!(outcome.ate_food, None);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(13, 12));
    }

    #[test]
    fn test_food_consumption_scenario() {
        // 24x24 grid, head (12,12) moving Right, Normal food at (13,12)
        let mut engine = engine();
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);
        state.food = FoodItem::new(Position::new(13, 12), FoodKind::Normal, t0);

        let outcome = engine.step(&mut state, t0 + Duration::from_millis(150));

        assert_eq!(outcome.ate_food, Some(FoodKind::Normal));
        assert_eq!(state.snake.head(), Position::new(13, 12));
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        // New food spawned off the snake
        assert!(!state.snake.occupies(state.food.position));
    }

    #[test]
    fn test_reversal_rejected() {
        let mut engine = engine();
        let mut state = engine.start_episode(Instant::now());

        engine.request_direction(&mut state, Direction::Left);
        assert_eq!(state.direction, Direction::Right);

        engine.request_direction(&mut state, Direction::Up);
        assert_eq!(state.direction, Direction::Up);

        engine.request_direction(&mut state, Direction::Down);
        assert_eq!(state.direction, Direction::Up);
    }

    #[test]
    fn test_wall_collision_freezes_state() {
        let mut config = GameConfig::small();
        config.wall_collision = true;
        let mut engine = GameEngine::new(config).unwrap();
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);
        state.snake = Snake::new(Position::new(9, 5), Direction::Right, 3);
        state.food = FoodItem::new(Position::new(0, 0), FoodKind::Normal, t0);

        let outcome = engine.step(&mut state, t0 + Duration::from_millis(150));
        assert_eq!(outcome.collision, Some(CollisionType::Wall));
        assert_eq!(state.phase, Phase::GameOver);

        // Further ticks must not mutate anything
        let frozen = state.clone();
        let outcome = engine.step(&mut state, t0 + Duration::from_millis(300));
        assert_eq!(outcome, StepOutcome::default());
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = GameEngine::new(GameConfig::small()).unwrap();
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);
        // Body: (5,5), (4,5), (3,5), (2,5)
        state.snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        state.food = FoodItem::new(Position::new(9, 9), FoodKind::Normal, t0);

        // Right, then a tight loop back into the body
        engine.step(&mut state, t0 + Duration::from_millis(100));
        engine.request_direction(&mut state, Direction::Down);
        engine.step(&mut state, t0 + Duration::from_millis(200));
        engine.request_direction(&mut state, Direction::Left);
        engine.step(&mut state, t0 + Duration::from_millis(300));
        engine.request_direction(&mut state, Direction::Up);
        let outcome = engine.step(&mut state, t0 + Duration::from_millis(400));

        assert_eq!(outcome.collision, Some(CollisionType::SelfCollision));
        assert_eq!(state.phase, Phase::GameOver);
    }

    #[test]
    fn test_wrap_around() {
        let mut engine = GameEngine::new(GameConfig::small()).unwrap();
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);
        state.snake = Snake::new(Position::new(9, 5), Direction::Right, 3);
        state.food = FoodItem::new(Position::new(0, 0), FoodKind::Normal, t0);

        let outcome = engine.step(&mut state, t0 + Duration::from_millis(150));

        assert_eq!(outcome.collision, None);
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.snake.head(), Position::new(0, 5));
    }

    #[test]
    fn test_speed_boost_interval() {
        let mut engine = engine();
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);
        state.food = FoodItem::new(Position::new(13, 12), FoodKind::Speed, t0);

        let outcome = engine.step(&mut state, t0 + Duration::from_millis(150));
        assert_eq!(outcome.ate_food, Some(FoodKind::Speed));
        assert_eq!(state.current_interval(), Duration::from_millis(90));

        // Park the food so the next tick only expires the boost
        state.food = FoodItem::new(Position::new(0, 0), FoodKind::Normal, t0);
        engine.step(&mut state, t0 + Duration::from_millis(6000));
        assert_eq!(state.current_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_bonus_expiry_respawns_via_policy() {
        let mut engine = engine();
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);
        // Bonus food spawned at episode start, long expired
        state.food = FoodItem::new(Position::new(0, 0), FoodKind::Bonus, t0);

        // At 21s the Bonus gate is open again, so it takes priority
        let now = t0 + Duration::from_secs(21);
        engine.step(&mut state, now);
        assert_eq!(state.food.kind, FoodKind::Bonus);
        assert_eq!(state.food.spawned_at, now);
    }

    #[test]
    fn test_bonus_expiry_can_yield_golden() {
        let mut engine = engine();
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);
        state.food = FoodItem::new(Position::new(0, 0), FoodKind::Bonus, t0);

        // At 16s only the Golden timer has fired
        let now = t0 + Duration::from_secs(16);
        engine.step(&mut state, now);
        assert_eq!(state.food.kind, FoodKind::Golden);
    }

    #[test]
    fn test_paused_tick_is_inert() {
        let mut engine = engine();
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);

        engine.pause(&mut state);
        assert_eq!(state.phase, Phase::Paused);

        let frozen = state.clone();
        let outcome = engine.step(&mut state, t0 + Duration::from_millis(150));
        assert_eq!(outcome, StepOutcome::default());
        assert_eq!(state, frozen);

        engine.resume(&mut state);
        assert_eq!(state.phase, Phase::Running);
    }

    #[test]
    fn test_high_score_reported_once() {
        let mut engine = engine();
        engine.set_high_score(42);
        let t0 = Instant::now();
        let mut state = engine.start_episode(t0);
        state.score = 42;

        state.food = FoodItem::new(Position::new(13, 12), FoodKind::Normal, t0);
        let outcome = engine.step(&mut state, t0 + Duration::from_millis(150));
        assert_eq!(state.score, 43);
        assert!(outcome.new_high_score);
        assert_eq!(engine.high_score(), 43);

        state.food = FoodItem::new(Position::new(14, 12), FoodKind::Normal, t0);
        let outcome = engine.step(&mut state, t0 + Duration::from_millis(300));
        assert_eq!(state.score, 44);
        assert!(!outcome.new_high_score);
        assert_eq!(engine.high_score(), 44);
    }

    proptest! {
        #[test]
        fn prop_wrap_keeps_snake_in_bounds(turns in proptest::collection::vec(0..4usize, 1..80)) {
            let mut engine = GameEngine::new(GameConfig::small()).unwrap();
            let t0 = Instant::now();
            let mut state = engine.start_episode(t0);

            let dirs = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
            for (i, turn) in turns.iter().enumerate() {
                engine.request_direction(&mut state, dirs[*turn]);
                engine.step(&mut state, t0 + Duration::from_millis(100 * (i as u64 + 1)));
                if state.phase != Phase::Running {
                    break;
                }
                for cell in state.snake.cells() {
                    prop_assert!(state.is_in_bounds(*cell));
                }
            }
        }

        #[test]
        fn prop_length_grows_iff_food_eaten(turns in proptest::collection::vec(0..4usize, 1..80)) {
            let mut engine = GameEngine::new(GameConfig::small()).unwrap();
            let t0 = Instant::now();
            let mut state = engine.start_episode(t0);

            let dirs = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
            for (i, turn) in turns.iter().enumerate() {
                engine.request_direction(&mut state, dirs[*turn]);
                let before = state.snake.len();
                let outcome = engine.step(&mut state, t0 + Duration::from_millis(100 * (i as u64 + 1)));
                let expected = if outcome.ate_food.is_some() { before + 1 } else { before };
                prop_assert_eq!(state.snake.len(), expected);
                if state.phase != Phase::Running {
                    break;
                }
            }
        }
    }
}
