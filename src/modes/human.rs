use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::game::{ConfigError, GameConfig, GameEngine, GameState, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;
use crate::render::Renderer;

/// Interactive terminal mode: owns the engine, the game state, and the
/// scheduling loop, and wires input and persistence to them.
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    store: Box<dyn HighScoreStore>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, store: Box<dyn HighScoreStore>) -> Result<Self, ConfigError> {
        let mut engine = GameEngine::new(config)?;
        engine.set_high_score(store.high_score());
        let state = engine.initial_state(Instant::now());

        Ok(Self {
            engine,
            state,
            store,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut current_interval = self.state.current_interval();
        let mut tick_timer = interval(current_interval);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick; paused and finished episodes stay inert
                _ = tick_timer.tick() => {
                    if self.state.phase == Phase::Running {
                        self.update_game();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let high_score = self.engine.high_score();
                    let new_record = self.engine.record_this_episode();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics, high_score, new_record);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            // The speed effect changes the tick interval; reprogram the
            // timer whenever the engine reports a different period.
            let wanted = self.state.current_interval();
            if wanted != current_interval {
                current_interval = wanted;
                tick_timer = interval(wanted);
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(direction) => {
                    if self.state.phase == Phase::Running {
                        self.engine.request_direction(&mut self.state, direction);
                    }
                }
                KeyAction::Start => {
                    if self.state.phase != Phase::Running {
                        self.start_episode();
                    }
                }
                KeyAction::TogglePause => match self.state.phase {
                    Phase::Running => self.engine.pause(&mut self.state),
                    Phase::Paused => self.engine.resume(&mut self.state),
                    _ => {}
                },
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn start_episode(&mut self) {
        self.state = self.engine.start_episode(Instant::now());
        self.metrics.on_game_start();
    }

    fn update_game(&mut self) {
        let outcome = self.engine.step(&mut self.state, Instant::now());

        if outcome.ate_food.is_some() {
            self.metrics.on_food_eaten();
            // Persist every improvement; write failures stay in the store
            let high_score = self.engine.high_score();
            if high_score > self.store.high_score() {
                self.store.update(high_score);
            }
        }

        if let Some(collision) = outcome.collision {
            self.metrics.on_game_over();
            info!(score = self.state.score, ?collision, "episode over");
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{FoodItem, FoodKind, Position};
    use crate::persistence::MemoryHighScoreStore;

    fn mode(high_score: u32) -> HumanMode {
        HumanMode::new(
            GameConfig::default(),
            Box::new(MemoryHighScoreStore::new(high_score)),
        )
        .unwrap()
    }

    #[test]
    fn test_starts_on_welcome_screen() {
        let mode = mode(0);
        assert_eq!(mode.state.phase, Phase::NotStarted);
        assert_eq!(mode.state.score, 0);
    }

    #[test]
    fn test_start_episode_resets() {
        let mut mode = mode(0);
        mode.start_episode();
        assert_eq!(mode.state.phase, Phase::Running);

        mode.state.score = 10;
        mode.state.phase = Phase::GameOver;
        mode.start_episode();
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.phase, Phase::Running);
    }

    #[test]
    fn test_record_is_persisted() {
        let mut mode = mode(0);
        mode.start_episode();

        // Put food right in front of the head and tick once
        let head = mode.state.snake.head();
        mode.state.food = FoodItem::new(
            Position::new(head.x + 1, head.y),
            FoodKind::Golden,
            Instant::now(),
        );
        mode.update_game();

        assert_eq!(mode.state.score, 5);
        assert_eq!(mode.store.high_score(), 5);
    }
}
