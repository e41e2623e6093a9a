use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{FoodKind, GameState, Phase, Position};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        high_score: u32,
        new_record: bool,
    ) {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Game area
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

        let stats = self.render_stats(state, metrics, high_score, new_record);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::horizontal([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .split(chunks[1])[1];

        match state.phase {
            Phase::NotStarted => {
                frame.render_widget(self.render_welcome(), game_area);
            }
            Phase::GameOver => {
                frame.render_widget(self.render_game_over(state, high_score, new_record), game_area);
            }
            Phase::Running | Phase::Paused => {
                frame.render_widget(self.render_grid(state), game_area);
                if state.phase == Phase::Paused {
                    self.render_pause_overlay(frame, game_area);
                }
            }
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn food_style(kind: FoodKind) -> Style {
        let color = match kind {
            FoodKind::Normal => Color::Red,
            FoodKind::Golden => Color::Yellow,
            FoodKind::Bonus => Color::Magenta,
            FoodKind::Speed => Color::Cyan,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.food.position {
                    Span::styled("O ", Self::food_style(state.food.kind))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        // Bonus items show their countdown in the frame title
        let title = if state.food.kind == FoodKind::Bonus {
            let remaining = state.food.remaining(Instant::now()).as_secs();
            format!(" Snake - bonus {}s ", remaining)
        } else {
            String::from(" Snake ")
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        state: &GameState,
        metrics: &GameMetrics,
        high_score: u32,
        new_record: bool,
    ) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ];

        if new_record {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "NEW RECORD!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else if state.effect.is_active() {
            let remaining = state.effect.remaining(Instant::now()).as_secs();
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("SPEED BOOST {}s", remaining),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let mut lines = vec![Line::from(spans)];
        if state.food.kind != FoodKind::Normal {
            lines.push(Line::from(Span::styled(
                state.food.kind.description(),
                Style::default().fg(Color::Gray),
            )));
        }

        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Stats "))
    }

    fn render_welcome(&self) -> Paragraph<'_> {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Snake",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Eat apples to grow; golden and bonus food score extra."),
            Line::from("Speed food makes you faster for five seconds."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to start",
                Style::default().fg(Color::LightGreen),
            )),
        ];

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Double))
            .alignment(Alignment::Center)
    }

    fn render_game_over(
        &self,
        state: &GameState,
        high_score: u32,
        new_record: bool,
    ) -> Paragraph<'_> {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if new_record {
            lines.push(Line::from(Span::styled(
                "* NEW HIGH SCORE *",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(format!("Final score: {}", state.score)));
        lines.push(Line::from(format!("High score: {}", high_score)));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to restart, q to quit",
            Style::default().fg(Color::Gray),
        )));

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Double))
            .alignment(Alignment::Center)
    }

    fn render_pause_overlay(&self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(area, 30, 3);
        frame.render_widget(Clear, overlay);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center),
            overlay,
        );
    }

    fn render_controls(&self) -> Paragraph<'_> {
        Paragraph::new(Line::from(
            "arrows/wasd: steer | space: pause | enter: start | q: quit",
        ))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
