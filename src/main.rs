use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use snake_arcade::game::{Difficulty, GameConfig};
use snake_arcade::modes::HumanMode;
use snake_arcade::persistence::FileHighScoreStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Terminal snake game with timed food kinds")]
struct Cli {
    /// Grid width in cells
    #[arg(long, default_value = "24")]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value = "24")]
    height: usize,

    /// Difficulty preset controlling the tick interval
    #[arg(long, value_enum, default_value = "easy")]
    difficulty: DifficultyArg,

    /// End the episode on wall contact instead of wrapping around
    #[arg(long)]
    wall_collision: bool,

    /// Where the high score is stored
    #[arg(long, default_value = "highscore.json")]
    high_score_file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    /// 150 ms per tick
    Easy,
    /// 100 ms per tick
    Medium,
    /// 50 ms per tick
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = GameConfig::new(cli.width, cli.height);
    config.tick_interval_ms = Difficulty::from(cli.difficulty).tick_interval_ms();
    config.wall_collision = cli.wall_collision;

    let store = Box::new(FileHighScoreStore::new(cli.high_score_file));
    let mut mode = HumanMode::new(config, store)?;
    mode.run().await?;

    Ok(())
}
