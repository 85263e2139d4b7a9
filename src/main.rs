mod engine;
mod game;
mod input;
mod render;
mod settings;
mod snake;
mod storage;
mod term;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use engine::Engine;
use game::{SnakeGame, Store};
use settings::Settings;
use storage::{FileStore, MemoryStore};

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Snake on a 20x20 grid, in the terminal")]
struct Cli {
    /// JSON settings file; flags given here override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Milliseconds between moves
    #[arg(long)]
    tick_ms: Option<u64>,

    /// File holding the best score
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Keep the best score in memory only
    #[arg(long, conflicts_with = "high_score_file")]
    no_persist: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is busy drawing the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_json_file(path)?,
            None => Settings::default(),
        };

        if let Some(tick_ms) = self.tick_ms {
            settings.tick_ms = tick_ms;
        }
        if let Some(path) = &self.high_score_file {
            settings.high_score_file = Some(path.clone());
        }
        if self.no_persist {
            settings.high_score_file = None;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn init_logging(path: &Path, level: &str) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;

    if let Some(path) = &cli.log_file {
        init_logging(path, &settings.log_level)?;
    }

    let store: Store = match &settings.high_score_file {
        Some(path) => Box::new(FileStore::new(path, settings.high_score_key.as_str())),
        None => Box::new(MemoryStore::new()),
    };
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    tracing::info!(?settings, "starting");

    let mut game = SnakeGame::new(Engine::new(store, rng), settings.tick_interval())?;
    game.run()
}
