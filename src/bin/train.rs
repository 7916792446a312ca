use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use actr_connect_four::ai::{ActrEngine, RandomAgent};
use actr_connect_four::config::AppConfig;
use actr_connect_four::game::Player;
use actr_connect_four::memory::{ChunkStore, DeclarativeMemory, MemorySnapshot};
use actr_connect_four::session::Session;
use actr_connect_four::training::trainer::Trainer;

/// Train the memory-based Connect Four engine against a random opponent.
#[derive(Parser)]
#[command(name = "train", about = "Train the memory-based Connect Four engine")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training rounds
    #[arg(long)]
    rounds: Option<usize>,

    /// Memory snapshot to load before and save after training
    #[arg(long)]
    memory: Option<PathBuf>,

    /// Seed for the engine, memory noise and opponent
    #[arg(long)]
    seed: Option<u64>,

    /// Colour the engine plays
    #[arg(long, value_enum)]
    engine_player: Option<Colour>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Colour {
    Red,
    Yellow,
}

impl From<Colour> for Player {
    fn from(colour: Colour) -> Self {
        match colour {
            Colour::Red => Player::Red,
            Colour::Yellow => Player::Yellow,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(rounds) = cli.rounds {
        if rounds == 0 {
            bail!("--rounds must be > 0");
        }
        app_config.training.num_rounds = rounds;
    }
    if let Some(seed) = cli.seed {
        app_config.engine.seed = Some(seed);
    }
    if let Some(colour) = cli.engine_player {
        app_config.session.engine_player = colour.into();
    }
    let snapshot_path = cli.memory.or_else(|| app_config.training.snapshot_path.clone());

    let engine = build_engine(&app_config, snapshot_path.as_deref())?;
    let mut session = Session::new(app_config.board, engine, &app_config.session);
    let mut opponent = RandomAgent::with_seed(app_config.engine.seed.map(|s| s.wrapping_add(1)));

    let trainer = Trainer::new(app_config.training.clone());
    let summary = trainer.train(&mut session, &mut opponent);

    let scores = session.scores();
    println!(
        "Rounds: {} | engine wins: {} | opponent wins: {} | draws: {} | red {} - yellow {}",
        summary.rounds,
        summary.engine_wins,
        summary.opponent_wins,
        summary.draws,
        scores.red,
        scores.yellow,
    );

    if let Some(path) = snapshot_path {
        let memory = session.into_engine().into_memory();
        MemorySnapshot::capture(&memory)
            .save(&path)
            .with_context(|| format!("saving memory to {}", path.display()))?;
        info!(path = %path.display(), records = memory.len(), "memory saved");
    }

    Ok(())
}

/// Restore the memory from `snapshot` when it exists, otherwise start from
/// freshly seeded prior knowledge.
fn build_engine(config: &AppConfig, snapshot: Option<&Path>) -> Result<ActrEngine> {
    let player = config.session.engine_player;
    let seed = config.engine.seed;

    match snapshot.filter(|path| path.exists()) {
        Some(path) => {
            let memory = MemorySnapshot::load(path)
                .and_then(|snapshot| snapshot.restore(config.memory.clone(), seed))
                .with_context(|| format!("restoring memory from {}", path.display()))?;
            info!(path = %path.display(), records = memory.len(), "memory restored");
            Ok(ActrEngine::new(memory, player, config.engine.clone()))
        }
        None => {
            let memory = ChunkStore::new(config.memory.clone(), seed);
            Ok(ActrEngine::with_prior_knowledge(memory, player, config.engine.clone()))
        }
    }
}
