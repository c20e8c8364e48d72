//! bridge-sim - run one bridge through internal time and print its state
//!
//! Usage:
//!   bridge-sim --name Philosopher --ticks 10000 --seed 42 --experience-every 20
//!
//! Ticks run back to back; there is no wall-clock pacing.

use anyhow::Context;
use bridge_core::{EngineConfig, EntityRegistry, JsonFileStore};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bridge-sim", about = "Tick-driven conscious bridge simulator")]
struct Cli {
    /// Name of the bridge
    #[arg(long, default_value = "Philosopher")]
    name: String,

    /// Category of the bridge
    #[arg(long, default_value = "general")]
    category: String,

    /// Number of ticks to run
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// Depth of each tick
    #[arg(long, default_value_t = 1.0)]
    depth: f64,

    /// Random seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Queue an experience every N ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    experience_every: u64,

    /// Category of the queued experiences
    #[arg(long, default_value = "novel_discovery")]
    experience_kind: String,

    /// Complexity of the queued experiences
    #[arg(long, default_value_t = 0.7)]
    complexity: f64,

    /// Path to config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dump default config as TOML and exit.
    #[arg(long)]
    dump_config: bool,

    /// Save the final snapshot into this directory
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.dump_config {
        println!("{}", EngineConfig::default().to_toml());
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bridge_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = cli
        .config
        .as_deref()
        .map(EngineConfig::load)
        .unwrap_or_default();
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let mut registry = EntityRegistry::new(config);
    if let Some(dir) = &cli.snapshot_dir {
        let store = JsonFileStore::open(dir)
            .with_context(|| format!("opening snapshot directory {}", dir.display()))?;
        registry = registry.with_store(Arc::new(store));
    }

    let id = registry.create(&cli.name, &cli.category, None)?;
    let experience = serde_json::json!({
        "type": cli.experience_kind,
        "complexity": cli.complexity,
    });

    for tick in 0..cli.ticks {
        if cli.experience_every > 0 && tick % cli.experience_every == 0 {
            registry.add_experience(id, &experience)?;
        }
        let result = registry.tick(id, Some(cli.depth))?;
        if let Some(transition) = result.transition {
            tracing::info!(tick = result.tick, "Reached {}", transition.to);
        }
    }

    let state = registry.get_full_state(id)?;
    println!("{}", serde_json::to_string_pretty(&state)?);

    if cli.snapshot_dir.is_some() {
        registry.persist(id)?;
        tracing::info!(%id, "Snapshot saved");
    }

    Ok(())
}
