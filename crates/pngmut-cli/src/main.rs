//! pngmut
//!
//! Offline driver for the structure-aware PNG mutator. Useful for building a
//! starting corpus, reproducing a seed/strategy combination outside the
//! fuzzer, or eyeballing what each strategy does to a file.

mod driver;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pngmut_engine::{MutatorConfig, Strategy};

/// Generate structure-aware PNG mutations from a seed file.
#[derive(Parser, Debug)]
#[command(name = "pngmut", about = "Structure-aware PNG mutator")]
struct Cli {
    /// Seed PNG file.
    input: PathBuf,

    /// Directory the mutated candidates are written to.
    #[arg(long, short)]
    out: PathBuf,

    /// Number of candidates to generate.
    #[arg(long, short = 'n', default_value_t = 100)]
    iterations: u64,

    /// Generator seed.
    #[arg(long, env = "PNGMUT_SEED", default_value_t = 0)]
    seed: u64,

    /// Maximum output size in bytes.
    #[arg(long, default_value_t = 1 << 20)]
    max_size: usize,

    /// Force a single strategy (e.g. `duplicate-chunk`).
    #[arg(long)]
    strategy: Option<Strategy>,

    /// Mutate the previous output instead of the seed each round.
    #[arg(long, default_value_t = false)]
    chain: bool,

    /// Engine config file (TOML).
    #[arg(long, env = "PNGMUT_CONFIG")]
    config: Option<PathBuf>,

    /// Print engine statistics as JSON when done.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .compact()
        .init();

    let cli = Cli::parse();

    let engine = match &cli.config {
        Some(path) => MutatorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MutatorConfig::default(),
    };

    let summary = driver::run(&driver::RunConfig {
        input: cli.input,
        out_dir: cli.out,
        iterations: cli.iterations,
        seed: cli.seed,
        max_size: cli.max_size,
        strategy: cli.strategy,
        chain: cli.chain,
        engine,
    })?;

    tracing::info!(
        files = summary.files_written,
        bytes = summary.bytes_written,
        applied_ratio = summary.stats.applied_ratio(),
        "mutation run complete"
    );

    if cli.stats {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
