//! Mutation run: read a seed, drive the engine, write candidates.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use pngmut_engine::stats::MutationStats;
use pngmut_engine::wire::is_png;
use pngmut_engine::{Mutator, MutatorConfig, Strategy};

/// Parameters for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub iterations: u64,
    pub seed: u64,
    pub max_size: usize,
    /// Force one strategy instead of drawing.
    pub strategy: Option<Strategy>,
    /// Feed each output back in as the next candidate.
    pub chain: bool,
    pub engine: MutatorConfig,
}

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub iterations: u64,
    pub files_written: u64,
    pub bytes_written: u64,
    pub stats: MutationStats,
}

/// Output file for iteration `i`.
pub fn candidate_path(out_dir: &Path, i: u64) -> PathBuf {
    out_dir.join(format!("mut_{i:06}.png"))
}

pub fn run(cfg: &RunConfig) -> Result<RunSummary> {
    let seed_bytes = fs::read(&cfg.input)
        .with_context(|| format!("failed to read seed file {}", cfg.input.display()))?;
    if !is_png(&seed_bytes) {
        bail!(
            "{} does not start with a PNG signature; the engine would pass it through unchanged",
            cfg.input.display()
        );
    }
    fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("failed to create {}", cfg.out_dir.display()))?;

    info!(
        input = %cfg.input.display(),
        len = seed_bytes.len(),
        seed = cfg.seed,
        iterations = cfg.iterations,
        strategy = ?cfg.strategy,
        chain = cfg.chain,
        "starting mutation run"
    );

    let mut mutator = Mutator::with_config(cfg.seed, cfg.engine.clone());
    let mut candidate = seed_bytes;
    let mut files_written = 0;
    let mut bytes_written = 0;

    for i in 0..cfg.iterations {
        let output = match cfg.strategy {
            Some(strategy) => mutator.mutate_with(&candidate, cfg.max_size, strategy),
            None => mutator.mutate(&candidate, cfg.max_size),
        }
        .to_vec();

        let path = candidate_path(&cfg.out_dir, i);
        fs::write(&path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?;
        files_written += 1;
        bytes_written += output.len() as u64;

        if let Some(outcome) = mutator.last_outcome() {
            debug!(
                i,
                strategy = ?outcome.strategy,
                applied = outcome.applied,
                len = outcome.output_len,
                "candidate written"
            );
        }

        if cfg.chain {
            candidate = output;
        }
    }

    Ok(RunSummary {
        iterations: cfg.iterations,
        files_written,
        bytes_written,
        stats: mutator.stats().clone(),
    })
}
