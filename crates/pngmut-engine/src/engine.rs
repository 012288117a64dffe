//! # Mutation Engine
//!
//! Pure logic, no I/O. One [`Mutator`] owns a seeded generator and a single
//! [`WorkingBuffer`]; each `mutate` call refreshes the buffer from the
//! candidate, draws a strategy, applies it and lends the result back.
//!
//! ## Per-call flow
//!
//! 1. **Signature gate**: non-PNG input is handed straight back
//! 2. **Buffer refresh**: fresh allocation of `min(len + slack, max_size)`
//! 3. **Strategy draw**: one selector draw from the engine's generator
//! 4. **Length gate**: inputs below `min_mutable_len` come back as a plain copy
//! 5. **Operation**: one in-place edit of the working buffer
//!
//! The returned slice borrows the engine, so it cannot outlive the next call.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

use crate::buffer::WorkingBuffer;
use crate::config::MutatorConfig;
use crate::ops::{self, OpParams};
use crate::stats::{MutationOutcome, MutationStats};
use crate::strategy::{self, Strategy};
use crate::wire::is_png;

/// Structure-aware PNG mutator.
#[derive(Debug)]
pub struct Mutator {
    config: MutatorConfig,
    params: OpParams,
    rng: StdRng,
    buffer: WorkingBuffer,
    stats: MutationStats,
    last: Option<MutationOutcome>,
}

impl Mutator {
    /// Create a mutator with the default configuration.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, MutatorConfig::default())
    }

    /// Create a mutator with the given configuration.
    ///
    /// The configuration is expected to have passed
    /// [`MutatorConfig::validate`]; an invalid one still never panics.
    pub fn with_config(seed: u64, config: MutatorConfig) -> Self {
        Mutator {
            params: config.op_params(),
            config,
            rng: StdRng::seed_from_u64(seed),
            buffer: WorkingBuffer::new(),
            stats: MutationStats::new(),
            last: None,
        }
    }

    /// Mutate `input` with a randomly drawn strategy.
    ///
    /// Returns either `input` itself (not a PNG, or allocation failure) or a
    /// view of the working buffer. The result never exceeds `max_size` bytes.
    pub fn mutate<'a>(&'a mut self, input: &'a [u8], max_size: usize) -> &'a [u8] {
        self.run(input, max_size, None)
    }

    /// Mutate `input` with a fixed strategy. No selector draw is consumed.
    pub fn mutate_with<'a>(
        &'a mut self,
        input: &'a [u8],
        max_size: usize,
        strategy: Strategy,
    ) -> &'a [u8] {
        self.run(input, max_size, Some(strategy))
    }

    fn run<'a>(
        &'a mut self,
        input: &'a [u8],
        max_size: usize,
        forced: Option<Strategy>,
    ) -> &'a [u8] {
        self.stats.invocations += 1;
        let passthrough = &input[..input.len().min(max_size)];

        if !is_png(input) {
            debug!(len = input.len(), "not a PNG stream, passing through");
            self.stats.passthrough += 1;
            self.finish(None, false, input.len(), passthrough.len());
            return passthrough;
        }

        let capacity = self.config.growth_target(input.len(), max_size);
        if let Err(err) = self.buffer.refresh(input, capacity) {
            warn!(%err, capacity, "working buffer allocation failed, passing candidate through");
            self.stats.alloc_failures += 1;
            self.finish(None, false, input.len(), passthrough.len());
            return passthrough;
        }

        // Drawn before the length gate so short inputs advance the generator too.
        let strategy = forced.unwrap_or_else(|| strategy::select(&mut self.rng));

        let applied = if self.buffer.len() < self.config.min_mutable_len {
            trace!(len = self.buffer.len(), "input too short to mutate");
            self.stats.too_short += 1;
            false
        } else {
            let applied = ops::apply(strategy, &mut self.buffer, &mut self.rng, &self.params);
            trace!(%strategy, applied, len = self.buffer.len(), "mutation");
            self.stats.record(strategy, applied);
            applied
        };

        self.finish(Some(strategy), applied, input.len(), self.buffer.len());
        self.buffer.as_slice()
    }

    fn finish(
        &mut self,
        strategy: Option<Strategy>,
        applied: bool,
        input_len: usize,
        output_len: usize,
    ) {
        self.stats.bytes_out += output_len as u64;
        self.last = Some(MutationOutcome {
            strategy,
            applied,
            input_len,
            output_len,
        });
    }

    /// Outcome of the most recent call.
    pub fn last_outcome(&self) -> Option<&MutationOutcome> {
        self.last.as_ref()
    }

    pub fn stats(&self) -> &MutationStats {
        &self.stats
    }

    /// The working buffer as left by the last structural call.
    pub fn buffer(&self) -> &WorkingBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::PNG_SIGNATURE;

    fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = (data.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(data);
        out.extend_from_slice(&[0; 4]);
        out
    }

    fn sample() -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        out.extend(chunk(b"IHDR", &[0; 13]));
        out.extend(chunk(b"IDAT", &[0x78, 0x9C, 1, 2, 3, 4]));
        out.extend(chunk(b"IEND", &[]));
        out
    }

    #[test]
    fn non_png_passes_through() {
        let mut m = Mutator::new(1);
        let input = b"GIF89a-not-a-png-at-all".to_vec();
        let out = m.mutate(&input, 1 << 16);
        assert_eq!(out.as_ptr(), input.as_ptr());
        assert_eq!(out, &input[..]);
        assert_eq!(m.stats().passthrough, 1);
        assert_eq!(m.last_outcome().unwrap().strategy, None);
    }

    #[test]
    fn short_png_is_copied() {
        let mut m = Mutator::new(1);
        let mut input = PNG_SIGNATURE.to_vec();
        input.extend_from_slice(&[1, 2, 3, 4, 5]);
        let out = m.mutate(&input, 1 << 16);
        assert_ne!(out.as_ptr(), input.as_ptr());
        assert_eq!(out, &input[..]);
        assert_eq!(m.stats().too_short, 1);
        assert!(!m.last_outcome().unwrap().applied);
    }

    #[test]
    fn capacity_follows_growth_target() {
        let mut m = Mutator::new(1);
        let input = sample();
        m.mutate(&input, 1 << 16);
        assert_eq!(m.buffer().capacity(), input.len() + 4096);

        m.mutate(&input, input.len() + 3);
        assert_eq!(m.buffer().capacity(), input.len() + 3);
    }

    #[test]
    fn oversized_candidate_is_truncated() {
        let mut m = Mutator::new(9);
        let input = sample();
        let out = m.mutate(&input, 30);
        assert!(out.len() <= 30);
        assert_eq!(&out[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn allocation_failure_returns_candidate() {
        let config = MutatorConfig {
            slack: usize::MAX,
            ..MutatorConfig::default()
        };
        let mut m = Mutator::with_config(2, config);
        let input = sample();
        let out = m.mutate(&input, usize::MAX);
        assert_eq!(out.as_ptr(), input.as_ptr());
        assert_eq!(out, &input[..]);
        assert_eq!(m.stats().alloc_failures, 1);
        assert_eq!(m.stats().passthrough, 0);
        let outcome = m.last_outcome().unwrap();
        assert_eq!(outcome.strategy, None);
        assert!(!outcome.applied);
    }

    #[test]
    fn forced_strategy_is_reported() {
        let mut m = Mutator::new(3);
        let input = sample();
        let out = m.mutate_with(&input, 1 << 16, Strategy::RemoveChunk).to_vec();
        assert_eq!(out.len(), input.len() - 18);
        let outcome = m.last_outcome().unwrap();
        assert_eq!(outcome.strategy, Some(Strategy::RemoveChunk));
        assert!(outcome.applied);
        assert_eq!(outcome.output_len, out.len());
        assert_eq!(m.stats().strategy(Strategy::RemoveChunk).applied, 1);
    }

    #[test]
    fn same_seed_same_outputs() {
        let input = sample();
        let mut a = Mutator::new(0xDEAD_BEEF);
        let mut b = Mutator::new(0xDEAD_BEEF);
        for _ in 0..100 {
            let oa = a.mutate(&input, 1 << 16).to_vec();
            let ob = b.mutate(&input, 1 << 16).to_vec();
            assert_eq!(oa, ob);
            assert_eq!(a.last_outcome(), b.last_outcome());
        }
    }

    #[test]
    fn stats_track_bytes_out() {
        let mut m = Mutator::new(5);
        let input = sample();
        let mut total = 0u64;
        for _ in 0..10 {
            total += m.mutate(&input, 1 << 16).len() as u64;
        }
        assert_eq!(m.stats().invocations, 10);
        assert_eq!(m.stats().bytes_out, total);
    }

    #[test]
    fn mutator_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Mutator>();
    }
}
