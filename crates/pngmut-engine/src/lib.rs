//! # pngmut-engine
//!
//! Structure-aware PNG mutation engine for coverage-guided fuzzing.
//!
//! Walks the chunk stream of a candidate PNG, draws one of a fixed set of
//! weighted strategies, and applies a single targeted corruption (CRC bit
//! flips, bogus lengths, duplicated or dropped chunks, damaged IHDR/IDAT
//! payloads) while keeping the signature intact so decoders get past their
//! first check.
//!
//! ## Crate structure
//!
//! - [`wire`] — Big-endian fields, signature check, chunk walker
//! - [`strategy`] — Weighted strategy selection
//! - [`ops`] — The mutation operations
//! - [`buffer`] — Capacity-tracked working buffer
//! - [`engine`] — `Mutator`: generator + buffer + per-call flow
//! - [`config`] — TOML-backed engine configuration
//! - [`stats`] — Per-strategy counters and last-call outcome
//! - [`afl`] — AFL++ custom mutator C ABI

pub mod afl;
pub mod buffer;
pub mod config;
pub mod engine;
pub mod ops;
pub mod stats;
pub mod strategy;
pub mod wire;

pub use config::MutatorConfig;
pub use engine::Mutator;
pub use strategy::Strategy;
