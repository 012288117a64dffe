//! # Strategy Selection
//!
//! One uniform draw in `[0, 10)` per invocation. Checksum corruption and
//! length tampering each own two outcomes; every other strategy owns one.
//!
//! | draw | strategy |
//! |------|----------|
//! | 0, 1 | [`Strategy::CorruptChecksum`] |
//! | 2, 3 | [`Strategy::TamperLength`] |
//! | 4    | [`Strategy::FlipHeaderBit`] |
//! | 5    | [`Strategy::DuplicateChunk`] |
//! | 6    | [`Strategy::CorruptChunkType`] |
//! | 7    | [`Strategy::CorruptImageData`] |
//! | 8    | [`Strategy::RemoveChunk`] |
//! | 9    | [`Strategy::FlipRandomByte`] |

use rand::{Rng, RngExt};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of selector outcomes.
pub const STRATEGY_DRAWS: u32 = 10;

/// A structural mutation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum Strategy {
    /// Flip one bit of a random chunk's CRC.
    CorruptChecksum = 0,
    /// Rewrite 4 bytes at a random offset as a bogus length.
    TamperLength = 1,
    /// Flip one bit inside the IHDR payload.
    FlipHeaderBit = 2,
    /// Insert a copy of a random chunk right after it.
    DuplicateChunk = 3,
    /// Overwrite one byte of a (presumed) type tag.
    CorruptChunkType = 4,
    /// Overwrite one byte inside the first IDAT payload.
    CorruptImageData = 5,
    /// Drop the first ancillary or data chunk.
    RemoveChunk = 6,
    /// Overwrite one random byte past the signature.
    FlipRandomByte = 7,
}

impl Strategy {
    /// Every strategy, in selector order.
    pub const ALL: [Strategy; 8] = [
        Strategy::CorruptChecksum,
        Strategy::TamperLength,
        Strategy::FlipHeaderBit,
        Strategy::DuplicateChunk,
        Strategy::CorruptChunkType,
        Strategy::CorruptImageData,
        Strategy::RemoveChunk,
        Strategy::FlipRandomByte,
    ];

    /// Map a raw selector draw to a strategy. Anything outside `0..=8`
    /// falls back to [`Strategy::FlipRandomByte`].
    pub fn from_draw(draw: u32) -> Self {
        match draw {
            0 | 1 => Strategy::CorruptChecksum,
            2 | 3 => Strategy::TamperLength,
            4 => Strategy::FlipHeaderBit,
            5 => Strategy::DuplicateChunk,
            6 => Strategy::CorruptChunkType,
            7 => Strategy::CorruptImageData,
            8 => Strategy::RemoveChunk,
            _ => Strategy::FlipRandomByte,
        }
    }

    /// Dense index, usable for per-strategy counters.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::CorruptChecksum => "corrupt-checksum",
            Strategy::TamperLength => "tamper-length",
            Strategy::FlipHeaderBit => "flip-header-bit",
            Strategy::DuplicateChunk => "duplicate-chunk",
            Strategy::CorruptChunkType => "corrupt-chunk-type",
            Strategy::CorruptImageData => "corrupt-image-data",
            Strategy::RemoveChunk => "remove-chunk",
            Strategy::FlipRandomByte => "flip-random-byte",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a strategy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy `{0}`")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStrategy(s.to_owned()))
    }
}

/// Draw the next strategy from `rng`.
pub fn select(rng: &mut impl Rng) -> Strategy {
    Strategy::from_draw(rng.random_range(0..STRATEGY_DRAWS))
}
