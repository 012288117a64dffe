//! # Mutation Operations
//!
//! Each operation edits the [`WorkingBuffer`] in place and returns whether it
//! changed anything. A failed precondition (no chunks, zero-length payload,
//! empty offset range, no capacity) is a no-op, never an error.
//!
//! No operation writes below offset 8, and none recomputes a CRC.

use rand::{Rng, RngExt};

use crate::buffer::WorkingBuffer;
use crate::strategy::Strategy;
use crate::wire::{read_be32, write_be32, ChunkType, Chunks, CHUNK_OVERHEAD, SIGNATURE_LEN};

/// Tuning knobs shared by the operations.
#[derive(Debug, Clone, Copy)]
pub struct OpParams {
    /// Exclusive upper bound of the delta added to / subtracted from a length field.
    pub length_delta_max: u32,
}

impl Default for OpParams {
    fn default() -> Self {
        OpParams {
            length_delta_max: 256,
        }
    }
}

/// Run `strategy` against `buf`.
pub fn apply(
    strategy: Strategy,
    buf: &mut WorkingBuffer,
    rng: &mut impl Rng,
    params: &OpParams,
) -> bool {
    match strategy {
        Strategy::CorruptChecksum => corrupt_checksum(buf, rng),
        Strategy::TamperLength => tamper_length(buf, rng, params.length_delta_max),
        Strategy::FlipHeaderBit => flip_header_bit(buf, rng),
        Strategy::DuplicateChunk => duplicate_chunk(buf, rng),
        Strategy::CorruptChunkType => corrupt_chunk_type(buf, rng),
        Strategy::CorruptImageData => corrupt_image_data(buf, rng),
        Strategy::RemoveChunk => remove_chunk(buf),
        Strategy::FlipRandomByte => flip_random_byte(buf, rng),
    }
}

/// Uniformly random offset in `[SIGNATURE_LEN, SIGNATURE_LEN + span)`.
fn offset_past_signature(rng: &mut impl Rng, span: usize) -> Option<usize> {
    if span == 0 {
        return None;
    }
    Some(SIGNATURE_LEN + rng.random_range(0..span))
}

/// Flip one bit of the CRC of a uniformly chosen chunk.
pub fn corrupt_checksum(buf: &mut WorkingBuffer, rng: &mut impl Rng) -> bool {
    let count = Chunks::new(buf.as_slice()).count();
    if count == 0 {
        return false;
    }
    let target = rng.random_range(0..count);
    let Some(chunk) = Chunks::new(buf.as_slice()).nth(target) else {
        return false;
    };

    let data = buf.as_mut_slice();
    let Some(crc) = read_be32(data, chunk.crc_offset()) else {
        return false;
    };
    let bit = rng.random_range(0..32u32);
    write_be32(data, chunk.crc_offset(), crc ^ (1 << bit))
}

/// Treat 4 bytes at a random offset as a length field and skew it.
///
/// The offset ignores chunk boundaries; landing mid-field is intended.
pub fn tamper_length(buf: &mut WorkingBuffer, rng: &mut impl Rng, delta_max: u32) -> bool {
    let len = buf.len();
    let Some(offset) = offset_past_signature(rng, len.saturating_sub(SIGNATURE_LEN)) else {
        return false;
    };
    let data = buf.as_mut_slice();
    let Some(value) = read_be32(data, offset) else {
        return false;
    };

    let tampered = match rng.random_range(0..4u8) {
        0 => value.wrapping_add(rng.random_range(0..delta_max.max(1))),
        1 => value.wrapping_sub(rng.random_range(0..delta_max.max(1))),
        2 => u32::MAX,
        _ => 0,
    };
    write_be32(data, offset, tampered)
}

/// Flip one bit inside the IHDR payload, if the stream opens with IHDR.
pub fn flip_header_bit(buf: &mut WorkingBuffer, rng: &mut impl Rng) -> bool {
    let Some(chunk) = Chunks::new(buf.as_slice()).next() else {
        return false;
    };
    if chunk.kind != ChunkType::IHDR || chunk.length == 0 {
        return false;
    }

    let byte = rng.random_range(0..chunk.data_len());
    let bit = rng.random_range(0..8u8);
    buf.as_mut_slice()[chunk.data_offset() + byte] ^= 1 << bit;
    true
}

/// Insert a copy of a uniformly chosen chunk directly after it.
pub fn duplicate_chunk(buf: &mut WorkingBuffer, rng: &mut impl Rng) -> bool {
    let count = Chunks::new(buf.as_slice()).count();
    if count == 0 {
        return false;
    }
    let target = rng.random_range(0..count);
    let Some(chunk) = Chunks::new(buf.as_slice()).nth(target) else {
        return false;
    };
    buf.duplicate_range(chunk.offset, chunk.total_len())
}

/// Overwrite one byte of the 4-byte field at `offset + 4`, where `offset` is
/// random in `[8, len - 12)`. Whether that field is really a type tag is not
/// checked.
pub fn corrupt_chunk_type(buf: &mut WorkingBuffer, rng: &mut impl Rng) -> bool {
    let span = buf.len().saturating_sub(SIGNATURE_LEN + CHUNK_OVERHEAD);
    let Some(offset) = offset_past_signature(rng, span) else {
        return false;
    };
    let pos = offset + 4 + rng.random_range(0..4usize);
    let value: u8 = rng.random();
    match buf.as_mut_slice().get_mut(pos) {
        Some(byte) => {
            *byte = value;
            true
        }
        None => false,
    }
}

/// Overwrite one byte inside the first IDAT payload.
pub fn corrupt_image_data(buf: &mut WorkingBuffer, rng: &mut impl Rng) -> bool {
    let Some(chunk) = Chunks::new(buf.as_slice()).find(|c| c.kind == ChunkType::IDAT) else {
        return false;
    };
    if chunk.length == 0 {
        return false;
    }

    let byte = rng.random_range(0..chunk.data_len());
    buf.as_mut_slice()[chunk.data_offset() + byte] = rng.random();
    true
}

/// Remove the first chunk that is neither IHDR nor IEND.
pub fn remove_chunk(buf: &mut WorkingBuffer) -> bool {
    let Some(chunk) = Chunks::new(buf.as_slice())
        .find(|c| c.kind != ChunkType::IHDR && c.kind != ChunkType::IEND)
    else {
        return false;
    };
    buf.remove_range(chunk.offset, chunk.total_len())
}

/// Overwrite one random byte past the signature.
pub fn flip_random_byte(buf: &mut WorkingBuffer, rng: &mut impl Rng) -> bool {
    let len = buf.len();
    let Some(pos) = offset_past_signature(rng, len.saturating_sub(SIGNATURE_LEN)) else {
        return false;
    };
    buf.as_mut_slice()[pos] = rng.random();
    true
}
