//! # PNG Chunk Stream
//!
//! Minimal, non-validating view of the PNG container, just enough structure
//! to aim mutations at chunk boundaries.
//!
//! ## Chunk layout
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      Length (32, big-endian)                   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      Type tag (4 ASCII bytes)                  |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      Data (Length bytes) ...                   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                      CRC-32 (32, big-endian)                   |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The stream starts after the 8-byte signature. Nothing here trusts the
//! length field: the walker stops at the first chunk that does not fit.

use bytes::{Buf, BufMut};
use std::fmt;

// ─── Constants ───────────────────────────────────────────────────────────────

/// The 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Offset of the first chunk header.
pub const SIGNATURE_LEN: usize = PNG_SIGNATURE.len();

/// Fixed per-chunk overhead: 4 (length) + 4 (type) + 4 (CRC).
pub const CHUNK_OVERHEAD: usize = 12;

// ─── Big-endian codec ────────────────────────────────────────────────────────

/// Read a big-endian u32 at `offset`. Returns `None` if fewer than 4 bytes remain.
#[inline]
pub fn read_be32(buf: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let mut field = buf.get(offset..end)?;
    Some(field.get_u32())
}

/// Write a big-endian u32 at `offset`. Returns `false` (and writes nothing)
/// if fewer than 4 bytes remain.
#[inline]
pub fn write_be32(buf: &mut [u8], offset: usize, value: u32) -> bool {
    let Some(end) = offset.checked_add(4) else {
        return false;
    };
    match buf.get_mut(offset..end) {
        Some(mut field) => {
            field.put_u32(value);
            true
        }
        None => false,
    }
}

/// Whether `buf` starts with the PNG signature.
#[inline]
pub fn is_png(buf: &[u8]) -> bool {
    buf.len() >= SIGNATURE_LEN && buf[..SIGNATURE_LEN] == PNG_SIGNATURE
}

// ─── Chunk Type ──────────────────────────────────────────────────────────────

/// A 4-byte chunk type tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Image header, mandatory first chunk.
    pub const IHDR: Self = Self(*b"IHDR");
    /// Compressed image data.
    pub const IDAT: Self = Self(*b"IDAT");
    /// Image trailer, mandatory last chunk.
    pub const IEND: Self = Self(*b"IEND");

    /// Tag as a big-endian integer, as it sits on the wire.
    pub fn to_be_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl From<u32> for ChunkType {
    fn from(raw: u32) -> Self {
        ChunkType(raw.to_be_bytes())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

// ─── Chunk Descriptor ────────────────────────────────────────────────────────

/// Location of one fully-present chunk inside a buffer.
///
/// Only produced by [`Chunks`], which guarantees that the whole chunk
/// (header, data and CRC) lies inside the buffer it walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDescriptor {
    /// Offset of the length field.
    pub offset: usize,
    /// Declared data length.
    pub length: u32,
    /// Type tag.
    pub kind: ChunkType,
}

impl ChunkDescriptor {
    #[inline]
    pub fn data_len(&self) -> usize {
        self.length as usize
    }

    /// Header + data + CRC.
    #[inline]
    pub fn total_len(&self) -> usize {
        CHUNK_OVERHEAD + self.data_len()
    }

    /// Offset of the first data byte.
    #[inline]
    pub fn data_offset(&self) -> usize {
        self.offset + 8
    }

    /// Offset of the 4-byte CRC field.
    #[inline]
    pub fn crc_offset(&self) -> usize {
        self.data_offset() + self.data_len()
    }

    /// One past the last byte of the chunk.
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.total_len()
    }
}

// ─── Chunk Walker ────────────────────────────────────────────────────────────

/// Lazy iterator over the chunks of a PNG stream.
///
/// Starts at offset 8 and stops, without error, at the first header that is
/// truncated or whose declared length overruns the buffer. Each step advances
/// by at least [`CHUNK_OVERHEAD`] bytes, so the walk always terminates.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Chunks<'a> {
    /// Walk `buf` from just after the signature. The signature itself is not checked.
    pub fn new(buf: &'a [u8]) -> Self {
        Self::from_offset(buf, SIGNATURE_LEN)
    }

    pub fn from_offset(buf: &'a [u8], offset: usize) -> Self {
        Chunks { buf, offset }
    }
}

impl Iterator for Chunks<'_> {
    type Item = ChunkDescriptor;

    fn next(&mut self) -> Option<ChunkDescriptor> {
        let offset = self.offset;
        if offset.checked_add(CHUNK_OVERHEAD)? > self.buf.len() {
            return None;
        }
        let length = read_be32(self.buf, offset)?;
        let kind = ChunkType::from(read_be32(self.buf, offset + 4)?);

        let end = offset
            .checked_add(CHUNK_OVERHEAD)?
            .checked_add(length as usize)?;
        if end > self.buf.len() {
            // Park at the end so subsequent calls stay exhausted.
            self.offset = self.buf.len();
            return None;
        }

        self.offset = end;
        Some(ChunkDescriptor {
            offset,
            length,
            kind,
        })
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}
