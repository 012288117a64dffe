#![no_main]

use libfuzzer_sys::fuzz_target;
use pngmut_engine::wire::{read_be32, Chunks, CHUNK_OVERHEAD};

/// Fuzz the chunk walker on arbitrary bytes.
///
/// Every descriptor it yields must lie fully inside the buffer, descriptors
/// must be contiguous, and the declared length must match the wire.
fuzz_target!(|data: &[u8]| {
    let mut expected_offset = 8;
    for chunk in Chunks::new(data) {
        assert_eq!(chunk.offset, expected_offset);
        assert!(chunk.end() <= data.len());
        assert_eq!(chunk.total_len(), CHUNK_OVERHEAD + chunk.length as usize);
        assert_eq!(read_be32(data, chunk.offset), Some(chunk.length));
        expected_offset = chunk.end();
    }
});
