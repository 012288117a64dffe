#![no_main]

use libfuzzer_sys::fuzz_target;
use pngmut_engine::wire::{is_png, PNG_SIGNATURE};
use pngmut_engine::{Mutator, Strategy};

/// Fuzz the mutation engine itself.
///
/// The first 9 bytes pick the seed and the host maximum; the rest is the
/// candidate, with the PNG signature prepended half of the time so the
/// structural path is reached. The engine must never panic, must respect
/// `max_size`, and must leave the signature alone.
fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let seed = u64::from_le_bytes(data[..8].try_into().unwrap());
    let max_size = (data[8] as usize) * 16;
    let body = &data[9..];

    let candidate = if seed & 1 == 0 {
        [&PNG_SIGNATURE[..], body].concat()
    } else {
        body.to_vec()
    };

    let mut m = Mutator::new(seed);
    let mut prev = candidate.clone();
    for _ in 0..4 {
        let out = m.mutate(&prev, max_size).to_vec();
        assert!(out.len() <= max_size);
        if is_png(&prev) && out.len() >= 8 {
            assert_eq!(&out[..8], &PNG_SIGNATURE);
        }
        prev = out;
    }

    // Every strategy, forced, on the original candidate.
    for strategy in Strategy::ALL {
        let out = m.mutate_with(&candidate, 1 << 16, strategy);
        assert!(out.len() <= 1 << 16);
    }
});
