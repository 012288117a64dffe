//! # AFL++ Custom Mutator ABI
//!
//! C entry points picked up by AFL++ when the `cdylib` is loaded through
//! `AFL_CUSTOM_MUTATOR_LIBRARY`:
//!
//! - `afl_custom_init` — box a seeded [`Mutator`]
//! - `afl_custom_fuzz` — mutate one candidate, lend the result
//! - `afl_custom_deinit` — drop the mutator and its working buffer
//!
//! The buffer written to `*out_buf` stays owned by the mutator and is valid
//! until the next `afl_custom_fuzz` or `afl_custom_deinit` on the same handle.

use std::ffi::{c_uint, c_void, OsStr};
use std::slice;
use tracing::{info, warn};

use crate::config::MutatorConfig;
use crate::engine::Mutator;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV: &str = "PNGMUT_CONFIG";

/// Resolve the configuration from an optional path, falling back to
/// defaults when the file cannot be used.
pub fn config_from_path(path: Option<&OsStr>) -> MutatorConfig {
    let Some(path) = path else {
        return MutatorConfig::default();
    };
    match MutatorConfig::load(path) {
        Ok(config) => {
            info!(path = %path.to_string_lossy(), ?config, "loaded mutator config");
            config
        }
        Err(err) => {
            warn!(path = %path.to_string_lossy(), %err, "ignoring mutator config, using defaults");
            MutatorConfig::default()
        }
    }
}

#[no_mangle]
pub extern "C" fn afl_custom_init(_afl: *mut c_void, seed: c_uint) -> *mut c_void {
    let config = config_from_path(std::env::var_os(CONFIG_ENV).as_deref());
    let mutator = Box::new(Mutator::with_config(u64::from(seed), config));
    Box::into_raw(mutator).cast()
}

/// # Safety
///
/// `data` must be null or a handle returned by [`afl_custom_init`] that has
/// not been passed to [`afl_custom_deinit`]. `buf` must be null or valid for
/// reads of `buf_size` bytes. `out_buf` must be null or valid for a write.
/// Calls on one handle must not overlap.
#[no_mangle]
pub unsafe extern "C" fn afl_custom_fuzz(
    data: *mut c_void,
    buf: *mut u8,
    buf_size: usize,
    out_buf: *mut *mut u8,
    _add_buf: *mut u8,
    _add_buf_size: usize,
    max_size: usize,
) -> usize {
    if out_buf.is_null() {
        return 0;
    }
    if data.is_null() || buf.is_null() || buf_size == 0 {
        *out_buf = buf;
        return if buf.is_null() { 0 } else { buf_size };
    }

    let mutator = &mut *data.cast::<Mutator>();
    let input = slice::from_raw_parts(buf.cast_const(), buf_size);
    let output = mutator.mutate(input, max_size);

    // The host only reads through this pointer.
    *out_buf = output.as_ptr().cast_mut();
    output.len()
}

/// # Safety
///
/// `data` must be null or a handle returned by [`afl_custom_init`] that has
/// not already been released.
#[no_mangle]
pub unsafe extern "C" fn afl_custom_deinit(data: *mut c_void) {
    if data.is_null() {
        return;
    }
    drop(Box::from_raw(data.cast::<Mutator>()));
}
