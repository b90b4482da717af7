//! Benchmark workloads for the Hoard buffer library.
//!
//! Provides pre-built workloads shared by the Criterion benches:
//!
//! - [`fill_buffer`]: append `n` values to an empty buffer
//! - [`record_stream`]: a byte stream of fixed-width records
//! - [`APPEND_SIZES`]: element counts used across the append benches

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use hoard_buffer::{BufferError, OwnedBuffer};
use hoard_core::Allocator;

/// Element counts exercised by the append benches.
pub const APPEND_SIZES: [usize; 3] = [1_000, 100_000, 1_000_000];

/// Width in bytes of one record in [`record_stream`].
pub const RECORD_WIDTH: usize = 16;

/// Append `0..n` to a fresh buffer drawn from `alloc`.
pub fn fill_buffer<A: Allocator>(n: usize, alloc: A) -> Result<OwnedBuffer<u64, A>, BufferError> {
    let mut buf = OwnedBuffer::new_in(alloc);
    for v in 0..n as u64 {
        buf.push(v)?;
    }
    Ok(buf)
}

/// `records` fixed-width records whose bytes count up from the record index.
pub fn record_stream(records: usize) -> Vec<u8> {
    (0..records * RECORD_WIDTH)
        .map(|i| ((i / RECORD_WIDTH) as u8).wrapping_add((i % RECORD_WIDTH) as u8))
        .collect()
}
