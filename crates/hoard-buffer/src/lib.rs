//! Allocator-backed growable buffers and slice views.
//!
//! Provides [`OwnedBuffer`], a move-only growable store that remembers the
//! allocator its storage came from, and three non-owning views over
//! contiguous elements. This is the only Hoard crate besides `hoard-core`
//! that may contain `unsafe` code, and it is confined to `raw.rs` and
//! `buffer.rs`.
//!
//! # Architecture
//!
//! ```text
//! OwnedBuffer<T, A: Allocator> (owner, explicit release or Drop)
//! ├── RawStorage<T>   (pointer + capacity, grown by relocation)
//! ├── A               (the allocator that issued the storage)
//! └── BufferConfig    (initial capacity, growth factor)
//!
//! Slice<'a, T>            Bound-Deferred read view
//! ├── SliceMut<'a, T>     writable view
//! └── FixedSlice<'a, T, N> Bound-Known refinement (length in the type)
//! ```
//!
//! # Lifecycle
//!
//! - `create`: [`OwnedBuffer::new_in`] (no allocation).
//! - `append`: [`OwnedBuffer::push`], amortised O(1) by geometric growth.
//! - `release`: [`OwnedBuffer::release`] consumes the buffer. Dropping it
//!   does the same, so storage goes back to its allocator exactly once on
//!   every exit path.
//!
//! Views borrow the buffer. Growing or releasing it while a view is alive
//! is a compile error rather than a runtime check.
//!
//! # Failure policy
//!
//! Allocator refusals surface as [`BufferError::OutOfMemory`] and leave
//! the buffer unchanged. Negative repetition counts and bad configs are
//! [`BufferError::InvalidArgument`]. Popping an empty buffer and indexing
//! out of range are programming errors and panic.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod fixed;
mod ops;
mod raw;
pub mod slice;

// Public re-exports for the primary API surface.
pub use buffer::OwnedBuffer;
pub use config::BufferConfig;
pub use error::BufferError;
pub use fixed::{FixedSlice, Records};
pub use slice::{Slice, SliceMut};
