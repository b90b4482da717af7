//! Hoard: allocator-parameterised owned buffers and bound-aware slice views.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Hoard sub-crates. For most users, adding `hoard` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use hoard::prelude::*;
//!
//! let alloc = CountingAllocator::new();
//!
//! // Create, append, pop.
//! let mut buf = OwnedBuffer::new_in(&alloc);
//! for v in [1, 2, 3] {
//!     buf.push(v)?;
//! }
//! assert_eq!(buf.pop(), 3);
//! assert_eq!(buf, [1, 2]);
//!
//! // Views borrow the buffer; new buffers come from concat / repeat.
//! let joined = buf.as_slice().concat(Slice::from_std(&[7, 8]), &alloc)?;
//! assert_eq!(joined, [1, 2, 7, 8]);
//! let twice = buf.as_slice().repeat(2, &alloc)?;
//! assert_eq!(twice, [1, 2, 1, 2]);
//!
//! // Bound-Known views carry their length in the type.
//! let pair: FixedSlice<'_, i32, 2> = joined.fixed(2);
//! assert_eq!(pair.to_array(), [7, 8]);
//!
//! // Release hands every block back to the allocator.
//! twice.release();
//! joined.release();
//! buf.release();
//! alloc.assert_balanced();
//! # Ok::<(), BufferError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`alloc`] | `hoard-core` | `Allocator` trait, `Global`, `CountingAllocator`, `AllocError` |
//! | [`buffer`] | `hoard-buffer` | `OwnedBuffer`, `Slice`, `SliceMut`, `FixedSlice`, `BufferConfig`, `BufferError` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Allocator boundary (`hoard-core`).
///
/// Implement [`alloc::Allocator`] to plug a custom memory source into
/// [`buffer::OwnedBuffer`]; use [`alloc::CountingAllocator`] to audit that
/// every block is returned.
pub use hoard_core as alloc;

/// Owned buffers and slice views (`hoard-buffer`).
pub use hoard_buffer as buffer;

/// Common imports for typical Hoard usage.
///
/// ```rust
/// use hoard::prelude::*;
/// ```
pub mod prelude {
    // Allocators
    pub use hoard_core::{AllocError, Allocator, CountingAllocator, Global};

    // Buffers and views
    pub use hoard_buffer::{
        BufferConfig, BufferError, FixedSlice, OwnedBuffer, Slice, SliceMut,
    };
}
