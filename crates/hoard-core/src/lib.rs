//! Allocator boundary for the Hoard buffer library.
//!
//! This is the leaf crate with zero internal dependencies. It defines how
//! buffers obtain and give back raw storage: the [`Allocator`] trait, the
//! process-wide [`Global`] allocator, the instrumented
//! [`CountingAllocator`], and the [`AllocError`] they report.
//!
//! Every block an allocator issues must be handed back to the same
//! allocator exactly once, with the layout it was requested with.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
pub mod counting;
pub mod error;

pub use alloc::{Allocator, Global};
pub use counting::{AllocStats, CountingAllocator};
pub use error::AllocError;
