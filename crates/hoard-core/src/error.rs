//! Allocator error types.

use std::error::Error;
use std::fmt;

/// Errors reported at the allocator boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The allocator could not supply a block of the requested layout.
    OutOfMemory {
        /// Requested block size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
}

impl AllocError {
    /// Number of bytes the failed request asked for.
    pub fn requested_bytes(&self) -> usize {
        match self {
            Self::OutOfMemory { size, .. } => *size,
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { size, align } => {
                write!(f, "out of memory: requested {size} bytes (align {align})")
            }
        }
    }
}

impl Error for AllocError {}
