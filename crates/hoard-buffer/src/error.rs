//! Buffer-specific error types.
//!
//! Only recoverable conditions live here. Lifecycle violations (popping an
//! empty buffer, indexing past the end of a view, malformed ranges) are
//! programming errors and panic at the point of detection.

use std::error::Error;
use std::fmt;

use hoard_core::AllocError;

/// Errors that can occur during buffer and slice operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The allocator could not satisfy a storage request, or the requested
    /// element count does not fit in addressable memory.
    OutOfMemory {
        /// Number of bytes requested (saturated on overflow).
        requested_bytes: usize,
    },
    /// An argument was outside its accepted domain.
    InvalidArgument {
        /// Human-readable description of the rejected argument.
        reason: String,
    },
}

impl BufferError {
    /// Out-of-memory error for `count` elements of `T` that overflowed
    /// address arithmetic before reaching the allocator.
    pub(crate) fn capacity_overflow<T>(count: usize) -> Self {
        Self::OutOfMemory {
            requested_bytes: count.saturating_mul(std::mem::size_of::<T>()),
        }
    }
}

impl From<AllocError> for BufferError {
    fn from(err: AllocError) -> Self {
        Self::OutOfMemory {
            requested_bytes: err.requested_bytes(),
        }
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested_bytes } => {
                write!(f, "out of memory: requested {requested_bytes} bytes")
            }
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
        }
    }
}

impl Error for BufferError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_error_converts_verbatim() {
        let err: BufferError = AllocError::OutOfMemory { size: 128, align: 8 }.into();
        assert_eq!(
            err,
            BufferError::OutOfMemory {
                requested_bytes: 128
            }
        );
    }

    #[test]
    fn capacity_overflow_saturates() {
        let err = BufferError::capacity_overflow::<u64>(usize::MAX);
        assert_eq!(
            err,
            BufferError::OutOfMemory {
                requested_bytes: usize::MAX
            }
        );
    }

    #[test]
    fn display_messages() {
        let oom = BufferError::OutOfMemory { requested_bytes: 8 };
        assert_eq!(oom.to_string(), "out of memory: requested 8 bytes");
        let bad = BufferError::InvalidArgument {
            reason: "count is -1".into(),
        };
        assert_eq!(bad.to_string(), "invalid argument: count is -1");
    }
}
