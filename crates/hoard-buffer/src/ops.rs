//! Operations that build a new buffer from existing views.
//!
//! Concatenation and repetition always allocate: the result never aliases
//! its inputs. The output is sized once up front, so a successful call
//! makes at most one allocator request and a failed one leaves nothing
//! behind.

use hoard_core::Allocator;

use crate::buffer::OwnedBuffer;
use crate::error::BufferError;
use crate::slice::Slice;

impl<T: Clone> Slice<'_, T> {
    /// Copy this view followed by `other` into a new buffer drawn from `alloc`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if the allocator refuses or the
    /// combined length overflows.
    pub fn concat<A: Allocator>(
        &self,
        other: Slice<'_, T>,
        alloc: A,
    ) -> Result<OwnedBuffer<T, A>, BufferError> {
        let total = self
            .len()
            .checked_add(other.len())
            .ok_or_else(|| BufferError::capacity_overflow::<T>(usize::MAX))?;
        let mut out = OwnedBuffer::with_capacity_in(total, alloc)?;
        out.extend_from_slice(*self)?;
        out.extend_from_slice(other)?;
        log::trace!("concatenated {} + {} element(s)", self.len(), other.len());
        Ok(out)
    }

    /// Copy this view `count` times into a new buffer drawn from `alloc`.
    ///
    /// A count of zero yields an empty buffer without allocating.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidArgument`] if `count` is negative, or
    /// [`BufferError::OutOfMemory`] if the allocator refuses or the result
    /// length overflows.
    pub fn repeat<A: Allocator>(
        &self,
        count: i64,
        alloc: A,
    ) -> Result<OwnedBuffer<T, A>, BufferError> {
        if count < 0 {
            return Err(BufferError::InvalidArgument {
                reason: format!("repetition count must be non-negative, got {count}"),
            });
        }
        let count = usize::try_from(count)
            .map_err(|_| BufferError::capacity_overflow::<T>(usize::MAX))?;
        let total = self
            .len()
            .checked_mul(count)
            .ok_or_else(|| BufferError::capacity_overflow::<T>(usize::MAX))?;

        let mut out = OwnedBuffer::with_capacity_in(total, alloc)?;
        if total == 0 {
            return Ok(out);
        }
        for _ in 0..count {
            out.extend_from_slice(*self)?;
        }
        log::trace!("repeated {} element(s) {count} time(s)", self.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoard_core::{CountingAllocator, Global};
    use hoard_test_utils::FailingAllocator;

    #[test]
    fn concat_hello_world() {
        let hello = Slice::from_std(b"hello");
        let world = Slice::from_std(b"world");
        let joined = hello.concat(world, Global).unwrap();
        assert_eq!(joined.len(), 10);
        assert_eq!(joined, *b"helloworld");
    }

    #[test]
    fn concat_with_empty_sides() {
        let empty: Slice<'_, u8> = Slice::default();
        let data = Slice::from_std(&[1u8, 2]);
        assert_eq!(empty.concat(data, Global).unwrap(), [1, 2]);
        assert_eq!(data.concat(empty, Global).unwrap(), [1, 2]);
        assert!(empty.concat(empty, Global).unwrap().is_empty());
    }

    #[test]
    fn concat_does_not_alias_inputs() {
        let alloc = CountingAllocator::new();
        let mut source = OwnedBuffer::new_in(&alloc);
        source.extend_from_slice(Slice::from_std(&[1, 2])).unwrap();
        let mut joined = source.as_slice().concat(source.as_slice(), &alloc).unwrap();
        joined.as_mut_slice().set(0, 99);
        assert_eq!(source, [1, 2]);
        assert_eq!(joined, [99, 2, 1, 2]);
        assert_eq!(alloc.stats().live_blocks, 2);
    }

    #[test]
    fn concat_allocates_once() {
        let alloc = CountingAllocator::new();
        let a = [1u32; 7];
        let b = [2u32; 9];
        let joined = Slice::from_std(&a).concat(Slice::from_std(&b), &alloc).unwrap();
        assert_eq!(joined.capacity(), 16);
        assert_eq!(alloc.stats().requests, 1);
    }

    #[test]
    fn concat_out_of_memory_leaves_nothing() {
        let alloc = FailingAllocator::fail_on_request(1);
        let result = Slice::from_std(&[1, 2]).concat(Slice::from_std(&[3]), &alloc);
        assert!(matches!(result, Err(BufferError::OutOfMemory { .. })));
        alloc.assert_balanced();
    }

    #[test]
    fn repeat_twice() {
        let out = Slice::from_std(&[1, 2, 3]).repeat(2, Global).unwrap();
        assert_eq!(out.len(), 6);
        assert_eq!(out, [1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn repeat_zero_is_empty_without_allocating() {
        let alloc = CountingAllocator::new();
        let out = Slice::from_std(&[1, 2, 3]).repeat(0, &alloc).unwrap();
        assert!(out.is_empty());
        assert_eq!(alloc.stats().requests, 0);
    }

    #[test]
    fn repeat_negative_is_invalid_argument() {
        let err = Slice::from_std(&[1]).repeat(-1, Global).unwrap_err();
        assert!(matches!(err, BufferError::InvalidArgument { .. }));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn repeat_empty_slice_many_times() {
        let empty: Slice<'_, u8> = Slice::default();
        let out = empty.repeat(i64::MAX, Global).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn repeat_length_overflow_is_out_of_memory() {
        let data = [0u8; 4];
        let err = Slice::from_std(&data).repeat(i64::MAX, Global).unwrap_err();
        assert!(matches!(err, BufferError::OutOfMemory { .. }));
    }

    #[test]
    fn repeat_fixed_slice() {
        let record = [7u8, 8];
        let fixed = crate::FixedSlice::new(&record);
        let out = Slice::from(fixed).repeat(3, Global).unwrap();
        assert_eq!(out, [7, 8, 7, 8, 7, 8]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn concat_is_a_then_b(
                a in proptest::collection::vec(any::<u16>(), 0..40),
                b in proptest::collection::vec(any::<u16>(), 0..40),
            ) {
                let alloc = CountingAllocator::new();
                let joined = Slice::from_std(&a).concat(Slice::from_std(&b), &alloc).unwrap();
                prop_assert_eq!(joined.len(), a.len() + b.len());
                prop_assert_eq!(joined.slice(..a.len()), Slice::from_std(&a));
                prop_assert_eq!(joined.slice(a.len()..), Slice::from_std(&b));
                joined.release();
                prop_assert!(alloc.is_balanced());
            }

            #[test]
            fn repeat_replicates(
                data in proptest::collection::vec(any::<u8>(), 0..16),
                count in 0i64..8,
            ) {
                let out = Slice::from_std(&data).repeat(count, Global).unwrap();
                prop_assert_eq!(out.len(), data.len() * count as usize);
                if !data.is_empty() {
                    for (i, chunk) in out.as_slice().as_std().chunks(data.len()).enumerate() {
                        prop_assert_eq!(chunk, data.as_slice(), "copy {}", i);
                    }
                }
            }

            #[test]
            fn repeat_negative_always_rejected(count in i64::MIN..0) {
                let result = Slice::from_std(&[1u8]).repeat(count, Global);
                prop_assert!(
                    matches!(result, Err(BufferError::InvalidArgument { .. })),
                    "expected InvalidArgument"
                );
            }
        }
    }
}
