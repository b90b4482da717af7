//! Bound-Known views: slices whose length is a compile-time constant.
//!
//! [`FixedSlice`] is a refinement of [`Slice`], not a different kind of
//! view. It converts into a `Slice` for free; the reverse direction goes
//! through [`Slice::to_fixed`], which re-checks the length. Because `N` is
//! known ahead of use, a fixed view can be copied into an exact-size stack
//! array or split into fixed-width records.

use std::fmt;
use std::ops::Index;

use crate::slice::{verify_range, Slice};

/// A read-only view of exactly `N` contiguous elements.
pub struct FixedSlice<'a, T, const N: usize> {
    items: &'a [T; N],
    offset: usize,
}

impl<'a, T, const N: usize> FixedSlice<'a, T, N> {
    /// Length of every view of this type.
    pub const LEN: usize = N;

    /// View all of `items`.
    pub const fn new(items: &'a [T; N]) -> Self {
        Self { items, offset: 0 }
    }

    pub(crate) const fn with_offset(items: &'a [T; N], offset: usize) -> Self {
        Self { items, offset }
    }

    /// View the `N` elements of `storage` starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start + N` exceeds `storage.len()`.
    #[track_caller]
    pub fn within(storage: &'a [T], start: usize) -> Self {
        let end = start
            .checked_add(N)
            .unwrap_or_else(|| panic!("fixed view at {start} of width {N} overflows usize"));
        let range = verify_range(storage.len(), start..end);
        match <&'a [T; N]>::try_from(&storage[range]) {
            Ok(items) => Self::with_offset(items, start),
            Err(_) => unreachable!("verified range has exactly {N} elements"),
        }
    }

    /// Number of elements in view; always `N`.
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether `N == 0`.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Start of the view within its storage.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The viewed elements as an array reference.
    pub const fn as_array(&self) -> &'a [T; N] {
        self.items
    }

    /// Copy the viewed elements into an owned array.
    pub fn to_array(&self) -> [T; N]
    where
        T: Copy,
    {
        *self.items
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[track_caller]
    pub fn at(&self, index: usize) -> &'a T {
        assert!(index < N, "index {index} out of range for slice of length {N}");
        &self.items[index]
    }

    /// Forget the static length.
    pub const fn as_slice(&self) -> Slice<'a, T> {
        Slice::with_offset(self.items.as_slice(), self.offset)
    }

    /// Split into consecutive `M`-element records plus the leftover tail.
    ///
    /// ```
    /// use hoard_buffer::FixedSlice;
    ///
    /// let data = [1, 2, 3, 4, 5];
    /// let (records, tail) = FixedSlice::new(&data).decompose::<2>();
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(tail.len(), 1);
    /// ```
    ///
    /// A zero record width is rejected at compile time:
    ///
    /// ```compile_fail
    /// use hoard_buffer::FixedSlice;
    ///
    /// let data = [1, 2];
    /// let _ = FixedSlice::new(&data).decompose::<0>();
    /// ```
    pub fn decompose<const M: usize>(&self) -> (Records<'a, T, M>, Slice<'a, T>) {
        const { assert!(M != 0, "record width must be non-zero") };
        let items: &'a [T; N] = self.items;
        let whole = (N / M) * M;
        let records = Records {
            chunks: items[..whole].chunks_exact(M),
            next_offset: self.offset,
        };
        let tail = Slice::with_offset(&items[whole..], self.offset + whole);
        (records, tail)
    }
}

/// Iterator over fixed-width records produced by [`FixedSlice::decompose`].
pub struct Records<'a, T, const M: usize> {
    chunks: std::slice::ChunksExact<'a, T>,
    next_offset: usize,
}

impl<'a, T, const M: usize> Iterator for Records<'a, T, M> {
    type Item = FixedSlice<'a, T, M>;

    fn next(&mut self) -> Option<Self::Item> {
        let items: &'a [T; M] = self.chunks.next()?.try_into().ok()?;
        let record = FixedSlice::with_offset(items, self.next_offset);
        self.next_offset += M;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<T, const M: usize> ExactSizeIterator for Records<'_, T, M> {}

impl<T, const N: usize> Clone for FixedSlice<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for FixedSlice<'_, T, N> {}

impl<'a, T, const N: usize> From<&'a [T; N]> for FixedSlice<'a, T, N> {
    fn from(items: &'a [T; N]) -> Self {
        Self::new(items)
    }
}

impl<'a, T, const N: usize> From<FixedSlice<'a, T, N>> for Slice<'a, T> {
    fn from(fixed: FixedSlice<'a, T, N>) -> Self {
        fixed.as_slice()
    }
}

impl<T, const N: usize> Index<usize> for FixedSlice<'_, T, N> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for FixedSlice<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: PartialEq<U>, U, const N: usize, const M: usize> PartialEq<FixedSlice<'_, U, M>>
    for FixedSlice<'_, T, N>
{
    fn eq(&self, other: &FixedSlice<'_, U, M>) -> bool {
        self.items.as_slice() == other.items.as_slice()
    }
}

impl<T: Eq, const N: usize> Eq for FixedSlice<'_, T, N> {}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<Slice<'_, U>> for FixedSlice<'_, T, N> {
    fn eq(&self, other: &Slice<'_, U>) -> bool {
        self.items.as_slice() == other.as_std()
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<FixedSlice<'_, U, N>> for Slice<'_, T> {
    fn eq(&self, other: &FixedSlice<'_, U, N>) -> bool {
        self.as_std() == other.items.as_slice()
    }
}
