//! Non-owning views over contiguous elements.
//!
//! A [`Slice`] is the Bound-Deferred view: its range may leave an endpoint
//! open (`2..`, `..`) and that endpoint is resolved against the storage
//! length when the view is built. [`SliceMut`] is its writable sibling.
//! Both borrow the storage they describe, so the borrow checker rejects
//! any attempt to grow or release a buffer while a view into it is alive.
//!
//! Ranges are half-open. A malformed range or an out-of-range index is a
//! programming error and panics.

use std::fmt;
use std::ops::{Index, IndexMut, Range, RangeBounds};

use crate::fixed::FixedSlice;

/// Resolve `range` against a storage of `len` elements.
///
/// # Panics
///
/// Panics if the start exceeds the end, the end exceeds `len`, or an
/// inclusive bound overflows.
#[track_caller]
pub(crate) fn verify_range(len: usize, range: impl RangeBounds<usize>) -> Range<usize> {
    use std::ops::Bound;

    let start = match range.start_bound() {
        Bound::Included(&n) => n,
        Bound::Excluded(&n) => n.checked_add(1).expect("range start overflows usize"),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&n) => n.checked_add(1).expect("range end overflows usize"),
        Bound::Excluded(&n) => n,
        Bound::Unbounded => len,
    };

    assert!(start <= end, "range start {start} is greater than end {end}");
    assert!(end <= len, "range end {end} out of bounds for storage of length {len}");
    start..end
}

#[track_caller]
fn check_index(index: usize, len: usize) {
    assert!(index < len, "index {index} out of range for slice of length {len}");
}

/// A read-only view over a contiguous range of elements.
///
/// `Slice` never owns what it points at and carries no release duty.
/// `offset` records where the view starts inside the storage it was cut
/// from, for diagnostics.
pub struct Slice<'a, T> {
    items: &'a [T],
    offset: usize,
}

impl<'a, T> Slice<'a, T> {
    /// View `range` of `storage`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is malformed or exceeds `storage.len()`.
    #[track_caller]
    pub fn new(storage: &'a [T], range: impl RangeBounds<usize>) -> Self {
        let range = verify_range(storage.len(), range);
        Self {
            offset: range.start,
            items: &storage[range],
        }
    }

    /// View all of `items`.
    pub const fn from_std(items: &'a [T]) -> Self {
        Self { items, offset: 0 }
    }

    pub(crate) const fn with_offset(items: &'a [T], offset: usize) -> Self {
        Self { items, offset }
    }

    /// Number of elements in view.
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the view is empty.
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Start of the view within its storage.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn at(&self, index: usize) -> &'a T {
        check_index(index, self.len());
        &self.items[index]
    }

    /// First element, if any.
    pub fn first(&self) -> Option<&'a T> {
        self.items.first()
    }

    /// Last element, if any.
    pub fn last(&self) -> Option<&'a T> {
        self.items.last()
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.items.iter()
    }

    /// Narrow the view to `range`, relative to this view.
    ///
    /// # Panics
    ///
    /// Panics if `range` is malformed or exceeds `self.len()`.
    #[track_caller]
    pub fn subslice(&self, range: impl RangeBounds<usize>) -> Self {
        let range = verify_range(self.len(), range);
        Self {
            offset: self.offset + range.start,
            items: &self.items[range],
        }
    }

    /// The viewed elements as a standard slice.
    pub const fn as_std(&self) -> &'a [T] {
        self.items
    }

    /// Refine into a Bound-Known view of exactly `N` elements.
    ///
    /// Returns `None` if the length is not `N`.
    pub fn to_fixed<const N: usize>(&self) -> Option<FixedSlice<'a, T, N>> {
        let items: &'a [T; N] = self.items.try_into().ok()?;
        Some(FixedSlice::with_offset(items, self.offset))
    }
}

impl<T> Clone for Slice<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slice<'_, T> {}

impl<T> Default for Slice<'_, T> {
    fn default() -> Self {
        Self::from_std(&[])
    }
}

impl<'a, T> From<&'a [T]> for Slice<'a, T> {
    fn from(items: &'a [T]) -> Self {
        Self::from_std(items)
    }
}

impl<'a, T, const N: usize> From<&'a [T; N]> for Slice<'a, T> {
    fn from(items: &'a [T; N]) -> Self {
        Self::from_std(items)
    }
}

impl<T> Index<usize> for Slice<'_, T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<'a, T> IntoIterator for Slice<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Slice<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Slice<'_, U>> for Slice<'_, T> {
    fn eq(&self, other: &Slice<'_, U>) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for Slice<'_, T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for Slice<'_, T> {
    fn eq(&self, other: &[U]) -> bool {
        self.items == other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for Slice<'_, T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.items == other.as_slice()
    }
}

/// A writable view over a contiguous range of elements.
pub struct SliceMut<'a, T> {
    items: &'a mut [T],
    offset: usize,
}

impl<'a, T> SliceMut<'a, T> {
    /// Mutably view `range` of `storage`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is malformed or exceeds `storage.len()`.
    #[track_caller]
    pub fn new(storage: &'a mut [T], range: impl RangeBounds<usize>) -> Self {
        let range = verify_range(storage.len(), range);
        Self {
            offset: range.start,
            items: &mut storage[range],
        }
    }

    /// Mutably view all of `items`.
    pub fn from_std(items: &'a mut [T]) -> Self {
        Self { items, offset: 0 }
    }

    /// Number of elements in view.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Start of the view within its storage.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn at(&self, index: usize) -> &T {
        check_index(index, self.len());
        &self.items[index]
    }

    /// Mutable element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        check_index(index, self.len());
        &mut self.items[index]
    }

    /// Overwrite the element at `index`, dropping the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[track_caller]
    pub fn set(&mut self, index: usize, value: T) {
        *self.at_mut(index) = value;
    }

    /// Overwrite every element with clones of `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.items.fill(value);
    }

    /// Overwrite every element with the corresponding element of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src.len() != self.len()`.
    #[track_caller]
    pub fn copy_from(&mut self, src: Slice<'_, T>)
    where
        T: Clone,
    {
        assert_eq!(
            src.len(),
            self.len(),
            "source length {} does not match destination length {}",
            src.len(),
            self.len(),
        );
        self.items.clone_from_slice(src.as_std());
    }

    /// Iterate mutably over the elements in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Reborrow as a read-only view.
    pub fn as_slice(&self) -> Slice<'_, T> {
        Slice::with_offset(&*self.items, self.offset)
    }

    /// Give up write access, keeping the full lifetime.
    pub fn into_slice(self) -> Slice<'a, T> {
        Slice::with_offset(self.items, self.offset)
    }
}

impl<'a, T> From<&'a mut [T]> for SliceMut<'a, T> {
    fn from(items: &'a mut [T]) -> Self {
        Self::from_std(items)
    }
}

impl<T> Index<usize> for SliceMut<'_, T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<T> IndexMut<usize> for SliceMut<'_, T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.at_mut(index)
    }
}

impl<T: fmt::Debug> fmt::Debug for SliceMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Slice<'_, U>> for SliceMut<'_, T> {
    fn eq(&self, other: &Slice<'_, U>) -> bool {
        *self.items == *other.as_std()
    }
}
