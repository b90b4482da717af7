//! Instrumented allocator that keeps a ledger of issued blocks.
//!
//! [`CountingAllocator`] wraps another allocator and records every block it
//! hands out. Returning a block it never issued (or issued with another
//! layout) is a lifecycle violation and panics immediately, which turns
//! double releases into loud failures instead of heap corruption. An
//! optional byte budget makes requests fail with
//! [`AllocError::OutOfMemory`] once live bytes would exceed the limit.
//!
//! The allocator is single-threaded by contract: it uses `Cell`/`RefCell`
//! and is neither `Sync` nor intended to be shared across threads.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::ptr::NonNull;

use indexmap::IndexMap;

use crate::alloc::{Allocator, Global};
use crate::error::AllocError;

/// Snapshot of a [`CountingAllocator`]'s counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Allocation requests received, including failed ones.
    pub requests: u64,
    /// Requests that failed with `OutOfMemory`.
    pub failures: u64,
    /// Blocks returned.
    pub releases: u64,
    /// Blocks issued and not yet returned.
    pub live_blocks: usize,
    /// Bytes issued and not yet returned.
    pub live_bytes: usize,
    /// High-water mark of `live_bytes`.
    pub peak_bytes: usize,
    /// Sum of the sizes of all successful requests.
    pub total_bytes_requested: usize,
}

/// Allocator wrapper with a block ledger and an optional byte budget.
pub struct CountingAllocator<A: Allocator = Global> {
    inner: A,
    limit: Option<usize>,
    /// Issued blocks keyed by address, in issue order.
    ledger: RefCell<IndexMap<usize, Layout>>,
    stats: Cell<AllocStats>,
}

impl CountingAllocator<Global> {
    /// Create a counting allocator over [`Global`] with no budget.
    pub fn new() -> Self {
        Self::wrap(Global)
    }

    /// Create a counting allocator over [`Global`] that refuses to hold
    /// more than `limit` live bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self::wrap(Global).limit(limit)
    }
}

impl Default for CountingAllocator<Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Allocator> CountingAllocator<A> {
    /// Wrap an existing allocator.
    pub fn wrap(inner: A) -> Self {
        Self {
            inner,
            limit: None,
            ledger: RefCell::new(IndexMap::new()),
            stats: Cell::new(AllocStats::default()),
        }
    }

    /// Set the live-byte budget.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The configured live-byte budget, if any.
    pub fn byte_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Current counters.
    pub fn stats(&self) -> AllocStats {
        self.stats.get()
    }

    /// Blocks issued and not yet returned, as `(address, layout)` in issue order.
    pub fn outstanding(&self) -> Vec<(usize, Layout)> {
        self.ledger
            .borrow()
            .iter()
            .map(|(&addr, &layout)| (addr, layout))
            .collect()
    }

    /// Whether every issued block has been returned.
    pub fn is_balanced(&self) -> bool {
        self.ledger.borrow().is_empty()
    }

    /// Panic if any issued block is still outstanding.
    ///
    /// # Panics
    ///
    /// Panics with the number of leaked blocks and bytes.
    pub fn assert_balanced(&self) {
        let stats = self.stats();
        assert!(
            self.is_balanced(),
            "allocator leak: {} block(s), {} byte(s) outstanding",
            stats.live_blocks,
            stats.live_bytes,
        );
    }

    /// The wrapped allocator.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn update(&self, f: impl FnOnce(&mut AllocStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

// SAFETY: blocks come from `inner`, which upholds the contract; the ledger
// only observes them.
unsafe impl<A: Allocator> Allocator for CountingAllocator<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        self.update(|s| s.requests += 1);

        let over_budget = self.limit.is_some_and(|limit| {
            self.stats
                .get()
                .live_bytes
                .checked_add(layout.size())
                .is_none_or(|total| total > limit)
        });
        let result = if over_budget {
            Err(AllocError::OutOfMemory {
                size: layout.size(),
                align: layout.align(),
            })
        } else {
            self.inner.allocate(layout)
        };

        match result {
            Ok(ptr) => {
                let previous = self.ledger.borrow_mut().insert(ptr.as_ptr() as usize, layout);
                assert!(
                    previous.is_none(),
                    "allocator issued live block {:p} twice",
                    ptr.as_ptr()
                );
                self.update(|s| {
                    s.live_blocks += 1;
                    s.live_bytes += layout.size();
                    s.peak_bytes = s.peak_bytes.max(s.live_bytes);
                    s.total_bytes_requested += layout.size();
                });
                Ok(ptr)
            }
            Err(err) => {
                self.update(|s| s.failures += 1);
                log::warn!("allocation of {} bytes refused: {err}", layout.size());
                Err(err)
            }
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let addr = ptr.as_ptr() as usize;
        let recorded = self.ledger.borrow().get(&addr).copied();
        match recorded {
            None => panic!("release of unknown block {addr:#x}: double release or foreign pointer"),
            Some(issued) => assert!(
                issued == layout,
                "release of block {addr:#x} with layout {layout:?}, issued as {issued:?}"
            ),
        }
        self.ledger.borrow_mut().shift_remove(&addr);
        self.update(|s| {
            s.releases += 1;
            s.live_blocks -= 1;
            s.live_bytes -= layout.size();
        });
        // SAFETY: the ledger confirmed `ptr` was issued by `inner` for `layout`.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}

impl<A: Allocator> fmt::Debug for CountingAllocator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingAllocator")
            .field("limit", &self.limit)
            .field("stats", &self.stats())
            .finish()
    }
}

impl<A: Allocator> Drop for CountingAllocator<A> {
    fn drop(&mut self) {
        let stats = self.stats();
        if stats.live_blocks > 0 {
            log::warn!(
                "counting allocator dropped with {} block(s), {} byte(s) outstanding",
                stats.live_blocks,
                stats.live_bytes,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(n: usize) -> Layout {
        Layout::array::<u8>(n).unwrap()
    }

    #[test]
    fn tracks_live_blocks_and_bytes() {
        let alloc = CountingAllocator::new();
        let a = alloc.allocate(layout(32)).unwrap();
        let b = alloc.allocate(layout(16)).unwrap();
        let stats = alloc.stats();
        assert_eq!(stats.requests, 2);
        assert_eq!(stats.live_blocks, 2);
        assert_eq!(stats.live_bytes, 48);
        assert_eq!(stats.peak_bytes, 48);

        unsafe { alloc.deallocate(a, layout(32)) };
        let stats = alloc.stats();
        assert_eq!(stats.releases, 1);
        assert_eq!(stats.live_bytes, 16);
        assert_eq!(stats.peak_bytes, 48);
        assert!(!alloc.is_balanced());

        unsafe { alloc.deallocate(b, layout(16)) };
        alloc.assert_balanced();
        assert_eq!(alloc.stats().total_bytes_requested, 48);
    }

    #[test]
    fn outstanding_preserves_issue_order() {
        let alloc = CountingAllocator::new();
        let a = alloc.allocate(layout(8)).unwrap();
        let b = alloc.allocate(layout(24)).unwrap();
        let c = alloc.allocate(layout(4)).unwrap();
        unsafe { alloc.deallocate(b, layout(24)) };

        let sizes: Vec<usize> = alloc.outstanding().iter().map(|(_, l)| l.size()).collect();
        assert_eq!(sizes, vec![8, 4]);

        unsafe {
            alloc.deallocate(a, layout(8));
            alloc.deallocate(c, layout(4));
        }
    }

    #[test]
    fn budget_refuses_over_limit() {
        let alloc = CountingAllocator::with_limit(64);
        let a = alloc.allocate(layout(48)).unwrap();
        let err = alloc.allocate(layout(32)).unwrap_err();
        assert_eq!(err, AllocError::OutOfMemory { size: 32, align: 1 });
        assert_eq!(alloc.stats().failures, 1);
        assert_eq!(alloc.stats().live_bytes, 48);

        let b = alloc.allocate(layout(16)).unwrap();
        unsafe {
            alloc.deallocate(a, layout(48));
            alloc.deallocate(b, layout(16));
        }
        alloc.assert_balanced();
    }

    #[test]
    #[should_panic(expected = "double release")]
    fn double_release_panics() {
        let alloc = CountingAllocator::new();
        let a = alloc.allocate(layout(8)).unwrap();
        unsafe {
            alloc.deallocate(a, layout(8));
            alloc.deallocate(a, layout(8));
        }
    }

    #[test]
    #[should_panic(expected = "issued as")]
    fn layout_mismatch_panics() {
        let alloc = CountingAllocator::new();
        let a = alloc.allocate(layout(8)).unwrap();
        unsafe { alloc.deallocate(a, layout(16)) };
    }

    #[test]
    fn layout_mismatch_keeps_block_on_ledger() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let alloc = CountingAllocator::new();
        let a = alloc.allocate(layout(8)).unwrap();
        let result = catch_unwind(AssertUnwindSafe(|| unsafe {
            alloc.deallocate(a, layout(16));
        }));
        assert!(result.is_err());
        assert_eq!(alloc.outstanding().len(), 1);
        assert_eq!(alloc.stats().live_blocks, 1);
        assert_eq!(alloc.stats().releases, 0);

        unsafe { alloc.deallocate(a, layout(8)) };
        alloc.assert_balanced();
    }

    #[test]
    #[should_panic(expected = "allocator leak")]
    fn assert_balanced_reports_leak() {
        let alloc = CountingAllocator::new();
        let _leaked = alloc.allocate(layout(8)).unwrap();
        alloc.assert_balanced();
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn live_bytes_match_outstanding(
                sizes in proptest::collection::vec(1usize..256, 1..24),
                release_mask in proptest::collection::vec(any::<bool>(), 24),
            ) {
                let alloc = CountingAllocator::new();
                let blocks: Vec<_> = sizes
                    .iter()
                    .map(|&n| (alloc.allocate(layout(n)).unwrap(), n))
                    .collect();

                let mut kept = Vec::new();
                for (i, (ptr, n)) in blocks.into_iter().enumerate() {
                    if release_mask[i] {
                        unsafe { alloc.deallocate(ptr, layout(n)) };
                    } else {
                        kept.push((ptr, n));
                    }
                }

                let expected: usize = kept.iter().map(|&(_, n)| n).sum();
                prop_assert_eq!(alloc.stats().live_bytes, expected);
                prop_assert_eq!(alloc.outstanding().len(), kept.len());

                for (ptr, n) in kept {
                    unsafe { alloc.deallocate(ptr, layout(n)) };
                }
                prop_assert!(alloc.is_balanced());
            }
        }
    }
}
