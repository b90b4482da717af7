//! Ownership and release discipline across buffers and views.

use hoard_buffer::{FixedSlice, OwnedBuffer, Slice};
use hoard_core::CountingAllocator;
use hoard_test_utils::{DropCounter, FailingAllocator};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Element whose destructor panics when armed.
struct Bomb(bool);

impl Drop for Bomb {
    fn drop(&mut self) {
        if self.0 {
            panic!("element destructor failed");
        }
    }
}

#[test]
fn relocation_never_drops_or_duplicates_elements() {
    let counter = DropCounter::new();
    let alloc = CountingAllocator::new();
    let mut buf = OwnedBuffer::new_in(&alloc);
    for id in 0..100 {
        buf.push(counter.track(id)).unwrap();
    }
    // Growth relocated the elements five times without running a destructor.
    assert_eq!(counter.drops(), 0);
    let ids: Vec<u32> = buf.iter().map(|t| t.id).collect();
    assert_eq!(ids, (0..100).collect::<Vec<_>>());

    let last = buf.pop();
    assert_eq!(last.id, 99);
    drop(last);
    assert_eq!(counter.drops(), 1);

    buf.release();
    assert_eq!(counter.drops(), 100);
    alloc.assert_balanced();
}

#[test]
fn panicking_element_drop_still_returns_storage() {
    let alloc = CountingAllocator::new();
    let mut buf = OwnedBuffer::new_in(&alloc);
    buf.push(Bomb(true)).unwrap();
    buf.push(Bomb(false)).unwrap();
    assert_eq!(alloc.stats().live_blocks, 1);

    let result = catch_unwind(AssertUnwindSafe(|| buf.release()));
    assert!(result.is_err());
    assert_eq!(alloc.stats().releases, 1);
    alloc.assert_balanced();
}

#[test]
fn panicking_element_drop_on_scope_exit_returns_storage() {
    let alloc = CountingAllocator::new();
    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut buf = OwnedBuffer::new_in(&alloc);
        buf.push(Bomb(false)).unwrap();
        buf.push(Bomb(true)).unwrap();
    }));
    assert!(result.is_err());
    alloc.assert_balanced();
}

#[test]
fn failed_extend_drops_nothing() {
    let counter = DropCounter::new();
    let alloc = FailingAllocator::fail_on_request(2);
    let mut buf = OwnedBuffer::new_in(&alloc);
    buf.push(counter.track(0)).unwrap();

    let extra: Vec<_> = (1..10).map(|id| counter.track(id)).collect();
    assert!(buf.extend_from_slice(Slice::from_std(&extra)).is_err());
    assert_eq!(buf.len(), 1);
    assert_eq!(counter.drops(), 0);

    drop(extra);
    buf.release();
    assert_eq!(counter.drops(), 10);
    alloc.assert_balanced();
}

#[test]
fn many_views_share_one_buffer() {
    let mut buf = OwnedBuffer::new();
    for b in b"abcdef" {
        buf.push(*b).unwrap();
    }
    let whole = buf.as_slice();
    let head = buf.slice(..3);
    let tail = buf.slice(3..);
    let record: FixedSlice<'_, u8, 2> = buf.fixed(2);

    assert_eq!(whole.len(), head.len() + tail.len());
    assert_eq!(head.concat(tail, hoard_core::Global).unwrap(), whole);
    assert_eq!(record.to_array(), *b"cd");
    assert_eq!(Slice::from(record), whole.subslice(2..4));
}

#[test]
fn buffers_from_one_allocator_are_independent() {
    let alloc = CountingAllocator::new();
    let mut a = OwnedBuffer::new_in(&alloc);
    let mut b = OwnedBuffer::new_in(&alloc);
    for i in 0..20 {
        a.push(i).unwrap();
        b.push(-i).unwrap();
    }
    assert_eq!(alloc.stats().live_blocks, 2);
    a.release();
    assert_eq!(alloc.stats().live_blocks, 1);
    assert_eq!(b.pop(), -19);
    b.release();
    alloc.assert_balanced();
}

#[test]
fn owned_allocator_travels_with_buffer() {
    let buf = {
        let mut buf = OwnedBuffer::new_in(CountingAllocator::new());
        buf.push(1u8).unwrap();
        buf.push(2u8).unwrap();
        buf
    };
    assert_eq!(buf.allocator().stats().live_blocks, 1);
    assert_eq!(buf, [1, 2]);
    buf.release();
}
