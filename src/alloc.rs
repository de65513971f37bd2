//! Injected allocator capability.
//!
//! A table receives its allocator once at construction and routes every
//! acquisition (bucket array, entry nodes, key and value copies) and every
//! release through it until it is dropped. The capability is the stable
//! `allocator-api2` mirror of `core::alloc::Allocator`.
//!
//! `Tracking` wraps another allocator and records what flows through it.
//! Clones share one set of counters, so the handle a caller keeps observes
//! the clones a table hands to its sub-allocations.

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;
use std::rc::Rc;

pub use allocator_api2::alloc::{AllocError, Allocator, Global};

#[derive(Debug, Default)]
struct Counters {
    live_bytes: Cell<usize>,
    peak_bytes: Cell<usize>,
    acquired: Cell<usize>,
    released: Cell<usize>,
    refused: Cell<usize>,
    limit: Cell<Option<usize>>,
}

/// Snapshot of a `Tracking` allocator's counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub live_bytes: usize,
    pub peak_bytes: usize,
    pub acquired: usize,
    pub released: usize,
    pub refused: usize,
}

impl AllocStats {
    /// Blocks acquired and not yet released.
    pub fn outstanding(&self) -> usize {
        self.acquired - self.released
    }
}

/// Counting allocator adapter with an optional live-byte limit.
#[derive(Clone, Debug)]
pub struct Tracking<A = Global> {
    inner: A,
    counters: Rc<Counters>,
}

impl Tracking<Global> {
    pub fn new() -> Self {
        Self::wrap(Global)
    }
}

impl Default for Tracking<Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Tracking<A> {
    pub fn wrap(inner: A) -> Self {
        Self {
            inner,
            counters: Rc::new(Counters::default()),
        }
    }

    /// Refuse any acquisition that would push live bytes above `limit`.
    /// `None` lifts the limit.
    pub fn set_limit(&self, limit: Option<usize>) {
        self.counters.limit.set(limit);
    }

    /// Refuse every acquisition from now on, as an exhausted heap would.
    pub fn exhaust(&self) {
        self.set_limit(Some(self.counters.live_bytes.get()));
    }

    pub fn stats(&self) -> AllocStats {
        let c = &self.counters;
        AllocStats {
            live_bytes: c.live_bytes.get(),
            peak_bytes: c.peak_bytes.get(),
            acquired: c.acquired.get(),
            released: c.released.get(),
            refused: c.refused.get(),
        }
    }
}

unsafe impl<A: Allocator> Allocator for Tracking<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let c = &self.counters;
        let live = c.live_bytes.get();
        let over = match c.limit.get() {
            Some(limit) => live.saturating_add(layout.size()) > limit,
            None => false,
        };
        if over {
            c.refused.set(c.refused.get() + 1);
            return Err(AllocError);
        }
        let block = self.inner.allocate(layout)?;
        let live = live + layout.size();
        c.live_bytes.set(live);
        c.peak_bytes.set(c.peak_bytes.get().max(live));
        c.acquired.set(c.acquired.get() + 1);
        Ok(block)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // Safety: forwarded unchanged; the caller upholds the contract.
        unsafe { self.inner.deallocate(ptr, layout) };
        let c = &self.counters;
        c.live_bytes.set(c.live_bytes.get() - layout.size());
        c.released.set(c.released.get() + 1);
    }
}
