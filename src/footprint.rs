//! Memory footprint accounting.
//!
//! A table's footprint is its header, one slot per bucket, and for every
//! live entry the node bookkeeping plus the copied key and value bytes.
//! Header, slot and node sizes come from the concrete types for the
//! allocator in use and the target's pointer width; nothing is hard-coded.

use crate::chain::{Link, Node};
use allocator_api2::alloc::Allocator;
use core::mem::size_of;

/// Bytes per bucket slot.
pub const fn slot_cost<A: Allocator>() -> usize {
    size_of::<Link<A>>()
}

/// Bytes attributable to one entry.
pub const fn entry_cost<A: Allocator>(key_len: usize, value_len: usize) -> usize {
    size_of::<Node<A>>() + key_len + value_len
}

/// Per-part breakdown of a table's footprint.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Footprint {
    pub header: usize,
    pub buckets: usize,
    pub entries: usize,
}

impl Footprint {
    pub fn total(&self) -> usize {
        self.header + self.buckets + self.entries
    }
}

/// Running total of live entry storage, adjusted by every insertion,
/// value replacement and removal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EntryLedger {
    bytes: usize,
}

impl EntryLedger {
    #[inline]
    pub(crate) fn bytes(&self) -> usize {
        self.bytes
    }

    #[inline]
    pub(crate) fn charge(&mut self, cost: usize) {
        self.bytes += cost;
    }

    #[inline]
    pub(crate) fn credit(&mut self, cost: usize) {
        debug_assert!(cost <= self.bytes, "entry ledger underflow");
        self.bytes -= cost;
    }

    /// A value of `old_len` bytes was replaced by one of `new_len` bytes.
    #[inline]
    pub(crate) fn replace(&mut self, old_len: usize, new_len: usize) {
        self.credit(old_len);
        self.charge(new_len);
    }

    pub(crate) fn reset(&mut self) {
        self.bytes = 0;
    }
}
