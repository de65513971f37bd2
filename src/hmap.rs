//! HMap: fixed bucket table with separately chained, allocator-owned entries.

use crate::chain::{self, Link, Node};
use crate::config::MapConfig;
use crate::error::{MapError, MapResult};
use crate::footprint::{self, EntryLedger, Footprint};
use crate::hash::{HashAlgorithm, HashFn, HashValue};
use crate::reentrancy::ExclusiveSection;
use allocator_api2::alloc::{Allocator, Global};
use allocator_api2::vec::Vec;
use core::fmt;
use tracing::{debug, trace, warn};

/// What `set` did with the key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// No equal key existed; a new entry was linked in.
    Inserted,
    /// An equal key existed; its value was replaced and the key kept.
    Updated,
}

/// Hash map over byte-blob keys and values with a fixed number of buckets.
///
/// Keys and values are copied in on `set`; the caller's buffers are never
/// retained. All storage comes from the allocator `A`.
pub struct HMap<A: Allocator + Clone = Global> {
    buckets: Vec<Link<A>, A>,
    hasher: HashFn,
    algorithm: HashAlgorithm,
    len: usize,
    ledger: EntryLedger,
    section: ExclusiveSection,
}

impl HMap<Global> {
    pub fn new(config: MapConfig) -> MapResult<Self> {
        Self::new_in(config, Global)
    }
}

impl<A: Allocator + Clone> HMap<A> {
    /// Validate `config` and acquire the bucket array from `alloc` in a
    /// single request.
    pub fn new_in(config: MapConfig, alloc: A) -> MapResult<Self> {
        config.validate()?;
        let bucket_count = config.bucket_count;
        let mut buckets = Vec::new_in(alloc);
        if buckets.try_reserve_exact(bucket_count).is_err() {
            let requested = bucket_count.saturating_mul(footprint::slot_cost::<A>());
            warn!(bucket_count, requested, "bucket array allocation refused");
            return Err(MapError::Allocation { requested });
        }
        for _ in 0..bucket_count {
            buckets.push(None);
        }
        let map = Self {
            buckets,
            hasher: config.hash_algorithm.resolve(),
            algorithm: config.hash_algorithm,
            len: 0,
            ledger: EntryLedger::default(),
            section: ExclusiveSection::new(),
        };
        debug!(
            bucket_count,
            hash = %config.hash_algorithm,
            footprint = map.footprint(),
            "created hash map"
        );
        Ok(map)
    }

    /// Release every entry and the bucket array. Equivalent to dropping the
    /// table; logs what was released.
    pub fn destroy(self) {
        debug!(
            entries = self.len,
            footprint = self.footprint(),
            "destroying hash map"
        );
        drop(self);
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hash of `key` under this table's algorithm. Independent of table
    /// contents.
    #[inline]
    pub fn hash(&self, key: &[u8]) -> HashValue {
        (self.hasher)(key)
    }

    /// Bucket that `key` lives in, or would live in.
    #[inline]
    pub fn bucket_index(&self, key: &[u8]) -> usize {
        self.hash(key) as usize % self.buckets.len()
    }

    /// Number of live entries. Maintained by `set` and `remove`.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `key -> value`, or replace the value of an existing equal key.
    ///
    /// On allocation failure the table is unchanged: a new entry is fully
    /// built before it is linked, and a replacement value is fully copied
    /// before the old one is released.
    pub fn set(&mut self, key: &[u8], value: &[u8]) -> MapResult<SetOutcome> {
        let _g = self.section.enter("set");
        let idx = self.bucket_index(key);
        let alloc = self.buckets.allocator().clone();

        if let Some(node) = chain::find_mut(&mut self.buckets[idx], key) {
            let fresh = chain::copy_blob(value, &alloc)?;
            let old = core::mem::replace(&mut node.value, fresh);
            self.ledger.replace(old.len(), value.len());
            trace!(bucket = idx, old_len = old.len(), new_len = value.len(), "value replaced");
            return Ok(SetOutcome::Updated);
        }

        let node = Node::try_new(key, value, &alloc)?;
        chain::push_front(&mut self.buckets[idx], node);
        self.len += 1;
        self.ledger
            .charge(footprint::entry_cost::<A>(key.len(), value.len()));
        trace!(bucket = idx, entries = self.len, "entry inserted");
        Ok(SetOutcome::Inserted)
    }

    /// Value stored for `key`, or `None` when the key is absent.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let _g = self.section.enter("get");
        chain::find(&self.buckets[self.bucket_index(key)], key).map(|n| n.value.as_slice())
    }

    /// Copy the value for `key` into `buf`, truncating to `buf.len()`.
    /// Returns the full length of the stored value.
    pub fn get_into(&self, key: &[u8], buf: &mut [u8]) -> Option<usize> {
        let value = self.get(key)?;
        let n = value.len().min(buf.len());
        buf[..n].copy_from_slice(&value[..n]);
        Some(value.len())
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        let _g = self.section.enter("contains_key");
        chain::find(&self.buckets[self.bucket_index(key)], key).is_some()
    }

    /// Remove the entry for `key`, releasing its key, value and node.
    /// Returns whether an entry existed.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let _g = self.section.enter("remove");
        let idx = self.bucket_index(key);
        let Some(node) = chain::unlink(&mut self.buckets[idx], key) else {
            return false;
        };
        self.len -= 1;
        self.ledger
            .credit(footprint::entry_cost::<A>(node.key.len(), node.value.len()));
        trace!(bucket = idx, entries = self.len, "entry removed");
        drop(node);
        true
    }

    /// Remove every entry. The bucket array is kept.
    pub fn clear(&mut self) {
        let _g = self.section.enter("clear");
        let released: usize = self.buckets.iter_mut().map(chain::drain).sum();
        debug_assert_eq!(released, self.len);
        self.len = 0;
        self.ledger.reset();
        debug!(released, "hash map cleared");
    }

    /// Total bytes attributable to the table.
    pub fn footprint(&self) -> usize {
        self.footprint_breakdown().total()
    }

    pub fn footprint_breakdown(&self) -> Footprint {
        Footprint {
            header: Self::header_size(),
            buckets: self.buckets.len() * footprint::slot_cost::<A>(),
            entries: self.ledger.bytes(),
        }
    }

    /// Fixed per-table overhead, independent of bucket count and contents.
    ///
    /// The debug-build exclusive-section guard is not counted, so the figure
    /// is the same in every build profile.
    pub const fn header_size() -> usize {
        core::mem::size_of::<Self>() - core::mem::size_of::<ExclusiveSection>()
    }

    /// Footprint contribution of one entry with the given blob lengths.
    pub const fn entry_cost(key_len: usize, value_len: usize) -> usize {
        footprint::entry_cost::<A>(key_len, value_len)
    }

    /// Number of entries chained from `bucket`, or `None` if out of range.
    pub fn chain_len(&self, bucket: usize) -> Option<usize> {
        self.buckets.get(bucket).map(chain::len)
    }

    /// All entries, bucket by bucket, each chain front-to-back.
    pub fn iter(&self) -> Iter<'_, A> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
        }
    }
}

impl<A: Allocator + Clone> Drop for HMap<A> {
    fn drop(&mut self) {
        for head in self.buckets.iter_mut() {
            chain::drain(head);
        }
    }
}

impl<A: Allocator + Clone> fmt::Debug for HMap<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HMap")
            .field("bucket_count", &self.bucket_count())
            .field("hash_algorithm", &self.algorithm)
            .field("len", &self.len)
            .field("footprint", &self.footprint())
            .finish()
    }
}

/// Iterator over `(key, value)` pairs of an `HMap`.
pub struct Iter<'a, A: Allocator + Clone> {
    buckets: core::slice::Iter<'a, Link<A>>,
    chain: Option<chain::Iter<'a, A>>,
}

impl<'a, A: Allocator + Clone> Iterator for Iter<'a, A> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.chain.as_mut().and_then(Iterator::next) {
                return Some((node.key.as_slice(), node.value.as_slice()));
            }
            self.chain = Some(chain::Iter::new(self.buckets.next()?));
        }
    }
}

impl<'a, A: Allocator + Clone> IntoIterator for &'a HMap<A> {
    type Item = (&'a [u8], &'a [u8]);
    type IntoIter = Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
