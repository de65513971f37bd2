//! hmap: a fixed-bucket hash map over byte-blob keys and values, with
//! separate chaining and an injected allocator.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, predictable table for constrained environments where
//!   the caller decides where memory comes from and how big the table is.
//! - Layers:
//!   - `hash`: pure byte-blob hash functions; the table resolves its
//!     algorithm to a plain function pointer once, at construction.
//!   - `chain`: single-owner linked chains. A bucket slot owns its head
//!     node, each node owns its successor, key copy and value copy.
//!   - `HMap<A>`: the public operation set (set/get/contains/remove and
//!     introspection) over a bucket array that never resizes.
//!   - `footprint`: exact byte accounting layered over both.
//!
//! Constraints
//! - `bucket_count` is fixed at construction; there is no rehashing.
//! - Every allocation goes through the allocator passed to `new_in`: one
//!   request for the bucket array, then one per node, key and value.
//! - Keys and values are copied in; caller buffers are never retained.
//! - Keys are unique by byte equality. `set` on an existing key replaces
//!   the value in place and keeps the key.
//! - `len()` and `footprint()` are counters, never recomputed by walking.
//!
//! Failure boundaries
//! - Configuration errors are reported by construction; no table exists.
//! - Allocation failures are reported by the operation that hit them and
//!   leave the table exactly as it was: new entries are fully built before
//!   being linked, replacement values fully copied before the old value is
//!   released.
//! - A missing key is `None`/`false`, not an error.
//!
//! Threading and reentrancy
//! - No internal locking. `HMap` is `Send` (when `A` is) but not `Sync`;
//!   share it across threads behind a `Mutex` or keep it on one thread.
//! - The allocator is the only user code a table calls. In debug builds a
//!   guard panics if it calls back into the same table mid-operation.
//!
//! Hash stability
//! - Hash values are a pure function of key bytes (`HashValue = u32`), so
//!   callers may probe them with `HMap::hash` and build deliberate
//!   collisions (see `collision`). Trailing NUL bytes are ordinary bytes.
//!
//! Notes and non-goals
//! - No resizing, persistence or serialization of table contents.
//! - Chain order is unspecified; new entries are linked at the head.
//! - Dropping a table releases chains iteratively, so chain length never
//!   bounds stack depth.

pub mod alloc;
mod chain;
pub mod collision;
pub mod config;
pub mod error;
pub mod footprint;
pub mod hash;
mod hmap;
mod hmap_proptest;
mod reentrancy;

// Public surface
pub use alloc::{AllocStats, Tracking};
pub use config::MapConfig;
pub use error::{ConfigError, MapError, MapResult, Status};
pub use footprint::Footprint;
pub use hash::{HashAlgorithm, HashValue};
pub use hmap::{HMap, Iter, SetOutcome};
