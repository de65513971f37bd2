// Injected allocator behavior, observed through the Tracking adapter.
//
// Invariants exercised:
// - Construction makes exactly one request; refusing it yields an
//   allocation error and no table.
// - Each new entry makes three requests (node, key, value); an update
//   makes one (the new value) and returns one (the old value).
// - A refused request leaves len, footprint, contents and live bytes
//   unchanged.
// - Dropping or destroying a table returns every byte.
use hmap::{HMap, MapConfig, MapError, Status, Tracking};

fn tracked(buckets: usize) -> (HMap<Tracking>, Tracking) {
    let t = Tracking::new();
    let m = HMap::new_in(MapConfig::new(buckets), t.clone()).expect("create");
    (m, t)
}

// Test: construction against an allocator that refuses everything.
// Assumes: the bucket array is the only construction-time request.
// Verifies: Allocation error with AllocationFailure status, one refusal,
// nothing left live.
#[test]
fn refused_bucket_array_means_no_table() {
    let t = Tracking::new();
    t.set_limit(Some(0));
    let res = HMap::new_in(MapConfig::new(1024), t.clone());
    let err = res.expect_err("bucket array must be refused");
    assert!(matches!(err, MapError::Allocation { .. }));
    assert_eq!(err.status(), Status::AllocationFailure);
    assert_eq!(t.stats().live_bytes, 0);
    assert_eq!(t.stats().refused, 1);
}

// Test: zero-bucket configuration.
// Assumes: validation runs before any allocation.
// Verifies: ConfigurationError status and no request reaches the allocator.
#[test]
fn config_error_touches_no_memory() {
    let t = Tracking::new();
    let err = HMap::new_in(MapConfig::new(0), t.clone()).unwrap_err();
    assert_eq!(err.status(), Status::ConfigurationError);
    assert_eq!(t.stats().acquired, 0);
}

// Test: allocator traffic of construct, insert, update and remove.
// Assumes: blobs are reserved exactly, one request per blob.
// Verifies: 1 request to build, 3 per insert, 1 in / 1 out per update,
// and remove returns all three, leaving only the bucket array.
#[test]
fn request_counts_per_operation() {
    let (mut m, t) = tracked(64);
    assert_eq!(t.stats().acquired, 1);

    m.set(b"key", b"value").unwrap();
    assert_eq!(t.stats().acquired, 4);

    m.set(b"key", b"other value").unwrap();
    assert_eq!(t.stats().acquired, 5);
    assert_eq!(t.stats().released, 1);

    assert!(m.remove(b"key"));
    assert_eq!(t.stats().released, 4);
    assert_eq!(t.stats().outstanding(), 1);
}

// Test: insert of a new key while the allocator is exhausted.
// Assumes: the node, key and value are all built before linking.
// Verifies: error, identical len/footprint/live bytes, no partial entry,
// and the same insert succeeds once the limit is lifted.
#[test]
fn refused_insert_leaves_table_unchanged() {
    let (mut m, t) = tracked(8);
    m.set(b"existing", b"1").unwrap();
    let snapshot = (m.len(), m.footprint(), t.stats().live_bytes);

    t.exhaust();
    let err = m.set(b"new key", b"new value").unwrap_err();
    assert!(matches!(err, MapError::Allocation { .. }));
    assert_eq!((m.len(), m.footprint(), t.stats().live_bytes), snapshot);
    assert!(!m.contains_key(b"new key"));
    assert_eq!(m.get(b"existing"), Some(&b"1"[..]));

    t.set_limit(None);
    m.set(b"new key", b"new value").unwrap();
    assert_eq!(m.len(), 2);
}

// Test: update of an existing key while the allocator is exhausted.
// Assumes: the replacement value is copied before the old one is freed.
// Verifies: error, unchanged len and footprint, old value still readable.
#[test]
fn refused_update_keeps_old_value() {
    let (mut m, t) = tracked(8);
    m.set(b"k", b"old").unwrap();
    let snapshot = (m.len(), m.footprint());
    t.exhaust();
    assert!(m.set(b"k", b"replacement").is_err());
    assert_eq!((m.len(), m.footprint()), snapshot);
    assert_eq!(m.get(b"k"), Some(&b"old"[..]));
}

// Test: remove and clear with no allocation budget left.
// Assumes: releasing memory never requests memory.
// Verifies: both succeed and the counts follow.
#[test]
fn removal_works_with_exhausted_allocator() {
    let (mut m, t) = tracked(8);
    m.set(b"a", b"1").unwrap();
    m.set(b"b", b"2").unwrap();
    t.exhaust();
    assert!(m.remove(b"a"));
    assert_eq!(m.len(), 1);
    m.clear();
    assert!(m.is_empty());
}

// Test: destroy after heavy insert and rewrite traffic.
// Assumes: Tracking records every acquire and release.
// Verifies: zero live bytes and matching acquire/release counts.
#[test]
fn destroy_returns_every_byte() {
    let (mut m, t) = tracked(1024);
    for i in 0u32..2000 {
        m.set(&i.to_be_bytes(), format!("value {i}").as_bytes()).unwrap();
    }
    for i in (0u32..2000).step_by(7) {
        m.set(&i.to_be_bytes(), b"rewritten").unwrap();
    }
    assert!(t.stats().peak_bytes >= t.stats().live_bytes);
    m.destroy();
    let s = t.stats();
    assert_eq!(s.live_bytes, 0);
    assert_eq!(s.outstanding(), 0);
    assert_eq!(s.acquired, s.released);
}
