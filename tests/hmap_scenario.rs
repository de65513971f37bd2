// End-to-end scenario over a 1024-bucket SDBM table.
//
// Keys and values are NUL-terminated, as a C caller would pass them; the
// terminator is part of each blob. The walk:
// - empty table: zero entries, footprint = 56-byte header + 1024 slots;
// - three distinct keys, then a fourth whose hash equals the first's;
// - all four resolve to their own values;
// - removing the first leaves the other three, collision included.
use hmap::collision::find_collision;
use hmap::{HMap, HashAlgorithm, MapConfig, SetOutcome, Status};

const KEY_1: &[u8] = b"key 1\0";
const KEY_2: &[u8] = b"key 2\0";
const KEY_3: &[u8] = b"key 3\0";
const COLLISION: &[u8] = b"key 1 collision bJo5LP\0";

const DATA_1: &[u8] = b"key 1 data\0";
const DATA_2: &[u8] = b"key 2 data\0";
const DATA_3: &[u8] = b"key 3 data\0";
const DATA_COLLISION: &[u8] = b"collision data\0";

const COLLISION_PREFIX: &[u8] = b"key 1 collision ";

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Empty 1024-bucket table on a 64-bit target: 56 header bytes plus 1024
/// eight-byte slots. Identical in debug and release builds.
#[cfg(target_pointer_width = "64")]
const EMPTY_1024_BYTES: usize = 8248;

// Test: full insert / collide / lookup / remove walk on 1024 SDBM buckets.
// Assumes: "key 1 collision bJo5LP\0" hashes like "key 1\0" under SDBM.
// Verifies: empty baseline, entry counts, every lookup, NotFound after
// removal, and that removing the head key leaves its collision partner.
#[test]
fn collision_scenario() {
    init_logging();
    let mut map = HMap::new(MapConfig::new(1024)).expect("create");
    assert_eq!(map.len(), 0);
    #[cfg(target_pointer_width = "64")]
    assert_eq!(map.footprint(), EMPTY_1024_BYTES);

    for (k, v) in [(KEY_1, DATA_1), (KEY_2, DATA_2), (KEY_3, DATA_3)] {
        assert_eq!(map.set(k, v).unwrap(), SetOutcome::Inserted);
    }
    assert_eq!(map.len(), 3);

    let key1_hash = map.hash(KEY_1);
    if map.hash(COLLISION) != key1_hash {
        // Report a replacement key so the constant can be updated.
        let stem = &KEY_1[..KEY_1.len() - 1];
        let found = find_collision(map.hash_algorithm(), map.hash(stem), COLLISION_PREFIX, 22);
        panic!(
            "{:?} no longer collides with {:?}; candidate: {:?}",
            String::from_utf8_lossy(COLLISION),
            String::from_utf8_lossy(KEY_1),
            found.map(|k| String::from_utf8_lossy(&k).into_owned())
        );
    }
    assert_eq!(map.bucket_index(COLLISION), map.bucket_index(KEY_1));

    assert_eq!(map.set(COLLISION, DATA_COLLISION).unwrap(), SetOutcome::Inserted);
    assert_eq!(map.len(), 4);

    assert_eq!(map.get(KEY_1), Some(DATA_1));
    assert_eq!(map.get(KEY_2), Some(DATA_2));
    assert_eq!(map.get(KEY_3), Some(DATA_3));
    assert_eq!(map.get(COLLISION), Some(DATA_COLLISION));

    let mut buf = [0u8; 20];
    let n = map.get_into(COLLISION, &mut buf).unwrap();
    assert_eq!(&buf[..n], DATA_COLLISION);

    let before = map.footprint();
    assert!(map.remove(KEY_1));
    assert!(!map.contains_key(KEY_1));
    assert_eq!(map.get(KEY_1), None);
    assert_eq!(Status::from_lookup(map.get(KEY_1)), Status::NotFound);
    assert_eq!(Status::from_removal(map.remove(KEY_1)), Status::NotFound);
    assert_eq!(map.len(), 3);
    assert_eq!(
        before - map.footprint(),
        HMap::<hmap::alloc::Global>::entry_cost(KEY_1.len(), DATA_1.len())
    );

    assert_eq!(map.get(KEY_2), Some(DATA_2));
    assert_eq!(map.get(KEY_3), Some(DATA_3));
    assert_eq!(map.get(COLLISION), Some(DATA_COLLISION));

    map.destroy();
}

// Test: empty-table footprint against absolute byte counts.
// Assumes: 64-bit target with the global allocator.
// Verifies: header 56, slots 8192, entries 0, total 8248; the same numbers
// hold whether or not debug assertions are on.
#[cfg(target_pointer_width = "64")]
#[test]
fn empty_footprint_is_pinned_on_64_bit() {
    let map = HMap::new(MapConfig::new(1024)).unwrap();
    let f = map.footprint_breakdown();
    assert_eq!(f.header, 56);
    assert_eq!(f.buckets, 8192);
    assert_eq!(f.entries, 0);
    assert_eq!(map.footprint(), EMPTY_1024_BYTES);
}

// Test: setting an existing key.
// Assumes: KEY_1 and KEY_2 are distinct.
// Verifies: Updated outcome, unchanged count, new value visible, and the
// updated entry still removes cleanly.
#[test]
fn update_keeps_count_and_replaces_value() {
    init_logging();
    let mut map = HMap::new(MapConfig::new(1024)).unwrap();
    map.set(KEY_1, DATA_1).unwrap();
    map.set(KEY_2, DATA_2).unwrap();
    assert_eq!(map.set(KEY_1, DATA_COLLISION).unwrap(), SetOutcome::Updated);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(KEY_1), Some(DATA_COLLISION));
    assert!(map.remove(KEY_1));
    assert_eq!(map.get(KEY_1), None);
}

// Test: 500 distinct keys in 13 buckets under each hash algorithm.
// Assumes: nothing about the distribution; chains absorb any collisions.
// Verifies: len() equals the number of chained entries and every key
// yields its own value.
#[test]
fn distinct_keys_are_counted_under_every_algorithm() {
    for algo in HashAlgorithm::ALL {
        let mut map = HMap::new(MapConfig::new(13).with_hash_algorithm(algo)).unwrap();
        for i in 0u32..500 {
            map.set(format!("key {i}\0").as_bytes(), &i.to_le_bytes()).unwrap();
        }
        assert_eq!(map.len(), 500, "{algo}");
        let chained: usize = (0..13).map(|b| map.chain_len(b).unwrap()).sum();
        assert_eq!(chained, 500, "{algo}");
        for i in 0u32..500 {
            assert_eq!(
                map.get(format!("key {i}\0").as_bytes()),
                Some(&i.to_le_bytes()[..]),
                "{algo}"
            );
        }
    }
}
