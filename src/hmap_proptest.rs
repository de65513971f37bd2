#![cfg(test)]

// Property tests for HMap kept inside the crate so they can reach chain
// internals and the allocator adapter without widening the public API.

use crate::alloc::Tracking;
use crate::config::MapConfig;
use crate::error::MapError;
use crate::footprint;
use crate::hash::HashAlgorithm;
use crate::hmap::{HMap, SetOutcome};
use allocator_api2::alloc::Allocator;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

type Blob = Vec<u8>;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, Blob),
    Get(usize),
    Contains(Blob),
    Remove(usize),
    Iterate,
    Clear,
}

fn arb_blob(max: usize) -> impl Strategy<Value = Blob> {
    proptest::collection::vec(any::<u8>(), 0..=max)
}

fn arb_scenario() -> impl Strategy<Value = (Vec<Blob>, Vec<Op>)> {
    proptest::collection::vec(arb_blob(6), 1..=8).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), arb_blob(12)).prop_map(|(i, v)| Op::Set(i, v)),
            3 => idx.clone().prop_map(Op::Get),
            2 => prop_oneof![contains_pool, arb_blob(6)].prop_map(Op::Contains),
            3 => idx.clone().prop_map(Op::Remove),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_config() -> impl Strategy<Value = MapConfig> {
    (
        prop_oneof![Just(1usize), Just(2), Just(7), Just(1024)],
        proptest::sample::select(HashAlgorithm::ALL.to_vec()),
    )
        .prop_map(|(n, h)| MapConfig::new(n).with_hash_algorithm(h))
}

// Structural invariants checked after every step:
// - entry counter == entries reachable by walking every chain;
// - every entry is reachable from bucket `hash(key) % bucket_count`;
// - footprint == header + slots + sum of entry costs of the model.
fn check_structure<A: Allocator + Clone>(
    sut: &HMap<A>,
    model: &HashMap<Blob, Blob>,
) -> Result<(), TestCaseError> {
    let walked: usize = (0..sut.bucket_count())
        .map(|b| sut.chain_len(b).unwrap_or(0))
        .sum();
    prop_assert_eq!(walked, sut.len());
    prop_assert_eq!(sut.len(), model.len());
    prop_assert_eq!(sut.is_empty(), model.is_empty());

    // Lookups only search the home bucket, so every iterated entry being
    // found again means every entry sits in its home bucket.
    for (k, v) in sut.iter() {
        prop_assert_eq!(sut.get(k), Some(v));
    }

    let entries: usize = model
        .iter()
        .map(|(k, v)| footprint::entry_cost::<A>(k.len(), v.len()))
        .sum();
    let expected = HMap::<A>::header_size()
        + sut.bucket_count() * footprint::slot_cost::<A>()
        + entries;
    prop_assert_eq!(sut.footprint(), expected);
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `set` reports Inserted exactly when the model lacked the key.
// - `get`/`contains_key` parity with the model for pool and arbitrary keys.
// - `remove` reports presence and the key is gone afterwards.
// - `iter` yields each live entry exactly once with the model's value.
// - Structural invariants (see `check_structure`) hold after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(cfg in arb_config(), (pool, ops) in arb_scenario()) {
        let mut sut = HMap::new(cfg).unwrap();
        let mut model: HashMap<Blob, Blob> = HashMap::new();

        for op in ops {
            match op {
                Op::Set(i, v) => {
                    let k = &pool[i];
                    let outcome = sut.set(k, &v).unwrap();
                    let prev = model.insert(k.clone(), v);
                    let expected = if prev.is_some() { SetOutcome::Updated } else { SetOutcome::Inserted };
                    prop_assert_eq!(outcome, expected);
                }
                Op::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k), model.get(k).map(Vec::as_slice));
                }
                Op::Contains(k) => {
                    prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
                }
                Op::Remove(i) => {
                    let k = &pool[i];
                    let removed = sut.remove(k);
                    prop_assert_eq!(removed, model.remove(k).is_some());
                    prop_assert!(!sut.contains_key(k));
                }
                Op::Iterate => {
                    let mut seen = BTreeSet::new();
                    for (k, v) in sut.iter() {
                        prop_assert!(seen.insert(k.to_vec()), "entry yielded twice");
                        prop_assert_eq!(Some(v), model.get(k).map(Vec::as_slice));
                    }
                    prop_assert_eq!(seen.len(), model.len());
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
            }
            check_structure(&sut, &model)?;
        }
    }
}

// Property: with an allocator that refuses requests beyond a random live
// byte limit, a failed `set` leaves the table exactly as it was and all
// memory the allocator handed out is returned when the table drops.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_allocation_failure_is_atomic(
        limit in 0usize..2048,
        (pool, ops) in arb_scenario(),
    ) {
        let tracking = Tracking::new();
        {
            let mut sut = HMap::new_in(MapConfig::new(7), tracking.clone()).unwrap();
            let base = tracking.stats().live_bytes;
            tracking.set_limit(Some(base + limit));
            let mut model: HashMap<Blob, Blob> = HashMap::new();

            for op in ops {
                match op {
                    Op::Set(i, v) => {
                        let k = &pool[i];
                        let before = (sut.len(), sut.footprint(), tracking.stats().live_bytes);
                        match sut.set(k, &v) {
                            Ok(_) => {
                                model.insert(k.clone(), v);
                            }
                            Err(MapError::Allocation { .. }) => {
                                prop_assert_eq!(
                                    (sut.len(), sut.footprint(), tracking.stats().live_bytes),
                                    before
                                );
                            }
                            Err(e) => prop_assert!(false, "unexpected error: {}", e),
                        }
                    }
                    Op::Remove(i) => {
                        let k = &pool[i];
                        prop_assert_eq!(sut.remove(k), model.remove(k).is_some());
                    }
                    Op::Clear => {
                        sut.clear();
                        model.clear();
                    }
                    Op::Get(i) => {
                        let k = &pool[i];
                        prop_assert_eq!(sut.get(k), model.get(k).map(Vec::as_slice));
                    }
                    Op::Contains(_) | Op::Iterate => {}
                }
                check_structure(&sut, &model)?;

                // Live allocator bytes: bucket array plus node, key and value per entry.
                let expected_live = base
                    + model
                        .iter()
                        .map(|(k, v)| footprint::entry_cost::<Tracking>(k.len(), v.len()))
                        .sum::<usize>();
                prop_assert_eq!(tracking.stats().live_bytes, expected_live);
            }
        }
        prop_assert_eq!(tracking.stats().live_bytes, 0);
        prop_assert_eq!(tracking.stats().outstanding(), 0);
    }
}
