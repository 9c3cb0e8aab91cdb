//! Replays an operation tape against a `SparseStore` and a `BTreeMap`
//! model, then checks the store's invariants.

#![no_main]

use std::collections::BTreeMap;

use geopipe_core::{debug_utils, SparseStore};
use geopipe_core_fuzz::{StoreOp, StorePlan};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|plan: StorePlan| {
    // Ensure the logger is initialized.
    let _ = pretty_env_logger::try_init();

    let mut store: SparseStore<u64, u32> = SparseStore::with_grow_increment(plan.grow_increment);
    let mut model: BTreeMap<u64, u32> = BTreeMap::new();

    for &op in &plan.ops {
        match op {
            StoreOp::Set { id, value } => {
                store.set(u64::from(id), value);
                if value == u32::MAX {
                    model.remove(&u64::from(id));
                } else {
                    model.insert(u64::from(id), value);
                }
            }
            StoreOp::Get { id } => {
                assert_eq!(
                    store.get(u64::from(id)).ok(),
                    model.get(&u64::from(id)).copied()
                );
            }
            StoreOp::Clear => {
                store.clear();
                model.clear();
            }
        }
        assert_eq!(store.len(), model.len());
    }

    let dumped: Vec<(u64, u32)> = store.iter().map(|(id, value)| (id, *value)).collect();
    let expected: Vec<(u64, u32)> = model.iter().map(|(&id, &value)| (id, value)).collect();
    assert_eq!(dumped, expected);

    debug_utils::check_store(&store).unwrap();
});
