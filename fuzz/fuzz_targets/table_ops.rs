//! Replays an operation tape against a `SparseTable` and a flat
//! `Vec<Option<u32>>` model, comparing the populated slots after every
//! step.

#![no_main]

use geopipe_core::{SparseArray, SparseTable};
use geopipe_core_fuzz::{TableOp, TablePlan};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|plan: TablePlan| {
    // Ensure the logger is initialized.
    let _ = pretty_env_logger::try_init();

    let mut table: SparseTable<u32> = SparseTable::new();
    let mut model: Vec<Option<u32>> = Vec::new();

    for &op in &plan.ops {
        match op {
            TableOp::Set { index, value } => {
                let index = usize::from(index);
                // Out-of-range sets are a contract violation; the store
                // always resizes first, so the model does too.
                if index < table.len() {
                    table.set(index, value);
                    model[index] = Some(value);
                }
            }
            TableOp::Remove { index } => {
                let index = usize::from(index);
                let expected = model.get_mut(index).and_then(Option::take);
                assert_eq!(table.remove(index), expected);
            }
            TableOp::Resize { len } => {
                let len = usize::from(len);
                table.resize(len);
                model.resize(len, None);
            }
            TableOp::Clear => {
                table.clear();
                model.clear();
            }
        }

        let populated = model.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(table.len(), model.len());
        assert_eq!(table.populated(), populated);
    }

    let entries: Vec<(usize, u32)> = table.iter().map(|(index, value)| (index, *value)).collect();
    let expected: Vec<(usize, u32)> = model
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| slot.map(|value| (index, value)))
        .collect();
    assert_eq!(entries, expected);

    for index in 0..model.len() {
        assert_eq!(table.get(index), model[index].as_ref());
    }
});
