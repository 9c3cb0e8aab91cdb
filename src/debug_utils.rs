//! Utilities to help with debugging stores.

use core::fmt::Debug;
use core::mem::size_of;

use anyhow::{bail, ensure, Result};

use crate::index::{EmptyValue, SparseArray, SparseId, SparseStore};

/// Checks every externally observable invariant of `store`.
///
/// Walks the full id range, so this is intended for tests and fuzzing
/// rather than production paths. Any violation is reported as an error
/// describing the offending id.
pub fn check_store<K, V, A>(store: &SparseStore<K, V, A>) -> Result<()>
where
    K: SparseId + Debug,
    V: EmptyValue + Clone + PartialEq + Debug,
    A: SparseArray<V>,
{
    ensure!(
        store.len() <= store.size(),
        "{} recorded values exceed the {} addressable slots",
        store.len(),
        store.size()
    );
    let expected_memory = store.size() / 8 + store.len() * size_of::<V>();
    ensure!(
        store.used_memory() == expected_memory,
        "used_memory reports {} instead of {expected_memory}",
        store.used_memory()
    );

    let mut seen = 0;
    let mut prev: Option<usize> = None;
    for (id, value) in store.iter() {
        let index = id.index();
        if let Some(prev) = prev {
            ensure!(index > prev, "iteration order regressed: id {index} after {prev}");
        }
        ensure!(
            index < store.size(),
            "iteration yielded id {index} beyond the {} addressable slots",
            store.size()
        );
        ensure!(
            !value.is_empty_value(),
            "iteration yielded the empty sentinel at id {index}"
        );
        match store.get(id) {
            Ok(stored) => ensure!(
                stored == *value,
                "id {index} reads back {stored:?} but iterates as {value:?}"
            ),
            Err(err) => bail!("iterated id {index} is not readable: {err}"),
        }
        prev = Some(index);
        seen += 1;
    }
    ensure!(
        seen == store.len(),
        "iteration yielded {seen} records but the store counts {}",
        store.len()
    );

    // Independently count the readable ids so a value can neither hide
    // from iteration nor appear twice.
    let readable = (0..store.size())
        .filter(|&index| store.get(K::from_index(index)).is_ok())
        .count();
    ensure!(
        readable == seen,
        "{readable} ids are readable but iteration yielded {seen}"
    );

    Ok(())
}
