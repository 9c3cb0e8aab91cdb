//! Bit-occupancy sparse array and the storage engine trait.
//!
//! [`SparseTable`] follows the classic sparse table scheme: the slot
//! space is cut into fixed groups of 64, each group carries one
//! occupancy word plus a dense row vector holding only the populated
//! slots, and a popcount over the occupancy word translates a slot index
//! into a row position. An unused slot therefore costs one bit of
//! occupancy plus a small constant share of per-group bookkeeping,
//! while lookups stay O(1).
//!
//! The engine is deliberately dumb about ids and sentinels: it deals in
//! raw `usize` indices and treats values as opaque. Id conversion and
//! empty-sentinel normalization live in [`SparseStore`].
//!
//! [`SparseStore`]: super::SparseStore

use alloc::vec::Vec;
use core::fmt;
use core::slice;

/// Number of slots covered by each occupancy word.
const GROUP_BITS: usize = u64::BITS as usize;

/// Capability trait for the storage engine behind a [`SparseStore`].
///
/// An engine is a growable array of slots addressed by raw index, where
/// any slot is either vacant or holds a `V`. The default engine is
/// [`SparseTable`]; a caller with different density expectations can
/// supply its own (a flat `Vec<Option<V>>` for near-full id spaces, a
/// mapped file, ...) without touching the store's contract.
///
/// Implementations must keep slots at or beyond [`len`](Self::len)
/// vacant and must report them as such from [`get`](Self::get).
///
/// [`SparseStore`]: super::SparseStore
pub trait SparseArray<V>: Default {
    /// Returns the number of addressable slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are addressable.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows or shrinks the addressable range to exactly `new_len`
    /// slots.
    ///
    /// Growing never disturbs existing slots; shrinking vacates every
    /// slot at or beyond `new_len`.
    fn resize(&mut self, new_len: usize);

    /// Returns the value in slot `index`, or `None` if the slot is
    /// vacant or out of range.
    fn get(&self, index: usize) -> Option<&V>;

    /// Fills slot `index` with `value`, replacing any previous value.
    ///
    /// Panics if `index` is out of range; callers resize first.
    #[track_caller]
    fn set(&mut self, index: usize, value: V);

    /// Vacates slot `index`, returning the previous value if the slot
    /// was populated.
    fn remove(&mut self, index: usize) -> Option<V>;

    /// Vacates all slots and shrinks the addressable range to zero.
    fn clear(&mut self);

    /// Returns the number of populated slots.
    fn populated(&self) -> usize;

    /// Iterates over `(index, value)` pairs of populated slots in
    /// ascending index order.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (usize, &'a V)> + 'a
    where
        V: 'a;
}

/// One run of 64 slots: an occupancy word plus the populated rows.
///
/// `rows` holds exactly the values of the set occupancy bits, ordered
/// by slot index.
#[derive(Clone)]
struct Group<V> {
    occupied: u64,
    rows: Vec<V>,
}

impl<V> Group<V> {
    const fn vacant() -> Self {
        Group {
            occupied: 0,
            rows: Vec::new(),
        }
    }

    /// Row position of `bit`, counting the populated slots below it.
    #[inline]
    fn rank(&self, bit: u32) -> usize {
        (self.occupied & ((1 << bit) - 1)).count_ones() as usize
    }
}

/// A growable array over a sparse index space, paying roughly one bit
/// per vacant slot.
///
/// This is the default engine behind [`SparseStore`] and is usually
/// used through it. Directly it behaves like a `Vec<Option<V>>` with a
/// compact representation: [`resize`](SparseArray::resize) controls the
/// addressable range, [`set`](SparseArray::set) and
/// [`remove`](SparseArray::remove) populate and vacate slots, and
/// vacant slots cost no `V`-sized storage.
///
/// [`SparseStore`]: super::SparseStore
#[derive(Clone)]
pub struct SparseTable<V> {
    groups: Vec<Group<V>>,
    len: usize,
    populated: usize,
}

impl<V> SparseTable<V> {
    /// Creates an empty table with no addressable slots.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        SparseTable {
            groups: Vec::new(),
            len: 0,
            populated: 0,
        }
    }

    #[inline]
    fn split(index: usize) -> (usize, u32) {
        (index / GROUP_BITS, (index % GROUP_BITS) as u32)
    }
}

impl<V> Default for SparseTable<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SparseArray<V> for SparseTable<V> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn resize(&mut self, new_len: usize) {
        let keep_groups = new_len.div_ceil(GROUP_BITS);
        if new_len < self.len {
            for group in self.groups.drain(keep_groups..) {
                self.populated -= group.occupied.count_ones() as usize;
            }
            // Mask off the tail of the boundary group, if it is now
            // only partially addressable.
            let keep_bits = new_len % GROUP_BITS;
            if keep_bits != 0 {
                if let Some(last) = self.groups.last_mut() {
                    let mask = (1u64 << keep_bits) - 1;
                    let dropped = last.occupied & !mask;
                    if dropped != 0 {
                        last.rows.truncate((last.occupied & mask).count_ones() as usize);
                        last.occupied &= mask;
                        self.populated -= dropped.count_ones() as usize;
                    }
                }
            }
        } else {
            self.groups.resize_with(keep_groups, Group::vacant);
        }
        self.len = new_len;
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&V> {
        if index >= self.len {
            return None;
        }
        let (word, bit) = Self::split(index);
        let group = &self.groups[word];
        if group.occupied & (1 << bit) == 0 {
            return None;
        }
        Some(&group.rows[group.rank(bit)])
    }

    fn set(&mut self, index: usize, value: V) {
        assert!(
            index < self.len,
            "slot {index} is out of range for a table of {} slots",
            self.len
        );
        let (word, bit) = Self::split(index);
        let group = &mut self.groups[word];
        let rank = group.rank(bit);
        if group.occupied & (1 << bit) == 0 {
            group.rows.insert(rank, value);
            group.occupied |= 1 << bit;
            self.populated += 1;
        } else {
            group.rows[rank] = value;
        }
        debug_assert_eq!(group.rows.len(), group.occupied.count_ones() as usize);
    }

    fn remove(&mut self, index: usize) -> Option<V> {
        if index >= self.len {
            return None;
        }
        let (word, bit) = Self::split(index);
        let group = &mut self.groups[word];
        if group.occupied & (1 << bit) == 0 {
            return None;
        }
        let rank = group.rank(bit);
        group.occupied &= !(1 << bit);
        self.populated -= 1;
        let value = group.rows.remove(rank);
        debug_assert_eq!(group.rows.len(), group.occupied.count_ones() as usize);
        Some(value)
    }

    fn clear(&mut self) {
        self.groups.clear();
        self.len = 0;
        self.populated = 0;
    }

    #[inline]
    fn populated(&self) -> usize {
        self.populated
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (usize, &'a V)> + 'a
    where
        V: 'a,
    {
        Iter {
            groups: self.groups.iter(),
            rows: Default::default(),
            word: 0,
            next_base: 0,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for SparseTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over the populated slots of a [`SparseTable`] in ascending
/// index order.
pub struct Iter<'a, V> {
    groups: slice::Iter<'a, Group<V>>,
    rows: slice::Iter<'a, V>,
    word: u64,
    next_base: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (usize, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.word == 0 {
            let group = self.groups.next()?;
            self.word = group.occupied;
            self.rows = group.rows.iter();
            self.next_base += GROUP_BITS;
        }
        let low_bit = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;
        // rows carries exactly one value per occupancy bit.
        let value = self.rows.next().unwrap();
        Some((self.next_base - GROUP_BITS + low_bit, value))
    }
}
