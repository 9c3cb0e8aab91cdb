//! Growable id-to-value store over a sparse id space.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use core::mem::size_of;

use bytemuck::{bytes_of, Pod};

#[cfg(feature = "std")]
use std::io;

use super::{EmptyValue, SparseArray, SparseId, SparseTable};

/// Slots added beyond the requested id when a store grows, unless
/// configured otherwise.
///
/// Also the initial number of addressable slots of a freshly
/// constructed store.
pub const DEFAULT_GROW_INCREMENT: usize = 10_000;

/// Error returned by [`SparseStore::get`] when an id has no recorded
/// value.
///
/// Out-of-range ids, never-written ids and ids erased by writing the
/// empty sentinel are deliberately indistinguishable: callers react to
/// a missing value the same way regardless of why it is missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotFound {
    index: usize,
}

impl NotFound {
    /// Returns the raw index of the id that had no value.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no value recorded for id {}", self.index)
    }
}

impl core::error::Error for NotFound {}

/// An associative array from sparse integer ids to fixed-size values.
///
/// The store addresses a contiguous slot range `0..size()` but only
/// pays for populated slots plus roughly one occupancy bit per vacant
/// one, which makes it the right shape for id spaces that are huge and
/// mostly dense-by-region: node id to packed coordinates, way id to
/// file offset, and similar pipeline indexes.
///
/// Writes to ids at or beyond the current range grow the store
/// automatically by at least one whole [grow increment], so a
/// monotonically rising id stream triggers one migration per increment
/// rather than one per id. Reads never grow the store.
///
/// Each value type reserves an [empty sentinel]; writing it erases the
/// slot, and [`get`] reports [`NotFound`] for erased, never-written and
/// out-of-range ids alike.
///
/// The store is single-writer: populate it from one thread, then share
/// it freely for concurrent reads.
///
/// # Storage engines
///
/// The third type parameter selects the storage engine and defaults to
/// [`SparseTable`]. Any [`SparseArray`] impl can stand in, for id
/// spaces whose density profile wants a different layout.
///
/// # Examples
///
/// ```
/// use geopipe_core::SparseStore;
///
/// let mut offsets: SparseStore<u64, u32> = SparseStore::with_grow_increment(4);
/// offsets.set(0, 7);
/// offsets.set(9, 3);
///
/// assert_eq!(offsets.get(0), Ok(7));
/// assert_eq!(offsets.get(9), Ok(3));
/// assert!(offsets.get(5).is_err());
/// assert!(offsets.size() >= 10);
///
/// let pairs: Vec<(u64, u32)> = offsets.iter().map(|(id, v)| (id, *v)).collect();
/// assert_eq!(pairs, vec![(0, 7), (9, 3)]);
/// ```
///
/// [grow increment]: DEFAULT_GROW_INCREMENT
/// [empty sentinel]: EmptyValue
/// [`get`]: SparseStore::get
#[derive(Clone)]
pub struct SparseStore<K, V, A = SparseTable<V>>
where
    K: SparseId,
{
    grow_increment: usize,
    backing: A,
    marker: PhantomData<(K, V)>,
}

impl<K, V, A> SparseStore<K, V, A>
where
    K: SparseId,
    A: SparseArray<V>,
{
    /// Creates a store with the [default grow increment].
    ///
    /// [default grow increment]: DEFAULT_GROW_INCREMENT
    #[must_use]
    pub fn new() -> Self {
        Self::with_grow_increment(DEFAULT_GROW_INCREMENT)
    }

    /// Creates a store that grows by at least `grow_increment` slots at
    /// a time, starting with one increment of addressable slots.
    ///
    /// # Panics
    ///
    /// Panics if `grow_increment` is zero.
    #[must_use]
    #[track_caller]
    pub fn with_grow_increment(grow_increment: usize) -> Self {
        let mut backing = A::default();
        backing.resize(grow_increment);
        Self::with_backing(backing, grow_increment)
    }

    /// Creates a store around an existing engine, keeping whatever
    /// slots it already addresses.
    ///
    /// # Panics
    ///
    /// Panics if `grow_increment` is zero.
    #[must_use]
    #[track_caller]
    pub fn with_backing(backing: A, grow_increment: usize) -> Self {
        assert!(grow_increment > 0, "grow increment must be positive");
        SparseStore {
            grow_increment,
            backing,
            marker: PhantomData,
        }
    }

    /// Returns the configured grow increment.
    #[must_use]
    pub fn grow_increment(&self) -> usize {
        self.grow_increment
    }

    /// Records `value` under `id`, growing the store if `id` is out of
    /// range.
    ///
    /// Growth extends the range to `id`'s index plus one full grow
    /// increment. Writing the [empty sentinel] erases the slot instead
    /// of recording anything; the store still grows first, so the write
    /// leaves `size()` as if a real value had been recorded.
    ///
    /// [empty sentinel]: EmptyValue
    pub fn set(&mut self, id: K, value: V)
    where
        V: EmptyValue,
    {
        let index = id.index();
        if index >= self.backing.len() {
            let old_len = self.backing.len();
            let new_len = index + self.grow_increment;
            trace!("sparse store grows from {old_len} to {new_len} slots");
            self.backing.resize(new_len);
        }
        if value.is_empty_value() {
            self.backing.remove(index);
        } else {
            self.backing.set(index, value);
        }
    }

    /// Returns the value recorded under `id`.
    ///
    /// Fails with [`NotFound`] if `id` is out of range, was never
    /// written, or was erased by writing the empty sentinel. Reads
    /// never grow the store.
    pub fn get(&self, id: K) -> Result<V, NotFound>
    where
        V: Clone,
    {
        let index = id.index();
        match self.backing.get(index) {
            Some(value) => Ok(value.clone()),
            None => Err(NotFound { index }),
        }
    }

    /// Returns the number of addressable id slots.
    ///
    /// This is the capacity of the id range, not the number of recorded
    /// values; see [`len`](Self::len) for the latter.
    #[must_use]
    pub fn size(&self) -> usize {
        self.backing.len()
    }

    /// Returns the number of ids with a recorded value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.backing.populated()
    }

    /// Returns `true` if no id has a recorded value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Estimates the memory footprint in bytes: one occupancy bit per
    /// addressable slot plus the payload of every recorded value.
    ///
    /// The estimate tracks the storage contract rather than allocator
    /// bookkeeping, so it is a planning figure, not an exact one.
    #[must_use]
    pub fn used_memory(&self) -> usize {
        self.size() / 8 + self.len() * size_of::<V>()
    }

    /// Erases all recorded values and releases the slot range.
    ///
    /// After clearing, `size()` is zero and the next out-of-range write
    /// regrows the store from scratch.
    pub fn clear(&mut self) {
        trace!("sparse store cleared");
        self.backing.clear();
    }

    /// Iterates over `(id, value)` pairs in ascending id order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.backing
            .iter()
            .map(|(index, value)| (K::from_index(index), value))
    }

    /// Serializes all recorded `(id, value)` pairs in ascending id
    /// order into a byte buffer.
    ///
    /// Records are fixed-width and tightly packed: the id's bytes
    /// immediately followed by the value's bytes, no padding, native
    /// byte order. The record width is `size_of::<K>() +
    /// size_of::<V>()`.
    #[must_use]
    pub fn dump_bytes(&self) -> Vec<u8>
    where
        K: Pod,
        V: Pod,
    {
        let mut out = Vec::with_capacity(self.len() * (size_of::<K>() + size_of::<V>()));
        for (id, value) in self.iter() {
            out.extend_from_slice(bytes_of(&id));
            out.extend_from_slice(bytes_of(value));
        }
        out
    }

    /// Writes the packed record sequence of [`dump_bytes`] to a byte
    /// sink.
    ///
    /// Stops at the first sink error. Records are small, so an
    /// unbuffered sink will see many short writes; wrap files in a
    /// [`std::io::BufWriter`].
    ///
    /// [`dump_bytes`]: Self::dump_bytes
    #[cfg(feature = "std")]
    pub fn write_dump<W: io::Write>(&self, sink: &mut W) -> io::Result<()>
    where
        K: Pod,
        V: Pod,
    {
        for (id, value) in self.iter() {
            sink.write_all(bytes_of(&id))?;
            sink.write_all(bytes_of(value))?;
        }
        Ok(())
    }
}

impl<K, V, A> Default for SparseStore<K, V, A>
where
    K: SparseId,
    A: SparseArray<V>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, A> fmt::Debug for SparseStore<K, V, A>
where
    K: SparseId + fmt::Debug,
    V: fmt::Debug,
    A: SparseArray<V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
