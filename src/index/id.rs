//! Integer key types for sparse stores.

/// A raw integer id usable as a [`SparseStore`] key.
///
/// Ids in the pipeline are plain unsigned integers: feature and geometry
/// ids arrive as `u64`s from input readers, while smaller extracts fit
/// comfortably in `u32`. This trait abstracts over the concrete width so
/// a store can be instantiated with whichever integer type the
/// surrounding code already uses for its id space.
///
/// Conversions must be lossless for every id a store will see. Ids that
/// do not fit the key type are a caller bug and are caught by debug
/// assertions.
///
/// [`SparseStore`]: super::SparseStore
pub trait SparseId: Copy + Eq {
    /// Creates a key from a raw slot index.
    fn from_index(index: usize) -> Self;

    /// Returns the raw slot index of this key.
    fn index(self) -> usize;
}

macro_rules! impl_sparse_id {
    ($($int:ty),*) => {
        $(
            impl SparseId for $int {
                #[inline]
                #[allow(clippy::unnecessary_cast)]
                fn from_index(index: usize) -> Self {
                    debug_assert!(
                        index as $int as usize == index,
                        "id {index} does not fit in {}",
                        stringify!($int)
                    );
                    index as $int
                }

                #[inline]
                #[allow(clippy::unnecessary_cast)]
                fn index(self) -> usize {
                    debug_assert!(
                        self as usize as $int == self,
                        "id does not fit in the addressable range"
                    );
                    self as usize
                }
            }
        )*
    };
}

impl_sparse_id!(u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_index() {
        assert_eq!(u32::from_index(0), 0);
        assert_eq!(u64::from_index(123_456_789), 123_456_789);
        assert_eq!(9_876_543_210_u64.index(), 9_876_543_210);
        assert_eq!(usize::from_index(42).index(), 42);
    }

    #[test]
    fn narrow_keys_cover_their_full_range() {
        assert_eq!(u16::from_index(u16::MAX as usize), u16::MAX);
        assert_eq!(u16::MAX.index(), u16::MAX as usize);
    }
}
