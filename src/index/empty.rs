//! Reserved "empty" representations for stored value types.

/// Binds a value type to its reserved empty sentinel.
///
/// A [`SparseStore`] treats one reserved bit pattern of each value type
/// as "no value": writing it erases the slot, and reading an erased or
/// never-written slot reports not-found. The binding is resolved at
/// compile time through this trait rather than through any runtime
/// registry, so a store over a custom value type only needs an
/// `EmptyValue` impl for it.
///
/// The provided unsigned integer impls reserve the all-ones pattern
/// (`MAX`), which never occurs as a real file offset or packed
/// coordinate in the pipeline. Signed integers reserve `MIN` for the
/// same reason. Composite impls (pairs, triples, arrays) are empty only
/// when every component is, so a value that merely contains a reserved
/// component is stored normally.
///
/// [`SparseStore`]: super::SparseStore
pub trait EmptyValue {
    /// Returns the reserved empty sentinel for this type.
    fn empty_value() -> Self;

    /// Returns `true` if `self` is the reserved empty sentinel.
    fn is_empty_value(&self) -> bool;
}

macro_rules! impl_empty_value_max {
    ($($int:ty),*) => {
        $(
            impl EmptyValue for $int {
                #[inline]
                fn empty_value() -> Self {
                    <$int>::MAX
                }

                #[inline]
                fn is_empty_value(&self) -> bool {
                    *self == <$int>::MAX
                }
            }
        )*
    };
}

macro_rules! impl_empty_value_min {
    ($($int:ty),*) => {
        $(
            impl EmptyValue for $int {
                #[inline]
                fn empty_value() -> Self {
                    <$int>::MIN
                }

                #[inline]
                fn is_empty_value(&self) -> bool {
                    *self == <$int>::MIN
                }
            }
        )*
    };
}

impl_empty_value_max!(u8, u16, u32, u64, u128, usize);
impl_empty_value_min!(i8, i16, i32, i64, i128, isize);

impl<A: EmptyValue, B: EmptyValue> EmptyValue for (A, B) {
    #[inline]
    fn empty_value() -> Self {
        (A::empty_value(), B::empty_value())
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        self.0.is_empty_value() && self.1.is_empty_value()
    }
}

impl<A: EmptyValue, B: EmptyValue, C: EmptyValue> EmptyValue for (A, B, C) {
    #[inline]
    fn empty_value() -> Self {
        (A::empty_value(), B::empty_value(), C::empty_value())
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        self.0.is_empty_value() && self.1.is_empty_value() && self.2.is_empty_value()
    }
}

impl<T: EmptyValue, const N: usize> EmptyValue for [T; N] {
    #[inline]
    fn empty_value() -> Self {
        core::array::from_fn(|_| T::empty_value())
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        self.iter().all(T::is_empty_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_reserve_an_extreme() {
        assert_eq!(u32::empty_value(), u32::MAX);
        assert_eq!(i32::empty_value(), i32::MIN);
        assert!(u64::MAX.is_empty_value());
        assert!(!0u64.is_empty_value());
        assert!(!i32::MAX.is_empty_value());
    }

    #[test]
    fn composites_are_empty_only_when_all_components_are() {
        assert!(<(u32, u32)>::empty_value().is_empty_value());
        assert!(!(u32::MAX, 0u32).is_empty_value());
        assert!(!(0u32, u32::MAX).is_empty_value());

        assert!(<[u16; 4]>::empty_value().is_empty_value());
        assert!(![0u16, u16::MAX, u16::MAX, u16::MAX].is_empty_value());
    }

    #[test]
    fn packed_coordinate_pairs_store_real_extremes() {
        // A (lat, lon) pair may legitimately carry one MIN component.
        let south_pole = (i32::MIN, 0i32);
        assert!(!south_pole.is_empty_value());
        assert!(<(i32, i32)>::empty_value().is_empty_value());
    }
}
