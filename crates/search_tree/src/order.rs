use std::cmp::Ordering;

/// Total order over keys, fixed for the lifetime of a tree.
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator, so trees can be built from
/// closures directly. The order is trusted: a comparator that is not a total
/// order silently breaks the search-tree invariant instead of being detected.
pub trait Comparator<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The `Ord` order of the key type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
