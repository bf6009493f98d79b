//! Ordering rule shared by every queue strategy.
//!
//! A queue entry is a `(key, value)` pair. Entries are ranked primarily by
//! their value under a caller-chosen [`Compare`] relation and secondarily by
//! ascending key, which gives a total order even when values tie:
//!
//! ```text
//!   precedes(a, b) := C::less(a.value, b.value)
//!                  || (!C::less(b.value, a.value) && a.key < b.key)
//! ```
//!
//! The entry that sorts *first* is the highest-priority entry, i.e. the one
//! returned by `top()`.
//!
//! ## Relations
//!
//! | Relation    | `less(a, b)` | First out         |
//! |-------------|--------------|-------------------|
//! | [`Greater`] | `a > b`      | largest value     |
//! | [`Less`]    | `a < b`      | smallest value    |
//!
//! [`Greater`] is the default everywhere, so a queue built without naming a
//! relation is a max-priority queue.
//!
//! ## Example
//!
//! ```
//! use std::cmp::Ordering;
//! use keyqueue::order::{compare_pairs, Greater, Less};
//!
//! // Larger values first under Greater.
//! assert_eq!(compare_pairs::<u32, u32, Greater>((&1, &9), (&2, &3)), Ordering::Less);
//! // Smaller values first under Less.
//! assert_eq!(compare_pairs::<u32, u32, Less>((&1, &9), (&2, &3)), Ordering::Greater);
//! // Equal values fall back to ascending key.
//! assert_eq!(compare_pairs::<u32, u32, Greater>((&1, &5), (&2, &5)), Ordering::Less);
//! ```
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// A stateless strict-weak-order relation over priority values.
///
/// `less(a, b)` returning `true` means `a` is served before `b`. The relation
/// must be irreflexive and transitive; values for which neither `less(a, b)`
/// nor `less(b, a)` holds are treated as equal priority and ordered by key.
///
/// Implement it on a zero-sized type to define a custom priority:
///
/// ```
/// use keyqueue::order::Compare;
///
/// /// Shortest string first.
/// struct ByLen;
///
/// impl Compare<String> for ByLen {
///     fn less(a: &String, b: &String) -> bool {
///         a.len() < b.len()
///     }
/// }
///
/// assert!(ByLen::less(&"ab".to_string(), &"abc".to_string()));
/// ```
pub trait Compare<V: ?Sized> {
    fn less(a: &V, b: &V) -> bool;
}

/// Larger values have higher priority (max-priority queue).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Greater;

/// Smaller values have higher priority (min-priority queue).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Less;

impl<V: PartialOrd + ?Sized> Compare<V> for Greater {
    #[inline]
    fn less(a: &V, b: &V) -> bool {
        a > b
    }
}

impl<V: PartialOrd + ?Sized> Compare<V> for Less {
    #[inline]
    fn less(a: &V, b: &V) -> bool {
        a < b
    }
}

/// Ranks two `(key, value)` pairs under relation `C`.
///
/// `Ordering::Less` means `a` is served before `b`.
#[inline]
pub fn compare_pairs<K, V, C>(a: (&K, &V), b: (&K, &V)) -> Ordering
where
    K: Ord + ?Sized,
    V: ?Sized,
    C: Compare<V>,
{
    if C::less(a.1, b.1) {
        Ordering::Less
    } else if C::less(b.1, a.1) {
        Ordering::Greater
    } else {
        a.0.cmp(b.0)
    }
}

/// A `(key, value)` pair whose `Ord` is the ordering rule for relation `C`.
///
/// Sorting a collection of `Ranked` entries ascending puts the
/// highest-priority entry first, so a `BTreeSet<Ranked<..>>` serves from
/// `first()` and a `BinaryHeap<Reverse<Ranked<..>>>` serves from `peek()`.
pub struct Ranked<K, V, C> {
    key: K,
    value: V,
    _compare: PhantomData<fn() -> C>,
}

impl<K, V, C> Ranked<K, V, C> {
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            _compare: PhantomData,
        }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: Clone, V: Clone, C> Clone for Ranked<K, V, C> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone(), self.value.clone())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Ranked<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ranked")
            .field(&self.key)
            .field(&self.value)
            .finish()
    }
}

impl<K: Ord, V, C: Compare<V>> PartialEq for Ranked<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: Ord, V, C: Compare<V>> Eq for Ranked<K, V, C> {}

impl<K: Ord, V, C: Compare<V>> PartialOrd for Ranked<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V, C: Compare<V>> Ord for Ranked<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_pairs::<K, V, C>(self.as_pair(), other.as_pair())
    }
}
