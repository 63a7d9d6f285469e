#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, V> = BTreeMap<K, V>;

#[cfg(feature = "std")]
pub(crate) type KeySet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub(crate) type KeySet<K> = BTreeSet<K>;

/// Bound for item keys.
///
/// With `std` this is `Hash + Eq + Clone` (keys live in a `HashMap`); without it, `Ord + Clone`
/// (keys live in a `BTreeMap`).
#[cfg(feature = "std")]
pub trait ListKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ListKey for K {}

#[cfg(not(feature = "std"))]
pub trait ListKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ListKey for K {}

/// A borrowed view of the host's data plus its key accessor.
///
/// The core never stores or mutates the data; hosts build a fresh `Items` for every call.
pub struct Items<'a, T, F> {
    data: &'a [T],
    get_key: F,
}

impl<'a, T, F, K> Items<'a, T, F>
where
    F: Fn(&T) -> K,
{
    pub fn new(data: &'a [T], get_key: F) -> Self {
        Self { data, get_key }
    }

    pub fn data(&self) -> &'a [T] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn key_of(&self, item: &T) -> K {
        (self.get_key)(item)
    }

    pub fn key_at(&self, index: usize) -> Option<K> {
        self.data.get(index).map(|item| (self.get_key)(item))
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.data.iter().map(|item| (self.get_key)(item))
    }

    /// Index of the first item whose key equals `key` (linear scan).
    pub fn position(&self, key: &K) -> Option<usize>
    where
        K: PartialEq,
    {
        self.data.iter().position(|item| (self.get_key)(item) == *key)
    }

    /// Returns the first pair of indexes that share a key, if any.
    pub fn find_duplicate_key(&self) -> Option<(usize, usize)>
    where
        K: ListKey,
    {
        let mut seen = KeyMap::<K, usize>::new();
        for (i, key) in self.keys().enumerate() {
            if let Some(&first) = seen.get(&key) {
                return Some((first, i));
            }
            seen.insert(key, i);
        }
        None
    }

    pub(crate) fn key_set(&self) -> KeySet<K>
    where
        K: ListKey,
    {
        self.keys().collect()
    }
}

impl<T, F: Clone> Clone for Items<'_, T, F> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            get_key: self.get_key.clone(),
        }
    }
}

impl<T, F> core::fmt::Debug for Items<'_, T, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Items")
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}
