use alloc::vec::Vec;

use crate::Items;
use crate::key::{KeyMap, ListKey};

/// Last measured height per item key.
///
/// Entries are created the first time an item is measured and are kept until explicitly pruned
/// (see [`HeightCache::retain_keys`]). `revision` is bumped on every write so derived state can
/// cheaply tell whether anything might have changed.
#[derive(Clone, Debug)]
pub struct HeightCache<K> {
    heights: KeyMap<K, u32>,
    revision: u64,
    // key -> height before the first write since the last `reset_changes`
    changes: KeyMap<K, Option<u32>>,
}

impl<K> Default for HeightCache<K> {
    fn default() -> Self {
        Self {
            heights: KeyMap::default(),
            revision: 0,
            changes: KeyMap::default(),
        }
    }
}

impl<K: ListKey> HeightCache<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `height` for `key`, unconditionally.
    ///
    /// Every call bumps [`HeightCache::revision`], even when the stored value does not change.
    pub fn set(&mut self, key: K, height: u32) {
        let prev = self.heights.insert(key.clone(), height);
        self.changes.entry(key).or_insert(prev);
        self.revision = self.revision.wrapping_add(1);
        vtrace!(height, revision = self.revision, "HeightCache::set");
    }

    pub fn get(&self, key: &K) -> Option<u32> {
        self.heights.get(key).copied()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.heights.contains_key(key)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Keys written since the last [`HeightCache::reset_changes`], with the height each key had
    /// before the first of those writes.
    pub fn changes(&self) -> impl Iterator<Item = (&K, Option<u32>)> + '_ {
        self.changes.iter().map(|(k, prev)| (k, *prev))
    }

    pub fn changed_len(&self) -> usize {
        self.changes.len()
    }

    pub fn reset_changes(&mut self) {
        self.changes.clear();
    }

    /// Drops every entry whose key is not present in `items`.
    ///
    /// Returns the number of removed entries. The revision is bumped once when anything was
    /// removed.
    pub fn retain_keys<T, F>(&mut self, items: &Items<'_, T, F>) -> usize
    where
        F: Fn(&T) -> K,
    {
        let live = items.key_set();
        let before = self.heights.len();
        self.heights.retain(|k, _| live.contains(k));
        self.changes.retain(|k, _| live.contains(k));
        let removed = before - self.heights.len();
        if removed > 0 {
            self.revision = self.revision.wrapping_add(1);
            vdebug!(removed, remaining = self.heights.len(), "HeightCache::retain_keys");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.heights.clear();
        self.changes.clear();
        self.revision = self.revision.wrapping_add(1);
    }

    /// Iterates over the cached heights without allocations.
    pub fn for_each(&self, mut f: impl FnMut(&K, u32)) {
        for (k, v) in self.heights.iter() {
            f(k, *v);
        }
    }

    /// Exports the cached heights (useful for persistence across remounts).
    pub fn export(&self) -> Vec<(K, u32)> {
        let mut out = Vec::with_capacity(self.heights.len());
        self.for_each(|k, v| out.push((k.clone(), v)));
        out
    }

    /// Replaces the cache contents. Bumps the revision once.
    pub fn import(&mut self, entries: impl IntoIterator<Item = (K, u32)>) {
        self.heights.clear();
        self.changes.clear();
        let mut n = 0usize;
        for (k, v) in entries {
            self.heights.insert(k, v);
            n = n.saturating_add(1);
        }
        self.revision = self.revision.wrapping_add(1);
        vdebug!(entries = n, "HeightCache::import");
    }
}
