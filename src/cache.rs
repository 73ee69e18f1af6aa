//! Computed table for memoizing diagram operations.
//!
//! A fixed table of `2^bits` slots. Each key maps to one slot, and a newer entry
//! overwrites whatever was stored there. Slots keep the full key, so a lookup only
//! hits when the stored key is equal to the requested one.

use std::cell::Cell;

use crate::utils::MyHash;

struct Entry<K, V> {
    key: K,
    value: V,
}

pub struct Cache<K, V> {
    data: Vec<Option<Entry<K, V>>>,
    bitmask: u64,
    hits: Cell<usize>,
    misses: Cell<usize>,
    faults: Cell<usize>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self::new(14)
    }
}

impl<K, V> Cache<K, V> {
    /// Create a new table of size `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");

        let size = 1 << bits;
        let bitmask = (size - 1) as u64;

        Self {
            data: std::iter::repeat_with(|| None).take(size).collect(),
            bitmask,
            hits: Cell::new(0),
            misses: Cell::new(0),
            faults: Cell::new(0),
        }
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }
    /// Get the number of misses on an occupied slot holding another key.
    pub fn faults(&self) -> usize {
        self.faults.get()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.data.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|e| e.is_none())
    }

    /// Reset the cache (counters are kept).
    pub fn clear(&mut self) {
        self.data.fill_with(|| None);
    }

    fn index(&self, hash: u64) -> usize {
        (hash & self.bitmask) as usize
    }
}

impl<K, V> Cache<K, V>
where
    K: MyHash + Eq,
{
    /// Get the cached result.
    pub fn get(&self, key: &K) -> Option<&V> {
        let index = self.index(key.hash());
        match &self.data[index] {
            Some(entry) if entry.key == *key => {
                self.hits.set(self.hits.get() + 1);
                Some(&entry.value)
            }
            Some(_) => {
                self.misses.set(self.misses.get() + 1);
                self.faults.set(self.faults.get() + 1);
                None
            }
            None => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    /// Insert a result into the cache, evicting the previous occupant of its slot.
    pub fn insert(&mut self, key: K, value: V) {
        let index = self.index(key.hash());
        self.data[index] = Some(Entry { key, value });
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    struct Key(u64);

    impl MyHash for Key {
        fn hash(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_cache() {
        let mut cache = Cache::<Key, i32>::new(3);

        cache.insert(Key(1), 3);
        cache.insert(Key(2), 1);
        cache.insert(Key(3), 2);

        assert_eq!(cache.get(&Key(1)), Some(&3));
        assert_eq!(cache.get(&Key(2)), Some(&1));
        assert_eq!(cache.get(&Key(3)), Some(&2));
        assert_eq!(cache.get(&Key(4)), None);
        assert_eq!(cache.get(&Key(5)), None);

        assert_eq!(cache.hits(), 3);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.faults(), 0);
        assert_eq!(cache.len(), 3);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&Key(1)), None);
    }

    #[test]
    fn test_cache_is_bounded() {
        let mut cache = Cache::<Key, u64>::new(4);
        for k in 0..1000 {
            cache.insert(Key(k), k);
        }
        assert_eq!(cache.capacity(), 16);
        assert_eq!(cache.len(), 16);

        // The last key written to each slot survives.
        assert_eq!(cache.get(&Key(999)), Some(&999));
        assert_eq!(cache.get(&Key(983)), None);
        assert_eq!(cache.faults(), 1);
    }

    #[test]
    fn test_collision_does_not_alias() {
        let mut cache = Cache::<Key, u64>::new(2);
        cache.insert(Key(1), 10);

        // Same slot (1 & 3 == 5 & 3), different key.
        assert_eq!(cache.get(&Key(5)), None);
        assert_eq!(cache.get(&Key(1)), Some(&10));

        cache.insert(Key(5), 50);
        assert_eq!(cache.get(&Key(1)), None);
        assert_eq!(cache.get(&Key(5)), Some(&50));
    }
}
