use std::cmp::min;
use std::ops::Index;

use log::debug;

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
}

/// Hash-consing table: values are stored once, chained per bucket.
///
/// Index `0` is a sentry and never holds a value, so `next == 0` terminates a chain.
/// The bucket array doubles whenever the load factor exceeds two;
/// the value storage grows on demand up to `2^bits` entries.
pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
    capacity: usize,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table holding at most `2^bits` values.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let capacity = 1 << bits;
        let buckets_size = 1 << min(bits, 12);

        let mut data = Vec::with_capacity(min(capacity, 1 << 16));
        data.push(Entry {
            value: T::default(),
            next: 0,
        });

        Self {
            data,
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
            capacity,
        }
    }
}

impl<T> Table<T> {
    /// Get the maximum number of values the table may hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    /// Get the number of stored values.
    pub fn size(&self) -> usize {
        self.data.len() - 1
    }
    /// Get the number of buckets.
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }

    /// Get the index of the next value in the same bucket.
    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next
    }

    /// Add a new value to the table, bypassing the buckets, and return its index.
    pub(crate) fn alloc(&mut self, value: T) -> usize {
        if self.data.len() > self.capacity {
            panic!("Storage is full");
        }
        self.data.push(Entry { value, next: 0 });
        self.data.len() - 1
    }
}

impl<T> Table<T>
where
    T: MyHash,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Put a value into the table and return its index, reusing an equal value if present.
    pub fn put(&mut self, value: T) -> usize
    where
        T: Eq,
    {
        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        while index != 0 {
            if &value == self.value(index) {
                return index;
            }
            index = self.next(index);
        }

        let i = self.alloc(value);
        self.data[i].next = self.buckets[bucket_index];
        self.buckets[bucket_index] = i;

        if self.size() > 2 * self.buckets.len() {
            self.grow();
        }

        i
    }

    fn grow(&mut self) {
        let size = self.buckets.len() * 2;
        debug!("Growing unique table to {} buckets", size);

        self.buckets = vec![0; size];
        self.bitmask = (size - 1) as u64;

        for i in 1..self.data.len() {
            let b = self.bucket_index(&self.data[i].value);
            self.data[i].next = self.buckets[b];
            self.buckets[b] = i;
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl MyHash for Item {
        fn hash(&self) -> u64 {
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_alloc() {
        let mut table = Table::new(2);
        assert_eq!(table.alloc(Item(1)), 1);
        assert_eq!(table.alloc(Item(2)), 2);
        assert_eq!(table.alloc(Item(3)), 3);
        assert_eq!(table.size(), 3);
    }

    #[test]
    #[should_panic(expected = "Storage is full")]
    fn test_alloc_too_much() {
        let mut table = Table::new(2);
        for i in 0..5 {
            table.alloc(Item(i));
        }
    }

    #[test]
    fn test_put() {
        let mut table = Table::new(4);
        let index1 = table.put(Item(5));
        let index2 = table.put(Item(-5));
        assert_ne!(index1, index2);
        assert_eq!(table[index1], Item(5));
        assert_eq!(table[index2], Item(-5));
        // Same bucket, newest value first.
        assert_eq!(table.next(index2), index1);
        assert_eq!(table.put(Item(5)), index1);
    }

    #[test]
    fn test_grow_keeps_values() {
        let mut table = Table::new(16);
        let buckets = table.num_buckets();
        let indices: Vec<usize> = (0..(3 * buckets as i32)).map(|i| table.put(Item(i))).collect();
        assert!(table.num_buckets() > buckets);
        for (i, &index) in indices.iter().enumerate() {
            assert_eq!(table.put(Item(i as i32)), index);
        }
    }
}
