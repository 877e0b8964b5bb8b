use core::fmt::Debug;

use crate::hash_table::CellHandle;
use crate::hash_table::HashTable;
use crate::mix::Key;
use crate::mix::Value;

/// A map from integer keys to integer values backed by a [`HashTable`].
///
/// Unlike [`HashTable::insert`], [`IntMap::insert`] replaces the value of an
/// existing key, mirroring `std::collections::HashMap`.
///
/// # Examples
///
/// ```rust
/// use lp_hash::IntMap;
///
/// let mut map: IntMap<u64, u32> = IntMap::new();
/// map.insert(0, 10);
/// map.insert(7, 70);
///
/// assert_eq!(map.get(7), Some(70));
/// assert_eq!(map.insert(7, 71), Some(70));
/// assert_eq!(map.remove(0), Some(10));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct IntMap<K: Key = usize, V: Value = usize> {
    table: HashTable<K, V>,
}

impl<K: Key, V: Value> Debug for IntMap<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Key, V: Value> PartialEq for IntMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Key, V: Value> Eq for IntMap<K, V> {}

impl<K: Key, V: Value> Default for IntMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, V: Value> IntMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    /// Creates an empty map that holds at least `capacity` keys without
    /// resizing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::IntMap;
    /// #
    /// let map: IntMap<u64, u64> = IntMap::with_capacity(100);
    /// assert!(map.capacity() >= 100);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = Self::new();
        map.reserve(capacity);
        map
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of entries the map can hold without resizing.
    pub fn capacity(&self) -> usize {
        // The last insertion before growth must stay under 75% load.
        (self.table.capacity() * 3).div_ceil(4) - 1
    }

    /// Removes all entries, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Shrinks the backing table to fit the current entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::IntMap;
    /// #
    /// let mut map: IntMap<u64, u64> = (0..1000).map(|k| (k, k)).collect();
    /// map.retain(|k, _| k < 10);
    /// map.shrink_to_fit();
    /// assert!(map.capacity() >= 10);
    /// assert!(map.capacity() < 100);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.table.compact();
    }

    /// Reserves capacity for at least `additional` more entries.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let len = self.table.len();
        let handle = self.table.insert(key);
        let previous = core::mem::replace(self.table.value_mut(handle), value);
        (self.table.len() == len).then_some(previous)
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: K) -> Option<V> {
        self.table.get(key)
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.table.get_mut(key)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key(&self, key: K) -> bool {
        self.table.contains_key(key)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: K) -> Option<V> {
        self.table.remove(key)
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::IntMap;
    /// #
    /// let mut counts: IntMap<u32, u32> = IntMap::new();
    /// for id in [4, 8, 4, 0, 4] {
    ///     *counts.entry(id).or_default() += 1;
    /// }
    /// assert_eq!(counts.get(4), Some(3));
    /// assert_eq!(counts.get(0), Some(1));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        match self.table.lookup(key) {
            Some(handle) => Entry::Occupied(OccupiedEntry {
                table: &mut self.table,
                handle,
            }),
            None => Entry::Vacant(VacantEntry {
                table: &mut self.table,
                key,
            }),
        }
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain(&mut self, mut f: impl FnMut(K, V) -> bool) {
        let doomed = self
            .iter()
            .filter(|&(k, v)| !f(k, v))
            .map(|(k, _)| k)
            .collect::<alloc::vec::Vec<_>>();
        for key in doomed {
            self.table.delete_key(key);
        }
    }

    /// Returns an iterator over the entries. The zero key, if present, comes
    /// first; the rest follow the table's internal order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Removes and yields every entry, keeping the allocated capacity.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// The underlying table.
    pub fn as_table(&self) -> &HashTable<K, V> {
        &self.table
    }
}

impl<K: Key, V: Value> From<HashTable<K, V>> for IntMap<K, V> {
    fn from(table: HashTable<K, V>) -> Self {
        Self { table }
    }
}

impl<K: Key, V: Value> FromIterator<(K, V)> for IntMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Key, V: Value> Extend<(K, V)> for IntMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Key, V: Value> IntoIterator for &'a IntMap<K, V> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`IntMap`].
///
/// [`entry`]: IntMap::entry
pub enum Entry<'a, K: Key, V: Value> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K: Key, V: Value> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference to the value.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Inserts the zero value if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert(V::ZERO)
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns this entry's key.
    pub fn key(&self) -> K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K: Key, V: Value> {
    table: &'a mut HashTable<K, V>,
    key: K,
}

impl<'a, K: Key, V: Value> VacantEntry<'a, K, V> {
    /// The key that would be used when inserting a value.
    pub fn key(&self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        let handle = table.insert(self.key);
        let slot = table.value_mut(handle);
        *slot = value;
        slot
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K: Key, V: Value> {
    table: &'a mut HashTable<K, V>,
    handle: CellHandle,
}

impl<'a, K: Key, V: Value> OccupiedEntry<'a, K, V> {
    /// The key in the entry.
    pub fn key(&self) -> K {
        self.table.key(self.handle)
    }

    /// The value in the entry.
    pub fn get(&self) -> V {
        self.table.value(self.handle)
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.value_mut(self.handle)
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        let table = self.table;
        table.value_mut(self.handle)
    }

    /// Replaces the value in the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        let value = self.table.value(self.handle);
        self.table.delete(self.handle);
        value
    }
}

/// An iterator over the key-value pairs of an `IntMap`.
pub struct Iter<'a, K: Key, V: Value> {
    inner: crate::hash_table::Iter<'a, K, V>,
}

impl<K: Key, V: Value> Iterator for Iter<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|cell| (cell.key(), cell.value()))
    }
}

/// An iterator over the keys of an `IntMap`.
pub struct Keys<'a, K: Key, V: Value> {
    inner: Iter<'a, K, V>,
}

impl<K: Key, V: Value> Iterator for Keys<'_, K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of an `IntMap`.
pub struct Values<'a, K: Key, V: Value> {
    inner: Iter<'a, K, V>,
}

impl<K: Key, V: Value> Iterator for Values<'_, K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the key-value pairs of an `IntMap`.
pub struct Drain<'a, K: Key, V: Value> {
    inner: crate::hash_table::Drain<'a, K, V>,
}

impl<K: Key, V: Value> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
