use core::fmt::Debug;

use crate::hash_table::HashTable;
use crate::mix::Key;

/// A set of integer keys backed by a [`HashTable`] with `()` values.
///
/// # Examples
///
/// ```rust
/// use lp_hash::IntSet;
///
/// let mut set: IntSet<u32> = IntSet::new();
/// assert!(set.insert(0));
/// assert!(set.insert(17));
/// assert!(!set.insert(17));
///
/// assert!(set.contains(0));
/// assert!(set.remove(17));
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Clone)]
pub struct IntSet<K: Key = usize> {
    table: HashTable<K, ()>,
}

impl<K: Key> Debug for IntSet<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Key> PartialEq for IntSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<K: Key> Eq for IntSet<K> {}

impl<K: Key> Default for IntSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> IntSet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    /// Creates an empty set that holds at least `capacity` keys without
    /// resizing.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut set = Self::new();
        set.reserve(capacity);
        set
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of keys the set can hold without resizing.
    pub fn capacity(&self) -> usize {
        (self.table.capacity() * 3).div_ceil(4) - 1
    }

    /// Removes all keys, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Shrinks the backing table to fit the current keys.
    pub fn shrink_to_fit(&mut self) {
        self.table.compact();
    }

    /// Reserves capacity for at least `additional` more keys.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Adds `key` to the set, returning `true` if it was not already present.
    pub fn insert(&mut self, key: K) -> bool {
        let len = self.table.len();
        self.table.insert(key);
        self.table.len() != len
    }

    /// Returns `true` if the set contains `key`.
    pub fn contains(&self, key: K) -> bool {
        self.table.contains_key(key)
    }

    /// Removes `key`, returning `true` if it was present.
    pub fn remove(&mut self, key: K) -> bool {
        self.table.remove(key).is_some()
    }

    /// Returns an iterator over the keys. The zero key, if present, comes
    /// first.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Removes and yields every key, keeping the allocated capacity.
    pub fn drain(&mut self) -> Drain<'_, K> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns `true` if `self` and `other` share no keys.
    pub fn is_disjoint(&self, other: &IntSet<K>) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().all(|k| !large.contains(k))
    }

    /// Returns `true` if every key of `self` is in `other`.
    pub fn is_subset(&self, other: &IntSet<K>) -> bool {
        self.len() <= other.len() && self.iter().all(|k| other.contains(k))
    }

    /// Returns `true` if every key of `other` is in `self`.
    pub fn is_superset(&self, other: &IntSet<K>) -> bool {
        other.is_subset(self)
    }

    /// Returns an iterator over the keys in `self` or `other`, without
    /// duplicates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::IntSet;
    /// #
    /// let a: IntSet<u64> = [1, 2].into_iter().collect();
    /// let b: IntSet<u64> = [2, 3].into_iter().collect();
    ///
    /// let mut union: Vec<_> = a.union(&b).collect();
    /// union.sort_unstable();
    /// assert_eq!(union, [1, 2, 3]);
    /// ```
    pub fn union<'a>(&'a self, other: &'a IntSet<K>) -> Union<'a, K> {
        Union {
            iter: self.iter(),
            other_iter: other.iter(),
            set: self,
        }
    }

    /// Returns an iterator over the keys in both `self` and `other`.
    pub fn intersection<'a>(&'a self, other: &'a IntSet<K>) -> Intersection<'a, K> {
        if self.len() <= other.len() {
            Intersection {
                iter: self.iter(),
                other,
            }
        } else {
            Intersection {
                iter: other.iter(),
                other: self,
            }
        }
    }

    /// Returns an iterator over the keys in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a IntSet<K>) -> Difference<'a, K> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Returns an iterator over the keys in exactly one of `self` and
    /// `other`.
    pub fn symmetric_difference<'a>(&'a self, other: &'a IntSet<K>) -> SymmetricDifference<'a, K> {
        SymmetricDifference {
            iter: self.difference(other).chain(other.difference(self)),
        }
    }

    /// Keeps only the keys for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::IntSet;
    /// #
    /// let mut set: IntSet<u32> = (0..10).collect();
    /// set.retain(|k| k % 3 == 0);
    /// assert_eq!(set.len(), 4);
    /// assert!(set.contains(0));
    /// assert!(set.contains(9));
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(K) -> bool) {
        let doomed = self
            .iter()
            .filter(|&k| !f(k))
            .collect::<alloc::vec::Vec<_>>();
        for key in doomed {
            self.table.delete_key(key);
        }
    }
}

impl<K: Key> FromIterator<K> for IntSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Key> Extend<K> for IntSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K: Key> IntoIterator for &'a IntSet<K> {
    type IntoIter = Iter<'a, K>;
    type Item = K;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the keys of an `IntSet`.
pub struct Iter<'a, K: Key> {
    inner: crate::hash_table::Iter<'a, K, ()>,
}

impl<K: Key> Iterator for Iter<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|cell| cell.key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// A draining iterator over the keys of an `IntSet`.
pub struct Drain<'a, K: Key> {
    inner: crate::hash_table::Drain<'a, K, ()>,
}

impl<K: Key> Iterator for Drain<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, ())| k)
    }
}

/// An iterator over the union of two sets.
pub struct Union<'a, K: Key> {
    iter: Iter<'a, K>,
    other_iter: Iter<'a, K>,
    set: &'a IntSet<K>,
}

impl<K: Key> Iterator for Union<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(k) = self.iter.next() {
            return Some(k);
        }
        loop {
            let k = self.other_iter.next()?;
            if !self.set.contains(k) {
                return Some(k);
            }
        }
    }
}

/// An iterator over the intersection of two sets.
pub struct Intersection<'a, K: Key> {
    iter: Iter<'a, K>,
    other: &'a IntSet<K>,
}

impl<K: Key> Iterator for Intersection<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let k = self.iter.next()?;
            if self.other.contains(k) {
                return Some(k);
            }
        }
    }
}

/// An iterator over the difference of two sets.
pub struct Difference<'a, K: Key> {
    iter: Iter<'a, K>,
    other: &'a IntSet<K>,
}

impl<K: Key> Iterator for Difference<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let k = self.iter.next()?;
            if !self.other.contains(k) {
                return Some(k);
            }
        }
    }
}

/// An iterator over the symmetric difference of two sets.
pub struct SymmetricDifference<'a, K: Key> {
    iter: core::iter::Chain<Difference<'a, K>, Difference<'a, K>>,
}

impl<K: Key> Iterator for SymmetricDifference<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}
