//! The core open-addressing table.
//!
//! Keys live in a power-of-two circular array of cells and are placed by
//! linear probing from `mix(key) & (capacity - 1)`. Key `0` marks an empty
//! cell, so the table keeps the zero key in a dedicated side cell. Deletion
//! shifts later members of a probe chain backwards instead of leaving
//! tombstones, which keeps "stop at the first empty cell" a valid lookup
//! termination rule.

use alloc::boxed::Box;
use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::mix::Key;
use crate::mix::Value;

/// Number of cells allocated by [`HashTable::new`].
pub const DEFAULT_CAPACITY: usize = 8;

/// Whether `population` entries would reach the 75% load limit.
#[inline(always)]
fn at_load_limit(population: usize, capacity: usize) -> bool {
    population * 4 >= capacity * 3
}

/// Smallest power-of-two capacity that holds `population` entries at or
/// below 75% load.
fn compact_capacity(population: usize) -> usize {
    population
        .checked_mul(4)
        .expect("capacity overflow")
        .div_ceil(3)
        .next_power_of_two()
}

/// Smallest power-of-two capacity that accepts `required` entries without
/// tripping the growth check on the last insertion.
fn reserve_capacity(required: usize) -> Option<usize> {
    (required.checked_mul(4)? / 3)
        .checked_add(1)?
        .checked_next_power_of_two()
}

fn alloc_cells<K: Key, V: Value>(capacity: usize) -> Box<[Cell<K, V>]> {
    alloc::vec![Cell::EMPTY; capacity].into_boxed_slice()
}

fn try_alloc_cells<K: Key, V: Value>(
    capacity: usize,
) -> Result<Box<[Cell<K, V>]>, TryReserveError> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(capacity)?;
    cells.resize(capacity, Cell::EMPTY);
    Ok(cells.into_boxed_slice())
}

/// A single (key, value) slot of a [`HashTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell<K, V> {
    key: K,
    value: V,
}

impl<K: Key, V: Value> Cell<K, V> {
    const EMPTY: Self = Cell {
        key: K::ZERO,
        value: V::ZERO,
    };

    /// The key stored in this cell.
    #[inline]
    pub fn key(&self) -> K {
        self.key
    }

    /// The value stored in this cell.
    #[inline]
    pub fn value(&self) -> V {
        self.value
    }

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.key == K::ZERO
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Slot {
    Zero,
    Regular(usize),
}

/// A handle to an occupied cell, returned by [`HashTable::lookup`] and
/// [`HashTable::insert`].
///
/// Handles are plain indices. A handle stays valid until the next
/// structural change of the table that issued it: a resize (including one
/// triggered by `insert`), any deletion, `clear`, `compact`, `reserve` or
/// `drain`. Using a stale handle is a logic error that debug builds detect
/// with an assertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellHandle {
    slot: Slot,
    generation: u32,
}

impl CellHandle {
    /// Returns `true` if this handle refers to the side cell holding key `0`.
    pub fn is_zero_cell(&self) -> bool {
        self.slot == Slot::Zero
    }

    /// The position of the cell in the regular array, or `None` for the zero
    /// cell.
    pub fn index(&self) -> Option<usize> {
        match self.slot {
            Slot::Zero => None,
            Slot::Regular(index) => Some(index),
        }
    }
}

/// Debug statistics for hash table analysis.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of keys in the table, including the zero key
    pub populated: usize,
    /// Number of cells in the regular array
    pub capacity: usize,
    /// Number of regular cells currently occupied
    pub occupied_cells: usize,
    /// Whether the zero key is present
    pub zero_used: bool,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Largest distance between a key's ideal cell and its actual cell
    pub longest_probe: usize,
    /// Mean distance between a key's ideal cell and its actual cell
    pub mean_probe: f64,
    /// Total memory in bytes used by the cell array
    pub total_bytes: usize,
    /// Bytes held by empty cells
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor, zero key {})",
            self.populated,
            self.capacity,
            self.load_factor * 100.0,
            if self.zero_used { "present" } else { "absent" }
        );
        println!(
            "Probe length: {:.2} mean, {} longest",
            self.mean_probe, self.longest_probe
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// Histogram of probe lengths for the regular array.
///
/// `counts[d]` is the number of keys stored `d` cells after their ideal
/// cell. The zero key is not counted.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Number of keys per probe length
    pub counts: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Number of keys counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The longest probe length observed, or `0` for an empty table.
    pub fn longest(&self) -> usize {
        self.counts.len().saturating_sub(1)
    }

    /// Pretty-prints the histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.total());

        let make_bar = |count: usize| -> String {
            if count == 0 {
                return String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            if let Some(ch) = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'].get((units % 8).wrapping_sub(1))
            {
                bar.push(*ch);
            }
            bar
        };

        for (distance, &count) in self.counts.iter().enumerate() {
            println!("{:>3} | {} ({})", distance, make_bar(count), count);
        }
    }
}

/// An open-addressing hash table from integer keys to integer values.
///
/// Lookups, insertions and deletions take expected constant time: the table
/// doubles its array whenever an insertion would bring it to 75% load, and
/// backward-shift deletion keeps probe chains short without tombstones.
/// The array never shrinks on its own; call [`compact`](Self::compact).
///
/// Operations hand out [`CellHandle`]s rather than references, so a cell
/// can be read, updated or deleted after it was found.
///
/// ## Example
///
/// ```rust
/// use lp_hash::HashTable;
///
/// let mut table: HashTable<u32, u32> = HashTable::new();
///
/// for id in [3, 1, 4, 1, 5] {
///     let handle = table.insert(id);
///     *table.value_mut(handle) += 1;
/// }
///
/// assert_eq!(table.len(), 4);
/// assert_eq!(table.get(1), Some(2));
///
/// let handle = table.lookup(4).unwrap();
/// table.delete(handle);
/// assert_eq!(table.get(4), None);
/// ```
#[derive(Clone)]
pub struct HashTable<K: Key = usize, V: Value = usize> {
    cells: Box<[Cell<K, V>]>,
    population: usize,
    zero_used: bool,
    zero_cell: Cell<K, V>,
    generation: u32,
}

impl<K: Key, V: Value> Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field("populated", &self.population)
            .field("capacity", &self.cells.len())
            .field("zero", &self.zero_used.then_some(self.zero_cell.value))
            .field(
                "cells",
                &self
                    .cells
                    .iter()
                    .map(|cell| {
                        if cell.is_empty() {
                            "..".to_string()
                        } else {
                            format!("{:?}={:?}", cell.key, cell.value)
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<K: Key, V: Value> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, V: Value> HashTable<K, V> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] cells.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let table: HashTable<u64, u64> = HashTable::new();
    /// assert_eq!(table.capacity(), 8);
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty table with exactly `capacity` cells.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let table: HashTable<u64, u64> = HashTable::with_capacity(64);
    /// assert_eq!(table.capacity(), 64);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "capacity must be a power of two, got {capacity}"
        );

        Self {
            cells: alloc_cells(capacity),
            population: 0,
            zero_used: false,
            zero_cell: Cell::EMPTY,
            generation: 0,
        }
    }

    /// Returns the number of keys in the table, including the zero key.
    pub fn len(&self) -> usize {
        self.population
    }

    /// Returns `true` if the table contains no keys.
    pub fn is_empty(&self) -> bool {
        self.population == 0
    }

    /// Returns the number of cells in the regular array.
    ///
    /// The table grows before its population reaches three quarters of this
    /// number.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        self.cells.len() - 1
    }

    #[inline(always)]
    fn ideal(&self, key: K) -> usize {
        key.probe_seed() & self.mask()
    }

    #[inline(always)]
    fn next(&self, index: usize) -> usize {
        (index + 1) & self.mask()
    }

    /// Forward circular distance from `from` to `to`.
    #[inline(always)]
    fn offset(&self, from: usize, to: usize) -> usize {
        to.wrapping_sub(from) & self.mask()
    }

    #[inline(always)]
    fn handle(&self, slot: Slot) -> CellHandle {
        CellHandle {
            slot,
            generation: self.generation,
        }
    }

    #[inline(always)]
    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline(always)]
    fn check(&self, handle: CellHandle) {
        debug_assert_eq!(
            handle.generation, self.generation,
            "stale cell handle: the table changed structurally after it was issued"
        );
    }

    fn slot_cell(&self, slot: Slot) -> &Cell<K, V> {
        match slot {
            Slot::Zero => &self.zero_cell,
            Slot::Regular(index) => &self.cells[index],
        }
    }

    fn slot_cell_mut(&mut self, slot: Slot) -> &mut Cell<K, V> {
        match slot {
            Slot::Zero => &mut self.zero_cell,
            Slot::Regular(index) => &mut self.cells[index],
        }
    }

    fn find(&self, key: K) -> Option<Slot> {
        if key == K::ZERO {
            return self.zero_used.then_some(Slot::Zero);
        }

        let mut index = self.ideal(key);
        loop {
            let occupant = self.cells[index].key;
            if occupant == key {
                return Some(Slot::Regular(index));
            }
            if occupant == K::ZERO {
                return None;
            }
            index = self.next(index);
        }
    }

    /// Finds the cell holding `key`.
    ///
    /// Never modifies the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// assert!(table.lookup(0).is_none());
    ///
    /// let inserted = table.insert(0);
    /// assert_eq!(table.lookup(0), Some(inserted));
    /// ```
    pub fn lookup(&self, key: K) -> Option<CellHandle> {
        self.find(key).map(|slot| self.handle(slot))
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: K) -> Option<V> {
        self.find(key).map(|slot| self.slot_cell(slot).value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// table.insert(9);
    /// if let Some(value) = table.get_mut(9) {
    ///     *value = 90;
    /// }
    /// assert_eq!(table.get(9), Some(90));
    /// ```
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        let slot = self.find(key)?;
        Some(&mut self.slot_cell_mut(slot).value)
    }

    /// Returns `true` if the table contains `key`.
    pub fn contains_key(&self, key: K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the cell a handle refers to.
    pub fn cell(&self, handle: CellHandle) -> &Cell<K, V> {
        self.check(handle);
        self.slot_cell(handle.slot)
    }

    /// Returns the key of the cell a handle refers to.
    pub fn key(&self, handle: CellHandle) -> K {
        self.cell(handle).key
    }

    /// Returns the value of the cell a handle refers to.
    pub fn value(&self, handle: CellHandle) -> V {
        self.cell(handle).value
    }

    /// Returns a mutable reference to the value of the cell a handle refers
    /// to.
    pub fn value_mut(&mut self, handle: CellHandle) -> &mut V {
        self.check(handle);
        &mut self.slot_cell_mut(handle.slot).value
    }

    /// Inserts `key` and returns a handle to its cell.
    ///
    /// If the key is already present its cell is returned unchanged; the
    /// value is not reset. A new key's value starts at zero.
    ///
    /// The array doubles when the new key would bring the population to 75%
    /// of the capacity. The zero key counts toward that population even
    /// though it never occupies a regular cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// let first = table.insert(5);
    /// assert_eq!(table.value(first), 0);
    ///
    /// *table.value_mut(first) = 50;
    /// let second = table.insert(5);
    /// assert_eq!(first, second);
    /// assert_eq!(table.value(second), 50);
    /// ```
    pub fn insert(&mut self, key: K) -> CellHandle {
        let slot = self.insert_slot(key);
        self.handle(slot)
    }

    fn insert_slot(&mut self, key: K) -> Slot {
        if key == K::ZERO {
            if !self.zero_used {
                self.zero_used = true;
                self.population += 1;
                if at_load_limit(self.population, self.cells.len()) {
                    self.grow();
                }
            }
            return Slot::Zero;
        }

        'probe: loop {
            let mut index = self.ideal(key);
            loop {
                let occupant = self.cells[index].key;
                if occupant == key {
                    return Slot::Regular(index);
                }
                if occupant == K::ZERO {
                    if at_load_limit(self.population + 1, self.cells.len()) {
                        self.grow();
                        continue 'probe;
                    }
                    self.population += 1;
                    self.cells[index] = Cell {
                        key,
                        value: V::ZERO,
                    };
                    return Slot::Regular(index);
                }
                index = self.next(index);
            }
        }
    }

    /// Deletes the cell a handle refers to.
    ///
    /// The handle must refer to an occupied cell of this table. Every handle
    /// issued before the call is invalidated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// let handle = table.insert(12);
    /// table.delete(handle);
    /// assert!(table.is_empty());
    /// ```
    pub fn delete(&mut self, handle: CellHandle) {
        self.check(handle);
        self.delete_slot(handle.slot);
    }

    /// Deletes `key` if present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// table.insert(1);
    /// table.delete_key(1);
    /// table.delete_key(2);
    /// assert!(table.is_empty());
    /// ```
    pub fn delete_key(&mut self, key: K) {
        if let Some(slot) = self.find(key) {
            self.delete_slot(slot);
        }
    }

    /// Deletes `key` and returns the value it held.
    pub fn remove(&mut self, key: K) -> Option<V> {
        let slot = self.find(key)?;
        let value = self.slot_cell(slot).value;
        self.delete_slot(slot);
        Some(value)
    }

    fn delete_slot(&mut self, slot: Slot) {
        self.bump_generation();
        match slot {
            Slot::Zero => {
                debug_assert!(self.zero_used, "deleting the zero cell while it is unused");
                self.zero_used = false;
                self.zero_cell.value = V::ZERO;
                self.population -= 1;
            }
            Slot::Regular(index) => self.shift_delete(index),
        }
    }

    /// Empties `hole` by pulling later members of its probe run backwards.
    ///
    /// A neighbour may only move into the hole if the hole lies between the
    /// neighbour's ideal cell and its current cell; otherwise moving it would
    /// put it ahead of its own probe start.
    fn shift_delete(&mut self, mut hole: usize) {
        debug_assert!(
            !self.cells[hole].is_empty(),
            "deleting unoccupied cell {hole}"
        );

        let mut neighbor = self.next(hole);
        loop {
            let candidate = self.cells[neighbor];
            if candidate.is_empty() {
                self.cells[hole] = Cell::EMPTY;
                self.population -= 1;
                return;
            }

            let ideal = self.ideal(candidate.key);
            if self.offset(ideal, hole) < self.offset(ideal, neighbor) {
                self.cells[hole] = candidate;
                hole = neighbor;
            }
            neighbor = self.next(neighbor);
        }
    }

    /// Removes every key, keeping the current capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// for key in 0..100 {
    ///     table.insert(key);
    /// }
    /// let capacity = table.capacity();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
        self.population = 0;
        self.zero_used = false;
        self.zero_cell = Cell::EMPTY;
        self.bump_generation();
    }

    /// Shrinks the array to the smallest power of two that keeps the current
    /// population at or below 75% load.
    ///
    /// This is the only way the table ever shrinks. An empty table compacts
    /// to a single cell.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// for key in 1..=1000 {
    ///     table.insert(key);
    /// }
    /// for key in 4..=1000 {
    ///     table.delete_key(key);
    /// }
    ///
    /// table.compact();
    /// assert_eq!(table.capacity(), 4);
    /// assert_eq!(table.len(), 3);
    /// ```
    #[doc(alias = "shrink_to_fit")]
    pub fn compact(&mut self) {
        let capacity = compact_capacity(self.population);
        log::debug!(
            "compacting table of {} keys from {} to {} cells",
            self.population,
            self.cells.len(),
            capacity
        );
        self.repopulate(capacity);
    }

    /// Grows the array so that `additional` more keys can be inserted without
    /// a resize. Does nothing if the capacity already suffices.
    ///
    /// # Panics
    ///
    /// Panics if the required capacity overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// table.reserve(100);
    /// let capacity = table.capacity();
    /// for key in 0..100 {
    ///     table.insert(key);
    /// }
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        let capacity = self
            .population
            .checked_add(additional)
            .and_then(reserve_capacity)
            .expect("capacity overflow");
        if capacity > self.cells.len() {
            log::debug!(
                "reserving {additional} keys: growing from {} to {capacity} cells",
                self.cells.len()
            );
            self.repopulate(capacity);
        }
    }

    /// Fallible version of [`reserve`](Self::reserve).
    ///
    /// On error the table is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// table.insert(1);
    /// assert!(table.try_reserve(usize::MAX).is_err());
    /// assert_eq!(table.get(1), Some(0));
    /// assert!(table.try_reserve(10).is_ok());
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        // An overflowing capacity is requested as `usize::MAX` cells, which
        // the allocator rejects as a capacity overflow.
        let capacity = self
            .population
            .checked_add(additional)
            .and_then(reserve_capacity)
            .unwrap_or(usize::MAX);
        if capacity > self.cells.len() {
            let cells = try_alloc_cells(capacity)?;
            self.rehash_into(cells);
        }
        Ok(())
    }

    #[cold]
    fn grow(&mut self) {
        let capacity = self
            .cells
            .len()
            .checked_mul(2)
            .expect("capacity overflow");
        self.repopulate(capacity);
    }

    fn repopulate(&mut self, capacity: usize) {
        let cells = alloc_cells(capacity);
        self.rehash_into(cells);
    }

    /// Moves every regular cell into `cells` and makes it the new array.
    ///
    /// The zero cell and the population are untouched.
    fn rehash_into(&mut self, mut cells: Box<[Cell<K, V>]>) {
        let capacity = cells.len();
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(self.population * 4 <= capacity * 3);

        log::trace!(
            "repopulating {} keys: {} -> {} cells",
            self.population,
            self.cells.len(),
            capacity
        );

        let mask = capacity - 1;
        for cell in self.cells.iter().filter(|cell| !cell.is_empty()) {
            let mut index = cell.key.probe_seed() & mask;
            while !cells[index].is_empty() {
                index = (index + 1) & mask;
            }
            cells[index] = *cell;
        }

        self.cells = cells;
        self.bump_generation();
    }

    /// Returns an iterator over all occupied cells.
    ///
    /// The zero key comes first if present, followed by the regular cells in
    /// array order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// table.insert(7);
    /// table.insert(0);
    ///
    /// let keys: Vec<u64> = table.iter().map(|cell| cell.key()).collect();
    /// assert_eq!(keys, [0, 7]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table: self,
            zero_pending: self.zero_used,
            index: 0,
        }
    }

    /// Returns an iterator that removes and yields every key and value.
    ///
    /// After the iterator is dropped the table is empty, even if it was not
    /// fully consumed. The capacity is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lp_hash::HashTable;
    /// #
    /// let mut table: HashTable<u64, u64> = HashTable::new();
    /// let handle = table.insert(3);
    /// *table.value_mut(handle) = 30;
    ///
    /// let drained: Vec<(u64, u64)> = table.drain().collect();
    /// assert_eq!(drained, [(3, 30)]);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            zero_pending: self.zero_used,
            index: 0,
            table: self,
        }
    }

    /// Computes a histogram of probe lengths for the regular array.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut counts = Vec::new();
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let distance = self.offset(self.ideal(cell.key), index);
            if counts.len() <= distance {
                counts.resize(distance + 1, 0);
            }
            counts[distance] += 1;
        }

        ProbeHistogram { counts }
    }

    /// Returns occupancy and probe statistics for debugging.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let occupied_cells = histogram.total();
        let probe_sum: usize = histogram
            .counts
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();
        let cell_size = core::mem::size_of::<Cell<K, V>>();

        DebugStats {
            populated: self.population,
            capacity: self.cells.len(),
            occupied_cells,
            zero_used: self.zero_used,
            load_factor: self.population as f64 / self.cells.len() as f64,
            longest_probe: histogram.longest(),
            mean_probe: if occupied_cells == 0 {
                0.0
            } else {
                probe_sum as f64 / occupied_cells as f64
            },
            total_bytes: self.cells.len() * cell_size,
            wasted_bytes: (self.cells.len() - occupied_cells) * cell_size,
        }
    }
}

impl<'a, K: Key, V: Value> IntoIterator for &'a HashTable<K, V> {
    type IntoIter = Iter<'a, K, V>;
    type Item = &'a Cell<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the occupied cells of a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`]. It makes
/// a single pass; once it returns `None` it keeps returning `None`.
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, K: Key, V: Value> {
    table: &'a HashTable<K, V>,
    zero_pending: bool,
    index: usize,
}

impl<'a, K: Key, V: Value> Iterator for Iter<'a, K, V> {
    type Item = &'a Cell<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        if core::mem::take(&mut self.zero_pending) {
            return Some(&table.zero_cell);
        }

        while let Some(cell) = table.cells.get(self.index) {
            self.index += 1;
            if !cell.is_empty() {
                return Some(cell);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining_cells = self.table.cells.len().saturating_sub(self.index);
        (0, Some(remaining_cells + self.zero_pending as usize))
    }
}

impl<K: Key, V: Value> FusedIterator for Iter<'_, K, V> {}

/// A draining iterator over the keys and values of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, K: Key, V: Value> {
    table: &'a mut HashTable<K, V>,
    zero_pending: bool,
    index: usize,
}

impl<K: Key, V: Value> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if core::mem::take(&mut self.zero_pending) {
            return Some((K::ZERO, self.table.zero_cell.value));
        }

        while let Some(cell) = self.table.cells.get_mut(self.index) {
            self.index += 1;
            if !cell.is_empty() {
                let cell = core::mem::replace(cell, Cell::EMPTY);
                return Some((cell.key, cell.value));
            }
        }

        None
    }
}

impl<K: Key, V: Value> FusedIterator for Drain<'_, K, V> {}

impl<K: Key, V: Value> Drop for Drain<'_, K, V> {
    fn drop(&mut self) {
        self.table.clear();
    }
}
