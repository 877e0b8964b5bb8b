#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A map interface over [`HashTable`].
///
/// This module provides an `IntMap` with the usual insert/get/remove/entry
/// surface, where inserting an existing key replaces its value.
pub mod hash_map;

pub mod hash_table;

/// A set interface over [`HashTable`].
///
/// This module provides an `IntSet` that stores keys in a table with `()`
/// values.
pub mod hash_set;

pub mod mix;

pub use hash_map::Entry;
pub use hash_map::IntMap;
pub use hash_set::IntSet;
pub use hash_table::CellHandle;
pub use hash_table::HashTable;
pub use mix::Key;
pub use mix::Value;
