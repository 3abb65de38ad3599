//! Collection contracts shared by local containers and remote views.
//!
//! The traits here mirror the familiar collection shapes (collection, set,
//! map, map entry), with two differences forced by remote-backed state:
//!
//! - every operation is fallible, because any of them may reach the remote
//!   store;
//! - every operation takes `&self`, because the state does not live in the
//!   value. A view is a description of *what* to ask the store, not a copy of
//!   the answer.
//!
//! Views may reject mutations they cannot honor with
//! [`Error::Unsupported`](crate::Error::Unsupported).

use std::hash::Hash;

use fxhash::FxHashMap;

use crate::error::Result;

pub mod equality;
pub mod local;

pub use local::{LocalMap, LocalSet};

/// A lazy sequence of fallible items produced by [`Collection::iter`].
pub type Iter<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// A group of items whose contents may live outside the process.
pub trait Collection {
    /// The element type.
    type Item;

    /// Returns the number of items.
    fn len(&self) -> Result<usize>;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> Result<bool> { Ok(self.len()? == 0) }

    /// Returns `true` if `item` is present.
    fn contains(&self, item: &Self::Item) -> Result<bool>;

    /// Returns an iterator over the current items.
    ///
    /// Errors met while iterating are yielded in place of an item.
    fn iter(&self) -> Result<Iter<'_, Self::Item>>;

    /// Adds `item`, returning `true` if the collection changed.
    fn insert(&self, item: Self::Item) -> Result<bool>;

    /// Removes `item`, returning `true` if it was present.
    fn remove(&self, item: &Self::Item) -> Result<bool>;

    /// Removes every item.
    fn clear(&self) -> Result<()>;

    /// Keeps only the items that also appear in `items`.
    fn retain_all(&self, items: &[Self::Item]) -> Result<bool>;

    /// Returns `true` if every element of `items` is present.
    fn contains_all(&self, items: &[Self::Item]) -> Result<bool> {
        for item in items {
            if !self.contains(item)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Adds every element of `items` one by one.
    ///
    /// This is not atomic: a failure leaves the elements inserted so far in
    /// place.
    fn insert_all<I>(&self, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = Self::Item>,
        Self: Sized,
    {
        let mut changed = false;

        for item in items {
            changed |= self.insert(item)?;
        }

        Ok(changed)
    }

    /// Removes every element of `items` one by one.
    fn remove_all(&self, items: &[Self::Item]) -> Result<bool> {
        let mut changed = false;

        for item in items {
            changed |= self.remove(item)?;
        }

        Ok(changed)
    }

    /// Collects the current items into a vector.
    fn to_vec(&self) -> Result<Vec<Self::Item>> { self.iter()?.collect() }
}

/// A [`Collection`] without duplicates.
pub trait Set: Collection {}

/// A key-value association returned by [`Map::entries`].
pub trait MapEntry {
    /// The key type.
    type Key;

    /// The value type.
    type Value;

    /// Returns the key.
    fn key(&self) -> &Self::Key;

    /// Returns the value observed when the entry was produced.
    fn value(&self) -> &Self::Value;

    /// Replaces the value in the underlying map, returning the previous one.
    fn set_value(&mut self, value: Self::Value) -> Result<Option<Self::Value>>;
}

/// A mapping from keys to values.
///
/// [`keys`](Map::keys), [`values`](Map::values) and
/// [`entries`](Map::entries) return views over the same state as the map:
/// they are not copies.
pub trait Map {
    /// The key type.
    type Key;

    /// The value type.
    type Value;

    /// The view returned by [`Map::keys`].
    type Keys: Set<Item = Self::Key>;

    /// The view returned by [`Map::values`].
    type Values: Collection<Item = Self::Value>;

    /// The entry type yielded by [`Map::entries`].
    type Entry: MapEntry<Key = Self::Key, Value = Self::Value>;

    /// The view returned by [`Map::entries`].
    type Entries: Set<Item = Self::Entry>;

    /// Returns the number of entries.
    fn len(&self) -> Result<usize>;

    /// Returns `true` if there are no entries.
    fn is_empty(&self) -> Result<bool>;

    /// Returns the value stored under `key`.
    fn get(&self, key: &Self::Key) -> Result<Option<Self::Value>>;

    /// Returns `true` if a value is stored under `key`.
    fn contains_key(&self, key: &Self::Key) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Returns `true` if any key maps to `value`.
    fn contains_value(&self, value: &Self::Value) -> Result<bool>;

    /// Stores `value` under `key`, returning the value it replaced.
    fn insert(
        &self,
        key: Self::Key,
        value: Self::Value,
    ) -> Result<Option<Self::Value>>;

    /// Removes `key`, returning the value it held.
    fn remove(&self, key: &Self::Key) -> Result<Option<Self::Value>>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;

    /// Returns a view of the keys.
    fn keys(&self) -> Self::Keys;

    /// Returns a view of the values.
    fn values(&self) -> Self::Values;

    /// Returns a view of the entries.
    fn entries(&self) -> Self::Entries;

    /// Copies every entry of `other` into this map, one insert at a time.
    fn insert_all<M>(&self, other: &M) -> Result<()>
    where
        M: Map<Key = Self::Key, Value = Self::Value>,
        Self::Key: Clone,
        Self::Value: Clone,
        Self: Sized,
    {
        let entries = other.entries();

        for entry in entries.iter()? {
            let entry = entry?;
            self.insert(entry.key().clone(), entry.value().clone())?;
        }

        Ok(())
    }

    /// Reads the whole map into a detached [`FxHashMap`].
    fn to_hash_map(&self) -> Result<FxHashMap<Self::Key, Self::Value>>
    where
        Self::Key: Eq + Hash + Clone,
        Self::Value: Clone,
    {
        let entries = self.entries();
        let mut map = FxHashMap::default();

        for entry in entries.iter()? {
            let entry = entry?;
            map.insert(entry.key().clone(), entry.value().clone());
        }

        Ok(map)
    }
}
