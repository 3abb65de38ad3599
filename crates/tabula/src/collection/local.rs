//! In-process containers implementing the collection contracts.
//!
//! A [`LocalSet`] or [`LocalMap`] is a shared handle: clones see the same
//! contents, and the key, value and entry views of a [`LocalMap`] are live.
//! Iteration works on a copy taken when [`Collection::iter`] is called, so
//! the lock is never held across a caller's loop body.

use std::{hash::Hash, sync::Arc};

use fxhash::{FxHashMap, FxHashSet};
use parking_lot::Mutex;

use crate::{
    collection::{Collection, Iter, Map, MapEntry, Set},
    error::{Error, Result},
};

/// A shared, thread-safe hash set.
#[derive(Debug)]
pub struct LocalSet<T> {
    items: Arc<Mutex<FxHashSet<T>>>,
}

impl<T> Clone for LocalSet<T> {
    fn clone(&self) -> Self { Self { items: self.items.clone() } }
}

impl<T> Default for LocalSet<T> {
    fn default() -> Self {
        Self { items: Arc::new(Mutex::new(FxHashSet::default())) }
    }
}

impl<T: Eq + Hash> LocalSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl<T: Eq + Hash> FromIterator<T> for LocalSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: Arc::new(Mutex::new(iter.into_iter().collect())) }
    }
}

impl<T: Eq + Hash + Clone> Collection for LocalSet<T> {
    type Item = T;

    fn len(&self) -> Result<usize> { Ok(self.items.lock().len()) }

    fn contains(&self, item: &T) -> Result<bool> {
        Ok(self.items.lock().contains(item))
    }

    fn iter(&self) -> Result<Iter<'_, T>> {
        let items = self.items.lock().iter().cloned().collect::<Vec<_>>();
        Ok(Box::new(items.into_iter().map(Ok)))
    }

    fn insert(&self, item: T) -> Result<bool> {
        Ok(self.items.lock().insert(item))
    }

    fn remove(&self, item: &T) -> Result<bool> {
        Ok(self.items.lock().remove(item))
    }

    fn clear(&self) -> Result<()> {
        self.items.lock().clear();
        Ok(())
    }

    fn retain_all(&self, items: &[T]) -> Result<bool> {
        let mut set = self.items.lock();
        let before = set.len();

        set.retain(|item| items.contains(item));

        Ok(set.len() != before)
    }
}

impl<T: Eq + Hash + Clone> Set for LocalSet<T> {}

/// A shared, thread-safe hash map.
#[derive(Debug)]
pub struct LocalMap<K, V> {
    entries: Arc<Mutex<FxHashMap<K, V>>>,
}

impl<K, V> Clone for LocalMap<K, V> {
    fn clone(&self) -> Self { Self { entries: self.entries.clone() } }
}

impl<K, V> Default for LocalMap<K, V> {
    fn default() -> Self {
        Self { entries: Arc::new(Mutex::new(FxHashMap::default())) }
    }
}

impl<K: Eq + Hash, V> LocalMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn snapshot<T>(&self, project: impl Fn(&K, &V) -> T) -> Vec<T> {
        self.entries
            .lock()
            .iter()
            .map(|(key, value)| project(key, value))
            .collect()
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for LocalMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: Arc::new(Mutex::new(iter.into_iter().collect())) }
    }
}

impl<K, V> Map for LocalMap<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
{
    type Key = K;
    type Value = V;
    type Keys = LocalKeys<K, V>;
    type Values = LocalValues<K, V>;
    type Entry = LocalEntry<K, V>;
    type Entries = LocalEntries<K, V>;

    fn len(&self) -> Result<usize> { Ok(self.entries.lock().len()) }

    fn is_empty(&self) -> Result<bool> { Ok(self.entries.lock().is_empty()) }

    fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn contains_value(&self, value: &V) -> Result<bool> {
        Ok(self.entries.lock().values().any(|candidate| candidate == value))
    }

    fn insert(&self, key: K, value: V) -> Result<Option<V>> {
        Ok(self.entries.lock().insert(key, value))
    }

    fn remove(&self, key: &K) -> Result<Option<V>> {
        Ok(self.entries.lock().remove(key))
    }

    fn clear(&self) -> Result<()> {
        self.entries.lock().clear();
        Ok(())
    }

    fn keys(&self) -> LocalKeys<K, V> { LocalKeys(self.clone()) }

    fn values(&self) -> LocalValues<K, V> { LocalValues(self.clone()) }

    fn entries(&self) -> LocalEntries<K, V> { LocalEntries(self.clone()) }
}

/// The live key set of a [`LocalMap`].
#[derive(Debug, Clone)]
pub struct LocalKeys<K, V>(LocalMap<K, V>);

impl<K, V> Collection for LocalKeys<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
{
    type Item = K;

    fn len(&self) -> Result<usize> { self.0.len() }

    fn contains(&self, key: &K) -> Result<bool> { self.0.contains_key(key) }

    fn iter(&self) -> Result<Iter<'_, K>> {
        let keys = self.0.snapshot(|key, _| key.clone());
        Ok(Box::new(keys.into_iter().map(Ok)))
    }

    fn insert(&self, _: K) -> Result<bool> {
        Err(Error::unsupported("insert into a key set"))
    }

    fn remove(&self, key: &K) -> Result<bool> {
        Ok(self.0.remove(key)?.is_some())
    }

    fn clear(&self) -> Result<()> { self.0.clear() }

    fn retain_all(&self, keys: &[K]) -> Result<bool> {
        let mut entries = self.0.entries.lock();
        let before = entries.len();

        entries.retain(|key, _| keys.contains(key));

        Ok(entries.len() != before)
    }
}

impl<K, V> Set for LocalKeys<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
{
}

/// The live value collection of a [`LocalMap`].
#[derive(Debug, Clone)]
pub struct LocalValues<K, V>(LocalMap<K, V>);

impl<K, V> Collection for LocalValues<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
{
    type Item = V;

    fn len(&self) -> Result<usize> { self.0.len() }

    fn contains(&self, value: &V) -> Result<bool> {
        self.0.contains_value(value)
    }

    fn iter(&self) -> Result<Iter<'_, V>> {
        let values = self.0.snapshot(|_, value| value.clone());
        Ok(Box::new(values.into_iter().map(Ok)))
    }

    fn insert(&self, _: V) -> Result<bool> {
        Err(Error::unsupported("insert into a value collection"))
    }

    fn remove(&self, value: &V) -> Result<bool> {
        let mut entries = self.0.entries.lock();
        let key = entries.iter().find_map(|(key, candidate)| {
            (candidate == value).then(|| key.clone())
        });

        Ok(key.is_some_and(|key| entries.remove(&key).is_some()))
    }

    fn clear(&self) -> Result<()> { self.0.clear() }

    fn retain_all(&self, values: &[V]) -> Result<bool> {
        let mut entries = self.0.entries.lock();
        let before = entries.len();

        entries.retain(|_, value| values.contains(value));

        Ok(entries.len() != before)
    }
}

/// The live entry set of a [`LocalMap`].
#[derive(Debug, Clone)]
pub struct LocalEntries<K, V>(LocalMap<K, V>);

impl<K, V> Collection for LocalEntries<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
{
    type Item = LocalEntry<K, V>;

    fn len(&self) -> Result<usize> { self.0.len() }

    fn contains(&self, entry: &LocalEntry<K, V>) -> Result<bool> {
        Ok(self.0.get(&entry.key)?.as_ref() == Some(&entry.value))
    }

    fn iter(&self) -> Result<Iter<'_, LocalEntry<K, V>>> {
        let entries = self.0.snapshot(|key, value| LocalEntry {
            map: self.0.clone(),
            key: key.clone(),
            value: value.clone(),
        });

        Ok(Box::new(entries.into_iter().map(Ok)))
    }

    fn insert(&self, entry: LocalEntry<K, V>) -> Result<bool> {
        let LocalEntry { key, value, .. } = entry;
        let previous = self.0.insert(key, value.clone())?;

        Ok(previous.as_ref() != Some(&value))
    }

    fn remove(&self, entry: &LocalEntry<K, V>) -> Result<bool> {
        let mut entries = self.0.entries.lock();

        if entries.get(&entry.key) == Some(&entry.value) {
            entries.remove(&entry.key);
            return Ok(true);
        }

        Ok(false)
    }

    fn clear(&self) -> Result<()> { self.0.clear() }

    fn retain_all(&self, keep: &[LocalEntry<K, V>]) -> Result<bool> {
        let mut entries = self.0.entries.lock();
        let before = entries.len();

        entries.retain(|key, value| {
            keep.iter().any(|entry| &entry.key == key && &entry.value == value)
        });

        Ok(entries.len() != before)
    }
}

impl<K, V> Set for LocalEntries<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
{
}

/// An entry of a [`LocalMap`]; [`set_value`](MapEntry::set_value) writes
/// through to the map.
#[derive(Debug, Clone)]
pub struct LocalEntry<K, V> {
    map: LocalMap<K, V>,
    key: K,
    value: V,
}

impl<K: PartialEq, V: PartialEq> PartialEq for LocalEntry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

impl<K: Eq, V: Eq> Eq for LocalEntry<K, V> {}

impl<K: Hash, V: Hash> Hash for LocalEntry<K, V> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.hash(state);
    }
}

impl<K, V> MapEntry for LocalEntry<K, V>
where
    K: Eq + Hash + Clone,
    V: PartialEq + Clone,
{
    type Key = K;
    type Value = V;

    fn key(&self) -> &K { &self.key }

    fn value(&self) -> &V { &self.value }

    fn set_value(&mut self, value: V) -> Result<Option<V>> {
        let previous = self.map.insert(self.key.clone(), value.clone())?;
        self.value = value;
        Ok(previous)
    }
}
