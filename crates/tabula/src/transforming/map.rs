use std::{any::Any, marker::PhantomData, sync::Arc};

use super::{Bijection, TransformingCollection, TransformingSet};
use crate::{
    collection::{Map, MapEntry, equality},
    error::{Result, absent_on_conversion},
};

/// A [`Map`] of backing keys and values presented as visible ones.
///
/// The key, value and entry views are the wrapped map's views, transformed;
/// they stay live.
pub struct TransformingMap<M, KB, VB> {
    backing: M,
    keys: Arc<KB>,
    values: Arc<VB>,
}

impl<M: Clone, KB, VB> Clone for TransformingMap<M, KB, VB> {
    fn clone(&self) -> Self {
        Self {
            backing: self.backing.clone(),
            keys: self.keys.clone(),
            values: self.values.clone(),
        }
    }
}

impl<M, KB, VB> std::fmt::Debug for TransformingMap<M, KB, VB>
where
    M: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformingMap")
            .field("backing", &self.backing)
            .finish_non_exhaustive()
    }
}

impl<M, KB, VB> TransformingMap<M, KB, VB> {
    /// Wraps `backing`, converting keys through `keys` and values through
    /// `values`.
    pub fn new(backing: M, keys: KB, values: VB) -> Self {
        Self::from_shared(backing, Arc::new(keys), Arc::new(values))
    }

    pub(crate) const fn from_shared(
        backing: M,
        keys: Arc<KB>,
        values: Arc<VB>,
    ) -> Self {
        Self { backing, keys, values }
    }

    /// Returns the wrapped map.
    pub const fn backing(&self) -> &M { &self.backing }
}

impl<M, KB, VB> TransformingMap<M, KB, VB>
where
    M: Map,
    M::Entry: Clone,
    KB: Bijection<Backing = M::Key>,
    VB: Bijection<Backing = M::Value>,
{
    /// Returns the value under `key` if `key` is a visible key.
    pub fn get_any(&self, key: &dyn Any) -> Result<Option<VB::Visible>>
    where
        KB::Visible: 'static,
    {
        let Some(key) = self.keys.to_any(key)? else {
            return Ok(None);
        };

        self.from_backing_value(self.backing.get(&key)?)
    }

    /// Returns `true` if `key` is a visible key that is present.
    pub fn contains_key_any(&self, key: &dyn Any) -> Result<bool>
    where
        KB::Visible: 'static,
    {
        match self.keys.to_any(key)? {
            Some(key) => self.backing.contains_key(&key),
            None => Ok(false),
        }
    }

    /// Returns `true` if `value` is a visible value that is present.
    pub fn contains_value_any(&self, value: &dyn Any) -> Result<bool>
    where
        VB::Visible: 'static,
    {
        match self.values.to_any(value)? {
            Some(value) => self.backing.contains_value(&value),
            None => Ok(false),
        }
    }

    /// Removes `key` if it is a visible key.
    pub fn remove_any(&self, key: &dyn Any) -> Result<Option<VB::Visible>>
    where
        KB::Visible: 'static,
    {
        let Some(key) = self.keys.to_any(key)? else {
            return Ok(None);
        };

        self.from_backing_value(self.backing.remove(&key)?)
    }

    /// Compares the visible entries with `other`'s.
    pub fn content_eq<O>(&self, other: &O) -> Result<bool>
    where
        O: Map<Key = KB::Visible, Value = VB::Visible>,
        VB::Visible: PartialEq,
    {
        equality::map_eq(self, other)
    }

    fn from_backing_value(
        &self,
        value: Option<M::Value>,
    ) -> Result<Option<VB::Visible>> {
        value.map(|value| self.values.from(&value)).transpose()
    }
}

impl<M, KB, VB> Map for TransformingMap<M, KB, VB>
where
    M: Map,
    M::Entry: Clone,
    KB: Bijection<Backing = M::Key>,
    VB: Bijection<Backing = M::Value>,
{
    type Key = KB::Visible;
    type Value = VB::Visible;
    type Keys = TransformingSet<M::Keys, Arc<KB>>;
    type Values = TransformingCollection<M::Values, Arc<VB>>;
    type Entry = TransformingEntry<M::Entry, KB, VB>;
    type Entries =
        TransformingSet<M::Entries, EntryBijection<M::Entry, KB, VB>>;

    fn len(&self) -> Result<usize> { self.backing.len() }

    fn is_empty(&self) -> Result<bool> { self.backing.is_empty() }

    fn get(&self, key: &KB::Visible) -> Result<Option<VB::Visible>> {
        let Some(key) = absent_on_conversion(self.keys.to(key))? else {
            return Ok(None);
        };

        self.from_backing_value(self.backing.get(&key)?)
    }

    fn contains_key(&self, key: &KB::Visible) -> Result<bool> {
        match absent_on_conversion(self.keys.to(key))? {
            Some(key) => self.backing.contains_key(&key),
            None => Ok(false),
        }
    }

    fn contains_value(&self, value: &VB::Visible) -> Result<bool> {
        match absent_on_conversion(self.values.to(value))? {
            Some(value) => self.backing.contains_value(&value),
            None => Ok(false),
        }
    }

    fn insert(
        &self,
        key: KB::Visible,
        value: VB::Visible,
    ) -> Result<Option<VB::Visible>> {
        let previous =
            self.backing.insert(self.keys.to(&key)?, self.values.to(&value)?)?;

        self.from_backing_value(previous)
    }

    fn remove(&self, key: &KB::Visible) -> Result<Option<VB::Visible>> {
        let Some(key) = absent_on_conversion(self.keys.to(key))? else {
            return Ok(None);
        };

        self.from_backing_value(self.backing.remove(&key)?)
    }

    fn clear(&self) -> Result<()> { self.backing.clear() }

    fn keys(&self) -> Self::Keys {
        TransformingSet::new(self.backing.keys(), self.keys.clone())
    }

    fn values(&self) -> Self::Values {
        TransformingCollection::new(self.backing.values(), self.values.clone())
    }

    fn entries(&self) -> Self::Entries {
        TransformingSet::new(
            self.backing.entries(),
            EntryBijection::new(self.keys.clone(), self.values.clone()),
        )
    }
}

/// An entry of a [`TransformingMap`].
///
/// The key and value are converted once, when the entry is produced.
/// [`set_value`](MapEntry::set_value) converts the new value and writes it
/// through the wrapped entry.
pub struct TransformingEntry<E, KB: Bijection, VB: Bijection> {
    backing: E,
    key: KB::Visible,
    value: VB::Visible,
    values: Arc<VB>,
}

impl<E, KB, VB> TransformingEntry<E, KB, VB>
where
    E: MapEntry,
    KB: Bijection<Backing = E::Key>,
    VB: Bijection<Backing = E::Value>,
{
    fn new(backing: E, keys: &KB, values: Arc<VB>) -> Result<Self> {
        Ok(Self {
            key: keys.from(backing.key())?,
            value: values.from(backing.value())?,
            backing,
            values,
        })
    }
}

impl<E, KB, VB> Clone for TransformingEntry<E, KB, VB>
where
    E: Clone,
    KB: Bijection<Visible: Clone>,
    VB: Bijection<Visible: Clone>,
{
    fn clone(&self) -> Self {
        Self {
            backing: self.backing.clone(),
            key: self.key.clone(),
            value: self.value.clone(),
            values: self.values.clone(),
        }
    }
}

impl<E, KB, VB> std::fmt::Debug for TransformingEntry<E, KB, VB>
where
    KB: Bijection<Visible: std::fmt::Debug>,
    VB: Bijection<Visible: std::fmt::Debug>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformingEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<E, KB, VB> MapEntry for TransformingEntry<E, KB, VB>
where
    E: MapEntry,
    KB: Bijection<Backing = E::Key>,
    VB: Bijection<Backing = E::Value>,
{
    type Key = KB::Visible;
    type Value = VB::Visible;

    fn key(&self) -> &KB::Visible { &self.key }

    fn value(&self) -> &VB::Visible { &self.value }

    fn set_value(
        &mut self,
        value: VB::Visible,
    ) -> Result<Option<VB::Visible>> {
        let previous = self.backing.set_value(self.values.to(&value)?)?;
        self.value = value;

        previous.map(|previous| self.values.from(&previous)).transpose()
    }
}

/// Converts between backing map entries and [`TransformingEntry`]s.
pub struct EntryBijection<E, KB, VB> {
    keys: Arc<KB>,
    values: Arc<VB>,
    _marker: PhantomData<fn() -> E>,
}

impl<E, KB, VB> EntryBijection<E, KB, VB> {
    const fn new(keys: Arc<KB>, values: Arc<VB>) -> Self {
        Self { keys, values, _marker: PhantomData }
    }
}

impl<E, KB, VB> Clone for EntryBijection<E, KB, VB> {
    fn clone(&self) -> Self {
        Self::new(self.keys.clone(), self.values.clone())
    }
}

impl<E, KB, VB> std::fmt::Debug for EntryBijection<E, KB, VB> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryBijection").finish_non_exhaustive()
    }
}

impl<E, KB, VB> Bijection for EntryBijection<E, KB, VB>
where
    E: MapEntry + Clone,
    KB: Bijection<Backing = E::Key>,
    VB: Bijection<Backing = E::Value>,
{
    type Visible = TransformingEntry<E, KB, VB>;
    type Backing = E;

    fn to(&self, visible: &TransformingEntry<E, KB, VB>) -> Result<E> {
        Ok(visible.backing.clone())
    }

    fn from(&self, backing: &E) -> Result<TransformingEntry<E, KB, VB>> {
        TransformingEntry::new(backing.clone(), &self.keys, self.values.clone())
    }
}
