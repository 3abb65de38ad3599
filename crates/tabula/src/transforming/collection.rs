use std::{any::Any, hash::Hash};

use super::{Bijection, to_backing_all};
use crate::{
    collection::{Collection, Iter, equality},
    error::{Result, absent_on_conversion},
};

/// A [`Collection`] of backing items presented as visible items.
#[derive(Debug, Clone)]
pub struct TransformingCollection<C, B> {
    backing: C,
    bijection: B,
}

impl<C, B> TransformingCollection<C, B> {
    /// Wraps `backing`, converting its items through `bijection`.
    pub const fn new(backing: C, bijection: B) -> Self {
        Self { backing, bijection }
    }

    /// Returns the wrapped collection.
    pub const fn backing(&self) -> &C { &self.backing }

    /// Returns the bijection used for conversion.
    pub const fn bijection(&self) -> &B { &self.bijection }
}

impl<C, B> TransformingCollection<C, B>
where
    C: Collection,
    B: Bijection<Backing = C::Item>,
{
    /// Returns `true` if `candidate` is a visible item that is present.
    pub fn contains_any(&self, candidate: &dyn Any) -> Result<bool>
    where
        B::Visible: 'static,
    {
        match self.bijection.to_any(candidate)? {
            Some(item) => self.backing.contains(&item),
            None => Ok(false),
        }
    }

    /// Removes `candidate` if it is a visible item that is present.
    pub fn remove_any(&self, candidate: &dyn Any) -> Result<bool>
    where
        B::Visible: 'static,
    {
        match self.bijection.to_any(candidate)? {
            Some(item) => self.backing.remove(&item),
            None => Ok(false),
        }
    }

    /// Compares the visible items with `other`'s, in iteration order.
    pub fn content_eq<O>(&self, other: &O) -> Result<bool>
    where
        O: Collection<Item = B::Visible>,
        B::Visible: PartialEq,
    {
        equality::sequence_eq(self, other)
    }

    /// Hashes the visible items in iteration order.
    pub fn content_hash(&self) -> Result<u64>
    where
        B::Visible: Hash,
    {
        equality::sequence_hash(self)
    }
}

impl<C, B> Collection for TransformingCollection<C, B>
where
    C: Collection,
    B: Bijection<Backing = C::Item>,
{
    type Item = B::Visible;

    fn len(&self) -> Result<usize> { self.backing.len() }

    fn is_empty(&self) -> Result<bool> { self.backing.is_empty() }

    fn contains(&self, item: &B::Visible) -> Result<bool> {
        match absent_on_conversion(self.bijection.to(item))? {
            Some(item) => self.backing.contains(&item),
            None => Ok(false),
        }
    }

    fn iter(&self) -> Result<Iter<'_, B::Visible>> {
        let backing = self.backing.iter()?;

        Ok(Box::new(backing.map(move |item| {
            item.and_then(|item| self.bijection.from(&item))
        })))
    }

    fn insert(&self, item: B::Visible) -> Result<bool> {
        self.backing.insert(self.bijection.to(&item)?)
    }

    fn remove(&self, item: &B::Visible) -> Result<bool> {
        match absent_on_conversion(self.bijection.to(item))? {
            Some(item) => self.backing.remove(&item),
            None => Ok(false),
        }
    }

    fn clear(&self) -> Result<()> { self.backing.clear() }

    fn retain_all(&self, items: &[B::Visible]) -> Result<bool> {
        self.backing.retain_all(&to_backing_all(&self.bijection, items)?)
    }

    fn contains_all(&self, items: &[B::Visible]) -> Result<bool> {
        let converted = to_backing_all(&self.bijection, items)?;

        // an item that cannot be converted cannot be present
        if converted.len() != items.len() {
            return Ok(false);
        }

        self.backing.contains_all(&converted)
    }

    fn insert_all<I>(&self, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = B::Visible>,
        Self: Sized,
    {
        let converted = items
            .into_iter()
            .map(|item| self.bijection.to(&item))
            .collect::<Result<Vec<_>>>()?;

        self.backing.insert_all(converted)
    }

    fn remove_all(&self, items: &[B::Visible]) -> Result<bool> {
        self.backing.remove_all(&to_backing_all(&self.bijection, items)?)
    }

    fn to_vec(&self) -> Result<Vec<B::Visible>> {
        self.backing
            .to_vec()?
            .iter()
            .map(|item| self.bijection.from(item))
            .collect()
    }
}
