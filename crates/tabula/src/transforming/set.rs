use std::{any::Any, hash::Hash};

use super::{Bijection, TransformingCollection};
use crate::{
    collection::{Collection, Iter, Set, equality},
    error::Result,
};

/// A [`Set`] of backing items presented as visible items.
///
/// A bijection maps distinct items to distinct items, so the result is a set
/// whenever the wrapped collection is.
#[derive(Debug, Clone)]
pub struct TransformingSet<S, B>(TransformingCollection<S, B>);

impl<S, B> TransformingSet<S, B> {
    /// Wraps `backing`, converting its items through `bijection`.
    pub const fn new(backing: S, bijection: B) -> Self {
        Self(TransformingCollection::new(backing, bijection))
    }

    /// Returns the wrapped set.
    pub const fn backing(&self) -> &S { self.0.backing() }
}

impl<S, B> TransformingSet<S, B>
where
    S: Set,
    B: Bijection<Backing = S::Item>,
{
    /// Returns `true` if `candidate` is a visible item that is present.
    pub fn contains_any(&self, candidate: &dyn Any) -> Result<bool>
    where
        B::Visible: 'static,
    {
        self.0.contains_any(candidate)
    }

    /// Removes `candidate` if it is a visible item that is present.
    pub fn remove_any(&self, candidate: &dyn Any) -> Result<bool>
    where
        B::Visible: 'static,
    {
        self.0.remove_any(candidate)
    }

    /// Compares the visible items with `other`'s, ignoring order.
    pub fn content_eq<O>(&self, other: &O) -> Result<bool>
    where
        O: Set<Item = B::Visible>,
    {
        equality::set_eq(self, other)
    }

    /// Hashes the visible items independently of order.
    pub fn content_hash(&self) -> Result<u64>
    where
        B::Visible: Hash,
    {
        equality::set_hash(self)
    }
}

impl<S, B> Collection for TransformingSet<S, B>
where
    S: Set,
    B: Bijection<Backing = S::Item>,
{
    type Item = B::Visible;

    fn len(&self) -> Result<usize> { self.0.len() }

    fn is_empty(&self) -> Result<bool> { self.0.is_empty() }

    fn contains(&self, item: &B::Visible) -> Result<bool> {
        self.0.contains(item)
    }

    fn iter(&self) -> Result<Iter<'_, B::Visible>> { self.0.iter() }

    fn insert(&self, item: B::Visible) -> Result<bool> { self.0.insert(item) }

    fn remove(&self, item: &B::Visible) -> Result<bool> { self.0.remove(item) }

    fn clear(&self) -> Result<()> { self.0.clear() }

    fn retain_all(&self, items: &[B::Visible]) -> Result<bool> {
        self.0.retain_all(items)
    }

    fn contains_all(&self, items: &[B::Visible]) -> Result<bool> {
        self.0.contains_all(items)
    }

    fn insert_all<I>(&self, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = B::Visible>,
        Self: Sized,
    {
        self.0.insert_all(items)
    }

    fn remove_all(&self, items: &[B::Visible]) -> Result<bool> {
        self.0.remove_all(items)
    }

    fn to_vec(&self) -> Result<Vec<B::Visible>> { self.0.to_vec() }
}

impl<S, B> Set for TransformingSet<S, B>
where
    S: Set,
    B: Bijection<Backing = S::Item>,
{
}
