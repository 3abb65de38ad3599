use std::hash::Hash;

use fxhash::FxHashSet;
use tabula_storage::{RemoteStore, entity::Entity, filter::Filter};

use crate::{
    collection::{Collection, Iter, Set},
    error::{Error, Result},
    remote::RemoteTable,
};

/// Turns one scanned entity into a view item.
pub(crate) type Extract<S, E> = fn(&RemoteTable<S>, Entity) -> Result<E>;

/// A read-only collection backed by a filtered scan of a [`RemoteTable`].
///
/// Every call issues a new scan: `len` counts a full scan, `contains` scans
/// until it finds a match. In distinct mode, duplicates produced by the
/// extractor are skipped within one iteration, which turns a scan of cells
/// into a scan of the keys those cells use.
///
/// The view cannot be modified and does not support
/// [`to_vec`](Collection::to_vec); collect [`iter`](Collection::iter)
/// instead.
pub struct ScanView<S, E> {
    table: RemoteTable<S>,
    filter: Filter,
    extract: Extract<S, E>,
    distinct: bool,
}

impl<S, E> Clone for ScanView<S, E> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            filter: self.filter.clone(),
            extract: self.extract,
            distinct: self.distinct,
        }
    }
}

impl<S, E> std::fmt::Debug for ScanView<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanView")
            .field("table", &self.table.table_name())
            .field("filter", &self.filter)
            .field("distinct", &self.distinct)
            .finish_non_exhaustive()
    }
}

impl<S, E> ScanView<S, E> {
    pub(crate) fn new(
        table: RemoteTable<S>,
        filter: Filter,
        extract: Extract<S, E>,
    ) -> Self {
        Self { table, filter, extract, distinct: false }
    }

    pub(crate) fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub(crate) const fn table(&self) -> &RemoteTable<S> { &self.table }

    /// Returns the filter every scan of this view is issued with.
    pub const fn filter(&self) -> &Filter { &self.filter }
}

impl<S, E> Collection for ScanView<S, E>
where
    S: RemoteStore,
    E: Eq + Hash + Clone,
{
    type Item = E;

    fn len(&self) -> Result<usize> {
        let mut len = 0usize;

        // items are extracted so that an undecodable entity fails here as it
        // does during iteration
        for item in self.iter()? {
            item?;
            len += 1;
        }

        Ok(len)
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(!self.table.any_match(&self.filter)?)
    }

    fn contains(&self, item: &E) -> Result<bool> {
        for candidate in self.iter()? {
            if candidate? == *item {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn iter(&self) -> Result<Iter<'_, E>> {
        let extract = self.extract;
        let table = &self.table;

        let items = self.table.scan(&self.filter)?.map(move |entity| {
            extract(table, entity?)
        });

        if !self.distinct {
            return Ok(Box::new(items));
        }

        let mut seen = FxHashSet::default();

        Ok(Box::new(items.filter(move |item| match item {
            Ok(item) => seen.insert(item.clone()),
            Err(_) => true,
        })))
    }

    fn insert(&self, _: E) -> Result<bool> {
        Err(Error::unsupported("insert into a scan view"))
    }

    fn remove(&self, _: &E) -> Result<bool> {
        Err(Error::unsupported("remove from a scan view"))
    }

    fn clear(&self) -> Result<()> {
        Err(Error::unsupported("clear a scan view"))
    }

    fn retain_all(&self, _: &[E]) -> Result<bool> {
        Err(Error::unsupported("retain_all on a scan view"))
    }

    fn insert_all<I>(&self, _: I) -> Result<bool>
    where
        I: IntoIterator<Item = E>,
        Self: Sized,
    {
        Err(Error::unsupported("insert_all into a scan view"))
    }

    fn remove_all(&self, _: &[E]) -> Result<bool> {
        Err(Error::unsupported("remove_all from a scan view"))
    }

    fn to_vec(&self) -> Result<Vec<E>> {
        Err(Error::unsupported("to_vec on a scan view"))
    }
}

/// Presents a duplicate-free collection as a [`Set`].
///
/// The wrapped collection must not yield duplicates; this wrapper only
/// forwards.
#[derive(Debug, Clone)]
pub struct SetView<C>(C);

impl<C> SetView<C> {
    pub(crate) const fn new(collection: C) -> Self { Self(collection) }

    /// Returns the wrapped collection.
    pub const fn inner(&self) -> &C { &self.0 }
}

impl<C: Collection> Collection for SetView<C> {
    type Item = C::Item;

    fn len(&self) -> Result<usize> { self.0.len() }

    fn is_empty(&self) -> Result<bool> { self.0.is_empty() }

    fn contains(&self, item: &C::Item) -> Result<bool> { self.0.contains(item) }

    fn iter(&self) -> Result<Iter<'_, C::Item>> { self.0.iter() }

    fn insert(&self, item: C::Item) -> Result<bool> { self.0.insert(item) }

    fn remove(&self, item: &C::Item) -> Result<bool> { self.0.remove(item) }

    fn clear(&self) -> Result<()> { self.0.clear() }

    fn retain_all(&self, items: &[C::Item]) -> Result<bool> {
        self.0.retain_all(items)
    }

    fn contains_all(&self, items: &[C::Item]) -> Result<bool> {
        self.0.contains_all(items)
    }

    fn insert_all<I>(&self, items: I) -> Result<bool>
    where
        I: IntoIterator<Item = C::Item>,
        Self: Sized,
    {
        self.0.insert_all(items)
    }

    fn remove_all(&self, items: &[C::Item]) -> Result<bool> {
        self.0.remove_all(items)
    }

    fn to_vec(&self) -> Result<Vec<C::Item>> { self.0.to_vec() }
}

impl<C: Collection> Set for SetView<C> {}
