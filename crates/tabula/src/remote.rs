//! The string-typed table facade over a [`RemoteStore`].
//!
//! [`RemoteTable`] maps a table onto the store's `(partition key, row key)`
//! addressing: the table's row key becomes the partition key, its column key
//! becomes the store's row key, and all three strings are written through
//! [`encoding::encode`], so that any Unicode string, including characters
//! the store forbids in keys, can be used.
//!
//! # Views
//!
//! Every view the facade hands out ([`CellSetView`], [`NarrowedView`],
//! [`ScanView`], [`SetView`]) is a description of a query. Creating one
//! performs no remote call; each use issues fresh point requests or scans,
//! and nothing is cached between uses.
//!
//! # Failure Semantics
//!
//! - a missing entity reads as "absent", never as an error;
//! - a delete that finds the entity already gone (a concurrent writer won
//!   the race) reads as "nothing removed";
//! - every other store failure is returned as
//!   [`Error::Store`](crate::Error::Store), immediately, without retry.

use std::{fmt::Display, sync::Arc, time::Instant};

use tabula_storage::{
    RemoteStore, Scan, StoreError,
    encoding::{decode, encode},
    entity::Entity,
    filter::Filter,
};

use crate::{
    collection::Collection,
    config::Configuration,
    error::Result,
    instrument::{Observer, Operation, TracingObserver},
    table::{Cell, Table},
};

mod cell_set;
mod narrowed;
mod view;

pub use cell_set::CellSetView;
pub use narrowed::{Fixed, NarrowedEntry, NarrowedView};
pub use view::{ScanView, SetView};

/// A cell as stored by a [`RemoteTable`].
pub type StringCell = Cell<String, String, String>;

/// A [`Table`] of strings whose contents live in a [`RemoteStore`].
///
/// This is a cheap handle: clones refer to the same store, configuration and
/// observer.
pub struct RemoteTable<S>(Arc<Impl<S>>);

struct Impl<S> {
    store: S,
    configuration: Configuration,
    observer: Arc<dyn Observer>,
}

impl<S> Clone for RemoteTable<S> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<S> std::fmt::Debug for RemoteTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTable")
            .field("configuration", &self.0.configuration)
            .finish_non_exhaustive()
    }
}

impl<S> Display for RemoteTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "remote table `{}`", self.table_name())
    }
}

impl<S> RemoteTable<S> {
    /// Returns the name of the remote table.
    pub fn table_name(&self) -> &str { &self.0.configuration.table_name }

    /// Returns the configuration this table was created with.
    pub fn configuration(&self) -> &Configuration { &self.0.configuration }

    /// Returns the underlying store.
    pub fn store(&self) -> &S { &self.0.store }
}

impl<S: RemoteStore> RemoteTable<S> {
    /// Creates a table that logs remote calls through [`TracingObserver`].
    pub fn new(store: S, configuration: Configuration) -> Self {
        Self::with_observer(store, configuration, Arc::new(TracingObserver))
    }

    /// Creates a table that reports remote calls to `observer`.
    pub fn with_observer(
        store: S,
        configuration: Configuration,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self(Arc::new(Impl { store, configuration, observer }))
    }

    fn observed<T>(
        &self,
        operation: Operation,
        call: impl FnOnce() -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let started = Instant::now();
        let outcome = call();

        self.0.observer.observe(
            operation,
            self.table_name(),
            started.elapsed(),
            outcome.is_ok(),
        );

        outcome
    }

    fn retrieve(
        &self,
        row_key: &str,
        column_key: &str,
    ) -> Result<Option<Entity>> {
        let partition_key = encode(row_key);
        let row_key = encode(column_key);

        Ok(self.observed(Operation::Get, || {
            self.0.store.retrieve(self.table_name(), &partition_key, &row_key)
        })?)
    }

    /// Issues a scan of this table.
    pub(crate) fn scan(&self, filter: &Filter) -> Result<Scan<'_>> {
        let scan = || self.0.store.scan(self.table_name(), filter);

        if self.0.configuration.observe_scans {
            Ok(self.observed(Operation::Scan, scan)?)
        } else {
            Ok(scan()?)
        }
    }

    /// Returns `true` if the scan described by `filter` yields anything.
    pub(crate) fn any_match(&self, filter: &Filter) -> Result<bool> {
        Ok(self.scan(filter)?.next().transpose()?.is_some())
    }
}

pub(crate) fn decode_value(entity: &Entity) -> Result<String> {
    Ok(decode(entity.value())?)
}

pub(crate) fn decode_cell(entity: &Entity) -> Result<StringCell> {
    Ok(Cell::new(
        decode(entity.partition_key())?,
        decode(entity.row_key())?,
        decode(entity.value())?,
    ))
}

fn extract_row_key<S>(_: &RemoteTable<S>, entity: Entity) -> Result<String> {
    Ok(decode(entity.partition_key())?)
}

fn extract_column_key<S>(
    _: &RemoteTable<S>,
    entity: Entity,
) -> Result<String> {
    Ok(decode(entity.row_key())?)
}

fn extract_value<S>(_: &RemoteTable<S>, entity: Entity) -> Result<String> {
    decode_value(&entity)
}

fn extract_cell<S>(_: &RemoteTable<S>, entity: Entity) -> Result<StringCell> {
    decode_cell(&entity)
}

impl<S: RemoteStore> Table for RemoteTable<S> {
    type RowKey = String;
    type ColumnKey = String;
    type Value = String;
    type Row = NarrowedView<S>;
    type Column = NarrowedView<S>;
    type Cells = CellSetView<S>;
    type RowKeys = SetView<ScanView<S, String>>;
    type ColumnKeys = SetView<ScanView<S, String>>;
    type Values = ScanView<S, String>;

    fn contains(&self, row_key: &String, column_key: &String) -> Result<bool> {
        Ok(self.retrieve(row_key, column_key)?.is_some())
    }

    fn contains_row(&self, row_key: &String) -> Result<bool> {
        self.any_match(&Filter::all().with_partition_key(encode(row_key)))
    }

    fn contains_column(&self, column_key: &String) -> Result<bool> {
        self.any_match(&Filter::all().with_row_key(encode(column_key)))
    }

    fn contains_value(&self, value: &String) -> Result<bool> {
        self.any_match(&Filter::all().with_value(encode(value)))
    }

    fn get(
        &self,
        row_key: &String,
        column_key: &String,
    ) -> Result<Option<String>> {
        self.retrieve(row_key, column_key)?
            .map(|entity| decode_value(&entity))
            .transpose()
    }

    fn is_empty(&self) -> Result<bool> { self.cells().is_empty() }

    fn len(&self) -> Result<usize> { self.cells().len() }

    #[tracing::instrument(skip(self), fields(table = self.table_name()))]
    fn clear(&self) -> Result<()> {
        let cells = self.cells();

        for cell in cells.iter()? {
            let cell = cell?;
            self.remove(cell.row_key(), cell.column_key())?;

            tracing::trace!(
                row_key = %cell.row_key(),
                column_key = %cell.column_key(),
                "removed cell"
            );
        }

        Ok(())
    }

    fn insert(
        &self,
        row_key: String,
        column_key: String,
        value: String,
    ) -> Result<Option<String>> {
        let entity =
            Entity::new(encode(&row_key), encode(&column_key), encode(&value));

        let previous = self.observed(Operation::Put, || {
            self.0.store.upsert(self.table_name(), entity)
        })?;

        previous.map(|entity| decode_value(&entity)).transpose()
    }

    #[tracing::instrument(skip_all, fields(table = self.table_name()))]
    fn insert_all<T>(&self, other: &T) -> Result<()>
    where
        T: Table<RowKey = String, ColumnKey = String, Value = String>,
    {
        let cells = other.cells();
        let mut inserted = 0usize;

        for cell in cells.iter()? {
            let (row_key, column_key, value) = cell?.into_parts();
            self.insert(row_key, column_key, value)?;
            inserted += 1;
        }

        tracing::debug!(inserted, "inserted cells");

        Ok(())
    }

    fn remove(
        &self,
        row_key: &String,
        column_key: &String,
    ) -> Result<Option<String>> {
        let Some(entity) = self.retrieve(row_key, column_key)? else {
            return Ok(None);
        };

        let deleted = self.observed(Operation::Remove, || {
            self.0.store.delete(self.table_name(), &entity)
        });

        match deleted {
            Ok(deleted) => Ok(Some(decode_value(&deleted)?)),

            // someone else removed the entity between our lookup and delete
            Err(error) if error.is_not_found() => {
                tracing::debug!(
                    table = self.table_name(),
                    %row_key,
                    %column_key,
                    "entity vanished before it could be deleted"
                );

                Ok(None)
            }

            Err(error) => Err(error.into()),
        }
    }

    fn row(&self, row_key: String) -> Result<NarrowedView<S>> {
        Ok(NarrowedView::new(self.clone(), Fixed::Row(row_key)))
    }

    fn column(&self, column_key: String) -> Result<NarrowedView<S>> {
        Ok(NarrowedView::new(self.clone(), Fixed::Column(column_key)))
    }

    fn cells(&self) -> CellSetView<S> { CellSetView::new(self.clone()) }

    fn row_keys(&self) -> SetView<ScanView<S, String>> {
        SetView::new(
            ScanView::new(self.clone(), Filter::all(), extract_row_key)
                .distinct(),
        )
    }

    fn column_keys(&self) -> SetView<ScanView<S, String>> {
        SetView::new(
            ScanView::new(self.clone(), Filter::all(), extract_column_key)
                .distinct(),
        )
    }

    fn values(&self) -> ScanView<S, String> {
        ScanView::new(self.clone(), Filter::all(), extract_value)
    }
}

#[cfg(test)]
mod test;
