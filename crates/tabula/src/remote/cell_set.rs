use std::fmt::Display;

use tabula_storage::{RemoteStore, filter::Filter};

use super::{RemoteTable, StringCell, extract_cell, view::ScanView};
use crate::{
    collection::{Collection, Iter, Set},
    error::{Error, Result},
    table::Table,
};

/// Every cell of a [`RemoteTable`], as a mutable set.
///
/// Reads scan the whole table. Membership is a point read: a cell is present
/// when the table holds exactly its value at its key pair.
///
/// Writes are point operations on the table. [`insert`](Collection::insert)
/// overwrites whatever value the key pair held and reports whether the key
/// pair was previously empty; [`remove`](Collection::remove) deletes the key
/// pair regardless of the value it holds. Bulk operations run one point call
/// per element and are not atomic.
///
/// [`retain_all`](Collection::retain_all) and
/// [`to_vec`](Collection::to_vec) are not supported.
pub struct CellSetView<S> {
    cells: ScanView<S, StringCell>,
}

impl<S> Clone for CellSetView<S> {
    fn clone(&self) -> Self { Self { cells: self.cells.clone() } }
}

impl<S> std::fmt::Debug for CellSetView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellSetView").field("cells", &self.cells).finish()
    }
}

impl<S> CellSetView<S> {
    pub(crate) fn new(table: RemoteTable<S>) -> Self {
        Self { cells: ScanView::new(table, Filter::all(), extract_cell) }
    }

    fn table(&self) -> &RemoteTable<S> { self.cells.table() }
}

impl<S> Display for CellSetView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cells of {}", self.table())
    }
}

impl<S: RemoteStore> Collection for CellSetView<S> {
    type Item = StringCell;

    fn len(&self) -> Result<usize> { self.cells.len() }

    fn is_empty(&self) -> Result<bool> { self.cells.is_empty() }

    fn contains(&self, cell: &StringCell) -> Result<bool> {
        let stored = self.table().get(cell.row_key(), cell.column_key())?;
        Ok(stored.as_ref() == Some(cell.value()))
    }

    fn iter(&self) -> Result<Iter<'_, StringCell>> { self.cells.iter() }

    fn insert(&self, cell: StringCell) -> Result<bool> {
        let (row_key, column_key, value) = cell.into_parts();
        Ok(self.table().insert(row_key, column_key, value)?.is_none())
    }

    fn remove(&self, cell: &StringCell) -> Result<bool> {
        Ok(self.table().remove(cell.row_key(), cell.column_key())?.is_some())
    }

    fn clear(&self) -> Result<()> { self.table().clear() }

    fn retain_all(&self, _: &[StringCell]) -> Result<bool> {
        Err(Error::unsupported("retain_all on a remote cell set"))
    }

    fn to_vec(&self) -> Result<Vec<StringCell>> {
        Err(Error::unsupported("to_vec on a remote cell set"))
    }
}

impl<S: RemoteStore> Set for CellSetView<S> {}
