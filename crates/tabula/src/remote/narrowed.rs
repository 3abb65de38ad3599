use std::hash::{Hash, Hasher};

use tabula_storage::{
    RemoteStore, encoding::encode, entity::Entity, filter::Filter,
};

use super::{
    RemoteTable, decode_cell, extract_column_key, extract_row_key,
    extract_value,
    view::{Extract, ScanView, SetView},
};
use crate::{
    collection::{Collection, Map, MapEntry},
    error::Result,
    table::Table,
};

/// The coordinate a [`NarrowedView`] holds fixed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fixed {
    /// A single row; the view is keyed by column key.
    Row(String),

    /// A single column; the view is keyed by row key.
    Column(String),
}

/// One row or one column of a [`RemoteTable`], as a map.
///
/// Point operations go to the table with the fixed coordinate filled in.
/// Reads of the whole map (`len`, iteration, `contains_value`) scan only the
/// fixed row or column. Inserting through the view creates cells in the
/// table, so a row obtained for a key with no cells yet can be populated
/// through it.
pub struct NarrowedView<S> {
    table: RemoteTable<S>,
    fixed: Fixed,
}

impl<S> Clone for NarrowedView<S> {
    fn clone(&self) -> Self {
        Self { table: self.table.clone(), fixed: self.fixed.clone() }
    }
}

impl<S> std::fmt::Debug for NarrowedView<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrowedView")
            .field("table", &self.table.table_name())
            .field("fixed", &self.fixed)
            .finish()
    }
}

impl<S> NarrowedView<S> {
    pub(crate) const fn new(table: RemoteTable<S>, fixed: Fixed) -> Self {
        Self { table, fixed }
    }

    /// Returns the fixed coordinate.
    pub const fn fixed(&self) -> &Fixed { &self.fixed }

    /// Returns `(row key, column key)` for the cell at `key` in this view.
    fn coordinates<'a>(&'a self, key: &'a String) -> (&'a String, &'a String) {
        match &self.fixed {
            Fixed::Row(row_key) => (row_key, key),
            Fixed::Column(column_key) => (key, column_key),
        }
    }

    fn filter(&self) -> Filter {
        match &self.fixed {
            Fixed::Row(row_key) => {
                Filter::all().with_partition_key(encode(row_key))
            }
            Fixed::Column(column_key) => {
                Filter::all().with_row_key(encode(column_key))
            }
        }
    }

    fn scan_view<E>(&self, extract: Extract<S, E>) -> ScanView<S, E> {
        ScanView::new(self.table.clone(), self.filter(), extract)
    }
}

fn extract_row_entry<S>(
    table: &RemoteTable<S>,
    entity: Entity,
) -> Result<NarrowedEntry<S>> {
    NarrowedEntry::new(table, &entity, true)
}

fn extract_column_entry<S>(
    table: &RemoteTable<S>,
    entity: Entity,
) -> Result<NarrowedEntry<S>> {
    NarrowedEntry::new(table, &entity, false)
}

impl<S: RemoteStore> Map for NarrowedView<S> {
    type Key = String;
    type Value = String;
    type Keys = SetView<ScanView<S, String>>;
    type Values = ScanView<S, String>;
    type Entry = NarrowedEntry<S>;
    type Entries = SetView<ScanView<S, NarrowedEntry<S>>>;

    fn len(&self) -> Result<usize> { self.keys().len() }

    fn is_empty(&self) -> Result<bool> { self.keys().is_empty() }

    fn get(&self, key: &String) -> Result<Option<String>> {
        let (row_key, column_key) = self.coordinates(key);
        self.table.get(row_key, column_key)
    }

    fn contains_key(&self, key: &String) -> Result<bool> {
        let (row_key, column_key) = self.coordinates(key);
        self.table.contains(row_key, column_key)
    }

    fn contains_value(&self, value: &String) -> Result<bool> {
        self.table.any_match(&self.filter().with_value(encode(value)))
    }

    fn insert(&self, key: String, value: String) -> Result<Option<String>> {
        match &self.fixed {
            Fixed::Row(row_key) => {
                self.table.insert(row_key.clone(), key, value)
            }
            Fixed::Column(column_key) => {
                self.table.insert(key, column_key.clone(), value)
            }
        }
    }

    fn remove(&self, key: &String) -> Result<Option<String>> {
        let (row_key, column_key) = self.coordinates(key);
        self.table.remove(row_key, column_key)
    }

    fn clear(&self) -> Result<()> {
        let keys = self.keys();

        for key in keys.iter()? {
            self.remove(&key?)?;
        }

        Ok(())
    }

    fn keys(&self) -> Self::Keys {
        let extract: Extract<S, String> = match self.fixed {
            Fixed::Row(_) => extract_column_key,
            Fixed::Column(_) => extract_row_key,
        };

        SetView::new(self.scan_view(extract))
    }

    fn values(&self) -> Self::Values { self.scan_view(extract_value) }

    fn entries(&self) -> Self::Entries {
        let extract: Extract<S, NarrowedEntry<S>> = match self.fixed {
            Fixed::Row(_) => extract_row_entry,
            Fixed::Column(_) => extract_column_entry,
        };

        SetView::new(self.scan_view(extract))
    }
}

/// An entry of a [`NarrowedView`].
///
/// Carries the value read by the scan that produced it.
/// [`set_value`](MapEntry::set_value) writes the new value to the table.
///
/// Two entries are equal when they address the same cell and carry the same
/// value.
pub struct NarrowedEntry<S> {
    table: RemoteTable<S>,
    row_key: String,
    column_key: String,
    value: String,
    keyed_by_column: bool,
}

impl<S> NarrowedEntry<S> {
    fn new(
        table: &RemoteTable<S>,
        entity: &Entity,
        keyed_by_column: bool,
    ) -> Result<Self> {
        let (row_key, column_key, value) = decode_cell(entity)?.into_parts();

        Ok(Self {
            table: table.clone(),
            row_key,
            column_key,
            value,
            keyed_by_column,
        })
    }

    /// Returns the row key of the addressed cell.
    pub fn row_key(&self) -> &str { &self.row_key }

    /// Returns the column key of the addressed cell.
    pub fn column_key(&self) -> &str { &self.column_key }
}

impl<S> Clone for NarrowedEntry<S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            row_key: self.row_key.clone(),
            column_key: self.column_key.clone(),
            value: self.value.clone(),
            keyed_by_column: self.keyed_by_column,
        }
    }
}

impl<S> std::fmt::Debug for NarrowedEntry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrowedEntry")
            .field("row_key", &self.row_key)
            .field("column_key", &self.column_key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<S> PartialEq for NarrowedEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.row_key == other.row_key
            && self.column_key == other.column_key
            && self.value == other.value
    }
}

impl<S> Eq for NarrowedEntry<S> {}

impl<S> Hash for NarrowedEntry<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row_key.hash(state);
        self.column_key.hash(state);
        self.value.hash(state);
    }
}

impl<S: RemoteStore> MapEntry for NarrowedEntry<S> {
    type Key = String;
    type Value = String;

    fn key(&self) -> &String {
        if self.keyed_by_column { &self.column_key } else { &self.row_key }
    }

    fn value(&self) -> &String { &self.value }

    fn set_value(&mut self, value: String) -> Result<Option<String>> {
        let previous = self.table.insert(
            self.row_key.clone(),
            self.column_key.clone(),
            value.clone(),
        )?;

        self.value = value;

        Ok(previous)
    }
}
