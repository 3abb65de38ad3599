//! The two-dimensional table contract.
//!
//! A [`Table`] associates an ordered pair of keys, a row key and a column
//! key, with at most one value. Each such association is a [`Cell`].
//!
//! Besides point operations, a table hands out views:
//!
//! - [`Table::cells`]: every cell;
//! - [`Table::row`] / [`Table::column`]: the cells sharing one row or column
//!   key, as a map from the other key to the value;
//! - [`Table::row_keys`] / [`Table::column_keys`]: the distinct keys in use;
//! - [`Table::values`]: every stored value, duplicates included;
//! - [`Table::row_map`] / [`Table::column_map`]: every row (or column) as a
//!   nested map.
//!
//! How live these views are depends on the implementation; for
//! [`RemoteTable`](crate::RemoteTable) every view re-reads the store each
//! time it is used.

use crate::{
    collection::{Collection, Map, Set},
    error::Result,
};

mod row_map;
mod transpose;

pub use row_map::{RowMap, RowMapEntries, RowMapEntry, RowMapValues};
pub use transpose::{TransposeCell, Transposed};

/// The nested column map of a table: column key to column.
pub type ColumnMap<T> = RowMap<Transposed<T>>;

/// A single `(row key, column key, value)` association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell<R, C, V> {
    row_key: R,
    column_key: C,
    value: V,
}

impl<R, C, V> Cell<R, C, V> {
    /// Creates a cell.
    pub const fn new(row_key: R, column_key: C, value: V) -> Self {
        Self { row_key, column_key, value }
    }

    /// Returns the row key.
    pub const fn row_key(&self) -> &R { &self.row_key }

    /// Returns the column key.
    pub const fn column_key(&self) -> &C { &self.column_key }

    /// Returns the value.
    pub const fn value(&self) -> &V { &self.value }

    /// Splits the cell into its parts.
    pub fn into_parts(self) -> (R, C, V) {
        (self.row_key, self.column_key, self.value)
    }

    /// Swaps the row and column keys.
    pub fn transpose(self) -> Cell<C, R, V> {
        Cell::new(self.column_key, self.row_key, self.value)
    }
}

/// A mutable mapping from `(row key, column key)` to a value.
pub trait Table {
    /// The row key type.
    type RowKey;

    /// The column key type.
    type ColumnKey;

    /// The value type.
    type Value;

    /// The view returned by [`Table::row`]: column key to value.
    type Row: Map<Key = Self::ColumnKey, Value = Self::Value>;

    /// The view returned by [`Table::column`]: row key to value.
    type Column: Map<Key = Self::RowKey, Value = Self::Value>;

    /// The view returned by [`Table::cells`].
    type Cells: Set<Item = Cell<Self::RowKey, Self::ColumnKey, Self::Value>>;

    /// The view returned by [`Table::row_keys`].
    type RowKeys: Set<Item = Self::RowKey>;

    /// The view returned by [`Table::column_keys`].
    type ColumnKeys: Set<Item = Self::ColumnKey>;

    /// The view returned by [`Table::values`].
    type Values: Collection<Item = Self::Value>;

    /// Returns `true` if a cell exists at `(row_key, column_key)`.
    fn contains(
        &self,
        row_key: &Self::RowKey,
        column_key: &Self::ColumnKey,
    ) -> Result<bool> {
        Ok(self.get(row_key, column_key)?.is_some())
    }

    /// Returns `true` if at least one cell has the given row key.
    fn contains_row(&self, row_key: &Self::RowKey) -> Result<bool>;

    /// Returns `true` if at least one cell has the given column key.
    fn contains_column(&self, column_key: &Self::ColumnKey) -> Result<bool>;

    /// Returns `true` if at least one cell holds `value`.
    fn contains_value(&self, value: &Self::Value) -> Result<bool>;

    /// Returns the value at `(row_key, column_key)`.
    fn get(
        &self,
        row_key: &Self::RowKey,
        column_key: &Self::ColumnKey,
    ) -> Result<Option<Self::Value>>;

    /// Returns `true` if the table holds no cells.
    fn is_empty(&self) -> Result<bool> { self.cells().is_empty() }

    /// Returns the number of cells.
    fn len(&self) -> Result<usize> { self.cells().len() }

    /// Removes every cell.
    fn clear(&self) -> Result<()>;

    /// Stores `value` at `(row_key, column_key)`, returning the value it
    /// replaced.
    fn insert(
        &self,
        row_key: Self::RowKey,
        column_key: Self::ColumnKey,
        value: Self::Value,
    ) -> Result<Option<Self::Value>>;

    /// Copies every cell of `other` into this table, one insert at a time.
    fn insert_all<T>(&self, other: &T) -> Result<()>
    where
        T: Table<
                RowKey = Self::RowKey,
                ColumnKey = Self::ColumnKey,
                Value = Self::Value,
            >,
        Self: Sized,
    {
        let cells = other.cells();

        for cell in cells.iter()? {
            let (row_key, column_key, value) = cell?.into_parts();
            self.insert(row_key, column_key, value)?;
        }

        Ok(())
    }

    /// Removes the cell at `(row_key, column_key)`, returning its value.
    fn remove(
        &self,
        row_key: &Self::RowKey,
        column_key: &Self::ColumnKey,
    ) -> Result<Option<Self::Value>>;

    /// Returns the cells with the given row key, as a map from column key to
    /// value.
    fn row(&self, row_key: Self::RowKey) -> Result<Self::Row>;

    /// Returns the cells with the given column key, as a map from row key to
    /// value.
    fn column(&self, column_key: Self::ColumnKey) -> Result<Self::Column>;

    /// Returns every cell.
    fn cells(&self) -> Self::Cells;

    /// Returns the distinct row keys.
    fn row_keys(&self) -> Self::RowKeys;

    /// Returns the distinct column keys.
    fn column_keys(&self) -> Self::ColumnKeys;

    /// Returns every value, with duplicates.
    fn values(&self) -> Self::Values;

    /// Returns every row as a map from row key to [`Table::Row`].
    fn row_map(&self) -> RowMap<Self>
    where
        Self: Clone,
    {
        RowMap::new(self.clone())
    }

    /// Returns every column as a map from column key to [`Table::Column`].
    ///
    /// This is the row map of the transposed table.
    fn column_map(&self) -> ColumnMap<Self>
    where
        Self: Clone,
    {
        RowMap::new(Transposed::new(self.clone()))
    }

    /// Returns a view of this table with row and column roles swapped.
    fn transpose(self) -> Transposed<Self>
    where
        Self: Sized,
    {
        Transposed::new(self)
    }
}

#[cfg(test)]
mod test;
