use std::marker::PhantomData;

use crate::{
    error::Result,
    table::{Cell, Table},
    transforming::{Bijection, TransformingSet},
};

/// A table with the row and column roles of another table swapped.
///
/// Every operation forwards to the wrapped table with the two keys
/// exchanged; a row of the transposed table is a column of the wrapped one.
#[derive(Debug, Clone)]
pub struct Transposed<T>(T);

impl<T> Transposed<T> {
    /// Wraps `table`.
    pub const fn new(table: T) -> Self { Self(table) }

    /// Returns the wrapped table.
    pub fn into_inner(self) -> T { self.0 }
}

impl<T> Table for Transposed<T>
where
    T: Table,
    T::RowKey: Clone,
    T::ColumnKey: Clone,
    T::Value: Clone,
{
    type RowKey = T::ColumnKey;
    type ColumnKey = T::RowKey;
    type Value = T::Value;
    type Row = T::Column;
    type Column = T::Row;
    type Cells = TransformingSet<
        T::Cells,
        TransposeCell<T::ColumnKey, T::RowKey, T::Value>,
    >;
    type RowKeys = T::ColumnKeys;
    type ColumnKeys = T::RowKeys;
    type Values = T::Values;

    fn contains(
        &self,
        row_key: &T::ColumnKey,
        column_key: &T::RowKey,
    ) -> Result<bool> {
        self.0.contains(column_key, row_key)
    }

    fn contains_row(&self, row_key: &T::ColumnKey) -> Result<bool> {
        self.0.contains_column(row_key)
    }

    fn contains_column(&self, column_key: &T::RowKey) -> Result<bool> {
        self.0.contains_row(column_key)
    }

    fn contains_value(&self, value: &T::Value) -> Result<bool> {
        self.0.contains_value(value)
    }

    fn get(
        &self,
        row_key: &T::ColumnKey,
        column_key: &T::RowKey,
    ) -> Result<Option<T::Value>> {
        self.0.get(column_key, row_key)
    }

    fn is_empty(&self) -> Result<bool> { self.0.is_empty() }

    fn len(&self) -> Result<usize> { self.0.len() }

    fn clear(&self) -> Result<()> { self.0.clear() }

    fn insert(
        &self,
        row_key: T::ColumnKey,
        column_key: T::RowKey,
        value: T::Value,
    ) -> Result<Option<T::Value>> {
        self.0.insert(column_key, row_key, value)
    }

    fn remove(
        &self,
        row_key: &T::ColumnKey,
        column_key: &T::RowKey,
    ) -> Result<Option<T::Value>> {
        self.0.remove(column_key, row_key)
    }

    fn row(&self, row_key: T::ColumnKey) -> Result<T::Column> {
        self.0.column(row_key)
    }

    fn column(&self, column_key: T::RowKey) -> Result<T::Row> {
        self.0.row(column_key)
    }

    fn cells(&self) -> Self::Cells {
        TransformingSet::new(self.0.cells(), TransposeCell::new())
    }

    fn row_keys(&self) -> T::ColumnKeys { self.0.column_keys() }

    fn column_keys(&self) -> T::RowKeys { self.0.row_keys() }

    fn values(&self) -> T::Values { self.0.values() }
}

/// The bijection between a cell and its transpose.
pub struct TransposeCell<R, C, V>(PhantomData<fn() -> (R, C, V)>);

impl<R, C, V> TransposeCell<R, C, V> {
    /// Creates the bijection.
    #[must_use]
    pub const fn new() -> Self { Self(PhantomData) }
}

impl<R, C, V> Default for TransposeCell<R, C, V> {
    fn default() -> Self { Self::new() }
}

impl<R, C, V> std::fmt::Debug for TransposeCell<R, C, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TransposeCell")
    }
}

impl<R: Clone, C: Clone, V: Clone> Bijection for TransposeCell<R, C, V> {
    type Visible = Cell<R, C, V>;
    type Backing = Cell<C, R, V>;

    fn to(&self, cell: &Cell<R, C, V>) -> Result<Cell<C, R, V>> {
        Ok(cell.clone().transpose())
    }

    fn from(&self, cell: &Cell<C, R, V>) -> Result<Cell<R, C, V>> {
        Ok(cell.clone().transpose())
    }
}
