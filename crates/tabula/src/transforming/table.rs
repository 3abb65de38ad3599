use std::{any::Any, sync::Arc};

use super::{
    Bijection, TransformingCollection, TransformingMap, TransformingSet,
};
use crate::{
    collection::{Map, equality},
    error::{Result, absent_on_conversion},
    table::{Cell, Table},
};

/// A [`Table`] of backing keys and values presented as visible ones.
///
/// Rows and columns are [`TransformingMap`]s over the wrapped table's rows
/// and columns, so nested maps obtained through
/// [`row_map`](Table::row_map) and [`column_map`](Table::column_map) are live
/// as well.
pub struct TransformingTable<T, RB, CB, VB> {
    backing: T,
    rows: Arc<RB>,
    columns: Arc<CB>,
    values: Arc<VB>,
}

impl<T: Clone, RB, CB, VB> Clone for TransformingTable<T, RB, CB, VB> {
    fn clone(&self) -> Self {
        Self {
            backing: self.backing.clone(),
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            values: self.values.clone(),
        }
    }
}

impl<T, RB, CB, VB> std::fmt::Debug for TransformingTable<T, RB, CB, VB>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformingTable")
            .field("backing", &self.backing)
            .finish_non_exhaustive()
    }
}

impl<T, RB, CB, VB> TransformingTable<T, RB, CB, VB> {
    /// Wraps `backing`, converting row keys, column keys and values through
    /// the given bijections.
    pub fn new(backing: T, rows: RB, columns: CB, values: VB) -> Self {
        Self {
            backing,
            rows: Arc::new(rows),
            columns: Arc::new(columns),
            values: Arc::new(values),
        }
    }

    /// Returns the wrapped table.
    pub const fn backing(&self) -> &T { &self.backing }
}

impl<T, RB, CB, VB> TransformingTable<T, RB, CB, VB>
where
    T: Table,
    RB: Bijection<Backing = T::RowKey>,
    CB: Bijection<Backing = T::ColumnKey>,
    VB: Bijection<Backing = T::Value>,
{
    fn backing_cell_key(
        &self,
        row_key: &RB::Visible,
        column_key: &CB::Visible,
    ) -> Result<Option<(T::RowKey, T::ColumnKey)>> {
        let Some(row_key) = absent_on_conversion(self.rows.to(row_key))? else {
            return Ok(None);
        };
        let Some(column_key) =
            absent_on_conversion(self.columns.to(column_key))?
        else {
            return Ok(None);
        };

        Ok(Some((row_key, column_key)))
    }

    fn backing_cell_key_any(
        &self,
        row_key: &dyn Any,
        column_key: &dyn Any,
    ) -> Result<Option<(T::RowKey, T::ColumnKey)>>
    where
        RB::Visible: 'static,
        CB::Visible: 'static,
    {
        let Some(row_key) = self.rows.to_any(row_key)? else {
            return Ok(None);
        };
        let Some(column_key) = self.columns.to_any(column_key)? else {
            return Ok(None);
        };

        Ok(Some((row_key, column_key)))
    }

    fn from_backing_value(
        &self,
        value: Option<T::Value>,
    ) -> Result<Option<VB::Visible>> {
        value.map(|value| self.values.from(&value)).transpose()
    }

    /// Returns `true` if a cell exists at the given keys, which may be of any
    /// type.
    pub fn contains_any(
        &self,
        row_key: &dyn Any,
        column_key: &dyn Any,
    ) -> Result<bool>
    where
        RB::Visible: 'static,
        CB::Visible: 'static,
    {
        match self.backing_cell_key_any(row_key, column_key)? {
            Some((row_key, column_key)) => {
                self.backing.contains(&row_key, &column_key)
            }
            None => Ok(false),
        }
    }

    /// Returns `true` if `row_key` is a visible row key with at least one
    /// cell.
    pub fn contains_row_any(&self, row_key: &dyn Any) -> Result<bool>
    where
        RB::Visible: 'static,
    {
        match self.rows.to_any(row_key)? {
            Some(row_key) => self.backing.contains_row(&row_key),
            None => Ok(false),
        }
    }

    /// Returns `true` if `column_key` is a visible column key with at least
    /// one cell.
    pub fn contains_column_any(&self, column_key: &dyn Any) -> Result<bool>
    where
        CB::Visible: 'static,
    {
        match self.columns.to_any(column_key)? {
            Some(column_key) => self.backing.contains_column(&column_key),
            None => Ok(false),
        }
    }

    /// Returns `true` if `value` is a visible value stored in some cell.
    pub fn contains_value_any(&self, value: &dyn Any) -> Result<bool>
    where
        VB::Visible: 'static,
    {
        match self.values.to_any(value)? {
            Some(value) => self.backing.contains_value(&value),
            None => Ok(false),
        }
    }

    /// Returns the value at the given keys, which may be of any type.
    pub fn get_any(
        &self,
        row_key: &dyn Any,
        column_key: &dyn Any,
    ) -> Result<Option<VB::Visible>>
    where
        RB::Visible: 'static,
        CB::Visible: 'static,
    {
        let Some((row_key, column_key)) =
            self.backing_cell_key_any(row_key, column_key)?
        else {
            return Ok(None);
        };

        self.from_backing_value(self.backing.get(&row_key, &column_key)?)
    }

    /// Removes the cell at the given keys, which may be of any type.
    pub fn remove_any(
        &self,
        row_key: &dyn Any,
        column_key: &dyn Any,
    ) -> Result<Option<VB::Visible>>
    where
        RB::Visible: 'static,
        CB::Visible: 'static,
    {
        let Some((row_key, column_key)) =
            self.backing_cell_key_any(row_key, column_key)?
        else {
            return Ok(None);
        };

        self.from_backing_value(self.backing.remove(&row_key, &column_key)?)
    }
}

impl<T, RB, CB, VB> TransformingTable<T, RB, CB, VB>
where
    T: Table,
    <T::Row as Map>::Entry: Clone,
    <T::Column as Map>::Entry: Clone,
    RB: Bijection<Backing = T::RowKey>,
    CB: Bijection<Backing = T::ColumnKey>,
    VB: Bijection<Backing = T::Value>,
{
    /// Compares the visible cells with `other`'s, ignoring order.
    pub fn content_eq<O>(&self, other: &O) -> Result<bool>
    where
        O: Table<
                RowKey = RB::Visible,
                ColumnKey = CB::Visible,
                Value = VB::Visible,
            >,
    {
        equality::set_eq(&self.cells(), &other.cells())
    }

    /// Hashes the visible cells independently of order.
    pub fn content_hash(&self) -> Result<u64>
    where
        RB::Visible: std::hash::Hash,
        CB::Visible: std::hash::Hash,
        VB::Visible: std::hash::Hash,
    {
        equality::set_hash(&self.cells())
    }
}

impl<T, RB, CB, VB> Table for TransformingTable<T, RB, CB, VB>
where
    T: Table,
    <T::Row as Map>::Entry: Clone,
    <T::Column as Map>::Entry: Clone,
    RB: Bijection<Backing = T::RowKey>,
    CB: Bijection<Backing = T::ColumnKey>,
    VB: Bijection<Backing = T::Value>,
{
    type RowKey = RB::Visible;
    type ColumnKey = CB::Visible;
    type Value = VB::Visible;
    type Row = TransformingMap<T::Row, CB, VB>;
    type Column = TransformingMap<T::Column, RB, VB>;
    type Cells = TransformingSet<T::Cells, CellBijection<RB, CB, VB>>;
    type RowKeys = TransformingSet<T::RowKeys, Arc<RB>>;
    type ColumnKeys = TransformingSet<T::ColumnKeys, Arc<CB>>;
    type Values = TransformingCollection<T::Values, Arc<VB>>;

    fn contains(
        &self,
        row_key: &RB::Visible,
        column_key: &CB::Visible,
    ) -> Result<bool> {
        match self.backing_cell_key(row_key, column_key)? {
            Some((row_key, column_key)) => {
                self.backing.contains(&row_key, &column_key)
            }
            None => Ok(false),
        }
    }

    fn contains_row(&self, row_key: &RB::Visible) -> Result<bool> {
        match absent_on_conversion(self.rows.to(row_key))? {
            Some(row_key) => self.backing.contains_row(&row_key),
            None => Ok(false),
        }
    }

    fn contains_column(&self, column_key: &CB::Visible) -> Result<bool> {
        match absent_on_conversion(self.columns.to(column_key))? {
            Some(column_key) => self.backing.contains_column(&column_key),
            None => Ok(false),
        }
    }

    fn contains_value(&self, value: &VB::Visible) -> Result<bool> {
        match absent_on_conversion(self.values.to(value))? {
            Some(value) => self.backing.contains_value(&value),
            None => Ok(false),
        }
    }

    fn get(
        &self,
        row_key: &RB::Visible,
        column_key: &CB::Visible,
    ) -> Result<Option<VB::Visible>> {
        let Some((row_key, column_key)) =
            self.backing_cell_key(row_key, column_key)?
        else {
            return Ok(None);
        };

        self.from_backing_value(self.backing.get(&row_key, &column_key)?)
    }

    fn is_empty(&self) -> Result<bool> { self.backing.is_empty() }

    fn len(&self) -> Result<usize> { self.backing.len() }

    fn clear(&self) -> Result<()> { self.backing.clear() }

    fn insert(
        &self,
        row_key: RB::Visible,
        column_key: CB::Visible,
        value: VB::Visible,
    ) -> Result<Option<VB::Visible>> {
        let previous = self.backing.insert(
            self.rows.to(&row_key)?,
            self.columns.to(&column_key)?,
            self.values.to(&value)?,
        )?;

        self.from_backing_value(previous)
    }

    fn remove(
        &self,
        row_key: &RB::Visible,
        column_key: &CB::Visible,
    ) -> Result<Option<VB::Visible>> {
        let Some((row_key, column_key)) =
            self.backing_cell_key(row_key, column_key)?
        else {
            return Ok(None);
        };

        self.from_backing_value(self.backing.remove(&row_key, &column_key)?)
    }

    fn row(&self, row_key: RB::Visible) -> Result<Self::Row> {
        let row = self.backing.row(self.rows.to(&row_key)?)?;

        Ok(TransformingMap::from_shared(
            row,
            self.columns.clone(),
            self.values.clone(),
        ))
    }

    fn column(&self, column_key: CB::Visible) -> Result<Self::Column> {
        let column = self.backing.column(self.columns.to(&column_key)?)?;

        Ok(TransformingMap::from_shared(
            column,
            self.rows.clone(),
            self.values.clone(),
        ))
    }

    fn cells(&self) -> Self::Cells {
        TransformingSet::new(
            self.backing.cells(),
            CellBijection {
                rows: self.rows.clone(),
                columns: self.columns.clone(),
                values: self.values.clone(),
            },
        )
    }

    fn row_keys(&self) -> Self::RowKeys {
        TransformingSet::new(self.backing.row_keys(), self.rows.clone())
    }

    fn column_keys(&self) -> Self::ColumnKeys {
        TransformingSet::new(self.backing.column_keys(), self.columns.clone())
    }

    fn values(&self) -> Self::Values {
        TransformingCollection::new(self.backing.values(), self.values.clone())
    }
}

/// Converts whole cells by converting each of their three parts.
pub struct CellBijection<RB, CB, VB> {
    rows: Arc<RB>,
    columns: Arc<CB>,
    values: Arc<VB>,
}

impl<RB, CB, VB> Clone for CellBijection<RB, CB, VB> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            values: self.values.clone(),
        }
    }
}

impl<RB, CB, VB> std::fmt::Debug for CellBijection<RB, CB, VB> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellBijection").finish_non_exhaustive()
    }
}

impl<RB, CB, VB> Bijection for CellBijection<RB, CB, VB>
where
    RB: Bijection,
    CB: Bijection,
    VB: Bijection,
{
    type Visible = Cell<RB::Visible, CB::Visible, VB::Visible>;
    type Backing = Cell<RB::Backing, CB::Backing, VB::Backing>;

    fn to(&self, cell: &Self::Visible) -> Result<Self::Backing> {
        Ok(Cell::new(
            self.rows.to(cell.row_key())?,
            self.columns.to(cell.column_key())?,
            self.values.to(cell.value())?,
        ))
    }

    fn from(&self, cell: &Self::Backing) -> Result<Self::Visible> {
        Ok(Cell::new(
            self.rows.from(cell.row_key())?,
            self.columns.from(cell.column_key())?,
            self.values.from(cell.value())?,
        ))
    }
}
