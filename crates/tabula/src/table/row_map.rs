use crate::{
    collection::{Collection, Iter, Map, MapEntry, Set, equality},
    error::{Error, Result},
    table::Table,
};

/// Every row of a table, as a map from row key to [`Table::Row`].
///
/// The map is a live view: it holds the table, not its contents, and each
/// call reads the table again. Rows handed out are the table's own row views,
/// so writing into them writes into the table.
///
/// A row cannot be stored as a single value, so [`Map::insert`],
/// [`Map::remove`] and [`MapEntry::set_value`] are unsupported. Rows are
/// modified through the row views themselves.
#[derive(Debug, Clone)]
pub struct RowMap<T>(T);

impl<T> RowMap<T> {
    /// Creates the row map of `table`.
    pub const fn new(table: T) -> Self { Self(table) }

    /// Returns the underlying table.
    pub const fn table(&self) -> &T { &self.0 }
}

/// Collects the current row keys so that rows can be produced lazily after
/// the key scan has finished.
fn row_keys_of<T: Table>(table: &T) -> Result<Vec<T::RowKey>> {
    let keys = table.row_keys();
    keys.iter()?.collect()
}

fn has_row_equal_to<T>(table: &T, row: &T::Row) -> Result<bool>
where
    T: Table,
    T::Value: PartialEq,
{
    let keys = table.row_keys();

    for key in keys.iter()? {
        if equality::map_eq(&table.row(key?)?, row)? {
            return Ok(true);
        }
    }

    Ok(false)
}

impl<T> Map for RowMap<T>
where
    T: Table + Clone,
    T::RowKey: Clone,
    T::Value: PartialEq,
{
    type Key = T::RowKey;
    type Value = T::Row;
    type Keys = T::RowKeys;
    type Values = RowMapValues<T>;
    type Entry = RowMapEntry<T>;
    type Entries = RowMapEntries<T>;

    fn len(&self) -> Result<usize> { self.0.row_keys().len() }

    fn is_empty(&self) -> Result<bool> { self.0.row_keys().is_empty() }

    fn get(&self, row_key: &T::RowKey) -> Result<Option<T::Row>> {
        if !self.0.contains_row(row_key)? {
            return Ok(None);
        }

        Ok(Some(self.0.row(row_key.clone())?))
    }

    fn contains_key(&self, row_key: &T::RowKey) -> Result<bool> {
        self.0.contains_row(row_key)
    }

    fn contains_value(&self, row: &T::Row) -> Result<bool> {
        has_row_equal_to(&self.0, row)
    }

    fn insert(&self, _: T::RowKey, _: T::Row) -> Result<Option<T::Row>> {
        Err(Error::unsupported("insert into a row map"))
    }

    fn remove(&self, _: &T::RowKey) -> Result<Option<T::Row>> {
        Err(Error::unsupported("remove from a row map"))
    }

    fn clear(&self) -> Result<()> { self.0.clear() }

    fn keys(&self) -> T::RowKeys { self.0.row_keys() }

    fn values(&self) -> RowMapValues<T> { RowMapValues(self.0.clone()) }

    fn entries(&self) -> RowMapEntries<T> { RowMapEntries(self.0.clone()) }
}

/// The rows of a [`RowMap`].
#[derive(Debug, Clone)]
pub struct RowMapValues<T>(T);

impl<T> Collection for RowMapValues<T>
where
    T: Table,
    T::Value: PartialEq,
{
    type Item = T::Row;

    fn len(&self) -> Result<usize> { self.0.row_keys().len() }

    fn is_empty(&self) -> Result<bool> { self.0.row_keys().is_empty() }

    fn contains(&self, row: &T::Row) -> Result<bool> {
        has_row_equal_to(&self.0, row)
    }

    fn iter(&self) -> Result<Iter<'_, T::Row>> {
        let keys = row_keys_of(&self.0)?;
        Ok(Box::new(keys.into_iter().map(move |key| self.0.row(key))))
    }

    fn insert(&self, _: T::Row) -> Result<bool> {
        Err(Error::unsupported("insert into row map values"))
    }

    fn remove(&self, _: &T::Row) -> Result<bool> {
        Err(Error::unsupported("remove from row map values"))
    }

    fn clear(&self) -> Result<()> { self.0.clear() }

    fn retain_all(&self, _: &[T::Row]) -> Result<bool> {
        Err(Error::unsupported("retain_all on row map values"))
    }
}

/// The entries of a [`RowMap`].
#[derive(Debug, Clone)]
pub struct RowMapEntries<T>(T);

impl<T> Collection for RowMapEntries<T>
where
    T: Table,
    T::RowKey: Clone,
    T::Value: PartialEq,
{
    type Item = RowMapEntry<T>;

    fn len(&self) -> Result<usize> { self.0.row_keys().len() }

    fn is_empty(&self) -> Result<bool> { self.0.row_keys().is_empty() }

    fn contains(&self, entry: &RowMapEntry<T>) -> Result<bool> {
        if !self.0.contains_row(&entry.key)? {
            return Ok(false);
        }

        equality::map_eq(&self.0.row(entry.key.clone())?, &entry.row)
    }

    fn iter(&self) -> Result<Iter<'_, RowMapEntry<T>>> {
        let keys = row_keys_of(&self.0)?;

        Ok(Box::new(keys.into_iter().map(move |key| {
            Ok(RowMapEntry { row: self.0.row(key.clone())?, key })
        })))
    }

    fn insert(&self, _: RowMapEntry<T>) -> Result<bool> {
        Err(Error::unsupported("insert into row map entries"))
    }

    fn remove(&self, _: &RowMapEntry<T>) -> Result<bool> {
        Err(Error::unsupported("remove from row map entries"))
    }

    fn clear(&self) -> Result<()> { self.0.clear() }

    fn retain_all(&self, _: &[RowMapEntry<T>]) -> Result<bool> {
        Err(Error::unsupported("retain_all on row map entries"))
    }
}

impl<T> Set for RowMapEntries<T>
where
    T: Table,
    T::RowKey: Clone,
    T::Value: PartialEq,
{
}

/// A row key together with its row.
pub struct RowMapEntry<T: Table> {
    key: T::RowKey,
    row: T::Row,
}

impl<T> std::fmt::Debug for RowMapEntry<T>
where
    T: Table<RowKey: std::fmt::Debug, Row: std::fmt::Debug>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowMapEntry")
            .field("key", &self.key)
            .field("row", &self.row)
            .finish()
    }
}

impl<T: Table> MapEntry for RowMapEntry<T> {
    type Key = T::RowKey;
    type Value = T::Row;

    fn key(&self) -> &T::RowKey { &self.key }

    fn value(&self) -> &T::Row { &self.row }

    fn set_value(&mut self, _: T::Row) -> Result<Option<T::Row>> {
        Err(Error::unsupported("set_value on a row map entry"))
    }
}
