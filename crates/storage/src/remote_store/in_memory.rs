//! A simple in-memory remote store implementation.

use std::{
    collections::BTreeMap,
    sync::{Arc, OnceLock},
};

use bon::Builder;
use dashmap::DashMap;
use fxhash::FxBuildHasher;
use parking_lot::RwLock;

use crate::{
    entity::Entity,
    error::StoreError,
    filter::Filter,
    remote_store::{RemoteStore, Scan},
};

/// The rows of one table, ordered by `(partition_key, row_key)`.
type Rows = BTreeMap<(String, String), String>;

/// The shard count of the table directory when none is configured.
///
/// Tables are looked up on every request, from any thread, so the directory
/// gets a few shards per available core. Always a power of two greater than
/// one.
fn directory_shard_amount() -> usize {
    static SHARD_AMOUNT: OnceLock<usize> = OnceLock::new();

    *SHARD_AMOUNT.get_or_init(|| {
        let cores =
            std::thread::available_parallelism().map_or(1, usize::from);
        (cores * 4).next_power_of_two().max(2)
    })
}

/// Configuration options for an [`InMemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Builder)]
pub struct Configuration {
    /// The number of shards of the table directory.
    ///
    /// Must be a power of two greater than one.
    #[builder(default = directory_shard_amount())]
    pub shard_amount: usize,
}

/// An in-memory implementation of [`RemoteStore`].
///
/// Each table is an ordered map guarded by its own lock, so that requests
/// against different tables never contend. A lock is held only for the
/// duration of one request: [`scan`](RemoteStore::scan) copies the matching
/// page out before returning, which mirrors a remote store answering a query
/// with a materialized result.
///
/// Reading a table that was never written behaves like reading an empty
/// table. Cloning the store yields another handle to the same tables.
#[derive(Debug, Clone)]
pub struct InMemoryStore(Arc<Impl>);

#[derive(Debug)]
struct Impl {
    tables: DashMap<String, Arc<RwLock<Rows>>, FxBuildHasher>,
}

impl InMemoryStore {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_configuration(Configuration::builder().build())
    }

    /// Creates an empty store with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if `configuration.shard_amount` is not a power of two greater
    /// than one.
    #[must_use]
    pub fn with_configuration(configuration: Configuration) -> Self {
        Self(Arc::new(Impl {
            tables: DashMap::with_capacity_and_hasher_and_shard_amount(
                0,
                FxBuildHasher::default(),
                configuration.shard_amount,
            ),
        }))
    }

    /// Returns the names of every table that has been written to.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.0.tables.iter().map(|table| table.key().clone()).collect()
    }

    /// Returns the number of entities stored in `table`.
    #[must_use]
    pub fn entity_count(&self, table: &str) -> usize {
        self.table(table).map_or(0, |rows| rows.read().len())
    }

    fn table(&self, table: &str) -> Option<Arc<RwLock<Rows>>> {
        self.0.tables.get(table).map(|rows| rows.value().clone())
    }

    fn table_or_create(&self, table: &str) -> Arc<RwLock<Rows>> {
        if let Some(rows) = self.table(table) {
            return rows;
        }

        self.0.tables.entry(table.to_owned()).or_default().value().clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self { Self::new() }
}

impl RemoteStore for InMemoryStore {
    fn retrieve(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<Entity>, StoreError> {
        let Some(rows) = self.table(table) else {
            return Ok(None);
        };

        let key = (partition_key.to_owned(), row_key.to_owned());
        let value = rows.read().get(&key).cloned();

        Ok(value.map(|value| Entity::new(key.0, key.1, value)))
    }

    fn upsert(
        &self,
        table: &str,
        entity: Entity,
    ) -> Result<Option<Entity>, StoreError> {
        let rows = self.table_or_create(table);
        let (partition_key, row_key, value) = entity.into_parts();

        let previous = rows
            .write()
            .insert((partition_key.clone(), row_key.clone()), value);

        Ok(previous.map(|value| Entity::new(partition_key, row_key, value)))
    }

    fn delete(
        &self,
        table: &str,
        entity: &Entity,
    ) -> Result<Entity, StoreError> {
        let Some(rows) = self.table(table) else {
            return Err(StoreError::NotFound);
        };

        let key =
            (entity.partition_key().to_owned(), entity.row_key().to_owned());
        let removed = rows.write().remove(&key).ok_or(StoreError::NotFound)?;

        Ok(Entity::new(key.0, key.1, removed))
    }

    fn scan<'s>(
        &'s self,
        table: &str,
        filter: &Filter,
    ) -> Result<Scan<'s>, StoreError> {
        let Some(rows) = self.table(table) else {
            return Ok(Box::new(std::iter::empty()));
        };

        let to_entity = |((partition_key, row_key), value): (
            &(String, String),
            &String,
        )| {
            Entity::new(partition_key.clone(), row_key.clone(), value.clone())
        };

        let page = {
            let rows = rows.read();

            match filter.partition_key() {
                // rows are ordered by partition key first, so a single
                // partition is a contiguous range
                Some(partition_key) => rows
                    .range((partition_key.to_owned(), String::new())..)
                    .take_while(|((candidate, _), _)| {
                        candidate == partition_key
                    })
                    .map(to_entity)
                    .filter(|entity| filter.matches(entity))
                    .collect::<Vec<_>>(),

                None => rows
                    .iter()
                    .map(to_entity)
                    .filter(|entity| filter.matches(entity))
                    .collect::<Vec<_>>(),
            }
        };

        tracing::trace!(table, matched = page.len(), "in-memory scan");

        Ok(Box::new(page.into_iter().map(Ok)))
    }
}
