//! Remote Store Abstraction Layer.
//!
//! This module provides the [`RemoteStore`] trait the table layer is written
//! against.

use std::sync::Arc;

use crate::{entity::Entity, error::StoreError, filter::Filter};

pub mod in_memory;

/// A lazy sequence of entities returned by [`RemoteStore::scan`].
///
/// The sequence is finite and is not restartable once consumed. Dropping it
/// early issues no further requests.
pub type Scan<'a> =
    Box<dyn Iterator<Item = Result<Entity, StoreError>> + Send + 'a>;

/// The main interface for a remote two-dimensional table store.
///
/// This trait abstracts over concrete table services, allowing the table
/// layer to work with any backend that can address a record by
/// `(partition key, row key)` and scan a table with simple equality filters.
///
/// Every method is a single synchronous request. Implementations must not
/// retry or cache on the caller's behalf; a failure is reported through the
/// returned [`StoreError`] and the caller decides what to do with it.
///
/// All keys and values crossing this boundary are already encoded (see
/// [`encoding`](crate::encoding)).
pub trait RemoteStore: Send + Sync {
    /// Retrieves the entity stored at `(partition_key, row_key)`.
    ///
    /// Returns `Ok(None)` if there is no such entity.
    fn retrieve(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<Entity>, StoreError>;

    /// Inserts or replaces an entity.
    ///
    /// Returns the entity previously stored under the same key pair, if any.
    fn upsert(
        &self,
        table: &str,
        entity: Entity,
    ) -> Result<Option<Entity>, StoreError>;

    /// Deletes the entity addressed by `entity`'s key pair.
    ///
    /// Returns the deleted entity, or [`StoreError::NotFound`] if nothing was
    /// stored under that key pair when the request reached the store.
    fn delete(
        &self,
        table: &str,
        entity: &Entity,
    ) -> Result<Entity, StoreError>;

    /// Scans a table, yielding the entities that match `filter`.
    ///
    /// Each call issues a fresh request; two scans are not guaranteed to
    /// observe the same state.
    fn scan<'s>(
        &'s self,
        table: &str,
        filter: &Filter,
    ) -> Result<Scan<'s>, StoreError>;
}

impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    fn retrieve(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<Entity>, StoreError> {
        (**self).retrieve(table, partition_key, row_key)
    }

    fn upsert(
        &self,
        table: &str,
        entity: Entity,
    ) -> Result<Option<Entity>, StoreError> {
        (**self).upsert(table, entity)
    }

    fn delete(
        &self,
        table: &str,
        entity: &Entity,
    ) -> Result<Entity, StoreError> {
        (**self).delete(table, entity)
    }

    fn scan<'s>(
        &'s self,
        table: &str,
        filter: &Filter,
    ) -> Result<Scan<'s>, StoreError> {
        (**self).scan(table, filter)
    }
}
