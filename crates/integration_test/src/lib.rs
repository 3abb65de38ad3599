//! Shared fixtures for the `tabula` integration tests.
//!
//! The centerpiece is [`FaultyStore`], an [`InMemoryStore`] wrapper that
//! counts every request it receives and can be told to fail them.

#![allow(missing_docs)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use tabula::{
    Configuration, RemoteTable, Table, TypedTable,
    typed::{ParseMarshaller, StringMarshaller},
};
use tabula_storage::{
    RemoteStore, Scan, StoreError, entity::Entity, filter::Filter,
    remote_store::in_memory::InMemoryStore,
};

// ============================================================================
// Fault Injection
// ============================================================================

/// The failure reported by a [`FaultyStore`] whose fault is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("injected {0} fault")]
pub struct InjectedFault(pub &'static str);

/// The number of requests a [`FaultyStore`] has received, per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallCounts {
    pub retrieves: usize,
    pub upserts: usize,
    pub deletes: usize,
    pub scans: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.retrieves + self.upserts + self.deletes + self.scans
    }
}

/// An [`InMemoryStore`] that counts requests and fails on demand.
#[derive(Debug)]
pub struct FaultyStore {
    inner: InMemoryStore,

    fail_retrieves: AtomicBool,
    fail_upserts: AtomicBool,
    fail_deletes: AtomicBool,
    fail_scans: AtomicBool,

    /// Scans yield this many entities before failing; `usize::MAX` disables.
    scan_fault_after: AtomicUsize,

    /// Deletes remove the entity and then report it missing, as if another
    /// writer got there first.
    vanish_on_delete: AtomicBool,

    retrieves: AtomicUsize,
    upserts: AtomicUsize,
    deletes: AtomicUsize,
    scans: AtomicUsize,
}

impl Default for FaultyStore {
    fn default() -> Self { Self::new() }
}

impl FaultyStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            fail_retrieves: AtomicBool::new(false),
            fail_upserts: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            fail_scans: AtomicBool::new(false),
            scan_fault_after: AtomicUsize::new(usize::MAX),
            vanish_on_delete: AtomicBool::new(false),
            retrieves: AtomicUsize::new(0),
            upserts: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            scans: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &InMemoryStore { &self.inner }

    pub fn fail_retrieves(&self, fail: bool) {
        self.fail_retrieves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_scans(&self, fail: bool) {
        self.fail_scans.store(fail, Ordering::SeqCst);
    }

    pub fn fail_scans_after(&self, entities: usize) {
        self.scan_fault_after.store(entities, Ordering::SeqCst);
    }

    pub fn vanish_on_delete(&self, vanish: bool) {
        self.vanish_on_delete.store(vanish, Ordering::SeqCst);
    }

    /// Disarms every fault.
    pub fn heal(&self) {
        self.fail_retrieves(false);
        self.fail_upserts(false);
        self.fail_deletes(false);
        self.fail_scans(false);
        self.fail_scans_after(usize::MAX);
        self.vanish_on_delete(false);
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            retrieves: self.retrieves.load(Ordering::SeqCst),
            upserts: self.upserts.load(Ordering::SeqCst),
            deletes: self.deletes.load(Ordering::SeqCst),
            scans: self.scans.load(Ordering::SeqCst),
        }
    }

    pub fn reset_calls(&self) {
        self.retrieves.store(0, Ordering::SeqCst);
        self.upserts.store(0, Ordering::SeqCst);
        self.deletes.store(0, Ordering::SeqCst);
        self.scans.store(0, Ordering::SeqCst);
    }
}

fn check(armed: &AtomicBool, kind: &'static str) -> Result<(), StoreError> {
    if armed.load(Ordering::SeqCst) {
        Err(StoreError::remote(InjectedFault(kind)))
    } else {
        Ok(())
    }
}

impl RemoteStore for FaultyStore {
    fn retrieve(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<Entity>, StoreError> {
        self.retrieves.fetch_add(1, Ordering::SeqCst);
        check(&self.fail_retrieves, "retrieve")?;

        self.inner.retrieve(table, partition_key, row_key)
    }

    fn upsert(
        &self,
        table: &str,
        entity: Entity,
    ) -> Result<Option<Entity>, StoreError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        check(&self.fail_upserts, "upsert")?;

        self.inner.upsert(table, entity)
    }

    fn delete(
        &self,
        table: &str,
        entity: &Entity,
    ) -> Result<Entity, StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        check(&self.fail_deletes, "delete")?;

        if self.vanish_on_delete.load(Ordering::SeqCst) {
            self.inner.delete(table, entity)?;
            return Err(StoreError::NotFound);
        }

        self.inner.delete(table, entity)
    }

    fn scan<'s>(
        &'s self,
        table: &str,
        filter: &Filter,
    ) -> Result<Scan<'s>, StoreError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        check(&self.fail_scans, "scan")?;

        let fault_after = self.scan_fault_after.load(Ordering::SeqCst);
        let entities = self.inner.scan(table, filter)?;

        Ok(Box::new(entities.enumerate().map(move |(index, entity)| {
            if index >= fault_after {
                Err(StoreError::remote(InjectedFault("scan page")))
            } else {
                entity
            }
        })))
    }
}

// ============================================================================
// Tables
// ============================================================================

pub type PeopleTable = RemoteTable<Arc<FaultyStore>>;

/// Integers as row keys, booleans as column keys, strings as values.
pub type FlagTable = TypedTable<PeopleTable, i32, bool, String>;

pub fn string(value: &str) -> String { value.to_owned() }

/// Creates an empty `people` table over a fresh [`FaultyStore`].
pub fn create_test_table() -> (Arc<FaultyStore>, PeopleTable) {
    let store = Arc::new(FaultyStore::new());
    let table =
        RemoteTable::new(store.clone(), Configuration::for_table("people"));

    (store, table)
}

/// Inserts the three cells every scenario starts from:
///
/// | row   | age | city |
/// |-------|-----|------|
/// | alice | 30  | NYC  |
/// | bob   | 40  |      |
pub fn populate_people(table: &PeopleTable) {
    for (row_key, column_key, value) in
        [("alice", "age", "30"), ("alice", "city", "NYC"), ("bob", "age", "40")]
    {
        table
            .insert(string(row_key), string(column_key), string(value))
            .expect("the store accepts the fixture cells");
    }
}

pub fn create_flag_table(backing: PeopleTable) -> FlagTable {
    TypedTable::from_marshallers(
        backing,
        ParseMarshaller::<i32>::new(),
        ParseMarshaller::<bool>::new(),
        StringMarshaller,
    )
}
