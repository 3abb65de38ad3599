use std::sync::Arc;

use tabula_storage::{
    RemoteStore, Scan, StoreError, encoding::encode, entity::Entity,
    filter::Filter, remote_store::in_memory::InMemoryStore,
};
use tracing_test::traced_test;

use super::{Fixed, RemoteTable, StringCell};
use crate::{
    Configuration,
    collection::{Collection, Map, MapEntry},
    instrument::{Operation, Statistics},
    table::{Cell, Table},
};

fn s(value: &str) -> String { value.to_owned() }

fn empty_table() -> RemoteTable<InMemoryStore> {
    RemoteTable::new(InMemoryStore::new(), Configuration::for_table("people"))
}

fn people() -> RemoteTable<InMemoryStore> {
    let table = empty_table();

    table.insert(s("alice"), s("age"), s("30")).unwrap();
    table.insert(s("alice"), s("city"), s("paris")).unwrap();
    table.insert(s("bob"), s("age"), s("30")).unwrap();

    table
}

fn sorted<T: Ord>(iter: impl Iterator<Item = crate::Result<T>>) -> Vec<T> {
    let mut items = iter.collect::<crate::Result<Vec<_>>>().unwrap();
    items.sort();
    items
}

#[test]
fn point_operations() {
    let table = empty_table();

    assert_eq!(table.insert(s("alice"), s("age"), s("30")).unwrap(), None);
    assert_eq!(
        table.insert(s("alice"), s("age"), s("31")).unwrap(),
        Some(s("30"))
    );

    assert_eq!(table.get(&s("alice"), &s("age")).unwrap(), Some(s("31")));
    assert_eq!(table.get(&s("alice"), &s("city")).unwrap(), None);
    assert!(table.contains(&s("alice"), &s("age")).unwrap());
    assert!(!table.contains(&s("bob"), &s("age")).unwrap());

    assert_eq!(table.remove(&s("alice"), &s("age")).unwrap(), Some(s("31")));
    assert_eq!(table.remove(&s("alice"), &s("age")).unwrap(), None);
    assert!(table.is_empty().unwrap());
}

#[test]
fn membership_queries_scan_with_filters() {
    let table = people();

    assert!(table.contains_row(&s("bob")).unwrap());
    assert!(!table.contains_row(&s("carol")).unwrap());
    assert!(table.contains_column(&s("city")).unwrap());
    assert!(!table.contains_column(&s("email")).unwrap());
    assert!(table.contains_value(&s("paris")).unwrap());
    assert!(!table.contains_value(&s("london")).unwrap());
    assert_eq!(table.len().unwrap(), 3);
}

#[test]
fn views_observe_later_writes() {
    let table = people();

    let cells = table.cells();
    let row_keys = table.row_keys();
    let alice = table.row(s("alice")).unwrap();

    assert_eq!(cells.len().unwrap(), 3);
    assert_eq!(row_keys.len().unwrap(), 2);
    assert_eq!(alice.len().unwrap(), 2);

    table.insert(s("carol"), s("age"), s("25")).unwrap();
    table.insert(s("alice"), s("email"), s("a@example.com")).unwrap();

    assert_eq!(cells.len().unwrap(), 5);
    assert_eq!(row_keys.len().unwrap(), 3);
    assert_eq!(alice.len().unwrap(), 3);
}

#[test]
fn row_keys_and_column_keys_are_distinct() {
    let table = people();

    assert_eq!(
        sorted(table.row_keys().iter().unwrap()),
        vec![s("alice"), s("bob")]
    );
    assert_eq!(
        sorted(table.column_keys().iter().unwrap()),
        vec![s("age"), s("city")]
    );
    assert!(table.column_keys().contains(&s("city")).unwrap());
    assert!(!table.column_keys().contains(&s("email")).unwrap());

    // values keep duplicates
    assert_eq!(
        sorted(table.values().iter().unwrap()),
        vec![s("30"), s("30"), s("paris")]
    );
    assert_eq!(table.values().len().unwrap(), 3);
}

#[test]
fn clear_removes_every_cell() {
    let table = people();

    table.clear().unwrap();

    assert!(table.is_empty().unwrap());
    assert_eq!(table.store().entity_count("people"), 0);
}

#[test]
fn cell_set_membership_is_value_aware() {
    let table = people();
    let cells = table.cells();

    assert!(cells.contains(&Cell::new(s("alice"), s("age"), s("30"))).unwrap());
    assert!(
        !cells.contains(&Cell::new(s("alice"), s("age"), s("99"))).unwrap()
    );

    // inserting reports whether the key pair was empty
    assert!(cells.insert(Cell::new(s("carol"), s("age"), s("25"))).unwrap());
    assert!(!cells.insert(Cell::new(s("carol"), s("age"), s("26"))).unwrap());
    assert_eq!(table.get(&s("carol"), &s("age")).unwrap(), Some(s("26")));

    // removal goes by key pair alone
    assert!(cells.remove(&Cell::new(s("carol"), s("age"), s("0"))).unwrap());
    assert!(!cells.remove(&Cell::new(s("carol"), s("age"), s("0"))).unwrap());

    let expected: Vec<StringCell> = vec![
        Cell::new(s("alice"), s("age"), s("30")),
        Cell::new(s("alice"), s("city"), s("paris")),
        Cell::new(s("bob"), s("age"), s("30")),
    ];
    assert_eq!(sorted(cells.iter().unwrap()), expected);
    assert!(cells.contains_all(&expected).unwrap());
}

#[test]
fn unsupported_view_operations() {
    let table = people();

    assert!(table.cells().retain_all(&[]).unwrap_err().is_unsupported());
    assert!(table.cells().to_vec().unwrap_err().is_unsupported());
    assert!(table.values().to_vec().unwrap_err().is_unsupported());
    assert!(table.values().insert(s("x")).unwrap_err().is_unsupported());
    assert!(table.row_keys().remove(&s("alice")).unwrap_err().is_unsupported());
    assert!(table.column_keys().clear().unwrap_err().is_unsupported());

    // nothing was touched
    assert_eq!(table.len().unwrap(), 3);
}

#[test]
fn row_view_reads_and_writes_one_row() {
    let table = people();
    let alice = table.row(s("alice")).unwrap();

    assert_eq!(alice.fixed(), &Fixed::Row(s("alice")));
    assert_eq!(alice.get(&s("city")).unwrap(), Some(s("paris")));
    assert!(alice.contains_key(&s("age")).unwrap());
    assert!(alice.contains_value(&s("paris")).unwrap());
    assert!(!alice.contains_value(&s("london")).unwrap());
    assert_eq!(
        sorted(alice.keys().iter().unwrap()),
        vec![s("age"), s("city")]
    );

    assert_eq!(alice.insert(s("email"), s("a@x")).unwrap(), None);
    assert_eq!(table.get(&s("alice"), &s("email")).unwrap(), Some(s("a@x")));

    assert_eq!(alice.remove(&s("age")).unwrap(), Some(s("30")));
    assert!(table.contains(&s("bob"), &s("age")).unwrap());

    alice.clear().unwrap();
    assert!(alice.is_empty().unwrap());
    assert_eq!(table.len().unwrap(), 1);
}

#[test]
fn empty_row_can_be_populated() {
    let table = empty_table();
    let carol = table.row(s("carol")).unwrap();

    assert!(carol.is_empty().unwrap());

    carol.insert(s("age"), s("25")).unwrap();

    assert!(table.contains_row(&s("carol")).unwrap());
    assert_eq!(carol.len().unwrap(), 1);
}

#[test]
fn column_view_is_keyed_by_row() {
    let table = people();
    let ages = table.column(s("age")).unwrap();

    assert_eq!(ages.fixed(), &Fixed::Column(s("age")));
    assert_eq!(ages.len().unwrap(), 2);
    assert_eq!(ages.get(&s("bob")).unwrap(), Some(s("30")));
    assert_eq!(sorted(ages.keys().iter().unwrap()), vec![s("alice"), s("bob")]);
    assert!(ages.values().contains(&s("30")).unwrap());

    ages.insert(s("carol"), s("25")).unwrap();
    assert_eq!(table.get(&s("carol"), &s("age")).unwrap(), Some(s("25")));
}

#[test]
fn entry_set_value_writes_through() {
    let table = people();
    let ages = table.column(s("age")).unwrap();

    let entries = ages.entries();
    let mut bob = entries
        .iter()
        .unwrap()
        .map(Result::unwrap)
        .find(|entry| entry.key() == "bob")
        .unwrap();

    assert_eq!(bob.row_key(), "bob");
    assert_eq!(bob.column_key(), "age");
    assert_eq!(bob.set_value(s("31")).unwrap(), Some(s("30")));
    assert_eq!(bob.value(), "31");
    assert_eq!(table.get(&s("bob"), &s("age")).unwrap(), Some(s("31")));

    // the stale entry is no longer a member
    let alice = entries
        .iter()
        .unwrap()
        .map(Result::unwrap)
        .find(|entry| entry.key() == "alice")
        .unwrap();
    table.insert(s("alice"), s("age"), s("40")).unwrap();
    assert!(!entries.contains(&alice).unwrap());
}

#[test]
fn keys_are_encoded_in_the_store() {
    let table = empty_table();
    let awkward = s("a/b\\c#d?é 日本");

    table.insert(awkward.clone(), s("k/1"), s("v\t\n")).unwrap();

    let entities = table
        .store()
        .scan("people", &Filter::all())
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(entities.len(), 1);
    assert!(!entities[0].partition_key().contains(['/', '\\', '#', '?']));
    assert!(!entities[0].row_key().contains('/'));

    assert_eq!(table.get(&awkward, &s("k/1")).unwrap(), Some(s("v\t\n")));
    assert_eq!(sorted(table.row_keys().iter().unwrap()), vec![awkward]);
}

#[test]
fn undecodable_entities_surface_as_errors() {
    let table = empty_table();

    table
        .store()
        .upsert("people", Entity::new("not base64!", "also not", "nope"))
        .unwrap();

    let error = table.cells().iter().unwrap().next().unwrap().unwrap_err();
    assert!(matches!(error, crate::Error::Encoding(_)));
}

#[test]
fn sizes_fail_like_iteration_on_undecodable_entities() {
    let table = people();

    table
        .store()
        .upsert("people", Entity::new(encode("carol"), encode("age"), "%%"))
        .unwrap();

    let values = table.values();
    assert!(matches!(values.len(), Err(crate::Error::Encoding(_))));
    assert!(values.iter().unwrap().any(|value| value.is_err()));

    assert!(matches!(table.len(), Err(crate::Error::Encoding(_))));

    // keys alone still decode
    assert_eq!(table.row_keys().len().unwrap(), 3);
}

#[test]
fn point_calls_are_reported_to_the_observer() {
    let statistics = Arc::new(Statistics::new());
    let table = RemoteTable::with_observer(
        InMemoryStore::new(),
        Configuration::for_table("people"),
        statistics.clone(),
    );

    table.insert(s("alice"), s("age"), s("30")).unwrap();
    table.get(&s("alice"), &s("age")).unwrap();
    table.remove(&s("alice"), &s("age")).unwrap();

    // creating views performs no remote call
    let _ = (table.cells(), table.row_keys(), table.row(s("alice")).unwrap());

    assert_eq!(statistics.snapshot(Operation::Put).calls, 1);
    assert_eq!(statistics.snapshot(Operation::Get).calls, 2);
    assert_eq!(statistics.snapshot(Operation::Remove).calls, 1);

    table.len().unwrap();
    assert_eq!(statistics.snapshot(Operation::Scan).calls, 0);
}

#[test]
fn scans_are_reported_when_configured() {
    let statistics = Arc::new(Statistics::new());
    let table = RemoteTable::with_observer(
        InMemoryStore::new(),
        Configuration::builder()
            .table_name("people")
            .observe_scans(true)
            .build(),
        statistics.clone(),
    );

    table.len().unwrap();
    table.contains_row(&s("alice")).unwrap();

    assert_eq!(statistics.snapshot(Operation::Scan).calls, 2);
}

/// Deletes the entity on its own before reporting it missing, as if another
/// writer had won the race.
struct RacingStore(InMemoryStore);

impl RemoteStore for RacingStore {
    fn retrieve(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<Entity>, StoreError> {
        self.0.retrieve(table, partition_key, row_key)
    }

    fn upsert(
        &self,
        table: &str,
        entity: Entity,
    ) -> Result<Option<Entity>, StoreError> {
        self.0.upsert(table, entity)
    }

    fn delete(
        &self,
        table: &str,
        entity: &Entity,
    ) -> Result<Entity, StoreError> {
        self.0.delete(table, entity)?;
        Err(StoreError::NotFound)
    }

    fn scan<'s>(
        &'s self,
        table: &str,
        filter: &Filter,
    ) -> Result<Scan<'s>, StoreError> {
        self.0.scan(table, filter)
    }
}

#[test]
#[traced_test]
fn delete_race_reads_as_nothing_removed() {
    let table = RemoteTable::new(
        RacingStore(InMemoryStore::new()),
        Configuration::for_table("people"),
    );

    table.insert(s("alice"), s("age"), s("30")).unwrap();

    assert_eq!(table.remove(&s("alice"), &s("age")).unwrap(), None);
    assert!(!table.contains(&s("alice"), &s("age")).unwrap());
    assert!(logs_contain("entity vanished before it could be deleted"));
}

#[test]
fn display_names_the_table() {
    let table = empty_table();

    assert_eq!(table.to_string(), "remote table `people`");
    assert_eq!(table.cells().to_string(), "cells of remote table `people`");
    assert_eq!(table.table_name(), "people");
}
