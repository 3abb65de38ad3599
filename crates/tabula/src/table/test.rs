use tabula_storage::remote_store::in_memory::InMemoryStore;

use super::{Cell, Table};
use crate::{
    Configuration, RemoteTable,
    collection::{Collection, Map, MapEntry},
};

fn table() -> RemoteTable<InMemoryStore> {
    let table = RemoteTable::new(
        InMemoryStore::new(),
        Configuration::for_table("grid"),
    );

    for (row_key, column_key, value) in
        [("r1", "c1", "a"), ("r1", "c2", "b"), ("r2", "c1", "c")]
    {
        table
            .insert(row_key.to_owned(), column_key.to_owned(), value.to_owned())
            .unwrap();
    }

    table
}

fn s(value: &str) -> String { value.to_owned() }

#[test]
fn cell_parts_and_transpose() {
    let cell = Cell::new(1, 'x', "v");

    assert_eq!(
        (cell.row_key(), cell.column_key(), cell.value()),
        (&1, &'x', &"v")
    );
    assert_eq!(cell.transpose(), Cell::new('x', 1, "v"));
    assert_eq!(cell.into_parts(), (1, 'x', "v"));
}

#[test]
fn transposed_swaps_roles() {
    let table = table();
    let transposed = table.clone().transpose();

    assert_eq!(transposed.get(&s("c2"), &s("r1")).unwrap(), Some(s("b")));
    assert!(transposed.contains_row(&s("c1")).unwrap());
    assert!(!transposed.contains_row(&s("r1")).unwrap());
    assert!(transposed.contains_column(&s("r2")).unwrap());

    transposed.insert(s("c3"), s("r3"), s("d")).unwrap();
    assert_eq!(table.get(&s("r3"), &s("c3")).unwrap(), Some(s("d")));

    let cells = transposed.cells();
    assert!(cells.contains(&Cell::new(s("c1"), s("r2"), s("c"))).unwrap());
    assert_eq!(cells.len().unwrap(), 4);

    let column = transposed.row(s("c1")).unwrap();
    assert_eq!(column.get(&s("r2")).unwrap(), Some(s("c")));

    assert_eq!(transposed.remove(&s("c3"), &s("r3")).unwrap(), Some(s("d")));
    assert_eq!(transposed.into_inner().len().unwrap(), 3);
}

#[test]
fn row_map_groups_cells_by_row() {
    let table = table();
    let rows = table.row_map();

    assert_eq!(rows.len().unwrap(), 2);
    assert!(rows.contains_key(&s("r2")).unwrap());
    assert!(rows.get(&s("r3")).unwrap().is_none());

    let r1 = rows.get(&s("r1")).unwrap().unwrap();
    assert_eq!(r1.len().unwrap(), 2);
    assert_eq!(r1.get(&s("c2")).unwrap(), Some(s("b")));

    // nested rows are live views of the table
    r1.insert(s("c3"), s("e")).unwrap();
    assert_eq!(table.get(&s("r1"), &s("c3")).unwrap(), Some(s("e")));

    assert!(rows.contains_value(&table.row(s("r2")).unwrap()).unwrap());
    assert!(!rows.contains_value(&table.row(s("r9")).unwrap()).unwrap());
}

#[test]
fn row_map_rejects_whole_row_writes() {
    let table = table();
    let rows = table.row_map();
    let row = table.row(s("r1")).unwrap();

    assert!(rows.insert(s("r5"), row.clone()).unwrap_err().is_unsupported());
    assert!(rows.remove(&s("r1")).unwrap_err().is_unsupported());

    let entries = rows.entries();
    let mut entry = entries.iter().unwrap().next().unwrap().unwrap();
    assert!(entry.set_value(row).unwrap_err().is_unsupported());
}

#[test]
fn row_map_entries_and_values() {
    let table = table();
    let rows = table.row_map();

    let mut keys = rows
        .entries()
        .iter()
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (entry.key().clone(), entry.value().len().unwrap())
        })
        .collect::<Vec<_>>();
    keys.sort();

    assert_eq!(keys, vec![(s("r1"), 2), (s("r2"), 1)]);

    let values = rows.values();
    assert_eq!(values.len().unwrap(), 2);
    assert!(values.contains(&table.row(s("r2")).unwrap()).unwrap());

    rows.clear().unwrap();
    assert!(table.is_empty().unwrap());
}

#[test]
fn column_map_is_the_transposed_row_map() {
    let table = table();
    let columns = table.column_map();

    assert_eq!(columns.len().unwrap(), 2);

    let c1 = columns.get(&s("c1")).unwrap().unwrap();
    assert_eq!(c1.get(&s("r1")).unwrap(), Some(s("a")));
    assert_eq!(c1.get(&s("r2")).unwrap(), Some(s("c")));

    let c2 = columns.get(&s("c2")).unwrap().unwrap();
    assert_eq!(c2.len().unwrap(), 1);
}

#[test]
fn insert_all_copies_every_cell() {
    let source = table();
    let target = RemoteTable::new(
        InMemoryStore::new(),
        Configuration::for_table("copy"),
    );

    target.insert(s("r1"), s("c1"), s("old")).unwrap();
    target.insert_all(&source).unwrap();

    assert_eq!(target.len().unwrap(), 3);
    assert_eq!(target.get(&s("r1"), &s("c1")).unwrap(), Some(s("a")));
}
