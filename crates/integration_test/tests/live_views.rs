//! Views are queries, not snapshots.

use tabula::{Collection, Map, Table};
use tabula_integration_test::{create_test_table, populate_people, string};

#[test]
fn creating_views_issues_no_requests() {
    let (store, table) = create_test_table();
    populate_people(&table);
    store.reset_calls();

    let _cells = table.cells();
    let _row_keys = table.row_keys();
    let _column_keys = table.column_keys();
    let _values = table.values();
    let _row = table.row(string("alice")).unwrap();
    let _column = table.column(string("age")).unwrap();
    let _rows = table.row_map();
    let _columns = table.column_map();

    assert_eq!(store.calls().total(), 0);
}

#[test]
fn every_use_issues_a_fresh_scan() {
    let (store, table) = create_test_table();
    populate_people(&table);

    let cells = table.cells();
    store.reset_calls();

    for _ in 0..3 {
        assert_eq!(cells.len().unwrap(), 3);
    }

    assert_eq!(store.calls().scans, 3);
}

#[test]
fn views_follow_writes_made_elsewhere() {
    let (_, table) = create_test_table();
    populate_people(&table);

    let alice = table.row(string("alice")).unwrap();
    let ages = table.column(string("age")).unwrap();
    let rows = table.row_map();

    // a second handle to the same table
    let other = table.clone();
    other.insert(string("alice"), string("email"), string("a@x")).unwrap();
    other.insert(string("carol"), string("age"), string("25")).unwrap();
    other.remove(&string("bob"), &string("age")).unwrap();

    assert_eq!(alice.len().unwrap(), 3);
    assert_eq!(ages.get(&string("carol")).unwrap(), Some(string("25")));
    assert!(!ages.contains_key(&string("bob")).unwrap());

    let mut row_keys = rows
        .keys()
        .iter()
        .unwrap()
        .collect::<tabula::Result<Vec<_>>>()
        .unwrap();
    row_keys.sort();
    assert_eq!(row_keys, vec![string("alice"), string("carol")]);
}

#[test]
fn writes_through_a_view_are_seen_by_every_view() {
    let (_, table) = create_test_table();
    populate_people(&table);

    let alice = table.row(string("alice")).unwrap();
    let cities = table.column(string("city")).unwrap();

    alice.insert(string("city"), string("LA")).unwrap();
    assert_eq!(cities.get(&string("alice")).unwrap(), Some(string("LA")));

    cities.clear().unwrap();
    assert_eq!(alice.len().unwrap(), 1);
    assert!(!table.column_keys().contains(&string("city")).unwrap());
}

#[test]
fn concurrent_writers_share_one_table() {
    let (_, table) = create_test_table();

    std::thread::scope(|scope| {
        for writer in 0..4 {
            let table = table.clone();

            scope.spawn(move || {
                for column in 0..25 {
                    table
                        .insert(
                            format!("writer-{writer}"),
                            format!("column-{column}"),
                            column.to_string(),
                        )
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(table.len().unwrap(), 100);
    assert_eq!(table.row_keys().len().unwrap(), 4);
    assert_eq!(table.column_keys().len().unwrap(), 25);
}
