use std::{collections::BTreeMap, sync::Arc};

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use tabula_storage::remote_store::in_memory::InMemoryStore;

use super::{
    JsonMarshaller, Marshaller, MarshallerBijection, ParseMarshaller,
    StringMarshaller, TypedTable,
};
use crate::{
    Configuration, RemoteTable,
    collection::{Collection, Map},
    instrument::{Operation, Statistics},
    table::{Cell, Table},
    transforming::Bijection,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Reading {
    celsius: f32,
    sensor: String,
}

fn reading(celsius: f32) -> Reading {
    Reading { celsius, sensor: "north".to_owned() }
}

type Readings = TypedTable<RemoteTable<InMemoryStore>, String, u32, Reading>;

fn readings(backing: RemoteTable<InMemoryStore>) -> Readings {
    TypedTable::from_marshallers(
        backing,
        StringMarshaller,
        ParseMarshaller::<u32>::new(),
        JsonMarshaller::<Reading>::new(),
    )
}

fn backing() -> RemoteTable<InMemoryStore> {
    RemoteTable::new(InMemoryStore::new(), Configuration::for_table("readings"))
}

fn kitchen() -> String { "kitchen".to_owned() }

#[test]
fn parse_marshaller_round_trips_and_rejects_garbage() {
    let marshaller = ParseMarshaller::<u32>::new();

    assert_eq!(marshaller.marshal(&42).unwrap(), "42");
    assert_eq!(marshaller.unmarshal("42").unwrap(), 42);
    assert!(marshaller.unmarshal("forty-two").unwrap_err().is_conversion());
    assert!(marshaller.unmarshal("-1").unwrap_err().is_conversion());
}

#[test]
fn json_marshaller_errors_are_conversion_errors() {
    let marshaller = JsonMarshaller::<Reading>::new();

    let text = marshaller.marshal(&reading(1.5)).unwrap();
    assert_eq!(marshaller.unmarshal(&text).unwrap(), reading(1.5));
    assert!(marshaller.unmarshal("{not json").unwrap_err().is_conversion());

    // JSON object keys must be strings
    let unrepresentable = JsonMarshaller::<BTreeMap<Vec<u8>, u8>>::new();
    let value = BTreeMap::from([(vec![1, 2], 3)]);
    assert!(unrepresentable.marshal(&value).unwrap_err().is_conversion());
}

#[test]
fn marshaller_bijection_rejects_foreign_types() {
    let bijection = MarshallerBijection::new(ParseMarshaller::<u32>::new());

    assert_eq!(bijection.to_any(&7u32).unwrap(), Some("7".to_owned()));
    assert_eq!(bijection.to_any(&7i64).unwrap(), None);
    assert_eq!(bijection.to_any(&"7").unwrap(), None);
}

#[test]
fn typed_table_stores_marshalled_strings() {
    let backing = backing();
    let table = readings(backing.clone());

    assert_eq!(table.insert(kitchen(), 1, reading(21.5)).unwrap(), None);
    assert_eq!(
        table.insert(kitchen(), 1, reading(22.0)).unwrap(),
        Some(reading(21.5))
    );

    assert_eq!(
        backing.get(&kitchen(), &"1".to_owned()).unwrap(),
        Some(r#"{"celsius":22.0,"sensor":"north"}"#.to_owned())
    );

    assert_eq!(table.get(&kitchen(), &1).unwrap(), Some(reading(22.0)));
    assert!(table.contains_row(&kitchen()).unwrap());
    assert!(table.contains_column(&1).unwrap());
    assert!(!table.contains_column(&2).unwrap());
    assert!(table.contains_value(&reading(22.0)).unwrap());

    assert_eq!(table.remove(&kitchen(), &1).unwrap(), Some(reading(22.0)));
    assert!(table.is_empty().unwrap());
}

#[test]
fn typed_views_convert_their_items() {
    let table = readings(backing());

    table.insert(kitchen(), 1, reading(20.0)).unwrap();
    table.insert(kitchen(), 2, reading(21.0)).unwrap();
    table.insert("garage".to_owned(), 1, reading(5.0)).unwrap();

    let mut columns = table
        .column_keys()
        .iter()
        .unwrap()
        .collect::<crate::Result<Vec<_>>>()
        .unwrap();
    columns.sort_unstable();
    assert_eq!(columns, vec![1, 2]);

    let row = table.row(kitchen()).unwrap();
    assert_eq!(row.len().unwrap(), 2);
    assert_eq!(row.get(&2).unwrap(), Some(reading(21.0)));

    row.insert(3, reading(19.0)).unwrap();
    assert_eq!(table.get(&kitchen(), &3).unwrap(), Some(reading(19.0)));

    assert!(
        table
            .cells()
            .contains(&Cell::new("garage".to_owned(), 1, reading(5.0)))
            .unwrap()
    );

    let first = table.column_map().get(&1).unwrap().unwrap();
    assert_eq!(first.len().unwrap(), 2);
    assert_eq!(first.get(&"garage".to_owned()).unwrap(), Some(reading(5.0)));
}

#[test]
fn foreign_probes_never_reach_the_store() {
    let statistics = Arc::new(Statistics::new());
    let table = readings(RemoteTable::with_observer(
        InMemoryStore::new(),
        Configuration::for_table("readings"),
        statistics.clone(),
    ));

    table.insert(kitchen(), 1, reading(20.0)).unwrap();
    statistics.reset();

    assert!(!table.contains_any(&kitchen(), &1i64).unwrap());
    assert!(!table.contains_any(&1u32, &kitchen()).unwrap());
    assert_eq!(table.get_any(&"kitchen", &1u32).unwrap(), None);
    assert_eq!(table.remove_any(&kitchen(), &"1").unwrap(), None);
    assert_eq!(statistics.snapshot(Operation::Get).calls, 0);

    assert!(table.contains_any(&kitchen(), &1u32).unwrap());
    assert_eq!(
        table.get_any(&kitchen(), &1u32).unwrap(),
        Some(reading(20.0))
    );
    assert_eq!(statistics.snapshot(Operation::Get).calls, 2);
}

#[test]
fn undecodable_stored_values_are_conversion_errors() {
    let backing = backing();
    let table = readings(backing.clone());

    backing
        .insert(kitchen(), "1".to_owned(), "{not json".to_owned())
        .unwrap();
    backing.insert(kitchen(), "one".to_owned(), "{}".to_owned()).unwrap();

    assert!(table.get(&kitchen(), &1).unwrap_err().is_conversion());

    let errors = table
        .column_keys()
        .iter()
        .unwrap()
        .filter(|key| key.as_ref().is_err_and(crate::Error::is_conversion))
        .count();
    assert_eq!(errors, 1);
}

#[test]
fn unrepresentable_values_fail_on_write() {
    let table = TypedTable::from_marshallers(
        backing(),
        StringMarshaller,
        StringMarshaller,
        JsonMarshaller::<BTreeMap<Vec<u8>, u8>>::new(),
    );

    let value = BTreeMap::from([(vec![0], 0)]);
    let error = table
        .insert("row".to_owned(), "column".to_owned(), value.clone())
        .unwrap_err();

    assert!(error.is_conversion());
    assert!(table.is_empty().unwrap());

    // reads treat the same value as absent
    assert!(!table.contains_value(&value).unwrap());
}

proptest! {
    #[test]
    fn typed_table_agrees_with_a_local_model(
        writes in prop::collection::vec(
            ("[a-z/ é]{0,6}", 0u32..8, any::<i64>()),
            0..24,
        ),
    ) {
        let table = TypedTable::from_marshallers(
            backing(),
            StringMarshaller,
            ParseMarshaller::<u32>::new(),
            ParseMarshaller::<i64>::new(),
        );
        let mut model = BTreeMap::new();

        for (row_key, column_key, value) in writes {
            let previous = table.insert(row_key.clone(), column_key, value)?;
            prop_assert_eq!(
                previous,
                model.insert((row_key, column_key), value)
            );
        }

        prop_assert_eq!(table.len()?, model.len());

        for ((row_key, column_key), value) in &model {
            prop_assert_eq!(table.get(row_key, column_key)?, Some(*value));
        }

        let mut cells = table
            .cells()
            .iter()?
            .map(|cell| cell.map(Cell::into_parts))
            .collect::<crate::Result<Vec<_>>>()?;
        cells.sort();

        let expected = model
            .into_iter()
            .map(|((row_key, column_key), value)| (row_key, column_key, value))
            .collect::<Vec<_>>();
        prop_assert_eq!(cells, expected);
    }
}
