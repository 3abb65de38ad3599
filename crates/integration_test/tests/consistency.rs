//! Property tests: every view of a table agrees with a local model.

use std::collections::BTreeMap;

use proptest::prelude::*;
use tabula::{Collection, Map, MapEntry, Table};
use tabula_integration_test::create_test_table;

#[derive(Debug, Clone)]
enum Step {
    Insert(String, String, String),
    Remove(String, String),
}

fn key() -> impl Strategy<Value = String> {
    prop_oneof![Just("a"), Just("b/c"), Just("日本"), Just("d?#"), Just("")]
        .prop_map(str::to_owned)
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (key(), key(), "[a-z0-9]{0,3}")
            .prop_map(|(row, column, value)| Step::Insert(row, column, value)),
        1 => (key(), key()).prop_map(|(row, column)| Step::Remove(row, column)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn views_match_the_model(steps in prop::collection::vec(step(), 0..32)) {
        let (_, table) = create_test_table();
        let mut model = BTreeMap::<(String, String), String>::new();

        for step in steps {
            match step {
                Step::Insert(row, column, value) => {
                    let previous = table.insert(
                        row.clone(),
                        column.clone(),
                        value.clone(),
                    )?;
                    prop_assert_eq!(
                        previous,
                        model.insert((row, column), value)
                    );
                }
                Step::Remove(row, column) => {
                    let removed = table.remove(&row, &column)?;
                    prop_assert_eq!(removed, model.remove(&(row, column)));
                }
            }
        }

        // the cell set is exactly the model
        let mut cells = table
            .cells()
            .iter()?
            .map(|cell| cell.map(tabula::Cell::into_parts))
            .collect::<tabula::Result<Vec<_>>>()?;
        cells.sort();

        let expected = model
            .iter()
            .map(|((row, column), value)| {
                (row.clone(), column.clone(), value.clone())
            })
            .collect::<Vec<_>>();
        prop_assert_eq!(&cells, &expected);
        prop_assert_eq!(table.len()?, model.len());

        // contains agrees with get, and both with the model
        for (row, column, value) in &cells {
            prop_assert!(table.contains(row, column)?);
            let stored = table.get(row, column)?;
            prop_assert_eq!(stored.as_ref(), Some(value));
        }

        // the row map regroups the cells, the column map is its transpose
        let rows = table.row_map();
        let columns = table.column_map();
        let mut regrouped = Vec::new();

        for entry in rows.entries().iter()? {
            let entry = entry?;

            for cell in entry.value().entries().iter()? {
                let cell = cell?;
                regrouped.push((
                    entry.key().clone(),
                    cell.key().clone(),
                    cell.value().clone(),
                ));

                let column = columns.get(cell.key())?;
                prop_assert!(column.is_some());

                let transposed = match column {
                    Some(column) => column.get(entry.key())?,
                    None => None,
                };
                prop_assert_eq!(transposed.as_ref(), Some(cell.value()));
            }
        }

        regrouped.sort();
        prop_assert_eq!(regrouped, expected);
    }
}
