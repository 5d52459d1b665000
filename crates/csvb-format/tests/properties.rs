#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Property tests over generated CSV blocks documents

use csvb_format::{CsvbError, ErrorKind, Value, ValueError, parse};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// A generated document plus the number of data rows it contains
#[derive(Debug, Clone)]
struct Document {
    text: String,
    data_rows: usize,
}

/// Cell content for a string column: never empty, never a separator
fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn number_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (-10_000i64..10_000).prop_map(|n| n.to_string()),
        (-1000.0f64..1000.0).prop_map(|n| format!("{n:.3}")),
    ]
}

fn bool_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("true".to_string()),
        Just("no".to_string()),
        Just("Y".to_string()),
        Just("0".to_string()),
    ]
}

/// Data or defaults row for the schema `name,n:n,flag:b`; the name cell is
/// always filled so a row can never read as a separator
fn row() -> impl Strategy<Value = String> {
    (word(), number_cell(), bool_cell()).prop_map(|(name, n, flag)| format!("{name},{n},{flag}"))
}

fn block() -> impl Strategy<Value = (String, Vec<String>)> {
    (row(), prop::collection::vec(row(), 0..6))
}

fn document() -> impl Strategy<Value = Document> {
    (
        prop::collection::vec(row(), 0..4),
        prop::collection::vec(block(), 0..5),
    )
        .prop_map(|(leading, blocks)| {
            let mut lines = vec!["name,n:n,flag:b".to_string()];
            let mut data_rows = leading.len();
            lines.extend(leading);
            for (defaults, rows) in blocks {
                lines.push(String::new());
                lines.push(defaults);
                data_rows += rows.len();
                lines.extend(rows);
            }
            Document {
                text: lines.join("\n"),
                data_rows,
            }
        })
}

/// Every spelling of a boolean synonym with random letter case
fn cased_bool() -> impl Strategy<Value = (String, bool)> {
    let synonyms = prop_oneof![
        Just(("true", true)),
        Just(("t", true)),
        Just(("yes", true)),
        Just(("y", true)),
        Just(("1", true)),
        Just(("false", false)),
        Just(("f", false)),
        Just(("no", false)),
        Just(("n", false)),
        Just(("0", false)),
    ];
    (synonyms, prop::collection::vec(any::<bool>(), 5)).prop_map(|((word, value), upper)| {
        let cased = word
            .chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect();
        (cased, value)
    })
}

proptest! {
    #[test]
    fn one_record_per_data_row(doc in document()) {
        let records = parse(&doc.text).expect("Generated document should parse");
        prop_assert_eq!(records.len(), doc.data_rows);
        for record in &records {
            prop_assert_eq!(record.len(), 3);
            prop_assert!(!record.get("name").expect("name column").is_absent());
        }
    }

    #[test]
    fn parsing_is_repeatable(doc in document()) {
        let first = parse(&doc.text).expect("Generated document should parse");
        let second = parse(&doc.text).expect("Generated document should parse");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn boolean_synonyms_ignore_case((cell, expected) in cased_bool()) {
        let records = parse(&format!("id,flag:b\nx,{cell}\n")).expect("Synonym should parse");
        prop_assert_eq!(records[0].get("flag"), Some(&Value::Boolean(expected)));
    }

    #[test]
    fn defaults_fill_only_empty_cells(default in -500i64..500, value in -500i64..500) {
        let text = format!("k,n:n\n\n,{default}\na,\nb,{value}\n");
        let records = parse(&text).expect("Document should parse");

        prop_assert_eq!(records[0].get("n"), Some(&Value::Number(default as f64)));
        prop_assert_eq!(records[1].get("n"), Some(&Value::Number(value as f64)));
    }
}

#[test]
fn header_with_empty_cell_fails_before_data() {
    let err = parse("a,,c\n1,2,3\n").expect_err("Empty header cell must fail");
    assert_eq!(err.kind(), Some(&ErrorKind::EmptyHeaderCell));
    assert_eq!(err.to_string(), "Unexpected empty header cell. At header.");
}

#[test]
fn invalid_bool_names_value_and_column() {
    let err = parse("id,ok:bool\n\n,\n7,maybe\n").expect_err("Bad bool must fail");

    assert_eq!(
        err.kind(),
        Some(&ErrorKind::Value(ValueError::InvalidBool("maybe".to_string())))
    );
    assert_eq!(
        err.to_string(),
        "Unexpected bool value 'maybe'. At block 1, row 1, column 'ok'."
    );
}

#[test]
fn unknown_type_is_rejected() {
    let err = parse("a:x\n1\n").expect_err("Unknown type must fail");
    assert!(matches!(
        err,
        CsvbError::Located {
            kind: ErrorKind::UnknownType(ref t),
            ..
        } if t == "x"
    ));
}
