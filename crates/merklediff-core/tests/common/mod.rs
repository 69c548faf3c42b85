// Shared fixtures for merklediff-core integration tests

use merklediff_core::{Column, ColumnType, Row, Schema, Value};

/// Rows keyed `"1"`, `"2"`, ... with an int id and a text name column
#[allow(dead_code)]
pub fn numbered_rows(count: usize) -> Vec<Row> {
    (1..=count)
        .map(|i| {
            Row::new(
                i.to_string(),
                vec![Value::Int(i as i64), Value::Text(format!("name-{}", i))],
            )
        })
        .collect()
}

/// Two-column schema matching `numbered_rows`
#[allow(dead_code)]
pub fn numbered_schema() -> Schema {
    Schema::new(
        vec![
            Column::new("id", ColumnType::Int),
            Column::new("name", ColumnType::Text),
        ],
        vec![0],
    )
}

/// Single-value row helper
#[allow(dead_code)]
pub fn text_row(key: &str, value: &str) -> Row {
    Row::new(key, vec![Value::Text(value.to_string())])
}
