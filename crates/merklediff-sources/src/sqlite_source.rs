//! SQLite row source.
//!
//! Reads a table (optionally filtered and ordered) or an arbitrary query.
//! The statement runs once, on the first `next_row`, and its single cursor is
//! drained into a buffer that later calls pop from. A failure partway through
//! is reported after the rows read before it.
//!
//! Column types come from the declared column types using SQLite's affinity
//! rules. Queries over expressions carry no declared type and report
//! `unknown`; their values are still typed by storage class.

use crate::errors::{from_rusqlite, invalid_config, sqlite_row_error};
use crate::infer::parse_timestamp;
use crate::key::compose_key;
use merklediff_core::errors::{MerkleDiffError, Result};
use merklediff_core::{Column, ColumnType, Row, RowSource, Schema, Value};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::collections::VecDeque;
use std::path::PathBuf;

/// What to read from a SQLite database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    pub path: PathBuf,
    /// Table to read with `SELECT *`. Exclusive with `query`.
    pub table: Option<String>,
    /// Custom query, used verbatim. Exclusive with `table`.
    pub query: Option<String>,
    /// Column names forming the key, matched case-insensitively
    pub key_columns: Vec<String>,
    /// Optional `WHERE` clause body (table mode only)
    pub where_clause: Option<String>,
    /// Optional `ORDER BY` clause body; defaults to the key columns (table mode only)
    pub order_by: Option<String>,
}

impl SqliteConfig {
    pub fn table(path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            table: Some(table.into()),
            query: None,
            key_columns: Vec::new(),
            where_clause: None,
            order_by: None,
        }
    }

    pub fn query(path: impl Into<PathBuf>, query: impl Into<String>) -> Self {
        Self {
            table: None,
            query: Some(query.into()),
            ..Self::table(path, String::new())
        }
    }

    pub fn with_key_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Human-readable label for reports
    pub fn label(&self) -> String {
        let target = match (&self.table, &self.query) {
            (Some(table), _) => table.clone(),
            (None, Some(_)) => "query".to_string(),
            (None, None) => "?".to_string(),
        };
        format!("{}:{}", self.path.display(), target)
    }

    /// The statement for the full result, plus whether it imposes an order
    fn base_query(&self) -> Result<(String, bool)> {
        match (&self.table, &self.query) {
            (Some(_), Some(_)) => Err(invalid_config("table and query are mutually exclusive")),
            (None, None) => Err(invalid_config("either a table or a query is required")),
            (None, Some(query)) => Ok((query.trim().trim_end_matches(';').to_string(), false)),
            (Some(table), None) => {
                let mut sql = format!("SELECT * FROM {}", table);
                if let Some(filter) = &self.where_clause {
                    sql.push_str(" WHERE ");
                    sql.push_str(filter);
                }
                let order = self
                    .order_by
                    .clone()
                    .or_else(|| (!self.key_columns.is_empty()).then(|| self.key_columns.join(", ")));
                let sorted = order.is_some();
                if let Some(order) = order {
                    sql.push_str(" ORDER BY ");
                    sql.push_str(&order);
                }
                Ok((sql, sorted))
            }
        }
    }
}

/// Row source over a SQLite table or query
pub struct SqliteSource {
    conn: Option<Connection>,
    sql: String,
    schema: Schema,
    sorted: bool,
    buffer: VecDeque<Row>,
    /// Error hit while draining, returned once the buffer runs dry
    pending: Option<MerkleDiffError>,
    executed: bool,
}

impl SqliteSource {
    /// Open the database read-only and resolve the result schema
    ///
    /// # Errors
    ///
    /// - `MerkleDiffError::InvalidInput` for inconsistent configuration or an
    ///   unknown key column
    /// - `MerkleDiffError::Persistence` if the database cannot be opened or
    ///   the statement does not prepare
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        let (sql, sorted) = config.base_query()?;

        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(from_rusqlite)?;

        let columns: Vec<Column> = {
            let stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
            stmt.columns()
                .iter()
                .map(|c| Column::new(c.name(), affinity_type(c.decl_type())))
                .collect()
        };

        let key_columns = config
            .key_columns
            .iter()
            .map(|name| {
                columns
                    .iter()
                    .position(|c| c.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| invalid_config(format!("key column '{}' not found", name)))
            })
            .collect::<Result<Vec<usize>>>()?;

        tracing::debug!(
            source = %config.label(),
            columns = columns.len(),
            sorted,
            "opened sqlite source"
        );

        Ok(Self {
            conn: Some(conn),
            sql,
            schema: Schema::new(columns, key_columns),
            sorted,
            buffer: VecDeque::new(),
            pending: None,
            executed: false,
        })
    }

    /// Run the statement and buffer every row it yields
    fn execute(&mut self) {
        self.executed = true;
        let Some(conn) = self.conn.as_ref() else {
            return;
        };

        let mut rows = VecDeque::new();
        if let Err(e) = drain(conn, &self.sql, &self.schema, &mut rows) {
            self.pending = Some(sqlite_row_error(rows.len() as u64, &e));
        }
        tracing::debug!(
            rows = rows.len(),
            failed = self.pending.is_some(),
            "sqlite result drained"
        );
        self.buffer = rows;
    }
}

/// Step one cursor over `sql`, appending converted rows to `out`
fn drain(
    conn: &Connection,
    sql: &str,
    schema: &Schema,
    out: &mut VecDeque<Row>,
) -> std::result::Result<(), rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;

    while let Some(row) = rows.next()? {
        let values = schema
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| row.get_ref(i).map(|v| convert(v, column.column_type)))
            .collect::<std::result::Result<Vec<Value>, _>>()?;

        let rendered: Vec<String> = schema
            .key_columns
            .iter()
            .map(|&i| values.get(i).map(ToString::to_string).unwrap_or_default())
            .collect();
        let key = compose_key(
            rendered.iter().map(|s| Some(s.as_str())),
            out.len() as u64,
        );

        out.push_back(Row::new(key, values));
    }
    Ok(())
}

impl RowSource for SqliteSource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn is_sorted(&self) -> bool {
        self.sorted
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        if !self.executed {
            self.execute();
        }
        if let Some(row) = self.buffer.pop_front() {
            return Ok(Some(row));
        }
        match self.pending.take() {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.executed = true;
        self.buffer.clear();
        self.pending = None;
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, e)| from_rusqlite(e)),
            None => Ok(()),
        }
    }
}

/// Map a declared column type to a column type using SQLite affinity rules
fn affinity_type(decl: Option<&str>) -> ColumnType {
    let Some(decl) = decl else {
        return ColumnType::Unknown;
    };
    let decl = decl.to_ascii_uppercase();
    if decl.contains("INT") {
        ColumnType::Int
    } else if ["CHAR", "CLOB", "TEXT"].iter().any(|t| decl.contains(t)) {
        ColumnType::Text
    } else if decl.contains("BLOB") {
        ColumnType::Bytes
    } else if ["REAL", "FLOA", "DOUB"].iter().any(|t| decl.contains(t)) {
        ColumnType::Float
    } else if decl.contains("BOOL") {
        ColumnType::Bool
    } else if decl.contains("DATE") || decl.contains("TIME") {
        ColumnType::Timestamp
    } else if decl.contains("NUM") || decl.contains("DEC") {
        ColumnType::Float
    } else {
        ColumnType::Unknown
    }
}

/// Convert one stored value, guided by the declared column type
fn convert(value: ValueRef<'_>, column_type: ColumnType) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) if column_type == ColumnType::Bool => Value::Bool(i != 0),
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(x) => Value::Float(x),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes).into_owned();
            if column_type == ColumnType::Timestamp {
                if let Some(ts) = parse_timestamp(&text) {
                    return Value::Timestamp(ts);
                }
            }
            Value::Text(text)
        }
        ValueRef::Blob(bytes) => Value::Bytes(bytes.to_vec()),
    }
}
