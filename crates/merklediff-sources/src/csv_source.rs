//! Delimited-text row source.
//!
//! Every field is run through [`infer_value`], so `"42"` hashes as an
//! integer and `"2024-01-01"` as a timestamp. A column's reported type is
//! the first non-text type inferred for it.

use crate::errors::{csv_error, io_error};
use crate::infer::{infer_value, inferred_type};
use crate::key::compose_key;
use merklediff_core::errors::Result;
use merklediff_core::{Column, ColumnType, Row, RowSource, Schema};
use std::fs::File;
use std::io;
use std::path::Path;

/// How a delimited file is parsed and keyed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvConfig {
    /// Column indices forming the key. Empty means `row:<n>` keys.
    pub key_columns: Vec<usize>,
    pub delimiter: u8,
    /// First record holds column names; otherwise columns are `col0`, `col1`, ...
    pub has_header: bool,
    /// Declared key order, reported through `is_sorted`
    pub is_sorted: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            key_columns: Vec::new(),
            delimiter: b',',
            has_header: true,
            is_sorted: false,
        }
    }
}

/// Row source over any delimited reader
pub struct CsvSource<R: io::Read> {
    reader: Option<csv::Reader<R>>,
    config: CsvConfig,
    schema: Schema,
    record: csv::StringRecord,
    row_num: u64,
}

impl CsvSource<File> {
    /// Open a file by path
    ///
    /// # Errors
    ///
    /// Returns `MerkleDiffError::Io` if the file cannot be opened, or
    /// `MerkleDiffError::Source` if the header record is malformed.
    pub fn open(path: impl AsRef<Path>, config: CsvConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| io_error(&format!("open {}", path.display()), &e))?;
        tracing::debug!(path = %path.display(), "opened csv file");
        Self::from_reader(file, config)
    }
}

impl<R: io::Read> CsvSource<R> {
    /// Wrap a reader, consuming the header record when configured
    ///
    /// # Errors
    ///
    /// Returns `MerkleDiffError::Source` if the header record is malformed.
    pub fn from_reader(reader: R, config: CsvConfig) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(config.has_header)
            .from_reader(reader);

        let mut schema = Schema::new(Vec::new(), config.key_columns.clone());
        if config.has_header {
            let headers = reader.headers().map_err(|e| csv_error(0, &e))?;
            schema.columns = headers
                .iter()
                .map(|name| Column::new(name, ColumnType::Text))
                .collect();
        }

        Ok(Self {
            reader: Some(reader),
            config,
            schema,
            record: csv::StringRecord::new(),
            row_num: 0,
        })
    }

    fn key_for_current(&self) -> Vec<u8> {
        compose_key(
            self.config
                .key_columns
                .iter()
                .map(|&idx| self.record.get(idx)),
            self.row_num,
        )
    }
}

impl<R: io::Read> RowSource for CsvSource<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn is_sorted(&self) -> bool {
        self.config.is_sorted
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        match reader.read_record(&mut self.record) {
            Ok(true) => {}
            Ok(false) => {
                self.reader = None;
                return Ok(None);
            }
            Err(e) => {
                self.reader = None;
                return Err(csv_error(self.row_num, &e));
            }
        }

        if self.schema.columns.is_empty() {
            self.schema.columns = (0..self.record.len())
                .map(|i| Column::new(format!("col{}", i), ColumnType::Text))
                .collect();
        }

        let values: Vec<_> = self.record.iter().map(infer_value).collect();
        for (column, value) in self.schema.columns.iter_mut().zip(&values) {
            if column.column_type == ColumnType::Text {
                column.column_type = inferred_type(value);
            }
        }

        let row = Row::new(self.key_for_current(), values);
        self.row_num += 1;
        Ok(Some(row))
    }

    fn close(&mut self) -> Result<()> {
        self.reader = None;
        Ok(())
    }
}
