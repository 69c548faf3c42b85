//! In-memory row source.

use super::RowSource;
use crate::errors::{MerkleDiffError, Result};
use crate::value::{Row, Schema};
use std::collections::VecDeque;

/// Serves a fixed list of rows, optionally failing after a given number of them
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    schema: Schema,
    rows: VecDeque<Row>,
    sorted: bool,
    emitted: u64,
    fail_after: Option<(u64, String)>,
}

impl MemorySource {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            schema,
            rows: rows.into(),
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Report `MerkleDiffError::Source` once `rows` rows have been served.
    ///
    /// Lets callers exercise mid-stream failure handling.
    pub fn fail_after(mut self, rows: u64, message: impl Into<String>) -> Self {
        self.fail_after = Some((rows, message.into()));
        self
    }
}

impl RowSource for MemorySource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn is_sorted(&self) -> bool {
        self.sorted
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        let budget_spent = self
            .fail_after
            .as_ref()
            .is_some_and(|(limit, _)| self.emitted >= *limit);
        if budget_spent {
            if let Some((row, message)) = self.fail_after.take() {
                self.rows.clear();
                return Err(MerkleDiffError::Source { row, message });
            }
        }
        let row = self.rows.pop_front();
        if row.is_some() {
            self.emitted += 1;
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::collect_rows;
    use crate::value::Value;

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row::new(i.to_string(), vec![Value::from(i as i64)]))
            .collect()
    }

    #[test]
    fn test_serves_rows_in_order() {
        let mut src = MemorySource::new(Schema::default(), rows(3));
        let collected = collect_rows(&mut src).unwrap();
        assert_eq!(collected, rows(3));
        assert!(src.next_row().unwrap().is_none());
    }

    #[test]
    fn test_fail_after_then_exhausted() {
        let mut src = MemorySource::new(Schema::default(), rows(5)).fail_after(2, "boom");
        assert!(src.next_row().unwrap().is_some());
        assert!(src.next_row().unwrap().is_some());
        assert_eq!(
            src.next_row(),
            Err(MerkleDiffError::Source {
                row: 2,
                message: "boom".into()
            })
        );
        assert_eq!(src.next_row(), Ok(None));
    }

    #[test]
    fn test_collect_propagates_error() {
        let mut src = MemorySource::new(Schema::default(), rows(3)).fail_after(1, "broken pipe");
        let err = collect_rows(&mut src).unwrap_err();
        assert!(matches!(err, MerkleDiffError::Source { row: 1, .. }));
    }

    #[test]
    fn test_sorted_flag() {
        let src = MemorySource::new(Schema::default(), vec![]).sorted(true);
        assert!(src.is_sorted());
    }
}
