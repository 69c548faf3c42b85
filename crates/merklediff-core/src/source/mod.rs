//! Row-source contract consumed by the tree builder.
//!
//! A source yields keyed rows one at a time together with the schema that
//! describes them. Sources may block on I/O inside [`RowSource::next_row`];
//! the builder applies no retries or timeouts.

mod memory;

pub use memory::MemorySource;

use crate::errors::Result;
use crate::value::{Row, Schema};

/// A forward-only producer of keyed rows
pub trait RowSource {
    /// Column metadata. Sources that infer types may refine this as rows are read.
    fn schema(&self) -> &Schema;

    /// Whether rows are declared to arrive in key order. Not verified.
    fn is_sorted(&self) -> bool;

    /// Advance to the next row.
    ///
    /// Returns `Ok(None)` at end of input. After an error the source is
    /// exhausted and keeps returning `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the source's iteration error, typically `MerkleDiffError::Source`.
    fn next_row(&mut self) -> Result<Option<Row>>;

    /// Release underlying resources early. Dropping the source also releases them.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying handle reports one on close.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn schema(&self) -> &Schema {
        (**self).schema()
    }

    fn is_sorted(&self) -> bool {
        (**self).is_sorted()
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        (**self).next_row()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Drain every remaining row from `source`.
///
/// # Errors
///
/// Propagates the first iteration error unchanged; rows read before it are
/// discarded.
pub fn collect_rows<S>(source: &mut S) -> Result<Vec<Row>>
where
    S: RowSource + ?Sized,
{
    let mut rows = Vec::new();
    while let Some(row) = source.next_row()? {
        rows.push(row);
    }
    tracing::debug!(row_count = rows.len(), "source drained");
    Ok(rows)
}
