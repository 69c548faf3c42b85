//! Resolution of differing key ranges into row-level changes.
//!
//! The diff engine reports ranges; this module looks the keys inside each
//! range up on both sides and classifies them. Two rows are equal when their
//! values have the same canonical encoding, the same rule the tree hashes by.

use merklediff_core::core_types::ComparisonContext;
use merklediff_core::{serialize, Column, DiffKind, KeyRange, Row, Schema, Value};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

/// Old and new value of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub from: Value,
    pub to: Value,
}

/// One added, removed or changed row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub key: String,
    /// Differing fields by column name (changed rows only)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldChange>,
    /// Full row values (added and removed rows only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub total: usize,
}

impl Summary {
    pub fn from_changes(changes: &[Change]) -> Self {
        let mut summary = changes.iter().fold(Self::default(), |mut s, c| {
            match c.kind {
                DiffKind::Added => s.added += 1,
                DiffKind::Removed => s.removed += 1,
                DiffKind::Changed => s.changed += 1,
            }
            s
        });
        summary.total = summary.added + summary.removed + summary.changed;
        summary
    }
}

/// Full comparison result as rendered to users
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub comparison_id: String,
    pub source_a: String,
    pub source_b: String,
    pub rows_a: usize,
    pub rows_b: usize,
    pub schema: Vec<Column>,
    pub identical: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<Change>,
    pub summary: Summary,
}

pub fn build_report(
    context: &ComparisonContext,
    rows_a: &[Row],
    rows_b: &[Row],
    schema: &Schema,
    ranges: &[KeyRange],
) -> Report {
    let changes = collect_changes(ranges, rows_a, rows_b, schema);
    Report {
        comparison_id: context.comparison_id.to_string(),
        source_a: context.left_label.clone(),
        source_b: context.right_label.clone(),
        rows_a: rows_a.len(),
        rows_b: rows_b.len(),
        schema: schema.columns.clone(),
        identical: changes.is_empty(),
        summary: Summary::from_changes(&changes),
        changes,
    }
}

type RowIndex<'a> = BTreeMap<&'a [u8], &'a Row>;

fn index(rows: &[Row]) -> RowIndex<'_> {
    // Later duplicates win
    rows.iter().map(|r| (r.key.as_slice(), r)).collect()
}

/// Resolve every range to row changes, sorted by key.
///
/// Keys present on one side only are reported even when no range covers
/// them. Each key is reported at most once.
pub fn collect_changes(
    ranges: &[KeyRange],
    rows_a: &[Row],
    rows_b: &[Row],
    schema: &Schema,
) -> Vec<Change> {
    let map_a = index(rows_a);
    let map_b = index(rows_b);
    let mut processed: BTreeSet<&[u8]> = BTreeSet::new();
    let mut changes = Vec::new();

    for range in ranges {
        let (lo, hi) = range.ordered_bounds();
        let bounds = (Bound::Included(lo), Bound::Included(hi));
        let keys: BTreeSet<&[u8]> = map_a
            .range::<&[u8], _>(bounds)
            .chain(map_b.range::<&[u8], _>(bounds))
            .map(|(k, _)| *k)
            .collect();

        for key in keys {
            if processed.insert(key) {
                let change = classify(
                    key,
                    map_a.get(key).copied(),
                    map_b.get(key).copied(),
                    schema,
                );
                changes.extend(change);
            }
        }
    }

    for (key, row) in &map_b {
        if !processed.contains(key) && !map_a.contains_key(key) {
            changes.extend(classify(key, None, Some(*row), schema));
        }
    }
    for (key, row) in &map_a {
        if !processed.contains(key) && !map_b.contains_key(key) {
            changes.extend(classify(key, Some(*row), None, schema));
        }
    }

    changes.sort_by(|a, b| a.key.cmp(&b.key));
    changes
}

fn classify(key: &[u8], a: Option<&Row>, b: Option<&Row>, schema: &Schema) -> Option<Change> {
    let key = String::from_utf8_lossy(key).into_owned();
    match (a, b) {
        (None, Some(b)) => Some(Change {
            kind: DiffKind::Added,
            key,
            fields: BTreeMap::new(),
            values: b.values.clone(),
        }),
        (Some(a), None) => Some(Change {
            kind: DiffKind::Removed,
            key,
            fields: BTreeMap::new(),
            values: a.values.clone(),
        }),
        (Some(a), Some(b)) if serialize(&a.values) != serialize(&b.values) => Some(Change {
            kind: DiffKind::Changed,
            key,
            fields: field_diff(schema, a, b),
            values: Vec::new(),
        }),
        _ => None,
    }
}

/// Fields whose canonical encodings differ; a field missing on one side
/// shows as null there.
fn field_diff(schema: &Schema, a: &Row, b: &Row) -> BTreeMap<String, FieldChange> {
    let width = a.values.len().max(b.values.len());
    (0..width)
        .filter_map(|i| {
            let from = a.values.get(i).cloned().unwrap_or(Value::Null);
            let to = b.values.get(i).cloned().unwrap_or(Value::Null);
            let differs = serialize(std::slice::from_ref(&from))
                != serialize(std::slice::from_ref(&to));
            differs.then(|| (schema.column_name(i), FieldChange { from, to }))
        })
        .collect()
}
