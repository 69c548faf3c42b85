// Test suite for building trees from row sources
// Streaming builds must match slice builds, and source errors must surface
// unchanged with no tree.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{numbered_rows, numbered_schema};
use merklediff_core::{
    build_from_reader, build_from_rows, collect_rows, MemorySource, MerkleDiffError, RowSource,
};

#[test]
fn test_reader_build_matches_slice_build() {
    let rows = numbered_rows(23);
    let mut source = MemorySource::new(numbered_schema(), rows.clone());

    let streamed = build_from_reader(&mut source).unwrap();
    assert_eq!(streamed, build_from_rows(&rows));
}

#[test]
fn test_empty_reader_builds_empty_tree() {
    let mut source = MemorySource::new(numbered_schema(), vec![]);
    let tree = build_from_reader(&mut source).unwrap();
    assert!(tree.is_empty());
}

#[test]
fn test_reader_error_is_propagated_unchanged() {
    let mut source =
        MemorySource::new(numbered_schema(), numbered_rows(10)).fail_after(4, "connection reset");

    let err = build_from_reader(&mut source).unwrap_err();
    assert_eq!(
        err,
        MerkleDiffError::Source {
            row: 4,
            message: "connection reset".into()
        }
    );
}

#[test]
fn test_boxed_source_is_a_source() {
    let mut source: Box<dyn RowSource> =
        Box::new(MemorySource::new(numbered_schema(), numbered_rows(3)).sorted(true));

    assert!(source.is_sorted());
    assert_eq!(source.schema().columns.len(), 2);
    let tree = build_from_reader(&mut source).unwrap();
    assert_eq!(tree.leaf_count(), 3);
    source.close().unwrap();
}

#[test]
fn test_collect_then_build_matches_stream() {
    let mut first = MemorySource::new(numbered_schema(), numbered_rows(8));
    let mut second = MemorySource::new(numbered_schema(), numbered_rows(8));

    let rows = collect_rows(&mut first).unwrap();
    assert_eq!(
        build_from_rows(&rows),
        build_from_reader(&mut second).unwrap()
    );
}
