// Test suite for tree construction and structural diff
// Covers empty builds, odd carry-up, self-diff, additions, structural
// mismatches and the key scheme precondition.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{numbered_rows, text_row};
use merklediff_core::hasher::{hash_leaf, hash_pair};
use merklediff_core::serializer::serialize;
use merklediff_core::{
    build_from_chunks, build_from_rows, compare, DiffKind, DiffStats, KeyRange, MerkleDiffError,
    MerkleTree, Value,
};

#[test]
fn test_empty_inputs_build_no_root() {
    assert!(build_from_rows(&[]).root().is_none());
    assert!(build_from_chunks(Vec::<&[u8]>::new()).root().is_none());
}

#[test]
fn test_self_diff_is_empty() {
    let rows = numbered_rows(37);
    let a = build_from_rows(&rows);
    let b = build_from_rows(&rows);
    assert_eq!(a.root_hash(), b.root_hash());
    assert!(compare(&a, &b).unwrap().is_empty());
}

#[test]
fn test_single_leaf_change() {
    let a = build_from_chunks(["a", "b"]);
    let b = build_from_chunks(["a", "x"]);

    let ranges = compare(&a, &b).unwrap();
    assert_eq!(
        ranges,
        vec![KeyRange::new("chunk-1", "chunk-1", DiffKind::Changed)]
    );
}

#[test]
fn test_change_in_carried_leaf() {
    let a = build_from_chunks(["a", "b", "c"]);
    let b = build_from_chunks(["a", "b", "x"]);

    let ranges = compare(&a, &b).unwrap();
    assert_eq!(
        ranges,
        vec![KeyRange::new("chunk-2", "chunk-2", DiffKind::Changed)]
    );
}

#[test]
fn test_odd_carry_up_shape() {
    let tree = build_from_rows(&[text_row("a", "1"), text_row("b", "2"), text_row("c", "3")]);
    let root = tree.root().unwrap();

    assert_eq!(root.level(), 2);
    assert_eq!(root.start_key(), b"a");
    assert_eq!(root.end_key(), b"c");

    let (ab, c) = root.children().unwrap();
    assert_eq!(ab.level(), 1);
    assert_eq!((ab.start_key(), ab.end_key()), (&b"a"[..], &b"b"[..]));
    assert_eq!(c.level(), 0);
    assert!(c.is_leaf());

    let leaf_c = hash_leaf(&serialize(&[Value::Text("3".into())]));
    assert_eq!(*c.hash(), leaf_c);
    assert_eq!(*root.hash(), hash_pair(ab.hash(), &leaf_c));
}

#[test]
fn test_empty_vs_non_empty_is_one_addition() {
    let rows = numbered_rows(6);
    let filled = build_from_rows(&rows);
    let ranges = compare(&MerkleTree::empty(), &filled).unwrap();

    assert_eq!(ranges, vec![KeyRange::new("1", "6", DiffKind::Added)]);
}

#[test]
fn test_non_empty_vs_empty_is_one_removal() {
    let filled = build_from_rows(&numbered_rows(3));
    let ranges = compare(&filled, &MerkleTree::empty()).unwrap();

    assert_eq!(ranges, vec![KeyRange::new("1", "3", DiffKind::Removed)]);
}

#[test]
fn test_structural_mismatch_reports_union() {
    let a = build_from_chunks(["a"]);
    let b = build_from_chunks(["a", "b"]);

    let ranges = compare(&a, &b).unwrap();
    assert_eq!(
        ranges,
        vec![KeyRange::new("chunk-0", "chunk-1", DiffKind::Changed)]
    );
}

#[test]
fn test_two_vs_four_chunks_reports_change() {
    let a = build_from_chunks(["a", "b"]);
    let b = build_from_chunks(["a", "b", "c", "d"]);

    let ranges = compare(&a, &b).unwrap();
    assert!(!ranges.is_empty());
    assert!(ranges.iter().all(|r| r.kind == DiffKind::Changed));
}

#[test]
fn test_key_scheme_mismatch_aborts() {
    let a = build_from_rows(&[text_row("k1", "v")]);
    let b = build_from_rows(&[text_row("key1", "v")]);

    let err = compare(&a, &b).unwrap_err();
    assert_eq!(err, MerkleDiffError::KeySchemeMismatch { left: 2, right: 4 });
}

#[test]
fn test_changed_row_in_larger_snapshot() {
    let before = numbered_rows(9);
    let mut after = before.clone();
    after[4].values[1] = Value::Text("renamed".into());

    let ranges = compare(&build_from_rows(&before), &build_from_rows(&after)).unwrap();
    assert_eq!(ranges, vec![KeyRange::new("5", "5", DiffKind::Changed)]);

    let stats = DiffStats::from_ranges(&ranges);
    assert_eq!(stats.changed, 1);
    assert_eq!(stats.total(), 1);
}

#[test]
fn test_type_change_is_detected() {
    let a = build_from_rows(&[merklediff_core::Row::new("1", vec![Value::Int(1)])]);
    let b = build_from_rows(&[merklediff_core::Row::new("1", vec![Value::Text("1".into())])]);

    let ranges = compare(&a, &b).unwrap();
    assert_eq!(ranges, vec![KeyRange::new("1", "1", DiffKind::Changed)]);
}

#[test]
fn test_tree_render_is_stable() {
    let tree = build_from_chunks(["a", "b", "c"]);
    assert_eq!(tree.to_string(), tree.clone().to_string());
    assert_eq!(tree.to_string().lines().count(), 2 * tree.node_count());
}
