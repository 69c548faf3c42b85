//! Bottom-up tree construction.
//!
//! [`TreeBuilder`] accepts leaves one at a time and reduces them pairwise on
//! [`TreeBuilder::finish`]. The `build_from_*` functions are the logged entry
//! points used by callers.
//!
//! ## Logging Ownership
//!
//! `build_from_rows`, `build_from_chunks` and `build_from_reader` emit the
//! start/end events; `TreeBuilder` itself only logs at debug level.

use super::{MerkleNode, MerkleTree, NodeId};
use crate::errors::Result;
use crate::hasher::hash_leaf;
use crate::serializer::Serializer;
use crate::source::RowSource;
use crate::value::Row;
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Incremental leaf collector
#[derive(Debug, Default)]
pub struct TreeBuilder {
    serializer: Serializer,
    leaves: Vec<MerkleNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(leaves: usize) -> Self {
        Self {
            serializer: Serializer::new(),
            leaves: Vec::with_capacity(leaves),
        }
    }

    /// Number of leaves pushed so far
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Add a leaf hashing the canonical encoding of `row.values`
    pub fn push_row(&mut self, row: &Row) {
        let hash = hash_leaf(self.serializer.encode(&row.values));
        self.leaves.push(MerkleNode::leaf(row.key.clone(), hash));
    }

    /// Add a leaf over an already encoded payload
    pub fn push_leaf(&mut self, key: impl Into<Vec<u8>>, payload: &[u8]) {
        self.leaves
            .push(MerkleNode::leaf(key.into(), hash_leaf(payload)));
    }

    /// Add a raw chunk keyed `chunk-<index>` by its position among the leaves
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        let key = format!("chunk-{}", self.leaves.len());
        self.push_leaf(key, chunk);
    }

    /// Reduce the collected leaves into a tree
    pub fn finish(self) -> MerkleTree {
        let leaf_count = self.leaves.len();
        let mut nodes = self.leaves;
        let mut current: Vec<NodeId> = (0..leaf_count).map(NodeId).collect();
        let mut rounds = 0u32;

        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match *pair {
                    [left, right] => {
                        let parent =
                            MerkleNode::parent((left, &nodes[left.0]), (right, &nodes[right.0]));
                        next.push(NodeId(nodes.len()));
                        nodes.push(parent);
                    }
                    // Odd node out advances unchanged
                    [carried] => next.push(carried),
                    _ => unreachable!("chunks(2) yields one or two ids"),
                }
            }
            current = next;
            rounds += 1;
        }

        tracing::debug!(leaf_count, rounds, node_count = nodes.len(), "tree reduced");
        MerkleTree::from_parts(nodes, current.first().copied(), leaf_count)
    }
}

/// Build a tree from keyed rows, in the order given.
///
/// Each leaf hashes the canonical encoding of the row's values; its key range
/// is `[row.key, row.key]`. An empty slice yields a tree with no root.
pub fn build_from_rows(rows: &[Row]) -> MerkleTree {
    log_op_start!("build_from_rows", row_count = rows.len());
    let start = Instant::now();

    let mut builder = TreeBuilder::with_capacity(rows.len());
    for row in rows {
        builder.push_row(row);
    }
    let tree = builder.finish();

    log_op_end!(
        "build_from_rows",
        duration_ms = start.elapsed().as_millis() as u64,
        leaf_count = tree.leaf_count(),
        key_len = tree.key_len()
    );
    tree
}

/// Build a tree from raw byte chunks.
///
/// Leaf `i` is keyed `chunk-<i>` and hashes the chunk bytes directly.
pub fn build_from_chunks<I>(chunks: I) -> MerkleTree
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    log_op_start!("build_from_chunks");
    let start = Instant::now();

    let mut builder = TreeBuilder::new();
    for chunk in chunks {
        builder.push_chunk(chunk.as_ref());
    }
    let tree = builder.finish();

    log_op_end!(
        "build_from_chunks",
        duration_ms = start.elapsed().as_millis() as u64,
        leaf_count = tree.leaf_count()
    );
    tree
}

/// Drain a row source into a tree, one row at a time.
///
/// The source's rows are never copied into an intermediate `Vec<Row>`; the
/// full leaf set is still held until the reduction runs.
///
/// # Errors
///
/// Returns the source's own error unchanged if iteration fails. No partial
/// tree is returned in that case.
pub fn build_from_reader<S>(source: &mut S) -> Result<MerkleTree>
where
    S: RowSource + ?Sized,
{
    log_op_start!("build_from_reader", sorted = source.is_sorted());
    let start = Instant::now();

    let mut builder = TreeBuilder::new();
    loop {
        match source.next_row() {
            Ok(Some(row)) => builder.push_row(&row),
            Ok(None) => break,
            Err(e) => {
                log_op_error!(
                    "build_from_reader",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    rows_read = builder.len()
                );
                return Err(e);
            }
        }
    }
    let tree = builder.finish();

    log_op_end!(
        "build_from_reader",
        duration_ms = start.elapsed().as_millis() as u64,
        leaf_count = tree.leaf_count(),
        key_len = tree.key_len()
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{hash_leaf, hash_pair};
    use crate::serializer::serialize;
    use crate::value::Value;

    fn row(key: &str, v: i64) -> Row {
        Row::new(key, vec![Value::Int(v)])
    }

    #[test]
    fn test_empty_rows_have_no_root() {
        assert!(build_from_rows(&[]).is_empty());
    }

    #[test]
    fn test_empty_chunks_have_no_root() {
        assert!(build_from_chunks(Vec::<Vec<u8>>::new()).is_empty());
    }

    #[test]
    fn test_single_row_is_root_leaf() {
        let tree = build_from_rows(&[row("k", 1)]);
        let root = tree.root().unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.level(), 0);
        assert_eq!(root.start_key(), b"k");
        assert_eq!(root.end_key(), b"k");
        assert_eq!(*root.hash(), hash_leaf(&serialize(&[Value::Int(1)])));
    }

    #[test]
    fn test_two_chunks_root_hash() {
        let tree = build_from_chunks([b"a".as_slice(), b"b".as_slice()]);
        let root = tree.root().unwrap();
        assert_eq!(*root.hash(), hash_pair(&hash_leaf(b"a"), &hash_leaf(b"b")));
        assert_eq!(root.level(), 1);
    }

    #[test]
    fn test_odd_leaf_is_carried_unchanged() {
        let tree = build_from_chunks([b"a".as_slice(), b"b".as_slice(), b"c".as_slice()]);
        let root = tree.root().unwrap();
        assert_eq!(root.level(), 2);
        assert_eq!(root.start_key(), b"chunk-0");
        assert_eq!(root.end_key(), b"chunk-2");

        let (left, right) = root.children().unwrap();
        assert_eq!(left.level(), 1);
        assert_eq!(left.start_key(), b"chunk-0");
        assert_eq!(left.end_key(), b"chunk-1");

        assert!(right.is_leaf());
        assert_eq!(right.level(), 0);
        assert_eq!(*right.hash(), hash_leaf(b"c"));
    }

    #[test]
    fn test_five_leaves_carry_twice() {
        // (((a b)(c d)) e): e is carried through two rounds
        let tree = build_from_chunks(["a", "b", "c", "d", "e"]);
        let root = tree.root().unwrap();
        assert_eq!(root.level(), 3);
        let (left, right) = root.children().unwrap();
        assert_eq!(left.level(), 2);
        assert!(right.is_leaf());
        assert_eq!(right.start_key(), b"chunk-4");
        assert_eq!(tree.node_count(), 5 + 4);
    }

    #[test]
    fn test_rows_keep_input_order() {
        let tree = build_from_rows(&[row("b", 1), row("a", 2)]);
        let root = tree.root().unwrap();
        assert_eq!(root.start_key(), b"b");
        assert_eq!(root.end_key(), b"a");
    }

    #[test]
    fn test_chunk_keys_follow_leaf_position() {
        let mut builder = TreeBuilder::new();
        builder.push_leaf("first", b"x");
        builder.push_chunk(b"y");
        let tree = builder.finish();
        let keys: Vec<&[u8]> = tree.leaves().map(|n| n.start_key()).collect();
        assert_eq!(keys, vec![&b"first"[..], b"chunk-1"]);
    }

    #[test]
    fn test_builder_matches_build_from_rows() {
        let rows = vec![row("1", 10), row("2", 20), row("3", 30)];
        let mut builder = TreeBuilder::new();
        for r in &rows {
            builder.push_row(r);
        }
        assert_eq!(builder.finish(), build_from_rows(&rows));
    }
}
