//! Lock-step structural comparison of two trees.
//!
//! The entry point is [`compare`]. Node pairs are processed from an explicit
//! work stack, so stack depth does not grow with tree height. The right pair
//! of an internal node is pushed before the left pair, which keeps the
//! output in left-to-right depth-first order.

use crate::diff::model::{DiffKind, KeyRange};
use crate::errors::{MerkleDiffError, Result};
use crate::tree::{MerkleTree, NodeRef};
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Pair of corresponding positions, one per tree
type Frame<'a> = (Option<NodeRef<'a>>, Option<NodeRef<'a>>);

/// Compare two trees and return the key ranges whose content differs.
///
/// For each pair of corresponding nodes, in priority order:
///
/// 1. both absent: nothing
/// 2. only the right node exists: `added` over its range
/// 3. only the left node exists: `removed` over its range
/// 4. equal hashes: nothing
/// 5. both leaves: `changed` over the left leaf's range
/// 6. one leaf, one internal: `changed` over the union of both ranges
/// 7. both internal: recurse into (left, left) then (right, right)
///
/// Ranges are emitted in traversal order, neither sorted nor deduplicated.
///
/// # Errors
///
/// Returns `MerkleDiffError::KeySchemeMismatch` when both trees have a root
/// and their root start keys differ in length. No ranges are produced.
pub fn compare(a: &MerkleTree, b: &MerkleTree) -> Result<Vec<KeyRange>> {
    log_op_start!(
        "compare",
        left_leaves = a.leaf_count(),
        right_leaves = b.leaf_count()
    );
    let start = Instant::now();

    let outcome = check_key_scheme(a, b).map(|()| walk(a.root(), b.root()));

    match outcome {
        Ok((ranges, nodes_visited)) => {
            log_op_end!(
                "compare",
                duration_ms = start.elapsed().as_millis() as u64,
                range_count = ranges.len(),
                nodes_visited = nodes_visited
            );
            Ok(ranges)
        }
        Err(e) => {
            log_op_error!(
                "compare",
                &e,
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

/// An empty tree carries no key scheme, so it is comparable with anything.
fn check_key_scheme(a: &MerkleTree, b: &MerkleTree) -> Result<()> {
    if a.is_empty() || b.is_empty() {
        return Ok(());
    }
    let (left, right) = (a.key_len(), b.key_len());
    if left != right {
        return Err(MerkleDiffError::KeySchemeMismatch { left, right });
    }
    Ok(())
}

fn walk<'a>(a: Option<NodeRef<'a>>, b: Option<NodeRef<'a>>) -> (Vec<KeyRange>, u64) {
    let mut ranges = Vec::new();
    let mut visited = 0u64;
    let mut stack: Vec<Frame<'a>> = vec![(a, b)];

    while let Some(frame) = stack.pop() {
        visited += 1;
        match frame {
            (None, None) => {}
            (None, Some(added)) => ranges.push(covering(added, DiffKind::Added)),
            (Some(removed), None) => ranges.push(covering(removed, DiffKind::Removed)),
            (Some(a), Some(b)) if a.hash() == b.hash() => {}
            (Some(a), Some(b)) => match (a.children(), b.children()) {
                (None, None) => ranges.push(covering(a, DiffKind::Changed)),
                (Some((a_left, a_right)), Some((b_left, b_right))) => {
                    stack.push((Some(a_right), Some(b_right)));
                    stack.push((Some(a_left), Some(b_left)));
                }
                // Structural mismatch: report the union and stop descending
                _ => ranges.push(KeyRange::new(
                    a.start_key().min(b.start_key()),
                    a.end_key().max(b.end_key()),
                    DiffKind::Changed,
                )),
            },
        }
    }

    tracing::debug!(visited, ranges = ranges.len(), "diff walk complete");
    (ranges, visited)
}

fn covering(node: NodeRef<'_>, kind: DiffKind) -> KeyRange {
    KeyRange::new(node.start_key(), node.end_key(), kind)
}
