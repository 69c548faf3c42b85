//! Immutable binary hash tree over keyed leaves.
//!
//! Nodes live in a flat arena owned by [`MerkleTree`]; internal nodes refer to
//! their children by [`NodeId`]. Leaves are stored first, in input order,
//! followed by internal nodes in the order the reduction created them.
//!
//! ## Shape
//!
//! Leaves are paired left to right; each full pair becomes a parent one level
//! up. A trailing unpaired node is carried to the next round unchanged and
//! keeps its level, so the shape depends on the leaf count's parity at every
//! round. Empty input produces a tree with no root.
//!
//! ## Guarantees
//!
//! - **Determinism**: the same leaves in the same order produce the same tree.
//! - **Immutability**: only [`TreeBuilder`] can create nodes; a finished tree
//!   exposes read-only [`NodeRef`] views.

mod builder;
mod node;

pub use builder::{build_from_chunks, build_from_reader, build_from_rows, TreeBuilder};
pub use node::{NodeId, NodeRef};

pub(crate) use node::MerkleNode;

use crate::chunker::Chunker;
use crate::hasher::{to_hex, Digest};
use std::fmt;

/// Root holder and node arena for one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerkleTree {
    nodes: Vec<MerkleNode>,
    root: Option<NodeId>,
    leaf_count: usize,
}

impl MerkleTree {
    /// A tree with no root
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        nodes: Vec<MerkleNode>,
        root: Option<NodeId>,
        leaf_count: usize,
    ) -> Self {
        Self {
            nodes,
            root,
            leaf_count,
        }
    }

    /// Chunk `data` and build a tree over the chunks
    pub fn from_bytes(data: &[u8], chunk_size: usize) -> Self {
        build_from_chunks(Chunker::new(chunk_size).chunk(data))
    }

    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| NodeRef::new(self, id))
    }

    pub fn root_hash(&self) -> Option<&Digest> {
        self.root.map(|id| &self.nodes[id.0].hash)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Level of the root, or 0 for an empty tree
    pub fn height(&self) -> u32 {
        self.root().map_or(0, |r| r.level())
    }

    /// Byte length of the root's start key, or 0 for an empty tree.
    ///
    /// Two trees are only comparable when this agrees.
    pub fn key_len(&self) -> usize {
        self.root().map_or(0, |r| r.start_key().len())
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then(|| NodeRef::new(self, id))
    }

    /// Leaves in input order
    pub fn leaves(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.leaf_count).map(move |i| NodeRef::new(self, NodeId(i)))
    }
}

impl fmt::Display for MerkleTree {
    /// Depth-first listing, one block per node, parents before children.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<NodeRef<'_>> = self.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            writeln!(f, "Hash: {}", to_hex(node.hash()))?;
            writeln!(
                f,
                "Start key: {}, End key: {}, Level: {}",
                String::from_utf8_lossy(node.start_key()),
                String::from_utf8_lossy(node.end_key()),
                node.level()
            )?;
            if let Some((left, right)) = node.children() {
                stack.push(right);
                stack.push(left);
            }
        }
        Ok(())
    }
}
