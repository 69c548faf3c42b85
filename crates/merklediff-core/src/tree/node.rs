//! Arena node storage and the read-only node view.

use super::MerkleTree;
use crate::hasher::{hash_pair, Digest};
use std::fmt;

/// Index of a node inside its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stored node. Only the builder creates these; the public surface is [`NodeRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MerkleNode {
    pub(crate) hash: Digest,
    pub(crate) start_key: Vec<u8>,
    pub(crate) end_key: Vec<u8>,
    pub(crate) level: u32,
    pub(crate) children: Option<(NodeId, NodeId)>,
}

impl MerkleNode {
    pub(crate) fn leaf(key: Vec<u8>, hash: Digest) -> Self {
        Self {
            hash,
            start_key: key.clone(),
            end_key: key,
            level: 0,
            children: None,
        }
    }

    pub(crate) fn parent(
        (left_id, left): (NodeId, &MerkleNode),
        (right_id, right): (NodeId, &MerkleNode),
    ) -> Self {
        Self {
            hash: hash_pair(&left.hash, &right.hash),
            start_key: left.start_key.clone(),
            end_key: right.end_key.clone(),
            level: 1 + left.level.max(right.level),
            children: Some((left_id, right_id)),
        }
    }
}

/// Borrowed, read-only view of one node in a [`MerkleTree`]
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a MerkleTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a MerkleTree, id: NodeId) -> Self {
        Self { tree, id }
    }

    fn node(&self) -> &'a MerkleNode {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn hash(&self) -> &'a Digest {
        &self.node().hash
    }

    /// First key covered by this node (inclusive)
    pub fn start_key(&self) -> &'a [u8] {
        &self.node().start_key
    }

    /// Last key covered by this node (inclusive)
    pub fn end_key(&self) -> &'a [u8] {
        &self.node().end_key
    }

    /// 0 for leaves, `1 + max(child levels)` otherwise
    pub fn level(&self) -> u32 {
        self.node().level
    }

    pub fn is_leaf(&self) -> bool {
        self.node().children.is_none()
    }

    pub fn children(&self) -> Option<(NodeRef<'a>, NodeRef<'a>)> {
        self.node()
            .children
            .map(|(l, r)| (NodeRef::new(self.tree, l), NodeRef::new(self.tree, r)))
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.children().map(|(l, _)| l)
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.children().map(|(_, r)| r)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id.0)
            .field("hash", &hex::encode(self.hash()))
            .field("start_key", &String::from_utf8_lossy(self.start_key()))
            .field("end_key", &String::from_utf8_lossy(self.end_key()))
            .field("level", &self.level())
            .finish()
    }
}
