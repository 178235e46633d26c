//! The arena-backed B+ tree behind the time index.

use tickdb_common::constants::INDEX_FANOUT;
use tickdb_common::RowId;

use super::node::{InternalNode, LeafNode, Node, NodeId};

/// Statistics about the index structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexStats {
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Number of internal nodes.
    pub internal_count: usize,
    /// Height of the tree (0 = the root is a leaf).
    pub height: usize,
    /// Number of node splits performed.
    pub splits: usize,
}

/// An ordered multimap from `u64` timestamps to [`RowId`]s.
///
/// Duplicate keys are permitted; for equal keys, entries come back in
/// insertion order, which equals ascending row id because the writer
/// inserts rows in commit order.
///
/// Exclusion is the caller's job: the engine holds its reader-writer lock
/// around every index access, so the tree itself is a plain single-writer
/// data structure.
///
/// # Example
///
/// ```rust
/// use tickdb_common::RowId;
/// use tickdb_storage::index::TimeIndex;
///
/// let mut index = TimeIndex::new();
/// index.insert(2000, RowId::new(0));
/// index.insert(1000, RowId::new(1));
///
/// let hits = index.range_query(0, 9999);
/// assert_eq!(hits[0], (1000, RowId::new(1)));
/// assert_eq!(hits[1], (2000, RowId::new(0)));
/// ```
#[derive(Debug)]
pub struct TimeIndex {
    arena: Vec<Node>,
    root: NodeId,
    fanout: usize,
    len: usize,
    stats: IndexStats,
}

impl TimeIndex {
    /// Creates an empty index with the default fanout.
    pub fn new() -> Self {
        Self::with_fanout(INDEX_FANOUT)
    }

    /// Creates an empty index with a custom fanout.
    ///
    /// Small fanouts force deep trees cheaply; the split machinery is the
    /// same at any size.
    pub fn with_fanout(fanout: usize) -> Self {
        assert!(fanout >= 4, "fanout must be at least 4");
        Self {
            arena: vec![Node::Leaf(LeafNode::new())],
            root: NodeId::new(0),
            fanout,
            len: 0,
            stats: IndexStats {
                leaf_count: 1,
                ..IndexStats::default()
            },
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns structural statistics.
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Inserts an entry. Duplicate keys are kept, ordered by insertion.
    pub fn insert(&mut self, key: u64, row: RowId) {
        // Descend to the target leaf, recording the path for splits.
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = self.root;
        loop {
            match &self.arena[current.as_usize()] {
                Node::Internal(node) => {
                    let slot = node.child_for_insert(key);
                    path.push((current, slot));
                    current = node.children[slot];
                }
                Node::Leaf(_) => break,
            }
        }

        let overflow = match &mut self.arena[current.as_usize()] {
            Node::Leaf(leaf) => {
                leaf.insert(key, row);
                leaf.len() >= self.fanout
            }
            Node::Internal(_) => unreachable!("descent ended on an internal node"),
        };
        self.len += 1;

        if overflow {
            self.split_leaf(current, path);
        }
    }

    /// Returns all entries with `lo <= key <= hi`, ascending by key, ties
    /// ascending by row id.
    pub fn range_query(&self, lo: u64, hi: u64) -> Vec<(u64, RowId)> {
        let mut out = Vec::new();
        if lo > hi || self.len == 0 {
            return out;
        }

        // Descend to the leftmost leaf that can hold `lo`, then walk the
        // chain until a key passes `hi`.
        let mut current = self.root;
        loop {
            match &self.arena[current.as_usize()] {
                Node::Internal(node) => {
                    current = node.children[node.child_for_seek(lo)];
                }
                Node::Leaf(_) => break,
            }
        }

        loop {
            let Node::Leaf(leaf) = &self.arena[current.as_usize()] else {
                unreachable!("leaf chain reached an internal node")
            };
            for (i, &key) in leaf.keys.iter().enumerate() {
                if key > hi {
                    return out;
                }
                if key >= lo {
                    out.push((key, leaf.rows[i]));
                }
            }
            if !leaf.next.is_valid() {
                return out;
            }
            current = leaf.next;
        }
    }

    /// Splits an overflowing leaf and propagates separators up the path,
    /// growing a new root when the old one splits.
    fn split_leaf(&mut self, leaf_id: NodeId, path: Vec<(NodeId, usize)>) {
        let right = match &mut self.arena[leaf_id.as_usize()] {
            Node::Leaf(leaf) => leaf.split(),
            Node::Internal(_) => unreachable!("split target is not a leaf"),
        };
        let separator = right.keys[0];
        let right_id = self.alloc(Node::Leaf(right));

        // Chain the split leaf to its new sibling; the sibling already
        // inherited the old forward link, so the chain stays intact.
        match &mut self.arena[leaf_id.as_usize()] {
            Node::Leaf(leaf) => leaf.next = right_id,
            Node::Internal(_) => unreachable!(),
        }
        self.stats.leaf_count += 1;
        self.stats.splits += 1;

        self.propagate_split(leaf_id, separator, right_id, path);
    }

    /// Inserts `(separator, right_id)` into the parents along `path`,
    /// splitting internal nodes as they overflow.
    fn propagate_split(
        &mut self,
        mut left_id: NodeId,
        mut separator: u64,
        mut right_id: NodeId,
        mut path: Vec<(NodeId, usize)>,
    ) {
        loop {
            let Some((parent_id, slot)) = path.pop() else {
                // The root itself split: grow the tree by one level.
                let new_root = InternalNode {
                    keys: vec![separator],
                    children: vec![left_id, right_id],
                };
                self.root = self.alloc(Node::Internal(new_root));
                self.stats.internal_count += 1;
                self.stats.height += 1;
                return;
            };

            let overflow = match &mut self.arena[parent_id.as_usize()] {
                Node::Internal(parent) => {
                    parent.keys.insert(slot, separator);
                    parent.children.insert(slot + 1, right_id);
                    parent.keys.len() >= self.fanout
                }
                Node::Leaf(_) => unreachable!("path node is not internal"),
            };
            if !overflow {
                return;
            }

            let (promoted, right) = match &mut self.arena[parent_id.as_usize()] {
                Node::Internal(parent) => parent.split(),
                Node::Leaf(_) => unreachable!(),
            };
            separator = promoted;
            right_id = self.alloc(Node::Internal(right));
            left_id = parent_id;
            self.stats.internal_count += 1;
            self.stats.splits += 1;
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.arena.len());
        self.arena.push(node);
        id
    }
}

impl Default for TimeIndex {
    fn default() -> Self {
        Self::new()
    }
}
