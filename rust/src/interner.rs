//! Dense indexing of node IDs.
//!
//! Maps caller-supplied `NodeId`s to contiguous `u32` indices so the solver can
//! keep per-node state in plain vectors.

use rustc_hash::FxHashMap;

use crate::graph::NodeId;

/// Dense node index (u32 for compact storage and fast hashing).
pub type NodeIndex = u32;

/// Bidirectional `NodeId` <-> `NodeIndex` mapping.
///
/// Indices are handed out in insertion order, so interning a graph's nodes in
/// order makes `NodeIndex` equal to the node's position in the graph.
#[derive(Debug, Clone)]
pub struct NodeInterner {
    to_index: FxHashMap<NodeId, NodeIndex>,
    from_index: Vec<NodeId>,
}

impl NodeInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_index: Vec::with_capacity(capacity),
        }
    }

    /// Intern an ID, returning its index.
    /// If already interned, returns the existing index.
    pub fn intern(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&index) = self.to_index.get(&id) {
            return index;
        }
        let index = self.from_index.len() as NodeIndex;
        self.from_index.push(id);
        self.to_index.insert(id, index);
        index
    }

    /// Intern an ID that must not have been seen before.
    ///
    /// Returns `None` when the ID is already present.
    pub fn insert_new(&mut self, id: NodeId) -> Option<NodeIndex> {
        if self.to_index.contains_key(&id) {
            return None;
        }
        Some(self.intern(id))
    }

    /// Get the index for an ID, if it exists.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<NodeIndex> {
        self.to_index.get(&id).copied()
    }

    /// Get the ID for an index.
    #[inline]
    pub fn resolve(&self, index: NodeIndex) -> Option<NodeId> {
        self.from_index.get(index as usize).copied()
    }

    /// Number of interned IDs.
    pub fn len(&self) -> usize {
        self.from_index.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.from_index.is_empty()
    }
}

impl Default for NodeInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
