//! Identifiers for node instances and node types.

use serde::{Deserialize, Serialize};

/// Index of a node instance within a resource tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw index.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Handle to a declared node type within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeTypeId(pub u32);

impl NodeTypeId {
    /// The abstract base type every registry is seeded with.
    pub const BASE: NodeTypeId = NodeTypeId(0);

    /// Create a new NodeTypeId from a raw index.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Check if this is the abstract base type.
    pub fn is_base(&self) -> bool {
        *self == Self::BASE
    }
}
