//! Node IDs and ranges for the flat tree.
//!
//! Children are `NodeId(u32)` indices into the arena instead of boxes, and
//! child lists are `NodeRange`s into a flattened side table. Unchanged
//! subtrees keep their ids across a rewrite, which is what makes structural
//! sharing observable.

use std::fmt;

/// Index into the node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Invalid node ID (sentinel value).
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a valid ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Range of nodes in the flattened child list.
///
/// Layout: start u32 + len u16. Child lists never exceed `u16::MAX` entries
/// in emitted modules.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(C)]
pub struct NodeRange {
    pub start: u32,
    pub len: u16,
}

impl NodeRange {
    /// Empty range.
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, len: u16) -> Self {
        NodeRange { start, len }
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes in the range.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NodeRange({}..{})",
            self.start,
            self.start + u32::from(self.len)
        )
    }
}

impl Default for NodeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_sentinel() {
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId::new(0).is_valid());
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn range_len() {
        let range = NodeRange::new(4, 3);
        assert_eq!(range.len(), 3);
        assert!(!range.is_empty());
        assert!(NodeRange::EMPTY.is_empty());
    }
}
