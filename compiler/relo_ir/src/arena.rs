//! Arena allocation for the flat tree.
//!
//! Contiguous storage for all nodes of one emitted file. Storage is
//! append-only: a rewrite allocates replacement nodes at fresh ids while
//! every untouched subtree keeps its original id, so structural sharing
//! between the input and output trees falls out of the representation.

use std::fmt;

use crate::ast::{Node, NodeKind, QuoteKind};
use crate::{Name, NodeId, NodeRange, Span};

/// Contiguous storage for all nodes in one emitted file.
#[derive(Clone, Default)]
pub struct ModuleArena {
    /// All nodes (indexed by `NodeId`).
    nodes: Vec<Node>,

    /// Flattened child lists (for arrays, call args, statement lists, etc.).
    node_lists: Vec<NodeId>,
}

impl ModuleArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with estimated capacity based on emitted-text size.
    /// Heuristic: ~1 node per 20 bytes of text.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated = source_len / 20;
        ModuleArena {
            nodes: Vec::with_capacity(estimated),
            node_lists: Vec::with_capacity(estimated / 2),
        }
    }

    /// Allocate a node, returning its ID.
    #[inline]
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let Ok(index) = u32::try_from(self.nodes.len()) else {
            unreachable!("node arena capacity exceeded");
        };
        let id = NodeId::new(index);
        self.nodes.push(node);
        id
    }

    /// Allocate a child list, returning its range.
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = NodeId>) -> NodeRange {
        let Ok(start) = u32::try_from(self.node_lists.len()) else {
            unreachable!("node list capacity exceeded");
        };
        self.node_lists.extend(ids);
        let Ok(len) = u16::try_from(self.node_lists.len() - start as usize) else {
            unreachable!("child list longer than u16::MAX");
        };
        NodeRange::new(start, len)
    }

    /// Get a node by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node's kind by ID.
    #[inline]
    #[track_caller]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    /// Get a node's span by ID.
    #[inline]
    #[track_caller]
    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).span
    }

    /// Get a child list by range.
    #[inline]
    pub fn list(&self, range: NodeRange) -> &[NodeId] {
        let start = range.start as usize;
        &self.node_lists[start..start + range.len()]
    }

    /// If `id` is a string literal, its cooked value and quote kind.
    #[inline]
    pub fn string_literal(&self, id: NodeId) -> Option<(Name, QuoteKind)> {
        match self.kind(id) {
            NodeKind::String { value, quote } => Some((*value, *quote)),
            _ => None,
        }
    }

    /// Number of nodes (replacement nodes included once a rewrite ran).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl fmt::Debug for ModuleArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ModuleArena({} nodes, {} list entries)",
            self.nodes.len(),
            self.node_lists.len()
        )
    }
}
