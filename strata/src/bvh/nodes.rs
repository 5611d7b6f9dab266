use std::collections::TryReserveError;
use std::ops;

use super::{BvhNode, BvhNodeId};

/// Fixed-capacity pool of nodes.
///
/// Nodes are bump-allocated and never freed individually; children always
/// come as an adjacent pair.
#[derive(Clone, Debug, Default)]
pub struct BvhNodes {
    nodes: Vec<BvhNode>,
    capacity: usize,
}

impl BvhNodes {
    /// Preallocates a pool for a tree over `primitive_count` primitives.
    ///
    /// With `padding` set, slot zero is left unused so that the root lives at
    /// an odd slot and every child pair starts at an even one.
    pub fn new(
        primitive_count: usize,
        padding: bool,
    ) -> Result<Self, TryReserveError> {
        let capacity = if primitive_count == 0 {
            0
        } else {
            2 * primitive_count - 1 + (padding as usize)
        };

        let mut nodes = Vec::new();

        nodes.try_reserve_exact(capacity)?;

        if padding && capacity > 0 {
            nodes.push(BvhNode::default());
        }

        Ok(Self { nodes, capacity })
    }

    pub fn alloc_root(&mut self, node: BvhNode) -> BvhNodeId {
        assert!(self.has_room_for(1), "node pool is full");

        self.push(node)
    }

    /// Allocates two adjacent nodes, returning id of the first one; returns
    /// `None` when the pool is full.
    pub fn alloc_pair(
        &mut self,
        left: BvhNode,
        right: BvhNode,
    ) -> Option<BvhNodeId> {
        if !self.has_room_for(2) {
            return None;
        }

        let left_id = self.push(left);

        self.push(right);

        Some(left_id)
    }

    pub fn has_room_for(&self, count: usize) -> bool {
        self.nodes.len() + count <= self.capacity
    }

    /// Number of allocated slots, including the padding one.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, id: BvhNodeId) -> Option<&BvhNode> {
        self.nodes.get(id.get() as usize)
    }

    pub fn as_slice(&self) -> &[BvhNode] {
        &self.nodes
    }

    fn push(&mut self, node: BvhNode) -> BvhNodeId {
        self.nodes.push(node);

        BvhNodeId::new((self.nodes.len() - 1) as u32)
    }
}

impl ops::Index<BvhNodeId> for BvhNodes {
    type Output = BvhNode;

    fn index(&self, index: BvhNodeId) -> &Self::Output {
        &self.nodes[index.get() as usize]
    }
}

impl ops::IndexMut<BvhNodeId> for BvhNodes {
    fn index_mut(&mut self, index: BvhNodeId) -> &mut Self::Output {
        &mut self.nodes[index.get() as usize]
    }
}
