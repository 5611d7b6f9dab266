use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::BoundingBox;

/// A single node of the tree, laid out as two 16-byte rows so that a pair of
/// siblings fills one cache line.
///
/// `count == 0` marks an internal node whose children live at `first` and
/// `first + 1`; otherwise this is a leaf covering `count` entries of the
/// index array, starting at `first`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct BvhNode {
    min: Vec3,
    first: u32,
    max: Vec3,
    count: u32,
}

impl BvhNode {
    pub fn leaf(bounds: BoundingBox, first: u32, count: u32) -> Self {
        assert!(count > 0, "leaves must contain at least one primitive");

        Self {
            min: bounds.min(),
            first,
            max: bounds.max(),
            count,
        }
    }

    pub fn internal(bounds: BoundingBox, left_id: BvhNodeId) -> Self {
        Self {
            min: bounds.min(),
            first: left_id.get(),
            max: bounds.max(),
            count: 0,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.min, self.max)
    }

    pub fn is_leaf(&self) -> bool {
        self.count > 0
    }

    pub fn is_internal(&self) -> bool {
        !self.is_leaf()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Range of the index array covered by this leaf.
    pub fn primitives(&self) -> Option<Range<usize>> {
        self.is_leaf().then(|| {
            let start = self.first as usize;

            start..(start + self.count as usize)
        })
    }

    pub fn children(&self) -> Option<[BvhNodeId; 2]> {
        self.is_internal().then(|| {
            let left_id = BvhNodeId::new(self.first);

            [left_id, left_id.sibling()]
        })
    }

    /// Cost of keeping this node as a leaf.
    pub fn sah_cost(&self) -> f32 {
        (self.count as f32) * self.bounds().area()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BvhNodeId(u32);

impl BvhNodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Id of the right child, given id of the left one.
    pub fn sibling(&self) -> Self {
        Self::new(self.0 + 1)
    }
}
