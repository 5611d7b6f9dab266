use std::collections::TryReserveError;

use thiserror::Error;

use super::BvhNodeId;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("couldn't allocate memory for the BVH")]
    OutOfMemory(#[from] TryReserveError),

    #[error("too many primitives: got {count}, but at most {max} are supported")]
    TooManyPrimitives { count: usize, max: usize },
}

/// Broken structural invariant, as found by [`crate::Bvh::validate()`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("BVH was built over {expected} primitives, but got {actual}")]
    PrimitiveCountMismatch { expected: usize, actual: usize },

    #[error("index array is not a permutation (at position {position})")]
    InvalidIndex { position: usize },

    #[error("node {node:?} is not allocated")]
    DanglingNode { node: BvhNodeId },

    #[error("node {node:?} is reachable through more than one path")]
    SharedNode { node: BvhNodeId },

    #[error("leaf {node:?} covers {start}..{end}, past the index array")]
    LeafOutOfRange {
        node: BvhNodeId,
        start: usize,
        end: usize,
    },

    #[error("leaf {node:?} overlaps another leaf at position {position}")]
    OverlappingLeaves { node: BvhNodeId, position: usize },

    #[error("position {position} of the index array is not covered by leaves")]
    UncoveredIndex { position: usize },

    #[error("bounds of node {node:?} don't match its contents")]
    LooseBounds { node: BvhNodeId },
}
