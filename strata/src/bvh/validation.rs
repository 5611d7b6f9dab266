use super::{BvhIndices, BvhNodeId, BvhNodes, BvhPrimitive, ValidationError};
use crate::BoundingBox;

/// Maximum per-component difference between a node's bounds and the union of
/// its contents.
const TOLERANCE: f32 = 1e-4;

pub fn run<P>(
    nodes: &BvhNodes,
    indices: &BvhIndices,
    root: Option<BvhNodeId>,
    primitives: &[P],
) -> Result<(), ValidationError>
where
    P: BvhPrimitive,
{
    if indices.len() != primitives.len() {
        return Err(ValidationError::PrimitiveCountMismatch {
            expected: indices.len(),
            actual: primitives.len(),
        });
    }

    let mut seen = vec![false; indices.len()];

    for (position, &id) in indices.as_slice().iter().enumerate() {
        match seen.get_mut(id as usize) {
            Some(seen) if !*seen => *seen = true,
            _ => return Err(ValidationError::InvalidIndex { position }),
        }
    }

    // ---

    let mut visited = vec![false; nodes.len()];
    let mut covered = vec![false; indices.len()];
    let mut stack = Vec::from_iter(root);

    while let Some(node_id) = stack.pop() {
        let node = *nodes
            .get(node_id)
            .ok_or(ValidationError::DanglingNode { node: node_id })?;

        if std::mem::replace(&mut visited[node_id.get() as usize], true) {
            return Err(ValidationError::SharedNode { node: node_id });
        }

        let expected = if let Some([left_id, right_id]) = node.children() {
            let mut bounds = BoundingBox::empty();

            for child_id in [left_id, right_id] {
                let child = nodes
                    .get(child_id)
                    .ok_or(ValidationError::DanglingNode { node: child_id })?;

                bounds += child.bounds();
                stack.push(child_id);
            }

            bounds
        } else {
            let range = node.primitives().unwrap_or_default();

            if range.end > indices.len() {
                return Err(ValidationError::LeafOutOfRange {
                    node: node_id,
                    start: range.start,
                    end: range.end,
                });
            }

            for position in range.clone() {
                if std::mem::replace(&mut covered[position], true) {
                    return Err(ValidationError::OverlappingLeaves {
                        node: node_id,
                        position,
                    });
                }
            }

            indices
                .get(range)
                .iter()
                .map(|&id| primitives[id as usize].bounds())
                .collect()
        };

        if !is_tight(node.bounds(), expected) {
            return Err(ValidationError::LooseBounds { node: node_id });
        }
    }

    if let Some(position) = covered.iter().position(|covered| !covered) {
        return Err(ValidationError::UncoveredIndex { position });
    }

    Ok(())
}

fn is_tight(a: BoundingBox, b: BoundingBox) -> bool {
    a.min().abs_diff_eq(b.min(), TOLERANCE)
        && a.max().abs_diff_eq(b.max(), TOLERANCE)
}
