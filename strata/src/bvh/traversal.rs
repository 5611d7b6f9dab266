use strata_geometry::{Hit, PrimitiveId, Ray};

use super::{BvhIndices, BvhNodeId, BvhNodes, BvhPrimitive};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TracingMode {
    /// Finds the nearest hit, skipping subtrees that begin past it.
    #[default]
    Nearest,

    /// Finds the nearest hit, always visiting every subtree the ray enters;
    /// useful to compare against [`Self::Nearest`].
    NearestExhaustive,

    /// Stops at the first hit found, e.g. for shadow rays.
    Any,
}

/// Outcome of a single traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub hit: bool,
    pub visited_nodes: u32,
    pub primitive_tests: u32,
}

/// Walks the tree near-child-first, updating `hit` with the closest
/// intersection found.
pub fn run<P>(
    nodes: &BvhNodes,
    indices: &BvhIndices,
    root: BvhNodeId,
    primitives: &[P],
    ray: Ray,
    hit: &mut Hit,
    mode: TracingMode,
) -> TraversalStats
where
    P: BvhPrimitive,
{
    let mut stats = TraversalStats::default();

    if nodes[root].bounds().intersect(&ray).is_none() {
        return stats;
    }

    // Far children yet to be visited, along with the distance at which the
    // ray enters them
    let mut stack: Vec<(BvhNodeId, f32)> = Vec::new();
    let mut node_id = root;

    loop {
        stats.visited_nodes += 1;

        let node = nodes[node_id];

        if let Some([left_id, right_id]) = node.children() {
            let left = nodes[left_id].bounds().intersect(&ray);
            let right = nodes[right_id].bounds().intersect(&ray);

            match (left, right) {
                (Some((left_t, _)), Some((right_t, _))) => {
                    let (near_id, far_id, far_t) = if left_t <= right_t {
                        (left_id, right_id, right_t)
                    } else {
                        (right_id, left_id, left_t)
                    };

                    stack.push((far_id, far_t));
                    node_id = near_id;
                    continue;
                }

                (Some(_), None) => {
                    node_id = left_id;
                    continue;
                }

                (None, Some(_)) => {
                    node_id = right_id;
                    continue;
                }

                (None, None) => {
                    //
                }
            }
        } else if let Some(range) = node.primitives() {
            for &primitive_id in indices.get(range) {
                stats.primitive_tests += 1;

                if primitives[primitive_id as usize].hit(ray, hit) {
                    hit.primitive_id = Some(PrimitiveId::new(primitive_id));
                    stats.hit = true;

                    if mode == TracingMode::Any {
                        return stats;
                    }
                }
            }
        }

        // If the control flow got here, then we've either finished a leaf or
        // missed both children of an internal node - time to pick the next
        // far child; since a primitive can't be hit before the ray enters its
        // box, children starting past the current hit can be skipped.
        loop {
            let Some((far_id, far_t)) = stack.pop() else {
                return stats;
            };

            let can_skip = mode != TracingMode::NearestExhaustive
                && stats.hit
                && hit.distance <= far_t;

            if !can_skip {
                node_id = far_id;
                break;
            }
        }
    }
}
