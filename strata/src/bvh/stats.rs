use super::{BvhNodeId, BvhNodes};

/// Shape of a built tree.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BvhStats {
    /// Number of nodes reachable from the root.
    pub nodes: usize,
    pub leaves: usize,
    /// Number of edges on the longest root-to-leaf path.
    pub max_depth: usize,
    pub max_leaf_size: usize,
    /// Expected number of primitive tests for a ray entering the root's box,
    /// as estimated by the surface area heuristic.
    pub sah_cost: f32,
}

pub fn run(nodes: &BvhNodes, root: Option<BvhNodeId>) -> BvhStats {
    let mut stats = BvhStats::default();

    let Some(root) = root else {
        return stats;
    };

    let root_area = nodes[root].bounds().area();
    let mut stack = vec![(root, 0)];

    while let Some((node_id, depth)) = stack.pop() {
        let node = nodes[node_id];

        stats.nodes += 1;
        stats.max_depth = stats.max_depth.max(depth);

        if let Some([left_id, right_id]) = node.children() {
            stack.push((left_id, depth + 1));
            stack.push((right_id, depth + 1));
        } else {
            stats.leaves += 1;
            stats.max_leaf_size =
                stats.max_leaf_size.max(node.count() as usize);

            stats.sah_cost += if root_area > 0.0 {
                node.sah_cost() / root_area
            } else {
                node.count() as f32
            };
        }
    }

    stats
}
