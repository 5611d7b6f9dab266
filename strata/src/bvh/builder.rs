use std::collections::VecDeque;

use glam::Vec3;

use super::{
    BuildError, BvhConfig, BvhIndices, BvhNode, BvhNodeId, BvhNodes,
    BvhPrimitive, SplitStrategy, MAX_BINS, MAX_PRIMITIVES,
};
use crate::{Axis, BoundingBox};

/// Builds the tree top-down, splitting nodes for as long as the surface area
/// heuristic says it's worth it.
///
/// Thanks to:
/// - https://jacco.ompf2.com/2022/04/13/how-to-build-a-bvh-part-1-basics/,
/// - https://jacco.ompf2.com/2022/04/21/how-to-build-a-bvh-part-3-quick-builds/.
pub fn run<P>(
    primitives: &[P],
    config: &BvhConfig,
) -> Result<(BvhNodes, BvhIndices, Option<BvhNodeId>), BuildError>
where
    P: BvhPrimitive,
{
    ensure_supported(primitives.len())?;

    let mut nodes = BvhNodes::new(primitives.len(), config.padding())?;
    let mut indices = BvhIndices::identity(primitives.len())?;

    if primitives.is_empty() {
        return Ok((nodes, indices, None));
    }

    let primitives = {
        let mut out = Vec::new();

        out.try_reserve_exact(primitives.len())?;

        out.extend(primitives.iter().map(|primitive| BuilderPrimitive {
            bounds: primitive.bounds(),
            center: primitive.center(),
        }));

        out
    };

    let root = nodes.alloc_root(BvhNode::leaf(
        primitives.iter().map(|primitive| primitive.bounds).collect(),
        0,
        primitives.len() as u32,
    ));

    let mut stack = VecDeque::from_iter([root]);

    while let Some(node_id) = stack.pop_front() {
        if let Some([left_id, right_id]) =
            balance(config, &mut nodes, &mut indices, &primitives, node_id)
        {
            stack.push_back(left_id);
            stack.push_back(right_id);
        }
    }

    Ok((nodes, indices, Some(root)))
}

pub fn ensure_supported(count: usize) -> Result<(), BuildError> {
    if count > MAX_PRIMITIVES {
        Err(BuildError::TooManyPrimitives {
            count,
            max: MAX_PRIMITIVES,
        })
    } else {
        Ok(())
    }
}

/// Splits given leaf in two, if that lowers the cost; returns ids of the
/// newly-allocated children.
fn balance(
    config: &BvhConfig,
    nodes: &mut BvhNodes,
    indices: &mut BvhIndices,
    primitives: &[BuilderPrimitive],
    node_id: BvhNodeId,
) -> Option<[BvhNodeId; 2]> {
    let node = nodes[node_id];
    let range = node.primitives()?;

    if range.len() <= config.leaf_size() {
        return None;
    }

    if !nodes.has_room_for(2) {
        log::debug!("Node pool is full; keeping {node_id:?} as a leaf");
        return None;
    }

    let candidates = Candidates {
        primitives,
        ids: indices.get(range.clone()),
    };

    let plane = match config.strategy() {
        SplitStrategy::BinnedSah => candidates.binned_sah(config.bins()),
        SplitStrategy::Sah => candidates.sah(),
        SplitStrategy::Midpoint => candidates.midpoint(node.bounds()),
    }?;

    if plane.cost >= node.sah_cost() {
        return None;
    }

    let pivot = indices.partition(range.clone(), |id| {
        plane.is_left(primitives[id as usize].center)
    });

    if pivot == range.start || pivot == range.end {
        return None;
    }

    let bounds_of = |ids: &[u32]| -> BoundingBox {
        ids.iter()
            .map(|&id| primitives[id as usize].bounds)
            .collect()
    };

    let left = BvhNode::leaf(
        bounds_of(indices.get(range.start..pivot)),
        range.start as u32,
        (pivot - range.start) as u32,
    );

    let right = BvhNode::leaf(
        bounds_of(indices.get(pivot..range.end)),
        pivot as u32,
        (range.end - pivot) as u32,
    );

    let left_id = nodes.alloc_pair(left, right)?;

    nodes[node_id] = BvhNode::internal(node.bounds(), left_id);

    Some([left_id, left_id.sibling()])
}

#[derive(Clone, Copy, Debug)]
struct BuilderPrimitive {
    bounds: BoundingBox,
    center: Vec3,
}

#[derive(Clone, Copy, Debug)]
struct SplittingPlane {
    split_by: Axis,
    split_at: SplitAt,
    cost: f32,
}

impl SplittingPlane {
    fn is_left(&self, center: Vec3) -> bool {
        let center = center[self.split_by];

        match self.split_at {
            SplitAt::Position(pos) => center < pos,
            SplitAt::Bin(bin, binning) => binning.bin_of(center) <= bin,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum SplitAt {
    /// Everything before this position goes to the left.
    Position(f32),

    /// Everything in this bin or any bin before it goes to the left.
    ///
    /// Partitioning goes through the same binning as evaluation did, so that
    /// both always agree on which side a primitive lands.
    Bin(usize, Binning),
}

#[derive(Clone, Copy, Debug)]
struct Binning {
    min: f32,
    scale: f32,
    bins: usize,
}

impl Binning {
    fn bin_of(&self, pos: f32) -> usize {
        (((pos - self.min) * self.scale) as usize).min(self.bins - 1)
    }
}

#[derive(Clone, Copy, Debug)]
struct Bin {
    bounds: BoundingBox,
    count: u32,
}

impl Default for Bin {
    fn default() -> Self {
        Self {
            bounds: BoundingBox::empty(),
            count: 0,
        }
    }
}

/// Primitives of a single node, looked at as split candidates.
struct Candidates<'a> {
    primitives: &'a [BuilderPrimitive],
    ids: &'a [u32],
}

impl Candidates<'_> {
    fn iter(&self) -> impl Iterator<Item = &BuilderPrimitive> + '_ {
        self.ids.iter().map(|&id| &self.primitives[id as usize])
    }

    fn binned_sah(&self, bins: usize) -> Option<SplittingPlane> {
        let bins = bins.clamp(2, MAX_BINS);
        let centroid_bb: BoundingBox =
            self.iter().map(|primitive| primitive.center).collect();

        let mut best: Option<SplittingPlane> = None;

        for split_by in Axis::all() {
            let extent = centroid_bb.extent()[split_by];

            // All centroids sit on the same plane - there's nothing to split
            // along this axis
            if extent.is_nan() || extent <= 0.0 {
                continue;
            }

            let binning = Binning {
                min: centroid_bb.min()[split_by],
                scale: (bins as f32) / extent,
                bins,
            };

            let mut bin_data = [Bin::default(); MAX_BINS];

            for primitive in self.iter() {
                let bin_idx = binning.bin_of(primitive.center[split_by]);
                let bin = &mut bin_data[bin_idx];

                bin.bounds += primitive.bounds;
                bin.count += 1;
            }

            // ---

            let mut left_areas = [0.0; MAX_BINS];
            let mut right_areas = [0.0; MAX_BINS];
            let mut left_counts = [0; MAX_BINS];
            let mut right_counts = [0; MAX_BINS];
            let mut left_bb = BoundingBox::empty();
            let mut right_bb = BoundingBox::empty();
            let mut left_count = 0;
            let mut right_count = 0;

            for i in 0..(bins - 1) {
                left_count += bin_data[i].count;
                left_counts[i] = left_count;
                left_bb += bin_data[i].bounds;
                left_areas[i] = left_bb.area();

                right_count += bin_data[bins - 1 - i].count;
                right_counts[bins - 2 - i] = right_count;
                right_bb += bin_data[bins - 1 - i].bounds;
                right_areas[bins - 2 - i] = right_bb.area();
            }

            // ---

            for i in 0..(bins - 1) {
                if left_counts[i] == 0 || right_counts[i] == 0 {
                    continue;
                }

                let cost = (left_counts[i] as f32) * left_areas[i]
                    + (right_counts[i] as f32) * right_areas[i];

                if best.map_or(true, |best| cost < best.cost) {
                    best = Some(SplittingPlane {
                        split_by,
                        split_at: SplitAt::Bin(i, binning),
                        cost,
                    });
                }
            }
        }

        best
    }

    fn sah(&self) -> Option<SplittingPlane> {
        let mut best: Option<SplittingPlane> = None;

        for split_by in Axis::all() {
            for candidate in self.iter() {
                let split_at = candidate.center[split_by];

                let Some(cost) = self.estimate(split_by, split_at) else {
                    continue;
                };

                if best.map_or(true, |best| cost < best.cost) {
                    best = Some(SplittingPlane {
                        split_by,
                        split_at: SplitAt::Position(split_at),
                        cost,
                    });
                }
            }
        }

        best
    }

    fn midpoint(&self, bounds: BoundingBox) -> Option<SplittingPlane> {
        let split_by = bounds.longest_axis();
        let split_at = bounds.center_on(split_by);

        self.estimate(split_by, split_at)
            .map(|cost| SplittingPlane {
                split_by,
                split_at: SplitAt::Position(split_at),
                cost,
            })
    }

    /// Returns SAH cost of splitting at given position, or `None` if one of
    /// the sides would end up empty.
    fn estimate(&self, split_by: Axis, split_at: f32) -> Option<f32> {
        let mut left = 0;
        let mut left_bb = BoundingBox::empty();
        let mut right = 0;
        let mut right_bb = BoundingBox::empty();

        for primitive in self.iter() {
            let (side, side_bb) = if primitive.center[split_by] < split_at {
                (&mut left, &mut left_bb)
            } else {
                (&mut right, &mut right_bb)
            };

            *side += 1;
            *side_bb += primitive.bounds;
        }

        if left == 0 || right == 0 {
            return None;
        }

        Some((left as f32) * left_bb.area() + (right as f32) * right_bb.area())
    }
}
