mod builder;
mod config;
mod error;
mod indices;
mod node;
mod nodes;
mod primitive;
mod stats;
mod traversal;
mod validation;

use derivative::Derivative;
use strata_geometry::{Hit, Ray};

pub use self::config::*;
pub use self::error::*;
pub use self::indices::*;
pub use self::node::*;
pub use self::nodes::*;
pub use self::primitive::*;
pub use self::stats::BvhStats;
pub use self::traversal::{TracingMode, TraversalStats};
use crate::utils::{measure, Elapsed};

/// Maximum number of primitives a single tree can be built over, so that ids
/// of all of its nodes fit in `u32`.
pub const MAX_PRIMITIVES: usize = (u32::MAX / 2) as usize;

/// Bounding volume hierarchy over a static set of primitives.
///
/// The tree refers to primitives by their position in the slice it was built
/// from and doesn't own them - queries take that same slice again.
///
/// Once built, the tree is read-only, so any number of threads can trace rays
/// through it at once.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct Bvh {
    config: BvhConfig,
    root: Option<BvhNodeId>,
    #[derivative(Debug = "ignore")]
    nodes: BvhNodes,
    #[derivative(Debug = "ignore")]
    indices: BvhIndices,
}

impl Bvh {
    /// Builds a tree with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if memory for the tree cannot be allocated or if there are more
    /// than [`MAX_PRIMITIVES`] primitives; see [`Self::try_build_with()`].
    pub fn build<P>(primitives: &[P]) -> Self
    where
        P: BvhPrimitive,
    {
        Self::build_with(primitives, BvhConfig::default())
    }

    /// Builds a tree with given configuration.
    ///
    /// # Panics
    ///
    /// See [`Self::build()`].
    pub fn build_with<P>(primitives: &[P], config: BvhConfig) -> Self
    where
        P: BvhPrimitive,
    {
        Self::try_build_with(primitives, config)
            .unwrap_or_else(|err| panic!("Couldn't build BVH: {err}"))
    }

    pub fn try_build_with<P>(
        primitives: &[P],
        config: BvhConfig,
    ) -> Result<Self, BuildError>
    where
        P: BvhPrimitive,
    {
        log::info!("Building BVH; primitives = {}", primitives.len());
        log::debug!("Building BVH; config = {config:?}");

        let (result, tt) = measure(|| builder::run(primitives, &config));
        let (nodes, indices, root) = result?;

        let this = Self {
            config,
            root,
            nodes,
            indices,
        };

        let stats = this.stats();

        log::info!(
            "BVH built; nodes = {}, leaves = {}, max-depth = {}, sah-cost = {:.2}, tt = {}",
            stats.nodes,
            stats.leaves,
            stats.max_depth,
            stats.sah_cost,
            Elapsed(tt),
        );

        Ok(this)
    }

    /// Traces the ray and returns whether it hit anything closer than
    /// `hit.distance`; if so, `hit` describes the nearest intersection.
    pub fn trace_nearest<P>(
        &self,
        primitives: &[P],
        ray: Ray,
        hit: &mut Hit,
    ) -> bool
    where
        P: BvhPrimitive,
    {
        self.trace(primitives, ray, hit, TracingMode::Nearest).hit
    }

    /// Traces the ray and returns whether it hits anything up to the given
    /// distance.
    pub fn trace_any<P>(
        &self,
        primitives: &[P],
        ray: Ray,
        max_distance: f32,
    ) -> bool
    where
        P: BvhPrimitive,
    {
        let mut hit = Hit::within(max_distance);

        self.trace(primitives, ray, &mut hit, TracingMode::Any).hit
    }

    /// Traces the ray in given mode, reporting how much work it took.
    pub fn trace<P>(
        &self,
        primitives: &[P],
        ray: Ray,
        hit: &mut Hit,
        mode: TracingMode,
    ) -> TraversalStats
    where
        P: BvhPrimitive,
    {
        assert_eq!(
            self.len(),
            primitives.len(),
            "BVH was built over a different set of primitives",
        );

        let Some(root) = self.root else {
            return TraversalStats::default();
        };

        traversal::run(
            &self.nodes,
            &self.indices,
            root,
            primitives,
            ray,
            hit,
            mode,
        )
    }

    /// Checks structural invariants of the tree against the primitives it
    /// was built from.
    pub fn validate<P>(&self, primitives: &[P]) -> Result<(), ValidationError>
    where
        P: BvhPrimitive,
    {
        validation::run(&self.nodes, &self.indices, self.root, primitives)
    }

    pub fn stats(&self) -> BvhStats {
        stats::run(&self.nodes, self.root)
    }

    /// Dumps the tree at the `trace` level.
    pub fn log_tree(&self) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }

        let Some(root) = self.root else {
            log::trace!("(empty)");
            return;
        };

        let mut stack = vec![(root, 0)];

        while let Some((node_id, depth)) = stack.pop() {
            let node = self.nodes[node_id];
            let bounds = node.bounds();
            let indent = 2 * depth;

            if let Some([left_id, right_id]) = node.children() {
                log::trace!(
                    "{:indent$}#{}: min = {}, max = {}",
                    "",
                    node_id.get(),
                    bounds.min(),
                    bounds.max(),
                );

                stack.push((right_id, depth + 1));
                stack.push((left_id, depth + 1));
            } else if let Some(range) = node.primitives() {
                log::trace!(
                    "{:indent$}#{}: min = {}, max = {}, primitives = {:?}",
                    "",
                    node_id.get(),
                    bounds.min(),
                    bounds.max(),
                    self.indices.get(range),
                );
            }
        }
    }

    pub fn config(&self) -> BvhConfig {
        self.config
    }

    pub fn root(&self) -> Option<BvhNodeId> {
        self.root
    }

    pub fn node(&self, id: BvhNodeId) -> Option<&BvhNode> {
        self.nodes.get(id)
    }

    /// All slots of the node pool, including the unused padding one.
    pub fn nodes(&self) -> &[BvhNode] {
        self.nodes.as_slice()
    }

    /// The node pool as raw bytes, 32 bytes per node.
    pub fn nodes_as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.nodes.as_slice())
    }

    /// Primitive ids, in the order leaves refer to them.
    pub fn indices(&self) -> &[u32] {
        self.indices.as_slice()
    }

    /// Number of primitives this tree was built over.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
