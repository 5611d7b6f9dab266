/// Upper bound for [`BvhConfig::with_bins()`].
pub const MAX_BINS: usize = 32;

/// Parameters of a single build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BvhConfig {
    leaf_size: usize,
    bins: usize,
    strategy: SplitStrategy,
    padding: bool,
}

impl BvhConfig {
    /// Nodes with this many primitives or fewer are never split; below it the
    /// cost of traversing another level outweighs testing primitives
    /// directly.
    ///
    /// Clamped to at least one.
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size.max(1);
        self
    }

    /// Number of bins per axis used by [`SplitStrategy::BinnedSah`]; more is
    /// better, with the trade-off on build time.
    ///
    /// Clamped to `2..=MAX_BINS`.
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins.clamp(2, MAX_BINS);
        self
    }

    pub fn with_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Whether to keep the first slot of the node pool unused, so that
    /// siblings share a cache line.
    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    pub fn padding(&self) -> bool {
        self.padding
    }
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            leaf_size: 3,
            bins: 8,
            strategy: SplitStrategy::BinnedSah,
            padding: true,
        }
    }
}

/// How the builder looks for splitting planes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Evaluates SAH at bin boundaries spread over the centroids' extent;
    /// linear in the number of primitives.
    #[default]
    BinnedSah,

    /// Evaluates SAH at every primitive's centroid; quadratic in the number
    /// of primitives, so only viable for small scenes.
    Sah,

    /// Splits the longest axis in half, as long as that lowers SAH.
    Midpoint,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamping() {
        let target = BvhConfig::default().with_leaf_size(0).with_bins(1000);

        assert_eq!(1, target.leaf_size());
        assert_eq!(MAX_BINS, target.bins());
        assert_eq!(2, BvhConfig::default().with_bins(0).bins());
    }
}
