use std::collections::TryReserveError;
use std::ops::Range;

/// Permutation of primitive ids; every node owns a contiguous range of it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BvhIndices {
    indices: Vec<u32>,
}

impl BvhIndices {
    /// Creates the identity permutation over `len` primitives.
    pub fn identity(len: usize) -> Result<Self, TryReserveError> {
        let mut indices = Vec::new();

        indices.try_reserve_exact(len)?;
        indices.extend(0..(len as u32));

        Ok(Self { indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn get(&self, range: Range<usize>) -> &[u32] {
        &self.indices[range]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }

    /// Reorders `range` so that all ids matching `is_left` come first and
    /// returns the absolute position of the first id that didn't match.
    pub fn partition(
        &mut self,
        range: Range<usize>,
        mut is_left: impl FnMut(u32) -> bool,
    ) -> usize {
        let mut pivot = range.start;

        for i in range {
            if is_left(self.indices[i]) {
                self.indices.swap(pivot, i);
                pivot += 1;
            }
        }

        pivot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity() {
        let target = BvhIndices::identity(4).unwrap();

        assert_eq!(&[0, 1, 2, 3], target.as_slice());
        assert!(BvhIndices::identity(0).unwrap().is_empty());
    }

    #[test]
    fn partition() {
        let mut target = BvhIndices::identity(8).unwrap();
        let pivot = target.partition(2..7, |id| id % 2 == 1);

        assert_eq!(4, pivot);
        assert_eq!(&[0, 1, 3, 5, 4, 2, 6, 7], target.as_slice());
    }

    #[test]
    fn partition_one_sided() {
        let mut target = BvhIndices::identity(4).unwrap();

        assert_eq!(1, target.partition(1..4, |_| false));
        assert_eq!(4, target.partition(1..4, |_| true));
        assert_eq!(&[0, 1, 2, 3], target.as_slice());
    }
}
