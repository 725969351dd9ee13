use itertools::{Either, Itertools};
use log::warn;

/// The decision a [`Partitioner`] makes for one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Partition {
    /// Stop here and keep every candidate in a leaf.
    Leaf,
    /// Split the candidates. Values strictly below `threshold` go `left`.
    Split {
        threshold: f64,
        left: Vec<usize>,
        right: Vec<usize>,
    },
}

/// Decides how the candidate points of a node are divided.
///
/// The tree allocates node ids and queues children itself, so a
/// partitioner only has to choose. A `Split` must give both sides at least
/// one index and use every candidate exactly once, otherwise the build
/// could stop making progress.
pub trait Partitioner {
    /// - `leaf_size`: the largest number of points a leaf should hold.
    /// - `values`: the projected value of every candidate, aligned with `indices`.
    /// - `indices`: the row indices of the candidates.
    fn partition(&self, leaf_size: usize, values: &[f64], indices: &[usize]) -> Partition;
}

/// Splits at the median of the projected values.
///
/// The threshold sits halfway between the two middle values, so no point
/// lies exactly on it unless values are tied. When the middle values are
/// tied, the closest gap between distinct values is used instead, which
/// keeps both sides non-empty. If every value is identical the points
/// cannot be separated along this dimension and they are kept in one leaf,
/// even if there are more than `leaf_size` of them.
///
/// Only the dimension of the current level is looked at. Distinct points can
/// still tie on it, for example when a hand-built projection like
/// `Rotation::from_matrix(Array2::eye(2))` leaves a coordinate constant, and
/// they then share an oversized leaf even though a deeper level would have
/// separated them. Randomly drawn projections make such ties vanishingly
/// unlikely for distinct points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MedianSplit;

impl Partitioner for MedianSplit {
    fn partition(&self, leaf_size: usize, values: &[f64], indices: &[usize]) -> Partition {
        debug_assert_eq!(values.len(), indices.len());
        if indices.len() <= leaf_size {
            return Partition::Leaf;
        }
        let sorted = values
            .iter()
            .cloned()
            .sorted_by(|a, b| a.total_cmp(b))
            .collect_vec();
        let threshold = match median_gap(&sorted) {
            Some(threshold) => threshold,
            None => {
                warn!(
                    "cannot separate {} points with identical projections, keeping one leaf",
                    indices.len()
                );
                return Partition::Leaf;
            }
        };
        let (left, right) = indices
            .iter()
            .zip(values)
            .partition_map(|(&ix, &value)| {
                if value < threshold {
                    Either::Left(ix)
                } else {
                    Either::Right(ix)
                }
            });
        Partition::Split {
            threshold,
            left,
            right,
        }
    }
}

/// Finds the gap between adjacent distinct values closest to the middle of
/// `sorted` and returns a threshold `t` inside it with `lo < t <= hi`.
fn median_gap(sorted: &[f64]) -> Option<f64> {
    let mid = sorted.len() / 2;
    let gap = (1..sorted.len())
        .filter(|&ix| sorted[ix - 1] < sorted[ix])
        .min_by_key(|&ix| if ix > mid { ix - mid } else { mid - ix })?;
    let (lo, hi) = (sorted[gap - 1], sorted[gap]);
    let threshold = lo + (hi - lo) / 2.0;
    // Adjacent floats (or an overflowing gap) can round the midpoint onto `lo`.
    Some(if threshold > lo && threshold <= hi {
        threshold
    } else {
        hi
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn split(values: &[f64], leaf_size: usize) -> Partition {
        let indices = (0..values.len()).map(|ix| ix * 10).collect_vec();
        MedianSplit.partition(leaf_size, values, &indices)
    }

    #[test]
    fn test_leaf() {
        assert_eq!(split(&[], 1), Partition::Leaf);
        assert_eq!(split(&[3.0], 1), Partition::Leaf);
        assert_eq!(split(&[3.0, 1.0, 2.0], 3), Partition::Leaf);
    }

    #[test]
    fn test_median() {
        assert_eq!(
            split(&[4.0, 1.0, 3.0, 2.0], 1),
            Partition::Split {
                threshold: 2.5,
                left: vec![10, 30],
                right: vec![0, 20],
            }
        );
        assert_eq!(
            split(&[5.0, 1.0, 3.0], 2),
            Partition::Split {
                threshold: 2.0,
                left: vec![10],
                right: vec![0, 20],
            }
        );
    }

    #[test]
    fn test_ties() {
        // The middle of [1, 2, 2, 2, 2, 3] is tied. Both gaps are equally far
        // from it and the lower one wins.
        match split(&[2.0, 2.0, 1.0, 2.0, 3.0, 2.0], 1) {
            Partition::Split {
                threshold,
                left,
                right,
            } => {
                assert_eq!(threshold, 1.5);
                assert_eq!(left, vec![20]);
                assert_eq!(right, vec![0, 10, 30, 40, 50]);
            }
            Partition::Leaf => panic!("expected a split"),
        }
        assert_eq!(split(&[7.0; 5], 1), Partition::Leaf);
    }

    #[test]
    fn test_adjacent_floats() {
        let lo = 1.0f64;
        let hi = f64::from_bits(lo.to_bits() + 1);
        assert_eq!(
            split(&[hi, lo], 1),
            Partition::Split {
                threshold: hi,
                left: vec![10],
                right: vec![0],
            }
        );
    }

    #[test]
    fn test_progress() {
        let values = (0..101).map(|n| ((n * 37) % 101) as f64 / 7.0).collect_vec();
        match split(&values, 4) {
            Partition::Split { left, right, .. } => {
                assert!(!left.is_empty() && !right.is_empty());
                assert_eq!(left.len() + right.len(), values.len());
            }
            Partition::Leaf => panic!("expected a split"),
        }
    }
}
