//! Approximate nearest neighbor search with randomly projected k-d trees.
//!
//! Instead of splitting on the raw coordinate axes, the points are first
//! passed through a random linear projection and the tree splits on the
//! projected dimensions, cycling through them one level at a time. Two
//! projections are available:
//!
//! - [`Rotation`]: multiply every point by a random `ncols × ncols` matrix.
//! - [`Convolution`]: circularly convolve every point with one random vector.
//!
//! A query descends the tree once, from the root to a single leaf, and the
//! points in that leaf are the candidate neighbors. There is no
//! backtracking, so true neighbors that fell on the other side of an early
//! split are missed.
//!
//! ```
//! # use ndarray::array;
//! # use rand::{rngs::SmallRng, SeedableRng};
//! # use rpkd::{Index, TreeParams};
//! let points = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
//! let mut rng = SmallRng::seed_from_u64(0);
//! let index = Index::build_rotation(points.view(), &TreeParams::new(1), &mut rng).unwrap();
//! assert_eq!(index.leaf_count(), 4);
//! assert_eq!(index.search(points.row(2)).unwrap(), &[2]);
//! ```

mod error;
mod node;
mod partition;
pub mod projection;
mod traverse;
mod tree;

pub use error::{Error, Result};
pub use node::{Node, NodeKind};
pub use partition::{MedianSplit, Partition, Partitioner};
pub use projection::{Convolution, Projection, Rotation, Strategy};
pub use traverse::{Traverse, Visit};
pub use tree::{Tree, TreeParams};

use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;

/// A built tree together with the projection it was built with.
///
/// The projection parameters only exist inside the tree they built, so a
/// query can never be projected with the wrong parameters.
#[derive(Debug, Clone)]
pub enum Index {
    Rotation(Tree<Rotation>),
    Convolution(Tree<Convolution>),
}

impl Index {
    /// Builds a tree over randomly rotated points.
    pub fn build_rotation<R>(
        data: ArrayView2<'_, f64>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        Tree::build(data, params, rng).map(Index::Rotation)
    }

    /// Builds a tree over randomly convolved points.
    pub fn build_convolution<R>(
        data: ArrayView2<'_, f64>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        Tree::build(data, params, rng).map(Index::Convolution)
    }

    /// The kind of projection the tree was built with.
    pub fn strategy(&self) -> Strategy {
        match self {
            Index::Rotation(_) => Strategy::Rotation,
            Index::Convolution(_) => Strategy::Convolution,
        }
    }

    /// See [`Tree::search`].
    pub fn search(&self, query: ArrayView1<'_, f64>) -> Result<&[usize]> {
        match self {
            Index::Rotation(tree) => tree.search(query),
            Index::Convolution(tree) => tree.search(query),
        }
    }

    /// See [`Tree::search_leaf`].
    pub fn search_leaf(&self, query: ArrayView1<'_, f64>) -> Result<&Node> {
        match self {
            Index::Rotation(tree) => tree.search_leaf(query),
            Index::Convolution(tree) => tree.search_leaf(query),
        }
    }

    /// See [`Tree::traverse`].
    pub fn traverse(&self) -> Traverse<'_> {
        match self {
            Index::Rotation(tree) => tree.traverse(),
            Index::Convolution(tree) => tree.traverse(),
        }
    }

    /// See [`Tree::log_tree`].
    pub fn log_tree(&self) {
        match self {
            Index::Rotation(tree) => tree.log_tree(),
            Index::Convolution(tree) => tree.log_tree(),
        }
    }

    /// The root node, always id 0.
    pub fn root(&self) -> &Node {
        match self {
            Index::Rotation(tree) => tree.root(),
            Index::Convolution(tree) => tree.root(),
        }
    }

    /// All nodes in id order, which is also breadth-first order.
    pub fn nodes(&self) -> &[Node] {
        match self {
            Index::Rotation(tree) => tree.nodes(),
            Index::Convolution(tree) => tree.nodes(),
        }
    }

    /// The number of leaves.
    pub fn leaf_count(&self) -> usize {
        match self {
            Index::Rotation(tree) => tree.leaf_count(),
            Index::Convolution(tree) => tree.leaf_count(),
        }
    }

    /// The level of the deepest node.
    pub fn depth(&self) -> usize {
        match self {
            Index::Rotation(tree) => tree.depth(),
            Index::Convolution(tree) => tree.depth(),
        }
    }

    /// The number of projected dimensions.
    pub fn ncols(&self) -> usize {
        match self {
            Index::Rotation(tree) => tree.ncols(),
            Index::Convolution(tree) => tree.ncols(),
        }
    }

    /// The number of points the tree was built over.
    pub fn len(&self) -> usize {
        match self {
            Index::Rotation(tree) => tree.len(),
            Index::Convolution(tree) => tree.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Tree<Rotation>> for Index {
    fn from(tree: Tree<Rotation>) -> Self {
        Index::Rotation(tree)
    }
}

impl From<Tree<Convolution>> for Index {
    fn from(tree: Tree<Convolution>) -> Self {
        Index::Convolution(tree)
    }
}
