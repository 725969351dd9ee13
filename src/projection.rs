//! Random projections used to pick the split values of a tree.
//!
//! A projection is prepared once from the point matrix and then used twice:
//! at build time the whole matrix is projected in bulk, and at query time a
//! single query vector is projected with the same parameters. The value a
//! tree level splits on is always dimension `level % ncols` of the projected
//! vector, so the two paths must agree for every row.

mod convolution;
mod rotation;

pub use self::convolution::{convolve_valid, wrap_kernel, Convolution};
pub use self::rotation::Rotation;

use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use std::fmt;

/// The family a projection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Rotation,
    Convolution,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strategy::Rotation => write!(f, "rotation"),
            Strategy::Convolution => write!(f, "convolution"),
        }
    }
}

pub trait Projection: fmt::Display {
    const STRATEGY: Strategy;

    /// Draws fresh projection parameters sized to the columns of `data`.
    fn prepare<R>(data: ArrayView2<'_, f64>, rng: &mut R) -> Result<Self>
    where
        Self: Sized,
        R: Rng + ?Sized;

    /// The number of dimensions this projection consumes and produces.
    fn ncols(&self) -> usize;

    /// Projects every row of `data` at once.
    fn project_matrix(&self, data: ArrayView2<'_, f64>) -> Result<ProjectedData>;

    /// Projects a single query vector to all `ncols` projected dimensions.
    fn project_query(&self, query: ArrayView1<'_, f64>) -> Result<Array1<f64>>;

    /// The projected values of every row of `data` for the dimension used at `level`.
    fn project_for_level(&self, data: ArrayView2<'_, f64>, level: usize) -> Result<Array1<f64>> {
        Ok(self.project_matrix(data)?.column(level).to_owned())
    }
}

/// A point matrix after projection, one row per point and one column per
/// projected dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedData {
    values: Array2<f64>,
}

impl ProjectedData {
    pub(crate) fn new(values: Array2<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// The column consulted at `level`.
    ///
    /// Panics if there are no columns.
    pub fn column(&self, level: usize) -> ArrayView1<'_, f64> {
        self.values.column(level % self.ncols())
    }

    /// Collects the column consulted at `level` for the given rows, in order.
    pub fn gather(&self, level: usize, indices: &[usize]) -> Vec<f64> {
        let column = self.column(level);
        indices.iter().map(|&ix| column[ix]).collect()
    }
}

/// Fails with [`Error::DimensionMismatch`] unless `found == expected`.
pub(crate) fn check_columns(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, found })
    }
}
