use super::{check_columns, ProjectedData, Projection, Strategy};
use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;
use std::fmt;

/// A circular convolution of every point against one random seed vector.
///
/// The seed has `ncols` standard normal entries. It is stored alongside a
/// wrap-around kernel of length `2 * ncols - 1` (the seed followed by all but
/// its last element) so that an ordinary "valid" convolution of a point
/// against the kernel produces exactly `ncols` values, one per dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Convolution {
    seed: Array1<f64>,
    kernel: Array1<f64>,
}

impl Convolution {
    /// Draws a random seed vector of length `ncols`.
    pub fn random<R>(ncols: usize, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        Self::from_seed(Array1::random_using(ncols, StandardNormal, rng))
    }

    /// Uses an existing seed vector.
    pub fn from_seed(seed: Array1<f64>) -> Result<Self> {
        if seed.is_empty() {
            return Err(Error::NoDimensions);
        }
        let kernel = wrap_kernel(seed.view());
        Ok(Self { seed, kernel })
    }

    pub fn seed(&self) -> ArrayView1<'_, f64> {
        self.seed.view()
    }

    pub fn kernel(&self) -> ArrayView1<'_, f64> {
        self.kernel.view()
    }

    /// Convolves one row against the kernel, refusing any result that is not `ncols` long.
    fn project_row(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        let projected = convolve_valid(row, self.kernel.view());
        if projected.len() != self.ncols() {
            return Err(Error::ShapeMismatch {
                expected: self.ncols(),
                found: projected.len(),
            });
        }
        Ok(projected)
    }
}

impl Projection for Convolution {
    const STRATEGY: Strategy = Strategy::Convolution;

    fn prepare<R>(data: ArrayView2<'_, f64>, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        Self::random(data.ncols(), rng)
    }

    fn ncols(&self) -> usize {
        self.seed.len()
    }

    fn project_matrix(&self, data: ArrayView2<'_, f64>) -> Result<ProjectedData> {
        check_columns(self.ncols(), data.ncols())?;
        let mut projected = Array2::zeros((data.nrows(), self.ncols()));
        for (row, mut out) in data.outer_iter().zip(projected.outer_iter_mut()) {
            out.assign(&self.project_row(row)?);
        }
        Ok(ProjectedData::new(projected))
    }

    fn project_query(&self, query: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        check_columns(self.ncols(), query.len())?;
        self.project_row(query)
    }
}

impl fmt::Display for Convolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Random convolution vector: {:.4}", self.seed)
    }
}

/// Extends `seed` with all but its last element.
///
/// A "valid" convolution of a length `n` signal against the result behaves
/// like a circular convolution against `seed`.
pub fn wrap_kernel(seed: ArrayView1<'_, f64>) -> Array1<f64> {
    let wrap = seed.len().saturating_sub(1);
    seed.iter().chain(seed.iter().take(wrap)).cloned().collect()
}

/// Linear convolution in "valid" mode: only the outputs where the shorter
/// input fully overlaps the longer one.
///
/// The kernel is flipped as in the mathematical definition of convolution,
/// and the operation is commutative. The result has
/// `|a.len() - b.len()| + 1` values, or none if either input is empty.
pub fn convolve_valid(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Array1<f64> {
    let (a, b) = (a.view(), b.view());
    let (signal, kernel) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let n = signal.len();
    if n == 0 {
        return Array1::zeros(0);
    }
    (0..=kernel.len() - n)
        .map(|k| {
            signal
                .iter()
                .enumerate()
                .map(|(j, &s)| s * kernel[k + n - 1 - j])
                .sum::<f64>()
        })
        .collect()
}
