use super::{check_columns, ProjectedData, Projection, Strategy};
use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_rand::RandomExt;
use rand::Rng;
use rand_distr::StandardNormal;
use std::fmt;

/// A random linear map of the whole coordinate frame.
///
/// The matrix is `ncols × ncols` with independent standard normal entries.
/// It is not orthonormalized, so it does not preserve distances exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    matrix: Array2<f64>,
}

impl Rotation {
    /// Draws a random `ncols × ncols` matrix.
    pub fn random<R>(ncols: usize, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        Self::from_matrix(Array2::random_using((ncols, ncols), StandardNormal, rng))
    }

    /// Uses an existing square matrix. Points are projected as `point · matrix`.
    pub fn from_matrix(matrix: Array2<f64>) -> Result<Self> {
        if matrix.ncols() == 0 {
            return Err(Error::NoDimensions);
        }
        check_columns(matrix.ncols(), matrix.nrows())?;
        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }
}

impl Projection for Rotation {
    const STRATEGY: Strategy = Strategy::Rotation;

    fn prepare<R>(data: ArrayView2<'_, f64>, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        Self::random(data.ncols(), rng)
    }

    fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    fn project_matrix(&self, data: ArrayView2<'_, f64>) -> Result<ProjectedData> {
        check_columns(self.ncols(), data.ncols())?;
        Ok(ProjectedData::new(data.dot(&self.matrix)))
    }

    fn project_query(&self, query: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        check_columns(self.ncols(), query.len())?;
        Ok(query.dot(&self.matrix))
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Each printed row is the direction one projected dimension is read along.
        writeln!(f, "Rotation matrix:")?;
        write!(f, "{:.4}", self.matrix.t())
    }
}
