use thiserror::Error;

/// Errors that can occur while building or querying a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The maximum leaf size must be at least one.
    #[error("leaf size must be positive")]
    InvalidLeafSize,
    /// The point matrix has no columns, so there is no dimension to split on.
    #[error("cannot index points with zero dimensions")]
    NoDimensions,
    /// The input has a different number of columns than the projection was prepared for.
    #[error("dimension mismatch: expected {expected} columns, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// A projection produced the wrong number of values for a point.
    ///
    /// This means the projection parameters are malformed (for instance a
    /// convolution kernel of the wrong length), which would silently corrupt
    /// the mapping from tree levels to projected dimensions.
    #[error("projection produced {found} values, expected {expected}")]
    ShapeMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
