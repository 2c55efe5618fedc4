use thiserror::Error;

/// An error type for grid and image construction.
#[derive(Error, Debug)]
pub enum GridError {
    /// Error when a grid axis has no samples.
    #[error("grid axes must be non-empty, got shape {0:?}")]
    EmptyAxis([usize; 3]),

    /// Error when the index-to-world affine cannot be inverted.
    #[error("the index-to-world affine is singular")]
    SingularAffine,

    /// Error when image data does not have a spatial rank.
    #[error("image data must have 3 or 4 axes, got {0}")]
    UnsupportedRank(usize),

    /// Error when world points do not come as rows of three coordinates.
    #[error("world points must have 3 columns, got {0}")]
    PointsDim(usize),

    /// Error when image data does not lie on the grid it is bound to.
    #[error("data of shape {data:?} does not fit a grid of shape {grid:?}")]
    DataShape {
        /// Shape of the offending data array.
        data: Vec<usize>,
        /// Spatial shape of the grid.
        grid: [usize; 3],
    },
}
