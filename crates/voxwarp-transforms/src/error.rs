use thiserror::Error;
use voxwarp_image::GridError;
use voxwarp_interp::InterpError;

/// An error type for transform construction and point mapping.
#[derive(Error, Debug)]
pub enum TransformError {
    /// Error when points do not come as rows of three world coordinates.
    #[error("points must come as rows of three world coordinates, got {0} columns")]
    PointsDim(usize),

    /// Error when a displacement or coefficient array does not fit its grid.
    #[error("a field of shape {field:?} does not fit a grid of shape {grid:?}")]
    FieldShape {
        /// Shape of the offending array.
        field: Vec<usize>,
        /// Spatial shape of the grid it should cover.
        grid: [usize; 3],
    },

    /// Error when an affine series carries no matrices.
    #[error("an affine series needs at least one matrix")]
    EmptySeries,

    /// Error when a transform chain has no members.
    #[error("a transform chain needs at least one member")]
    EmptyChain,

    /// Error when a volume-indexed transform is placed inside a chain.
    #[error("chained transforms must map single volumes")]
    ChainedSeries,

    /// Grid errors raised while resolving coordinates.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Interpolation errors raised while evaluating model-based transforms.
    #[error(transparent)]
    Interp(#[from] InterpError),

    /// Array reshape errors raised while densifying a transform.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
