use thiserror::Error;
use voxwarp_image::GridError;
use voxwarp_interp::InterpError;
use voxwarp_transforms::TransformError;

/// An error type for the resampling pipeline.
#[derive(Error, Debug)]
pub enum ResampleError {
    /// Error when neither the caller nor the transform supplies a reference.
    #[error("cannot resample without a reference grid")]
    MissingReference,

    /// Error when a four-dimensional source does not carry one volume per
    /// mapped volume of the transform.
    #[error("source carries {data} trailing volumes but the transform maps {expected}")]
    VolumeCountMismatch {
        /// Trailing-axis length of the source data.
        data: usize,
        /// Number of volumes the transform maps.
        expected: usize,
    },

    /// Error when a transform returns a coordinate set of the wrong length.
    #[error("transform mapped {got} points where {expected} were expected")]
    MappedShape {
        /// Number of rows the transform returned.
        got: usize,
        /// Number of rows the reference grid calls for.
        expected: usize,
    },

    /// Grid errors raised while converting coordinates or wrapping results.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Interpolation errors raised while sampling the source.
    #[error(transparent)]
    Interp(#[from] InterpError),

    /// Transform errors raised while mapping reference coordinates.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Array reshape errors raised while assembling the output.
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
