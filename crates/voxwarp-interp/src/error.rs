use thiserror::Error;

/// An error type for the interpolation engine.
#[derive(Error, Debug)]
pub enum InterpError {
    /// Error when the requested spline order is outside the supported range.
    #[error("spline order must be in the range [0, 5], got {0}")]
    UnsupportedOrder(usize),

    /// Error when the data array has more axes than the engine supports.
    #[error("arrays with {0} axes are not supported, expected 1 to 8")]
    UnsupportedRank(usize),

    /// Error when coordinate rows do not match the data array rank.
    #[error("coordinate rows carry {got} values but the data array has {expected} axes")]
    CoordinateDimMismatch {
        /// Number of values per coordinate row.
        got: usize,
        /// Number of axes of the data array.
        expected: usize,
    },

    /// Error when a filter axis does not exist on the data array.
    #[error("axis {axis} is out of bounds for an array with {ndim} axes")]
    InvalidAxis {
        /// The requested axis.
        axis: usize,
        /// Number of axes of the data array.
        ndim: usize,
    },

    /// Error when the data array has a zero-length axis.
    #[error("input arrays must not have zero-length axes")]
    EmptyAxis,
}
