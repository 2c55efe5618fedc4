#![deny(missing_docs)]
//! Resampling of spatial images onto reference grids.
//!
//! The pipeline maps every sample position of a reference grid through a
//! coordinate transform into a source image's index space, reconstructs the
//! source there with separable B-splines, and reassembles the values into the
//! reference's shape, either as a bare array ([`resample`]) or as a full
//! image carrying the reference's spatial metadata ([`apply`]).

/// error types for the resampling pipeline
pub mod error;
/// mapping of reference samples into source index space
pub mod mapper;
/// resampling pipeline options
pub mod options;
/// the resampling pipeline itself
pub mod pipeline;

pub use crate::error::ResampleError;
pub use crate::mapper::source_coordinates;
pub use crate::options::ResampleOptions;
pub use crate::pipeline::{apply, resample};
