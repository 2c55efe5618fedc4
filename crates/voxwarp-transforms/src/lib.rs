#![deny(missing_docs)]
//! Spatial coordinate transforms for volume resampling.
//!
//! Everything here maps world points from a reference space toward the
//! space of a sampled image: plain affines, per-volume affine series, dense
//! displacement fields, and B-spline free-form deformations that can
//! densify themselves onto a grid. Pipelines consume them behind the
//! object-safe [`SpatialTransform`] trait.

/// affine transforms and per-volume series
pub mod affine;
/// free-form deformations on knot lattices
pub mod bspline;
/// ordered transform composition
pub mod chain;
/// error types for transforms
pub mod error;
/// dense displacement fields
pub mod field;
/// the transform traits
pub mod transform;

pub use crate::affine::{AffineSeries, AffineTransform};
pub use crate::bspline::BSplineFieldTransform;
pub use crate::chain::TransformChain;
pub use crate::error::TransformError;
pub use crate::field::DenseFieldTransform;
pub use crate::transform::{FieldSource, SpatialTransform};
