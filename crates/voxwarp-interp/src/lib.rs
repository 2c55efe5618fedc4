#![deny(missing_docs)]
//! Separable B-spline interpolation for N-dimensional volumes.
//!
//! The engine samples a data array at arbitrary fractional coordinates with
//! B-splines of order 0 (nearest) through 5, resolves out-of-bounds
//! coordinates through a configurable boundary mode, and prefilters data
//! into interpolating spline coefficients so that on-grid samples are
//! reproduced exactly. It is self-contained: no grids, no transforms, just
//! arrays in and values out.

/// errors produced by the interpolation engine
pub mod error;
/// recursive prefilters that turn samples into spline coefficients
pub mod filter;
/// boundary extension for out-of-bounds coordinates
pub mod mode;
/// spline evaluation at arbitrary fractional coordinates
pub mod sample;
/// spline basis weights and filter poles
pub mod spline;

pub use crate::error::InterpError;
pub use crate::filter::{spline_filter, spline_filter1d};
pub use crate::mode::ExtendMode;
pub use crate::sample::{map_coordinates, MAX_RANK};
pub use crate::spline::{validate_order, MAX_ORDER};

// lossless for the float widths the engine accepts
pub(crate) fn to_f64<T: num_traits::Float>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}
