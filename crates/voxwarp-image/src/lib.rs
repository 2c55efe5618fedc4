#![deny(missing_docs)]
//! Voxel grids, volumetric images, and the header bookkeeping that travels
//! with them through spatial resampling.

/// error types for grids and images
pub mod error;
/// sampling lattices anchored in world space
pub mod grid;
/// on-disk element types and header metadata
pub mod header;
/// volumetric images bound to their grids
pub mod image;

pub use crate::error::GridError;
pub use crate::grid::VoxelGrid;
pub use crate::header::{effective_dtype, DataType, ImageHeader};
pub use crate::image::SpatialImage;
