use ndarray::{Array2, ArrayView2};
use voxwarp_image::VoxelGrid;

use crate::error::TransformError;
use crate::field::DenseFieldTransform;

/// A coordinate mapping from one world space into another.
///
/// Implementations map points from the space a reference grid lives in to
/// the space of the image being resampled. The trait is object safe so
/// pipelines can hold transforms behind `dyn` without caring which concrete
/// kind they got.
pub trait SpatialTransform: Send + Sync {
    /// Number of coordinate axes the transform addresses; 4 for
    /// volume-indexed transforms, 3 otherwise.
    fn ndim(&self) -> usize {
        3
    }

    /// Number of volumes a volume-indexed transform maps; 1 otherwise.
    fn num_volumes(&self) -> usize {
        1
    }

    /// The grid the transform resamples onto when the caller names none.
    fn reference(&self) -> Option<&VoxelGrid> {
        None
    }

    /// Maps world points, one per row.
    ///
    /// Volume-indexed transforms return the input rows mapped once per
    /// volume, volume-major: all rows under volume 0, then all rows under
    /// volume 1, and so on.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are malformed or the transform cannot
    /// be evaluated.
    fn map(&self, points: &ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError>;

    /// Transforms that can resolve themselves into a dense displacement
    /// field return themselves here; direct transforms return `None`.
    fn as_field_source(&self) -> Option<&dyn FieldSource> {
        None
    }
}

/// A model-based transform that can be evaluated once per voxel of a grid.
pub trait FieldSource {
    /// Densifies the transform onto `reference`, producing a displacement
    /// field that maps exactly like the model does on that grid's voxels.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be evaluated on the grid.
    fn to_field(&self, reference: &VoxelGrid) -> Result<DenseFieldTransform, TransformError>;
}

pub(crate) fn check_points(points: &ArrayView2<'_, f64>) -> Result<(), TransformError> {
    if points.ncols() != 3 {
        return Err(TransformError::PointsDim(points.ncols()));
    }
    Ok(())
}
