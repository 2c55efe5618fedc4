use ndarray::{Array2, Array4, ArrayView2};
use voxwarp_image::VoxelGrid;

use crate::error::TransformError;
use crate::transform::{check_points, SpatialTransform};

/// A displacement field sampled on its own grid.
///
/// `field[[i, j, k, c]]` is the world-space displacement component `c` at
/// voxel `(i, j, k)` of the field grid. Points are mapped by looking up the
/// displacement at their nearest field voxel, so mapping is exact on the
/// grid samples themselves; points beyond the field take the displacement of
/// the closest edge voxel.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseFieldTransform {
    field: Array4<f64>,
    grid: VoxelGrid,
}

impl DenseFieldTransform {
    /// Binds a displacement field to the grid it is sampled on.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is not shaped `(X, Y, Z, 3)` for the
    /// grid's `(X, Y, Z)`.
    pub fn new(field: Array4<f64>, grid: VoxelGrid) -> Result<Self, TransformError> {
        if field.shape()[..3] != grid.shape() || field.shape()[3] != 3 {
            return Err(TransformError::FieldShape {
                field: field.shape().to_vec(),
                grid: grid.shape(),
            });
        }
        Ok(Self { field, grid })
    }

    /// The grid the field is sampled on.
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// The raw displacement values.
    pub fn field(&self) -> &Array4<f64> {
        &self.field
    }
}

impl SpatialTransform for DenseFieldTransform {
    fn reference(&self) -> Option<&VoxelGrid> {
        Some(&self.grid)
    }

    fn map(&self, points: &ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        check_points(points)?;
        let indices = self.grid.index_coords(points)?;
        let shape = self.grid.shape();
        let mut out = points.to_owned();
        for (row, idx) in indices.rows().into_iter().enumerate() {
            let i = nearest_voxel(idx[0], shape[0]);
            let j = nearest_voxel(idx[1], shape[1]);
            let k = nearest_voxel(idx[2], shape[2]);
            for c in 0..3 {
                out[[row, c]] += self.field[[i, j, k, c]];
            }
        }
        Ok(out)
    }
}

fn nearest_voxel(x: f64, n: usize) -> usize {
    x.round().clamp(0.0, (n - 1) as f64) as usize
}
