use nalgebra::Matrix4;
use ndarray::ArrayD;

use crate::error::GridError;
use crate::grid::VoxelGrid;
use crate::header::ImageHeader;

/// A decoded volumetric image bound to its sampling grid.
///
/// Data is rank 3 (one volume) or rank 4 (trailing axis stacking volumes or
/// components), always `f64` in memory; the on-disk element type lives in
/// the header. Loaders produce these, the resampling pipeline consumes and
/// returns them.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialImage {
    data: ArrayD<f64>,
    grid: VoxelGrid,
}

impl SpatialImage {
    /// Creates an image from decoded data, its index-to-world affine, and
    /// optional header metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the data rank is not 3 or 4, a spatial axis is
    /// empty, or the affine is singular.
    pub fn new(
        data: ArrayD<f64>,
        affine: [[f64; 4]; 4],
        header: Option<ImageHeader>,
    ) -> Result<Self, GridError> {
        let rank = data.ndim();
        if !(3..=4).contains(&rank) {
            return Err(GridError::UnsupportedRank(rank));
        }
        let shape = [data.shape()[0], data.shape()[1], data.shape()[2]];
        let mut grid = VoxelGrid::new(shape, affine)?;
        if let Some(h) = header {
            grid = grid.with_header(h);
        }
        Ok(Self { data, grid })
    }

    /// Binds decoded data to an existing grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the data rank is not 3 or 4 or its spatial axes
    /// disagree with the grid.
    pub fn from_grid(data: ArrayD<f64>, grid: VoxelGrid) -> Result<Self, GridError> {
        let rank = data.ndim();
        if !(3..=4).contains(&rank) {
            return Err(GridError::UnsupportedRank(rank));
        }
        if data.shape()[..3] != grid.shape() {
            return Err(GridError::DataShape {
                data: data.shape().to_vec(),
                grid: grid.shape(),
            });
        }
        Ok(Self { data, grid })
    }

    /// The decoded voxel data.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// The sampling grid the data lies on.
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// The index-to-world affine.
    pub fn affine(&self) -> &Matrix4<f64> {
        self.grid.affine()
    }

    /// Header metadata, if any.
    pub fn header(&self) -> Option<&ImageHeader> {
        self.grid.header()
    }

    /// Full data shape, including a trailing volume axis when present.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of stacked volumes; 1 for rank-3 data.
    pub fn num_volumes(&self) -> usize {
        if self.data.ndim() == 4 {
            self.data.shape()[3]
        } else {
            1
        }
    }

    /// Consumes the image, returning the voxel data.
    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }
}

impl From<&SpatialImage> for VoxelGrid {
    fn from(image: &SpatialImage) -> Self {
        image.grid.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    const EYE: [[f64; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    #[test]
    fn volume_counts_follow_rank() -> Result<(), GridError> {
        let single = SpatialImage::new(ArrayD::zeros(IxDyn(&[2, 3, 4])), EYE, None)?;
        assert_eq!(single.num_volumes(), 1);
        assert_eq!(single.grid().shape(), [2, 3, 4]);

        let stacked = SpatialImage::new(ArrayD::zeros(IxDyn(&[2, 3, 4, 5])), EYE, None)?;
        assert_eq!(stacked.num_volumes(), 5);
        assert_eq!(stacked.grid().shape(), [2, 3, 4]);
        Ok(())
    }

    #[test]
    fn rejects_non_spatial_ranks() {
        for shape in [vec![4usize, 4], vec![2usize, 2, 2, 2, 2]] {
            let res = SpatialImage::new(ArrayD::zeros(IxDyn(&shape)), EYE, None);
            assert!(matches!(res, Err(GridError::UnsupportedRank(_))));
        }
    }

    #[test]
    fn grid_binding_checks_spatial_axes() -> Result<(), GridError> {
        let grid = VoxelGrid::unit([2, 3, 4])?;
        let ok = SpatialImage::from_grid(ArrayD::zeros(IxDyn(&[2, 3, 4, 2])), grid.clone());
        assert!(ok.is_ok());

        let bad = SpatialImage::from_grid(ArrayD::zeros(IxDyn(&[2, 3, 5])), grid);
        assert!(matches!(bad, Err(GridError::DataShape { .. })));
        Ok(())
    }

    #[test]
    fn grids_derive_from_images() -> Result<(), GridError> {
        let header = crate::ImageHeader::new(crate::DataType::Int16);
        let image = SpatialImage::new(
            ArrayD::zeros(IxDyn(&[2, 2, 2])),
            EYE,
            Some(header.clone()),
        )?;
        let grid = VoxelGrid::from(&image);
        assert_eq!(grid.shape(), [2, 2, 2]);
        assert_eq!(grid.header(), Some(&header));
        Ok(())
    }
}
