use nalgebra::{Matrix4, Vector4};
use ndarray::{Array2, ArrayView2};

use crate::error::GridError;
use crate::header::ImageHeader;

/// A regular 3-D sampling lattice anchored in world space.
///
/// A grid couples a voxel extent with an invertible index-to-world affine
/// (homogeneous, last row `0 0 0 1`); the inverse is computed once at
/// construction so world-to-index conversion never re-inverts. Grids are the
/// reference targets of the resampling pipeline and the spatial anchor of
/// [`SpatialImage`](crate::SpatialImage)s.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    shape: [usize; 3],
    affine: Matrix4<f64>,
    inverse: Matrix4<f64>,
    header: Option<ImageHeader>,
}

impl VoxelGrid {
    /// Creates a grid from its shape and index-to-world affine, given as
    /// rows.
    ///
    /// # Errors
    ///
    /// Returns an error if an axis is empty or the affine is singular.
    ///
    /// # Example
    ///
    /// ```
    /// use voxwarp_image::VoxelGrid;
    ///
    /// let affine = [
    ///     [2.0, 0.0, 0.0, -10.0],
    ///     [0.0, 2.0, 0.0, -10.0],
    ///     [0.0, 0.0, 2.0, -10.0],
    ///     [0.0, 0.0, 0.0, 1.0],
    /// ];
    /// let grid = VoxelGrid::new([11, 11, 11], affine).unwrap();
    /// assert_eq!(grid.num_samples(), 1331);
    /// ```
    pub fn new(shape: [usize; 3], affine: [[f64; 4]; 4]) -> Result<Self, GridError> {
        Self::from_matrix(shape, matrix_from_rows(&affine))
    }

    /// Creates a grid from a prebuilt affine matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if an axis is empty or the affine is singular.
    pub fn from_matrix(shape: [usize; 3], affine: Matrix4<f64>) -> Result<Self, GridError> {
        if shape.iter().any(|&n| n == 0) {
            return Err(GridError::EmptyAxis(shape));
        }
        let inverse = affine.try_inverse().ok_or(GridError::SingularAffine)?;
        Ok(Self {
            shape,
            affine,
            inverse,
            header: None,
        })
    }

    /// Creates a grid with unit spacing anchored at the world origin.
    ///
    /// # Errors
    ///
    /// Returns an error if an axis is empty.
    pub fn unit(shape: [usize; 3]) -> Result<Self, GridError> {
        Self::from_matrix(shape, Matrix4::identity())
    }

    /// Attaches header metadata to the grid.
    pub fn with_header(mut self, header: ImageHeader) -> Self {
        self.header = Some(header);
        self
    }

    /// The voxel extent along each axis.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Total number of grid samples.
    pub fn num_samples(&self) -> usize {
        self.shape.iter().product()
    }

    /// The index-to-world affine.
    pub fn affine(&self) -> &Matrix4<f64> {
        &self.affine
    }

    /// Header metadata attached to the grid, if any.
    pub fn header(&self) -> Option<&ImageHeader> {
        self.header.as_ref()
    }

    /// World coordinates of every voxel, one row per sample.
    ///
    /// Samples are enumerated in C order, last axis fastest; reshaping
    /// values computed in this order to [`shape`](Self::shape) puts each one
    /// back on its voxel.
    pub fn world_coords(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.num_samples(), 3));
        let mut row = 0;
        for i in 0..self.shape[0] {
            for j in 0..self.shape[1] {
                for k in 0..self.shape[2] {
                    let w = self.affine * Vector4::new(i as f64, j as f64, k as f64, 1.0);
                    out[[row, 0]] = w[0];
                    out[[row, 1]] = w[1];
                    out[[row, 2]] = w[2];
                    row += 1;
                }
            }
        }
        out
    }

    /// Converts world points, one per row, to continuous voxel indices.
    ///
    /// # Errors
    ///
    /// Returns an error if the points do not come as rows of three
    /// coordinates.
    pub fn index_coords(&self, world: &ArrayView2<'_, f64>) -> Result<Array2<f64>, GridError> {
        if world.ncols() != 3 {
            return Err(GridError::PointsDim(world.ncols()));
        }
        let mut out = Array2::zeros((world.nrows(), 3));
        for (row, p) in world.rows().into_iter().enumerate() {
            let v = self.inverse * Vector4::new(p[0], p[1], p[2], 1.0);
            out[[row, 0]] = v[0];
            out[[row, 1]] = v[1];
            out[[row, 2]] = v[2];
        }
        Ok(out)
    }

    /// World coordinates of a single (possibly fractional) voxel index.
    pub fn world_at(&self, index: [f64; 3]) -> [f64; 3] {
        let w = self.affine * Vector4::new(index[0], index[1], index[2], 1.0);
        [w[0], w[1], w[2]]
    }

    /// Continuous voxel index of a single world point.
    pub fn index_at(&self, world: [f64; 3]) -> [f64; 3] {
        let v = self.inverse * Vector4::new(world[0], world[1], world[2], 1.0);
        [v[0], v[1], v[2]]
    }
}

fn matrix_from_rows(m: &[[f64; 4]; 4]) -> Matrix4<f64> {
    Matrix4::new(
        m[0][0], m[0][1], m[0][2], m[0][3], m[1][0], m[1][1], m[1][2], m[1][3], m[2][0], m[2][1],
        m[2][2], m[2][3], m[3][0], m[3][1], m[3][2], m[3][3],
    )
}
