use nalgebra::{Matrix4, Vector3, Vector4};
use ndarray::{Array2, ArrayView2};
use voxwarp_image::VoxelGrid;

use crate::error::TransformError;
use crate::transform::{check_points, SpatialTransform};

/// A homogeneous affine mapping of world coordinates.
///
/// Rigid motions, scalings, and shears are all plain affines; the matrix is
/// applied as-is, so callers hand in the direction they want (reference
/// space toward the sampled image).
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    matrix: Matrix4<f64>,
    reference: Option<VoxelGrid>,
}

impl AffineTransform {
    /// Creates a transform from a 4×4 matrix given as rows.
    pub fn new(matrix: [[f64; 4]; 4]) -> Self {
        let m = &matrix;
        Self::from_matrix(Matrix4::new(
            m[0][0], m[0][1], m[0][2], m[0][3], m[1][0], m[1][1], m[1][2], m[1][3], m[2][0],
            m[2][1], m[2][2], m[2][3], m[3][0], m[3][1], m[3][2], m[3][3],
        ))
    }

    /// Creates a transform from a prebuilt matrix.
    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self {
            matrix,
            reference: None,
        }
    }

    /// The identity mapping.
    pub fn identity() -> Self {
        Self::from_matrix(Matrix4::identity())
    }

    /// A pure translation.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_matrix(Matrix4::new_translation(&Vector3::new(x, y, z)))
    }

    /// Attaches the grid this transform resamples onto by default.
    pub fn with_reference(mut self, reference: VoxelGrid) -> Self {
        self.reference = Some(reference);
        self
    }

    /// The transform matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }
}

impl SpatialTransform for AffineTransform {
    fn reference(&self) -> Option<&VoxelGrid> {
        self.reference.as_ref()
    }

    fn map(&self, points: &ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        check_points(points)?;
        let mut out = Array2::zeros((points.nrows(), 3));
        apply_matrix(&self.matrix, points, &mut out, 0);
        Ok(out)
    }
}

/// One affine per volume of a 4-D image.
///
/// The usual carrier of per-volume head motion: volume `t` of the data gets
/// resampled through matrix `t`. Mapping is volume-major, so the output
/// stacks one full copy of the point set per matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineSeries {
    matrices: Vec<Matrix4<f64>>,
    reference: Option<VoxelGrid>,
}

impl AffineSeries {
    /// Creates a series from matrices given as rows.
    ///
    /// # Errors
    ///
    /// Returns an error if `matrices` is empty.
    pub fn new(matrices: &[[[f64; 4]; 4]]) -> Result<Self, TransformError> {
        Self::from_matrices(
            matrices
                .iter()
                .map(|m| *AffineTransform::new(*m).matrix())
                .collect(),
        )
    }

    /// Creates a series from prebuilt matrices.
    ///
    /// # Errors
    ///
    /// Returns an error if `matrices` is empty.
    pub fn from_matrices(matrices: Vec<Matrix4<f64>>) -> Result<Self, TransformError> {
        if matrices.is_empty() {
            return Err(TransformError::EmptySeries);
        }
        Ok(Self {
            matrices,
            reference: None,
        })
    }

    /// Attaches the grid this series resamples onto by default.
    pub fn with_reference(mut self, reference: VoxelGrid) -> Self {
        self.reference = Some(reference);
        self
    }

    /// The per-volume matrices.
    pub fn matrices(&self) -> &[Matrix4<f64>] {
        &self.matrices
    }
}

impl SpatialTransform for AffineSeries {
    fn ndim(&self) -> usize {
        4
    }

    fn num_volumes(&self) -> usize {
        self.matrices.len()
    }

    fn reference(&self) -> Option<&VoxelGrid> {
        self.reference.as_ref()
    }

    fn map(&self, points: &ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        check_points(points)?;
        let n = points.nrows();
        let mut out = Array2::zeros((n * self.matrices.len(), 3));
        for (t, matrix) in self.matrices.iter().enumerate() {
            apply_matrix(matrix, points, &mut out, t * n);
        }
        Ok(out)
    }
}

fn apply_matrix(
    matrix: &Matrix4<f64>,
    points: &ArrayView2<'_, f64>,
    out: &mut Array2<f64>,
    row_offset: usize,
) {
    for (r, p) in points.rows().into_iter().enumerate() {
        let v = matrix * Vector4::new(p[0], p[1], p[2], 1.0);
        out[[row_offset + r, 0]] = v[0];
        out[[row_offset + r, 1]] = v[1];
        out[[row_offset + r, 2]] = v[2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn identity_maps_points_onto_themselves() -> Result<(), TransformError> {
        let points = array![[1.0, -2.5, 3.0], [0.0, 0.0, 0.0]];
        let mapped = AffineTransform::identity().map(&points.view())?;
        for (a, b) in mapped.iter().zip(points.iter()) {
            assert_relative_eq!(a, b);
        }
        Ok(())
    }

    #[test]
    fn translation_shifts_every_row() -> Result<(), TransformError> {
        let points = array![[1.0, 2.0, 3.0], [-1.0, 0.5, 2.0]];
        let mapped = AffineTransform::translation(10.0, -20.0, 0.5).map(&points.view())?;
        assert_relative_eq!(mapped[[0, 0]], 11.0);
        assert_relative_eq!(mapped[[0, 1]], -18.0);
        assert_relative_eq!(mapped[[0, 2]], 3.5);
        assert_relative_eq!(mapped[[1, 0]], 9.0);
        Ok(())
    }

    #[test]
    fn rejects_malformed_points() {
        let points = ndarray::Array2::<f64>::zeros((2, 4));
        assert!(matches!(
            AffineTransform::identity().map(&points.view()),
            Err(TransformError::PointsDim(4))
        ));
    }

    #[test]
    fn series_maps_volume_major() -> Result<(), TransformError> {
        let series = AffineSeries::from_matrices(vec![
            *AffineTransform::translation(0.0, 0.0, 0.0).matrix(),
            *AffineTransform::translation(100.0, 0.0, 0.0).matrix(),
        ])?;
        assert_eq!(series.ndim(), 4);
        assert_eq!(series.num_volumes(), 2);

        let points = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let mapped = series.map(&points.view())?;
        assert_eq!(mapped.nrows(), 4);
        // volume 0 first, untouched
        assert_relative_eq!(mapped[[0, 0]], 1.0);
        assert_relative_eq!(mapped[[1, 0]], 4.0);
        // then volume 1, shifted
        assert_relative_eq!(mapped[[2, 0]], 101.0);
        assert_relative_eq!(mapped[[3, 0]], 104.0);
        Ok(())
    }

    #[test]
    fn series_cannot_be_empty() {
        assert!(matches!(
            AffineSeries::from_matrices(Vec::new()),
            Err(TransformError::EmptySeries)
        ));
    }
}
