use ndarray::{Array2, Array4, ArrayView2, Axis};
use voxwarp_image::VoxelGrid;
use voxwarp_interp::{map_coordinates, ExtendMode};

use crate::error::TransformError;
use crate::field::DenseFieldTransform;
use crate::transform::{check_points, FieldSource, SpatialTransform};

/// A free-form deformation parametrized by cubic B-spline coefficients on a
/// knot lattice.
///
/// `coefficients[[i, j, k, c]]` weights the cubic basis centered on knot
/// `(i, j, k)` for displacement component `c`; the knot grid's affine places
/// the lattice in world space. Displacements fade to zero for points whose
/// knot-space position leaves the lattice.
///
/// The model is cheap to densify, so resampling pipelines evaluate it once
/// per reference voxel through [`FieldSource::to_field`] instead of once per
/// mapped point.
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineFieldTransform {
    coefficients: Array4<f64>,
    knots: VoxelGrid,
    reference: Option<VoxelGrid>,
}

impl BSplineFieldTransform {
    /// Binds coefficients to the knot lattice they live on.
    ///
    /// # Errors
    ///
    /// Returns an error if the coefficients are not shaped `(Kx, Ky, Kz, 3)`
    /// for the lattice's `(Kx, Ky, Kz)`.
    pub fn new(coefficients: Array4<f64>, knots: VoxelGrid) -> Result<Self, TransformError> {
        if coefficients.shape()[..3] != knots.shape() || coefficients.shape()[3] != 3 {
            return Err(TransformError::FieldShape {
                field: coefficients.shape().to_vec(),
                grid: knots.shape(),
            });
        }
        Ok(Self {
            coefficients,
            knots,
            reference: None,
        })
    }

    /// Attaches the grid this transform resamples onto by default.
    pub fn with_reference(mut self, reference: VoxelGrid) -> Self {
        self.reference = Some(reference);
        self
    }

    /// The knot lattice.
    pub fn knots(&self) -> &VoxelGrid {
        &self.knots
    }

    /// The raw coefficient values.
    pub fn coefficients(&self) -> &Array4<f64> {
        &self.coefficients
    }
}

impl SpatialTransform for BSplineFieldTransform {
    fn reference(&self) -> Option<&VoxelGrid> {
        self.reference.as_ref()
    }

    fn map(&self, points: &ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        check_points(points)?;
        // evaluate the spline in knot-index space; the coefficients are the
        // spline coefficients themselves, so no prefilter
        let knot_idx = self.knots.index_coords(points)?;
        let mut out = points.to_owned();
        for c in 0..3 {
            let component = self.coefficients.index_axis(Axis(3), c);
            let displacement = map_coordinates(
                &component.into_dyn(),
                &knot_idx.view(),
                3,
                ExtendMode::Constant,
                0.0,
                false,
            )?;
            for (row, d) in displacement.iter().enumerate() {
                out[[row, c]] += d;
            }
        }
        Ok(out)
    }

    fn as_field_source(&self) -> Option<&dyn FieldSource> {
        Some(self)
    }
}

impl FieldSource for BSplineFieldTransform {
    fn to_field(&self, reference: &VoxelGrid) -> Result<DenseFieldTransform, TransformError> {
        let world = reference.world_coords();
        let mapped = self.map(&world.view())?;
        let displacement = &mapped - &world;
        let [sx, sy, sz] = reference.shape();
        let field = displacement.into_shape((sx, sy, sz, 3))?;
        DenseFieldTransform::new(field, reference.clone())
    }
}
