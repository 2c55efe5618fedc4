use ndarray::{Array2, ArrayView2};
use voxwarp_image::VoxelGrid;

use crate::error::TransformError;
use crate::transform::{check_points, SpatialTransform};

/// An ordered composition of transforms.
///
/// Points travel through the members in order: the first member maps the
/// reference-space points, the second maps that result, and so on. Members
/// must map single volumes; a chain does not guess a reference from its
/// members, so attach one explicitly when the pipeline should fall back
/// to it.
pub struct TransformChain {
    transforms: Vec<Box<dyn SpatialTransform>>,
    reference: Option<VoxelGrid>,
}

impl TransformChain {
    /// Creates a chain from its members.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain is empty or a member is
    /// volume-indexed.
    pub fn new(transforms: Vec<Box<dyn SpatialTransform>>) -> Result<Self, TransformError> {
        if transforms.is_empty() {
            return Err(TransformError::EmptyChain);
        }
        if transforms.iter().any(|t| t.ndim() != 3) {
            return Err(TransformError::ChainedSeries);
        }
        Ok(Self {
            transforms,
            reference: None,
        })
    }

    /// Attaches the grid this chain resamples onto by default.
    pub fn with_reference(mut self, reference: VoxelGrid) -> Self {
        self.reference = Some(reference);
        self
    }

    /// The chain members, in application order.
    pub fn transforms(&self) -> &[Box<dyn SpatialTransform>] {
        &self.transforms
    }
}

impl SpatialTransform for TransformChain {
    fn reference(&self) -> Option<&VoxelGrid> {
        self.reference.as_ref()
    }

    fn map(&self, points: &ArrayView2<'_, f64>) -> Result<Array2<f64>, TransformError> {
        check_points(points)?;
        let mut current = points.to_owned();
        for transform in &self.transforms {
            current = transform.map(&current.view())?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::{AffineSeries, AffineTransform};
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn members_apply_in_order() -> Result<(), TransformError> {
        let scale = AffineTransform::new([
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let shift = AffineTransform::translation(1.0, 0.0, 0.0);
        let chain = TransformChain::new(vec![Box::new(scale), Box::new(shift)])?;

        let mapped = chain.map(&array![[3.0, 0.0, 0.0]].view())?;
        // scale first, then shift
        assert_relative_eq!(mapped[[0, 0]], 7.0);
        Ok(())
    }

    #[test]
    fn rejects_empty_and_volume_indexed_members() {
        assert!(matches!(
            TransformChain::new(Vec::new()),
            Err(TransformError::EmptyChain)
        ));

        let series = AffineSeries::from_matrices(vec![*AffineTransform::identity().matrix()])
            .expect("non-empty series");
        assert!(matches!(
            TransformChain::new(vec![Box::new(series)]),
            Err(TransformError::ChainedSeries)
        ));
    }
}
