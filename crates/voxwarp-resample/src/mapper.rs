use ndarray::Array2;
use voxwarp_image::VoxelGrid;
use voxwarp_transforms::SpatialTransform;

use crate::error::ResampleError;

/// Computes continuous source-voxel coordinates for every reference sample.
///
/// The reference grid's world coordinates are pushed through the transform
/// and the result is converted into the source grid's index space. Transforms
/// that expose a dense-field form are densified onto the reference grid first
/// and the field is evaluated instead of the model. For volume-indexed
/// transforms the output holds one block of `reference.num_samples()` rows per
/// volume, in volume order.
///
/// # Errors
///
/// Returns an error if the transform fails to map the coordinates, returns an
/// unexpected number of rows, or the mapped points do not come as world
/// triplets.
pub fn source_coordinates(
    transform: &dyn SpatialTransform,
    source: &VoxelGrid,
    reference: &VoxelGrid,
) -> Result<Array2<f64>, ResampleError> {
    let world = reference.world_coords();
    let mapped = match transform.as_field_source() {
        Some(model) => {
            log::debug!("densifying the transform onto the reference grid");
            model.to_field(reference)?.map(&world.view())?
        }
        None => transform.map(&world.view())?,
    };
    let expected = reference.num_samples() * transform.num_volumes();
    if mapped.nrows() != expected {
        return Err(ResampleError::MappedShape {
            got: mapped.nrows(),
            expected,
        });
    }
    Ok(source.index_coords(&mapped.view())?)
}
