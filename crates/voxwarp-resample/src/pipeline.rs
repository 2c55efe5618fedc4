use ndarray::{s, Array2, ArrayD, Axis, IxDyn};

use voxwarp_image::{effective_dtype, DataType, SpatialImage, VoxelGrid};
use voxwarp_interp::{map_coordinates, spline_filter, validate_order};
use voxwarp_transforms::SpatialTransform;

use crate::error::ResampleError;
use crate::mapper::source_coordinates;
use crate::options::ResampleOptions;

/// Resamples an image onto a reference grid and returns the raw values.
///
/// Every sample position of the reference grid is mapped through `transform`
/// into the source's index space and the source is evaluated there with a
/// separable B-spline. The output has the reference grid's spatial shape; a
/// trailing volume axis is appended when the source is four-dimensional or
/// the transform maps one coordinate set per volume. A four-dimensional
/// source must carry exactly one volume per mapped volume, and each volume is
/// interpolated independently.
///
/// When `reference` is `None`, the transform's own reference grid is used.
///
/// # Arguments
///
/// * `transform` - Maps reference world coordinates into source world
///   coordinates.
/// * `image` - The source image to be resampled.
/// * `reference` - The grid to sample on, if the transform carries none.
/// * `options` - Spline order, boundary handling, and output element type.
///
/// # Errors
///
/// Returns an error if no reference grid is available, the spline order is
/// unsupported, the source volume count disagrees with the transform, or the
/// transform fails to map the reference coordinates.
///
/// # Example
///
/// ```
/// use ndarray::ArrayD;
/// use voxwarp_image::{SpatialImage, VoxelGrid};
/// use voxwarp_resample::{resample, ResampleOptions};
/// use voxwarp_transforms::AffineTransform;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = ArrayD::from_elem(ndarray::IxDyn(&[4, 4, 4]), 1.0);
/// let image = SpatialImage::from_grid(data, VoxelGrid::unit([4, 4, 4])?)?;
/// let reference = VoxelGrid::unit([2, 2, 2])?;
///
/// let out = resample(
///     &AffineTransform::identity(),
///     &image,
///     Some(&reference),
///     &ResampleOptions::default(),
/// )?;
/// assert_eq!(out.shape(), &[2, 2, 2]);
/// # Ok(())
/// # }
/// ```
pub fn resample(
    transform: &dyn SpatialTransform,
    image: &SpatialImage,
    reference: Option<&VoxelGrid>,
    options: &ResampleOptions,
) -> Result<ArrayD<f64>, ResampleError> {
    validate_order(options.order)?;
    let reference = reference
        .or_else(|| transform.reference())
        .ok_or(ResampleError::MissingReference)?;

    let data = image.data();
    let rank4 = data.ndim() == 4;
    let volumes = transform.num_volumes();
    if rank4 && data.shape()[3] != volumes {
        return Err(ResampleError::VolumeCountMismatch {
            data: data.shape()[3],
            expected: volumes,
        });
    }

    log::debug!(
        "resampling {:?} onto {:?} with order {} and {:?} boundaries",
        data.shape(),
        reference.shape(),
        options.order,
        options.mode,
    );

    let coords = source_coordinates(transform, image.grid(), reference)?;
    let n = reference.num_samples();

    // a three-dimensional source crossed with a volume-indexed transform is
    // sampled once per volume, so turn it into coefficients up front
    let prepared = if !rank4 && volumes > 1 && options.prefilter && options.order > 1 {
        Some(spline_filter(&data.view(), options.order)?)
    } else {
        None
    };

    let mut stacked = Array2::<f64>::zeros((n, volumes));
    for t in 0..volumes {
        let block = coords.slice(s![t * n..(t + 1) * n, ..]);
        let values = if let Some(coefficients) = &prepared {
            map_coordinates(
                &coefficients.view(),
                &block,
                options.order,
                options.mode,
                options.cval,
                false,
            )?
        } else if rank4 {
            map_coordinates(
                &data.index_axis(Axis(3), t),
                &block,
                options.order,
                options.mode,
                options.cval,
                options.prefilter,
            )?
        } else {
            map_coordinates(
                &data.view(),
                &block,
                options.order,
                options.mode,
                options.cval,
                options.prefilter,
            )?
        };
        stacked.column_mut(t).assign(&values);
    }

    let [sx, sy, sz] = reference.shape();
    let out = if rank4 || transform.ndim() == 4 {
        stacked.into_shape(IxDyn(&[sx, sy, sz, volumes]))?
    } else {
        stacked.into_shape(IxDyn(&[sx, sy, sz]))?
    };
    log::debug!("resampled {} samples across {} volumes", n, volumes);
    Ok(out)
}

/// Resamples an image onto a reference grid and wraps the result.
///
/// This is the image-flavoured front of [`resample`]: the interpolated values
/// are quantized to the effective element type of the source (scaled images
/// stay floating point) or to `options.output_dtype` when set, and the result
/// carries the reference's affine together with a copy of its header stamped
/// with the requested on-disk type.
///
/// # Errors
///
/// Returns an error under the same conditions as [`resample`].
///
/// # Example
///
/// ```
/// use ndarray::ArrayD;
/// use voxwarp_image::{DataType, SpatialImage, VoxelGrid};
/// use voxwarp_resample::{apply, ResampleOptions};
/// use voxwarp_transforms::AffineTransform;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = ArrayD::from_elem(ndarray::IxDyn(&[4, 4, 4]), 0.75);
/// let image = SpatialImage::from_grid(data, VoxelGrid::unit([4, 4, 4])?)?;
///
/// let options = ResampleOptions {
///     output_dtype: Some(DataType::Uint8),
///     ..Default::default()
/// };
/// let shift = AffineTransform::translation(1.0, 0.0, 0.0);
/// let moved = apply(&shift, &image, Some(image.grid()), &options)?;
/// assert_eq!(moved.data()[[0, 0, 0]], 0.0);
/// # Ok(())
/// # }
/// ```
pub fn apply(
    transform: &dyn SpatialTransform,
    image: &SpatialImage,
    reference: Option<&VoxelGrid>,
    options: &ResampleOptions,
) -> Result<SpatialImage, ResampleError> {
    let grid = reference
        .or_else(|| transform.reference())
        .ok_or(ResampleError::MissingReference)?;
    let mut values = resample(transform, image, Some(grid), options)?;

    let effective = effective_dtype(image.header(), options.output_dtype);
    if effective != DataType::Float64 {
        values.mapv_inplace(|v| effective.cast_value(v));
    }

    // the output header keeps the source's on-disk type unless overridden
    let source_dtype = image
        .header()
        .map(|h| h.data_type)
        .unwrap_or(DataType::Float64);
    let stamped = options.output_dtype.unwrap_or(source_dtype);
    let grid = match grid.header() {
        Some(header) => grid
            .clone()
            .with_header(header.clone().with_data_type(stamped)),
        None => grid.clone(),
    };
    Ok(SpatialImage::from_grid(values, grid)?)
}
