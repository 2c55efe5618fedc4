use ndarray::{Array1, ArrayView1, ArrayView2, ArrayViewD};
use num_traits::Float;
use rayon::prelude::*;

use crate::error::InterpError;
use crate::filter::spline_filter;
use crate::mode::{fold_footprint, ExtendMode};
use crate::spline::{spline_weights, validate_order};
use crate::to_f64;

/// Highest data-array rank supported by [`map_coordinates`].
pub const MAX_RANK: usize = 8;

/// Samples `input` at fractional coordinates with a separable B-spline.
///
/// Each row of `coordinates` is one output sample, expressed in index
/// coordinates of `input` (one value per axis). Coordinates outside the array
/// are resolved by `mode`; with [`ExtendMode::Constant`] the whole sample
/// takes `cval` as soon as any axis leaves `[0, n - 1]`. Spline support
/// points around an in-bounds coordinate always extend by mirroring.
///
/// With `prefilter` enabled and `order > 1` the input is first converted to
/// interpolating spline coefficients, so on-grid coordinates reproduce the
/// stored samples; without it the input is treated as coefficients directly,
/// which smooths the data. Output row `i` corresponds to coordinate row `i`
/// regardless of parallel scheduling.
///
/// # Arguments
///
/// * `input` - The data array, rank 1 to 8.
/// * `coordinates` - `(num_samples, input.ndim())` fractional coordinates.
/// * `order` - The B-spline order, 0 to 5.
/// * `mode` - Boundary extension for out-of-bounds coordinates.
/// * `cval` - Fill value for [`ExtendMode::Constant`].
/// * `prefilter` - Whether to compute spline coefficients first.
///
/// # Errors
///
/// Returns an error if the order or rank is unsupported, a coordinate row
/// length does not match the rank, or the input has a zero-length axis.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use voxwarp_interp::{map_coordinates, ExtendMode};
///
/// let image = array![[0.0_f64, 1.0], [2.0, 3.0]].into_dyn();
/// let coords = array![[0.5, 0.5], [1.0, 0.0]];
/// let out = map_coordinates(
///     &image.view(),
///     &coords.view(),
///     1,
///     ExtendMode::Constant,
///     0.0,
///     true,
/// )
/// .unwrap();
/// assert!((out[0] - 1.5).abs() < 1e-12);
/// assert!((out[1] - 2.0).abs() < 1e-12);
/// ```
pub fn map_coordinates<T>(
    input: &ArrayViewD<'_, T>,
    coordinates: &ArrayView2<'_, f64>,
    order: usize,
    mode: ExtendMode,
    cval: f64,
    prefilter: bool,
) -> Result<Array1<T>, InterpError>
where
    T: Float + Send + Sync,
{
    validate_order(order)?;
    let ndim = input.ndim();
    if ndim == 0 || ndim > MAX_RANK {
        return Err(InterpError::UnsupportedRank(ndim));
    }
    if coordinates.ncols() != ndim {
        return Err(InterpError::CoordinateDimMismatch {
            got: coordinates.ncols(),
            expected: ndim,
        });
    }
    if input.shape().iter().any(|&n| n == 0) {
        return Err(InterpError::EmptyAxis);
    }

    let mut data = if prefilter && order > 1 {
        spline_filter(input, order)?
    } else {
        input.mapv(to_f64)
    };
    if !data.is_standard_layout() {
        data = data.as_standard_layout().into_owned();
    }
    let shape: Vec<usize> = data.shape().to_vec();
    let mut strides = vec![1usize; ndim];
    for d in (0..ndim - 1).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    // the raw vec of a standard-layout array is its C-order flattening
    let flat = data.into_raw_vec();

    let sampler = Sampler {
        flat: &flat,
        shape: &shape,
        strides: &strides,
        order,
        mode,
        cval,
    };
    let values: Vec<T> = (0..coordinates.nrows())
        .into_par_iter()
        .map(|i| {
            let v = sampler.sample(coordinates.row(i));
            T::from(v).unwrap_or_else(T::nan)
        })
        .collect();
    Ok(Array1::from_vec(values))
}

struct Sampler<'a> {
    flat: &'a [f64],
    shape: &'a [usize],
    strides: &'a [usize],
    order: usize,
    mode: ExtendMode,
    cval: f64,
}

impl Sampler<'_> {
    fn sample(&self, point: ArrayView1<'_, f64>) -> f64 {
        let ndim = self.shape.len();
        let mut weights = [[0.0f64; 6]; MAX_RANK];
        let mut indices = [[0usize; 6]; MAX_RANK];
        for d in 0..ndim {
            let n = self.shape[d];
            let x = point[d];
            if self.mode == ExtendMode::Constant && !(0.0..=(n - 1) as f64).contains(&x) {
                return self.cval;
            }
            let start = spline_weights(self.order, self.mode.fold(x, n), &mut weights[d]);
            for (ll, slot) in indices[d][..=self.order].iter_mut().enumerate() {
                *slot = fold_footprint(start + ll as i64, n);
            }
        }

        // walk the (order + 1)^ndim footprint with an odometer
        let mut acc = 0.0;
        let mut digits = [0usize; MAX_RANK];
        'footprint: loop {
            let mut w = 1.0;
            let mut offset = 0;
            for d in 0..ndim {
                w *= weights[d][digits[d]];
                offset += self.strides[d] * indices[d][digits[d]];
            }
            acc += w * self.flat[offset];
            let mut d = ndim;
            loop {
                if d == 0 {
                    break 'footprint;
                }
                d -= 1;
                if digits[d] < self.order {
                    digits[d] += 1;
                    break;
                }
                digits[d] = 0;
            }
        }
        acc
    }
}
