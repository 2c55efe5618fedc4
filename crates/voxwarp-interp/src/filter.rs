use ndarray::{ArrayD, ArrayViewD, Axis, Zip};
use num_traits::Float;

use crate::error::InterpError;
use crate::spline::{filter_poles, validate_order};
use crate::to_f64;

/// Computes the interpolating B-spline coefficients of `input` along every
/// axis.
///
/// Evaluating a spline of the same `order` on the returned coefficients
/// reproduces the input samples on the grid; evaluating it on the raw samples
/// instead acts as a smoothing kernel. Orders 0 and 1 need no filtering and
/// return the input converted to `f64`.
///
/// Boundaries are handled by whole-sample mirroring, matching the footprint
/// extension used by [`map_coordinates`](crate::map_coordinates).
///
/// # Arguments
///
/// * `input` - The data array, any rank.
/// * `order` - The B-spline order, 0 to 5.
///
/// # Errors
///
/// Returns an error if the order is unsupported.
pub fn spline_filter<T>(
    input: &ArrayViewD<'_, T>,
    order: usize,
) -> Result<ArrayD<f64>, InterpError>
where
    T: Float + Send + Sync,
{
    validate_order(order)?;
    let mut data = input.mapv(to_f64);
    if order > 1 {
        let poles = filter_poles(order);
        for axis in 0..data.ndim() {
            filter_axis(&mut data, &poles, axis);
        }
    }
    Ok(data)
}

/// Computes interpolating B-spline coefficients along a single axis.
///
/// # Errors
///
/// Returns an error if the order is unsupported or the axis does not exist.
pub fn spline_filter1d<T>(
    input: &ArrayViewD<'_, T>,
    order: usize,
    axis: usize,
) -> Result<ArrayD<f64>, InterpError>
where
    T: Float + Send + Sync,
{
    validate_order(order)?;
    let ndim = input.ndim();
    if axis >= ndim {
        return Err(InterpError::InvalidAxis { axis, ndim });
    }
    let mut data = input.mapv(to_f64);
    if order > 1 {
        filter_axis(&mut data, &filter_poles(order), axis);
    }
    Ok(data)
}

fn filter_axis(data: &mut ArrayD<f64>, poles: &[f64], axis: usize) {
    Zip::from(data.lanes_mut(Axis(axis))).par_for_each(|mut lane| {
        let mut buf: Vec<f64> = lane.iter().copied().collect();
        filter_line(&mut buf, poles);
        for (dst, v) in lane.iter_mut().zip(buf) {
            *dst = v;
        }
    });
}

/// In-place recursive filter over one line of samples.
///
/// The classic exponential-filter cascade: scale by the overall gain, then
/// for each pole run a causal and an anti-causal first-order recursion with
/// mirror boundary conditions.
fn filter_line(c: &mut [f64], poles: &[f64]) {
    let n = c.len();
    if n < 2 {
        return;
    }
    let mut gain = 1.0;
    for &z in poles {
        gain *= (1.0 - z) * (1.0 - 1.0 / z);
    }
    for v in c.iter_mut() {
        *v *= gain;
    }
    for &z in poles {
        c[0] = causal_init(c, z);
        for i in 1..n {
            c[i] += z * c[i - 1];
        }
        c[n - 1] = anticausal_init(c, z);
        for i in (0..n - 1).rev() {
            c[i] = z * (c[i + 1] - c[i]);
        }
    }
}

// sum of the causal recursion over the mirrored signal, truncated once the
// pole powers drop below machine precision
fn causal_init(c: &[f64], z: f64) -> f64 {
    let n = c.len();
    let horizon = (f64::EPSILON.ln() / z.abs().ln()).ceil() as usize;
    if horizon < n {
        let mut zi = z;
        let mut sum = c[0];
        for &v in &c[1..horizon] {
            sum += zi * v;
            zi *= z;
        }
        sum
    } else {
        let z_n = z.powi(n as i32 - 1);
        let mut zi = z;
        let mut z2i = z_n * z_n / z;
        let mut sum = c[0] + z_n * c[n - 1];
        for &v in &c[1..n - 1] {
            sum += (zi + z2i) * v;
            zi *= z;
            z2i /= z;
        }
        sum / (1.0 - z_n * z_n)
    }
}

fn anticausal_init(c: &[f64], z: f64) -> f64 {
    let n = c.len();
    (z / (z * z - 1.0)) * (z * c[n - 2] + c[n - 1])
}
