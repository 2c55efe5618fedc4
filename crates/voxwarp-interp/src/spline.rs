use crate::error::InterpError;

/// Highest supported B-spline order.
pub const MAX_ORDER: usize = 5;

/// Checks that `order` is a supported B-spline order.
///
/// The pipeline calls this before doing any array work so that a bad order
/// fails eagerly; the engine entry points call it again on their own inputs.
pub fn validate_order(order: usize) -> Result<(), InterpError> {
    if order > MAX_ORDER {
        return Err(InterpError::UnsupportedOrder(order));
    }
    Ok(())
}

/// Fills `w[..=order]` with the centered B-spline basis weights at `x` and
/// returns the index of the first footprint sample.
///
/// The anchor is `floor(x)` for odd orders and `floor(x + 0.5)` for even
/// orders, so order 0 reduces to a round-half-up lookup. `w[ll]` weights the
/// sample at `start + ll`. One interior weight is recovered from the
/// partition of unity rather than its polynomial.
pub(crate) fn spline_weights(order: usize, x: f64, w: &mut [f64; 6]) -> i64 {
    let anchor = if order % 2 == 1 {
        x.floor()
    } else {
        (x + 0.5).floor()
    };
    let t = x - anchor;
    let start = anchor as i64 - (order / 2) as i64;
    match order {
        0 => {
            w[0] = 1.0;
        }
        1 => {
            w[0] = 1.0 - t;
            w[1] = t;
        }
        2 => {
            // t in [-1/2, 1/2)
            w[0] = 0.5 * (0.5 - t) * (0.5 - t);
            w[2] = 0.5 * (0.5 + t) * (0.5 + t);
            w[1] = 1.0 - w[0] - w[2];
        }
        3 => {
            let u = 1.0 - t;
            w[0] = u * u * u / 6.0;
            w[1] = 2.0 / 3.0 - t * t * (2.0 - t) / 2.0;
            w[3] = t * t * t / 6.0;
            w[2] = 1.0 - w[0] - w[1] - w[3];
        }
        4 => {
            // t in [-1/2, 1/2)
            let t2 = t * t;
            let q = 0.5 - t;
            w[0] = q * q * q * q / 24.0;
            w[1] = quartic_flank(1.0 + t);
            w[2] = 115.0 / 192.0 + t2 * (t2 / 4.0 - 5.0 / 8.0);
            let p = 0.5 + t;
            w[4] = p * p * p * p / 24.0;
            w[3] = 1.0 - w[0] - w[1] - w[2] - w[4];
        }
        _ => {
            let u = 1.0 - t;
            let t2 = t * t;
            w[0] = u * u * u * u * u / 120.0;
            w[1] = quintic_flank(1.0 + t);
            w[2] = 11.0 / 20.0 + t2 * (t2 / 4.0 - 0.5) - t2 * t2 * t / 12.0;
            w[4] = quintic_flank(2.0 - t);
            w[5] = t2 * t2 * t / 120.0;
            w[3] = 1.0 - w[0] - w[1] - w[2] - w[4] - w[5];
        }
    }
    start
}

// quartic B-spline on 1/2 <= |x| <= 3/2
fn quartic_flank(x: f64) -> f64 {
    (55.0 + x * (20.0 + x * (-120.0 + x * (80.0 - 16.0 * x)))) / 96.0
}

// quintic B-spline on 1 <= |x| <= 2
fn quintic_flank(x: f64) -> f64 {
    17.0 / 40.0 + x * (5.0 / 8.0 + x * (-7.0 / 4.0 + x * (5.0 / 4.0 + x * (x / 24.0 - 3.0 / 8.0))))
}

/// Poles of the interpolating-spline prefilter for `order`, empty for
/// orders 0 and 1.
pub(crate) fn filter_poles(order: usize) -> Vec<f64> {
    match order {
        2 => vec![8f64.sqrt() - 3.0],
        3 => vec![3f64.sqrt() - 2.0],
        4 => vec![
            (664.0 - 438976f64.sqrt()).sqrt() + 304f64.sqrt() - 19.0,
            (664.0 + 438976f64.sqrt()).sqrt() - 304f64.sqrt() - 19.0,
        ],
        5 => vec![
            (135.0 / 2.0 - (17745.0 / 4.0f64).sqrt()).sqrt() + (105.0 / 4.0f64).sqrt() - 13.0 / 2.0,
            (135.0 / 2.0 + (17745.0 / 4.0f64).sqrt()).sqrt() - (105.0 / 4.0f64).sqrt() - 13.0 / 2.0,
        ],
        _ => Vec::new(),
    }
}
