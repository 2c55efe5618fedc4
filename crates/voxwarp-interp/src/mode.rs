/// How coordinates outside the data extent are resolved.
///
/// The variants mirror the boundary handling of the classic grid-aligned
/// resamplers: the requested coordinate is folded back into the extent
/// `[0, n - 1]` of each axis before the spline is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtendMode {
    /// Samples mapped outside the extent take a constant fill value.
    #[default]
    Constant,
    /// Clamp to the nearest edge sample.
    Nearest,
    /// Half-sample symmetry: the extension reflects about the outer sample
    /// edges (`b a | a b c d | d c`).
    Reflect,
    /// Whole-sample symmetry: the extension reflects about the edge samples
    /// themselves (`c b | a b c d | c b`).
    Mirror,
    /// Periodic extension with the first and last samples coinciding.
    Wrap,
}

impl ExtendMode {
    /// Folds the coordinate `x` into the extent of an axis with `n` samples.
    ///
    /// `Constant` returns `x` unchanged; the caller decides out-of-bounds
    /// samples before folding. Axes with a single sample fold everything
    /// to zero.
    pub fn fold(self, x: f64, n: usize) -> f64 {
        if n <= 1 {
            return 0.0;
        }
        let last = (n - 1) as f64;
        if (0.0..=last).contains(&x) {
            return x;
        }
        match self {
            ExtendMode::Constant => x,
            ExtendMode::Nearest => x.clamp(0.0, last),
            ExtendMode::Reflect => {
                let period = 2.0 * n as f64;
                let mut t = (x + 0.5).rem_euclid(period);
                if t >= n as f64 {
                    t = period - t;
                }
                t - 0.5
            }
            ExtendMode::Mirror => {
                let period = 2.0 * last;
                let t = x.rem_euclid(period);
                if t > last {
                    period - t
                } else {
                    t
                }
            }
            ExtendMode::Wrap => x.rem_euclid(last),
        }
    }
}

/// Folds a spline footprint index into `[0, len - 1]` by whole-sample
/// mirroring. All modes extend the spline support this way, which is what
/// keeps prefiltered evaluation exact on the sample grid.
pub(crate) fn fold_footprint(index: i64, len: usize) -> usize {
    let n = len as i64;
    if n <= 1 {
        return 0;
    }
    let period = 2 * n - 2;
    let mut t = index.rem_euclid(period);
    if t >= n {
        t = period - t;
    }
    t as usize
}
