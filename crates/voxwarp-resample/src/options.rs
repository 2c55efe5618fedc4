use voxwarp_image::DataType;
use voxwarp_interp::ExtendMode;

/// Knobs of the resampling pipeline.
///
/// The defaults reproduce the most common configuration: cubic splines with
/// prefiltering, out-of-bounds samples filled with zero, and the element type
/// taken from the source image.
///
/// ```
/// use voxwarp_resample::ResampleOptions;
///
/// let options = ResampleOptions {
///     order: 1,
///     ..Default::default()
/// };
/// assert!(options.prefilter);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleOptions {
    /// B-spline order, 0 to 5.
    pub order: usize,
    /// Boundary extension for coordinates that leave the source grid.
    pub mode: ExtendMode,
    /// Fill value for [`ExtendMode::Constant`].
    pub cval: f64,
    /// Whether the source is converted to spline coefficients first. Turning
    /// this off with `order > 1` smooths the output unless the source already
    /// holds coefficients.
    pub prefilter: bool,
    /// Element type stamped on the output image; `None` keeps the source's.
    pub output_dtype: Option<DataType>,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            order: 3,
            mode: ExtendMode::Constant,
            cval: 0.0,
            prefilter: true,
            output_dtype: None,
        }
    }
}
