/// On-disk element types the pipeline can stamp on its outputs.
///
/// The data handed around in memory is always `f64`; these describe how a
/// loader decoded an image and how a writer should store one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Unsigned 8-bit integers.
    Uint8,
    /// Signed 16-bit integers.
    Int16,
    /// Signed 32-bit integers.
    Int32,
    /// 32-bit floats.
    Float32,
    /// 64-bit floats.
    Float64,
}

impl DataType {
    /// Whether values of this type are integers.
    pub fn is_integer(self) -> bool {
        matches!(self, DataType::Uint8 | DataType::Int16 | DataType::Int32)
    }

    /// Quantizes `v` to what storing it in this type would preserve.
    ///
    /// Integer types truncate toward zero and saturate at the type limits;
    /// `Float32` rounds through `f32`.
    pub fn cast_value(self, v: f64) -> f64 {
        match self {
            DataType::Uint8 => int_cast(v, 0.0, u8::MAX as f64),
            DataType::Int16 => int_cast(v, i16::MIN as f64, i16::MAX as f64),
            DataType::Int32 => int_cast(v, i32::MIN as f64, i32::MAX as f64),
            DataType::Float32 => v as f32 as f64,
            DataType::Float64 => v,
        }
    }
}

fn int_cast(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.trunc().clamp(lo, hi)
}

/// Decoded header metadata carried alongside an image.
///
/// The pipeline treats this as opaque apart from the element type and the
/// intensity scaling flag, which together decide the element type of a
/// resampled result.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageHeader {
    /// Element type the image uses on disk.
    pub data_type: DataType,
    /// Slope and intercept a loader applied while decoding, if any.
    pub slope_inter: Option<(f64, f64)>,
}

impl ImageHeader {
    /// Creates a header for the given on-disk element type.
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            slope_inter: None,
        }
    }

    /// Records the intensity scaling the loader applied.
    pub fn with_scaling(mut self, slope: f64, inter: f64) -> Self {
        self.slope_inter = Some((slope, inter));
        self
    }

    /// Returns a copy of the header stamped with a new element type.
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Whether decoding rescaled the raw values.
    pub fn has_scaling(&self) -> bool {
        matches!(self.slope_inter, Some((s, i)) if s != 1.0 || i != 0.0)
    }
}

impl Default for ImageHeader {
    fn default() -> Self {
        Self::new(DataType::Float64)
    }
}

/// Element type of a resampled result.
///
/// An explicit request wins; otherwise scaled images promote to `Float64`
/// and unscaled images keep their on-disk type. Without a header the data is
/// plain `f64`.
pub fn effective_dtype(header: Option<&ImageHeader>, requested: Option<DataType>) -> DataType {
    if let Some(dt) = requested {
        return dt;
    }
    match header {
        Some(h) if h.has_scaling() => DataType::Float64,
        Some(h) => h.data_type,
        None => DataType::Float64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_type_wins() {
        let header = ImageHeader::new(DataType::Int16).with_scaling(2.0, 0.5);
        assert_eq!(
            effective_dtype(Some(&header), Some(DataType::Uint8)),
            DataType::Uint8
        );
    }

    #[test]
    fn scaling_promotes_to_f64() {
        let scaled = ImageHeader::new(DataType::Int16).with_scaling(2.0, 0.0);
        assert_eq!(effective_dtype(Some(&scaled), None), DataType::Float64);

        let unit = ImageHeader::new(DataType::Int16).with_scaling(1.0, 0.0);
        assert_eq!(effective_dtype(Some(&unit), None), DataType::Int16);

        let plain = ImageHeader::new(DataType::Float32);
        assert_eq!(effective_dtype(Some(&plain), None), DataType::Float32);

        assert_eq!(effective_dtype(None, None), DataType::Float64);
    }

    #[test]
    fn integer_casts_truncate_and_saturate() {
        assert_eq!(DataType::Uint8.cast_value(3.9), 3.0);
        assert_eq!(DataType::Uint8.cast_value(-0.5), 0.0);
        assert_eq!(DataType::Uint8.cast_value(300.0), 255.0);
        assert_eq!(DataType::Int16.cast_value(-3.9), -3.0);
        assert_eq!(DataType::Int16.cast_value(1e9), 32767.0);
        assert_eq!(DataType::Int32.cast_value(f64::NAN), 0.0);
        assert_eq!(DataType::Float64.cast_value(0.1), 0.1);
    }

    #[test]
    fn float32_cast_drops_precision() {
        let v = 1.000_000_1_f64;
        let cast = DataType::Float32.cast_value(v);
        assert_eq!(cast, v as f32 as f64);
        assert_ne!(cast, v);
    }

    #[test]
    fn restamping_keeps_scaling() {
        let header = ImageHeader::new(DataType::Int16)
            .with_scaling(2.0, 1.0)
            .with_data_type(DataType::Float32);
        assert_eq!(header.data_type, DataType::Float32);
        assert!(header.has_scaling());
    }
}
