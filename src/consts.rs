/*!
Default parameters of the feature extraction.
Changing any of these changes the output schema or the numeric values of the features.
 */

/// Side of the centered crop used for the aspect ratio
pub const ASPECT_CROP: u32 = 300;
/// Side of the centered crop used for the circularity
pub const CIRCULARITY_CROP: u32 = 170;
/// Side of the centered crop used for the color coherence vector
pub const CCV_CROP: u32 = 160;

pub const NB_COLORS: u32 = 64;
/// 1% of the CCV crop area
pub const COHERENCE_THRESHOLD: u32 = CCV_CROP * CCV_CROP / 100;
pub const CCV_BINARY_THRESHOLD: u8 = 127;

pub const LOG_SIGMA: f32 = 20.0;
/// Tolerance (px) of the polygon approximation used for the circularity perimeter
pub const CONTOUR_EPSILON: f64 = 1.0;

pub const HISTOGRAM_BINS: usize = 256;
/// Added to the bin probabilities before the log of the entropy
pub const ENTROPY_EPSILON: f64 = 1e-5;

/// Added to denominators instead of branching on zero
pub const EPSILON: f64 = 1e-10;

pub const IMAGE_EXTENSION: &str = ".jpg";
