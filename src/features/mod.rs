mod ccv;
mod color;
mod filter;
mod shape;
mod stats;

use image::RgbImage;
use log::debug;

use crate::{
    args::FeatureSet,
    consts::{
        ASPECT_CROP, CCV_BINARY_THRESHOLD, CCV_CROP, CIRCULARITY_CROP, COHERENCE_THRESHOLD,
        CONTOUR_EPSILON, HISTOGRAM_BINS, LOG_SIGMA, NB_COLORS,
    },
    error::{FeatureError, Result},
};

pub use self::{ccv::Ccv, shape::AspectRatio, stats::IntensityStats};
use self::{
    ccv::bin_width,
    color::color_histogram,
    shape::{aspect_ratio, circularity},
    stats::intensity_stats,
};

/// One row of the output, columns given by `FeatureConfig::columns`
pub type FeatureVector = Vec<f64>;

/**
Parameters of the extraction.
Any change to them changes the schema or the values of the feature vectors.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    pub nb_colors: u32,
    pub coherence_threshold: u32,
    pub aspect_crop: u32,
    pub circularity_crop: u32,
    pub ccv_crop: u32,
    pub ccv_binary_threshold: u8,
    pub log_sigma: f32,
    pub contour_epsilon: f64,
    pub(crate) feature_sets: Vec<FeatureSet>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            nb_colors: NB_COLORS,
            coherence_threshold: COHERENCE_THRESHOLD,
            aspect_crop: ASPECT_CROP,
            circularity_crop: CIRCULARITY_CROP,
            ccv_crop: CCV_CROP,
            ccv_binary_threshold: CCV_BINARY_THRESHOLD,
            log_sigma: LOG_SIGMA,
            contour_epsilon: CONTOUR_EPSILON,
            feature_sets: vec![FeatureSet::Geometry, FeatureSet::Ccv],
        }
    }
}

impl FeatureConfig {
    /// Feature sets are always emitted in canonical order whatever the input order
    pub fn with_feature_sets(mut self, feature_sets: &[FeatureSet]) -> Self {
        let mut feature_sets = feature_sets.to_vec();
        feature_sets.sort();
        feature_sets.dedup();
        self.feature_sets = feature_sets;
        self
    }

    pub fn feature_sets(&self) -> &[FeatureSet] {
        &self.feature_sets
    }

    fn has(&self, set: FeatureSet) -> bool {
        self.feature_sets.contains(&set)
    }

    pub fn validate(&self) -> Result<()> {
        let mismatch = |msg: String| Err(FeatureError::ConfigurationMismatch(msg));
        if self.nb_colors == 0 || self.nb_colors > 256 {
            return mismatch(format!("nb_colors must be in [1, 256], got {}", self.nb_colors));
        }
        if 255 / bin_width(self.nb_colors) >= self.nb_colors {
            return mismatch(format!(
                "nb_colors {} leaves intensities outside of the bins (bin width {})",
                self.nb_colors,
                bin_width(self.nb_colors)
            ));
        }
        if self.aspect_crop == 0 || self.circularity_crop == 0 || self.ccv_crop == 0 {
            return mismatch("crop sizes must be positive".to_string());
        }
        if !(self.log_sigma > 0.0) || !(self.contour_epsilon > 0.0) {
            return mismatch("log_sigma and contour_epsilon must be positive".to_string());
        }
        if self.feature_sets.is_empty() {
            return mismatch("at least one feature set is required".to_string());
        }
        Ok(())
    }

    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        for set in &self.feature_sets {
            match set {
                FeatureSet::Geometry => {
                    columns.extend(["aspect_ratio", "bbox_width", "bbox_height", "circularity"].map(String::from));
                }
                FeatureSet::Ccv => {
                    columns.extend((0..self.nb_colors).map(|i| format!("ccv_coherent_{}", i)));
                    columns.extend((0..self.nb_colors).map(|i| format!("ccv_incoherent_{}", i)));
                }
                FeatureSet::Stats => {
                    columns.extend(["entropy", "gini"].map(String::from));
                }
                FeatureSet::Histogram => {
                    for channel in ["b", "g", "r"] {
                        columns.extend((0..HISTOGRAM_BINS).map(|i| format!("hist_{}_{}", channel, i)));
                    }
                }
            }
        }
        columns
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub aspect: AspectRatio,
    /// NaN when no contour could be measured
    pub circularity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyFeatures {
    pub geometry: Option<Geometry>,
    pub ccv: Option<Ccv>,
    pub stats: Option<IntensityStats>,
    pub histogram: Option<[Vec<f64>; 3]>,
}

impl GalaxyFeatures {
    pub fn to_vector(&self) -> FeatureVector {
        let mut vector = Vec::new();
        if let Some(Geometry { aspect, circularity }) = &self.geometry {
            vector.extend([
                aspect.ratio,
                aspect.width.unwrap_or(f64::NAN),
                aspect.height.unwrap_or(f64::NAN),
                *circularity,
            ]);
        }
        if let Some(ccv) = &self.ccv {
            vector.extend(&ccv.coherent);
            vector.extend(&ccv.incoherent);
        }
        if let Some(stats) = &self.stats {
            vector.extend([stats.entropy, stats.gini]);
        }
        if let Some(histogram) = &self.histogram {
            histogram.iter().for_each(|channel| vector.extend(channel));
        }
        vector
    }
}

/// Features of one sample and the recoverable problems met while computing them
#[derive(Debug)]
pub struct Extracted {
    pub features: GalaxyFeatures,
    pub issues: Vec<FeatureError>,
}

pub(crate) fn all_features(image: &RgbImage, config: &FeatureConfig) -> Result<Extracted> {
    let mut issues = Vec::new();

    let geometry = if config.has(FeatureSet::Geometry) {
        let aspect = aspect_ratio(image, config);
        let circularity = match circularity(image, config) {
            Ok(circularity) => circularity,
            Err(err @ FeatureError::DegenerateGeometry(_)) => {
                issues.push(err);
                f64::NAN
            }
            Err(err) => return Err(err),
        };
        debug!("ratio {:.4} circularity {:.4}", aspect.ratio, circularity);
        Some(Geometry { aspect, circularity })
    } else {
        None
    };

    let ccv = if config.has(FeatureSet::Ccv) {
        let ccv = ccv::ccv(image, config)?;
        debug!("ccv over {} pixels", ccv.total());
        Some(ccv)
    } else {
        None
    };

    let stats = config.has(FeatureSet::Stats).then(|| intensity_stats(image));
    if let Some(stats) = &stats {
        debug!("entropy {:.4} gini {:.4}", stats.entropy, stats.gini);
    }

    // Legacy example feature
    let histogram = config.has(FeatureSet::Histogram).then(|| color_histogram(image));

    Ok(Extracted {
        features: GalaxyFeatures { geometry, ccv, stats, histogram },
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use super::shape::tests::disk;

    fn all_sets() -> FeatureConfig {
        FeatureConfig::default()
            .with_feature_sets(&[
                FeatureSet::Histogram, FeatureSet::Stats, FeatureSet::Ccv, FeatureSet::Geometry, FeatureSet::Ccv,
            ])
    }

    #[test]
    fn feature_sets_are_canonical() {
        let config = all_sets();
        assert_eq!(
            config.feature_sets(),
            &[FeatureSet::Geometry, FeatureSet::Ccv, FeatureSet::Stats, FeatureSet::Histogram]
        );
        let columns = config.columns();
        assert_eq!(columns.len(), 4 + 2 * 64 + 2 + 3 * 256);
        assert_eq!(columns[0], "aspect_ratio");
        assert_eq!(columns[4], "ccv_coherent_0");
        assert_eq!(columns[4 + 64], "ccv_incoherent_0");
        assert_eq!(columns[4 + 128], "entropy");
        assert_eq!(columns[4 + 129], "gini");
        assert_eq!(columns[4 + 130], "hist_b_0");
        assert_eq!(columns.last().unwrap(), "hist_r_255");
    }

    #[test]
    fn default_configuration_is_valid() {
        let config = FeatureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.coherence_threshold, 256);
        assert_eq!(config.columns().len(), 4 + 2 * 64);
    }

    #[test]
    fn bad_color_counts_are_rejected() {
        for nb_colors in [0, 100, 257] {
            let config = FeatureConfig { nb_colors, ..FeatureConfig::default() };
            assert!(matches!(config.validate(), Err(FeatureError::ConfigurationMismatch(_))), "{}", nb_colors);
        }
        for nb_colors in [1, 2, 16, 64, 128, 256] {
            let config = FeatureConfig { nb_colors, ..FeatureConfig::default() };
            assert!(config.validate().is_ok(), "{}", nb_colors);
        }
        let empty = FeatureConfig::default().with_feature_sets(&[]);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn vector_matches_columns() {
        let config = all_sets();
        let image = disk(424, 55.0, Rgb([240, 200, 180]));
        let extracted = all_features(&image, &config).unwrap();
        assert!(extracted.issues.is_empty());
        assert_eq!(extracted.features.to_vector().len(), config.columns().len());
    }

    #[test]
    fn extraction_is_reproducible() {
        let config = all_sets();
        let image = RgbImage::from_fn(424, 424, |x, y| {
            let d = ((x as f64 - 212.0).powi(2) + (y as f64 - 200.0).powi(2) * 2.0).sqrt();
            let v = (255.0 - d * 2.0).max(0.0) as u8;
            Rgb([v, v / 2, ((x + y) % 7) as u8])
        });
        let first = all_features(&image, &config).unwrap().features.to_vector();
        let second = all_features(&image, &config).unwrap().features.to_vector();
        let bits = |v: &[f64]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn degenerate_circularity_is_a_sentinel() {
        let extracted = all_features(&RgbImage::new(424, 424), &FeatureConfig::default()).unwrap();
        assert_eq!(extracted.issues.len(), 1);
        let geometry = extracted.features.geometry.as_ref().unwrap();
        assert!(geometry.circularity.is_nan());
        assert_eq!(geometry.aspect, AspectRatio::UNDEFINED);

        let vector = extracted.features.to_vector();
        assert_eq!(vector[0], -1.0);
        assert!(vector[1].is_nan() && vector[2].is_nan() && vector[3].is_nan());
    }

    #[test]
    fn stats_follow_the_ccv_columns() {
        let config = FeatureConfig::default().with_feature_sets(&[FeatureSet::Stats, FeatureSet::Ccv]);
        let image = disk(424, 55.0, Rgb([255, 255, 255]));
        let extracted = all_features(&image, &config).unwrap();
        let stats = extracted.features.stats.unwrap();
        assert!(stats.entropy > 0.0 && stats.entropy < 1.0, "{:?}", stats);
        assert!(stats.gini > 0.5 && stats.gini < 1.0, "{:?}", stats);

        let vector = extracted.features.to_vector();
        assert_eq!(vector.len(), config.columns().len());
        assert_eq!(vector[2 * 64], stats.entropy);
        assert_eq!(vector[2 * 64 + 1], stats.gini);
    }

    #[test]
    fn small_images_fail() {
        let image = RgbImage::from_pixel(120, 120, Rgb([255, 255, 255]));
        assert!(matches!(
            all_features(&image, &FeatureConfig::default()),
            Err(FeatureError::ImageTooSmall { .. })
        ));
    }
}
