/*!
Scalar statistics of the gray intensity distribution.
 */
use image::{GrayImage, RgbImage};
use imageproc::stats::histogram;

use crate::{consts::{ENTROPY_EPSILON, HISTOGRAM_BINS}, utils::to_gray};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityStats {
    pub entropy: f64,
    pub gini: f64,
}

fn gray_histogram(gray: &GrayImage) -> [u32; HISTOGRAM_BINS] {
    histogram(gray).channels[0]
}

/**
Shannon entropy (bits) of the 256 bins gray histogram.
The log is taken of `p + 1e-5`, so a single-valued image gives a slightly negative value.
 */
pub(crate) fn entropy(gray: &GrayImage) -> f64 {
    let hist = gray_histogram(gray);
    let total = hist.iter().map(|v| *v as f64).sum::<f64>();
    if total == 0.0 {
        return 0.0;
    }
    -hist.iter()
        .map(|v| *v as f64 / total)
        .map(|p| p * (p + ENTROPY_EPSILON).log2())
        .sum::<f64>()
}

/**
Gini coefficient of the pixel intensities : 0 for a uniform image, close to 1 when the light
sits in a few pixels. An all black image gives 1.
 */
pub(crate) fn gini(gray: &GrayImage) -> f64 {
    let hist = gray_histogram(gray);
    let n = hist.iter().map(|v| *v as f64).sum::<f64>();
    let s = hist.iter().enumerate().map(|(value, count)| value as f64 * *count as f64).sum::<f64>();
    if n == 0.0 || s == 0.0 {
        return 1.0;
    }

    // ranks are given by decreasing intensity, equal intensities share a run of ranks
    let mut start = 0.0;
    let mut weighted = 0.0;
    for (value, count) in hist.iter().enumerate().rev() {
        let count = *count as f64;
        let rank_sum = count * start + count * (count - 1.0) / 2.0;
        weighted += value as f64 * rank_sum;
        start += count;
    }
    1.0 - (2.0 * weighted + s) / (n * s)
}

pub(crate) fn intensity_stats(image: &RgbImage) -> IntensityStats {
    let gray = to_gray(image);
    IntensityStats {
        entropy: entropy(&gray),
        gini: gini(&gray),
    }
}
