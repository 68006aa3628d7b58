/*!
Smoothing and sharpening applied before binarization.
Both work on float planes and round back to u8 once at the end.
 */
use image::RgbImage;
use imageproc::filter::separable_filter;

use crate::utils::{merge_planes, split_planes, FloatPlane};

/// What a 3x3 gaussian kernel with an automatic sigma reduces to
const BINOMIAL_3: [f32; 3] = [0.25, 0.5, 0.25];

pub(crate) fn gaussian_blur_3x3(image: &RgbImage) -> RgbImage {
    let planes = split_planes(image)
        .map(|plane| separable_filter(&plane, &BINOMIAL_3[..], &BINOMIAL_3[..]));
    merge_planes(&planes)
}

/// Sampled gaussian and its second derivative, both over `[-radius, radius]`
fn gaussian_kernels(sigma: f32) -> (Vec<f32>, Vec<f32>) {
    let radius = (4.0 * sigma + 0.5) as i32;
    let sigma2 = sigma * sigma;
    let mut gaussian = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f32 / sigma2).exp())
        .collect::<Vec<_>>();
    let sum: f32 = gaussian.iter().sum();
    gaussian.iter_mut().for_each(|g| *g /= sum);

    let second = (-radius..=radius)
        .zip(gaussian.iter())
        .map(|(x, g)| g * ((x * x) as f32 - sigma2) / (sigma2 * sigma2))
        .collect::<Vec<_>>();
    (gaussian, second)
}

/// Laplacian of gaussian of a single plane, computed separably
pub(crate) fn laplacian_of_gaussian(plane: &FloatPlane, sigma: f32) -> FloatPlane {
    let (gaussian, second) = gaussian_kernels(sigma);
    let mut dxx = separable_filter(plane, &second[..], &gaussian[..]);
    let dyy = separable_filter(plane, &gaussian[..], &second[..]);
    dxx.pixels_mut()
        .zip(dyy.pixels())
        .for_each(|(a, b)| a[0] += b[0]);
    dxx
}

/**
High-pass sharpening : subtract the laplacian of gaussian of each channel from the channel.
Removes the smooth background gradients before thresholding.
 */
pub(crate) fn subtract_log(image: &RgbImage, sigma: f32) -> RgbImage {
    let planes = split_planes(image).map(|mut plane| {
        let log = laplacian_of_gaussian(&plane, sigma);
        plane.pixels_mut()
            .zip(log.pixels())
            .for_each(|(p, l)| p[0] -= l[0]);
        plane
    });
    merge_planes(&planes)
}
