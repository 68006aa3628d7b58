use image::{GrayImage, Luma, Rgb, RgbImage, imageops};
use imageproc::{
    contours::{BorderType, Contour},
    contrast::{otsu_level, threshold, ThresholdType},
    definitions::Image,
    point::Point,
};

use crate::error::{FeatureError, Result};

pub type FloatPlane = Image<Luma<f32>>;
pub type ContourPoint = Point<i32>;

/**
Crop a `size`x`size` square around the center of the image
 */
pub(crate) fn crop_center(image: &RgbImage, size: u32) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if size == 0 || width < size || height < size {
        return Err(FeatureError::ImageTooSmall { width, height, crop: size });
    }
    let x = width / 2 - size / 2;
    let y = height / 2 - size / 2;
    Ok(imageops::crop_imm(image, x, y, size, size).to_image())
}

/// BT.601 luma, the weights used by the reference outputs
pub(crate) fn to_gray(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Otsu's automatic threshold followed by a binary rule (above the level -> 255)
pub(crate) fn otsu_binarize(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    threshold(gray, level, ThresholdType::Binary)
}

pub(crate) fn split_planes(image: &RgbImage) -> [FloatPlane; 3] {
    let plane = |c: usize| FloatPlane::from_fn(image.width(), image.height(), |x, y| {
        Luma([image.get_pixel(x, y)[c] as f32])
    });
    [plane(0), plane(1), plane(2)]
}

/// Inverse of `split_planes`, rounding and saturating to u8
pub(crate) fn merge_planes(planes: &[FloatPlane; 3]) -> RgbImage {
    let (width, height) = planes[0].dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let px = |c: usize| planes[c].get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8;
        Rgb([px(0), px(1), px(2)])
    })
}

/**
Keep only the points of a closed chain where the step direction changes.
Straight runs (horizontal, vertical or diagonal) are reduced to their two end points.
 */
pub(crate) fn compress_chain(points: &[ContourPoint]) -> Vec<ContourPoint> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }
    (0..n)
        .filter(|&i| {
            let (prev, p, next) = (points[(i + n - 1) % n], points[i], points[(i + 1) % n]);
            (p.x - prev.x, p.y - prev.y) != (next.x - p.x, next.y - p.y)
        })
        .map(|i| points[i])
        .collect()
}

/**
Select the contour with the most points once its straight runs are compressed.
Ties go to the first contour found, the point count is not an area ranking.
 */
pub(crate) fn most_points_contour<'a, I>(contours: I) -> Option<&'a Contour<i32>>
where
    I: IntoIterator<Item = &'a Contour<i32>>,
    I::IntoIter: DoubleEndedIterator,
{
    contours.into_iter()
        .rev()
        .max_by_key(|contour| compress_chain(&contour.points).len())
}

pub(crate) fn outer_contours(contours: &[Contour<i32>]) -> Vec<&Contour<i32>> {
    contours.iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .collect()
}

pub trait PointsExt {
    /// Zeroth moment (area) of the closed polygon
    fn moment_area(&self) -> f64;
    fn distance(&self, a: usize, b: usize) -> f64;
}

impl PointsExt for [ContourPoint] {
    fn moment_area(&self) -> f64 {
        if self.len() < 3 {
            return 0.0;
        }
        let mut doubled = 0.0;
        for i in 0..self.len() {
            let p1 = self[i];
            let p2 = self[(i + 1) % self.len()];
            doubled += p1.x as f64 * p2.y as f64 - p2.x as f64 * p1.y as f64;
        }
        (doubled * 0.5).abs()
    }

    fn distance(&self, a: usize, b: usize) -> f64 {
        let (p1, p2) = (self[a], self[b]);
        ((p1.x - p2.x) as f64).hypot((p1.y - p2.y) as f64)
    }
}
