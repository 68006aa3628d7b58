/*!
Contains the shape features computation functions.
 */

use image::RgbImage;
use imageproc::{
    contours::find_contours,
    distance_transform::Norm,
    geometry::{approximate_polygon_dp, arc_length, min_area_rect},
    morphology::dilate,
};
use log::debug;

use crate::{
    consts::EPSILON,
    error::{FeatureError, Result},
    utils::{crop_center, most_points_contour, otsu_binarize, outer_contours, to_gray, PointsExt},
};

use super::{filter::subtract_log, FeatureConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio {
    pub ratio: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl AspectRatio {
    /// Returned when no bounding rectangle can be measured
    pub const UNDEFINED: AspectRatio = AspectRatio { ratio: -1.0, width: None, height: None };
}

/**
Ratio of the minimum area rectangle bounding the contour with the most points.
Most of the time that contour is the galaxy.
 */
pub(crate) fn aspect_ratio(image: &RgbImage, config: &FeatureConfig) -> AspectRatio {
    match bounding_rect_size(image, config.aspect_crop) {
        Ok((width, height)) => AspectRatio {
            ratio: width / (height + EPSILON),
            width: Some(width),
            height: Some(height),
        },
        Err(err) => {
            debug!("Aspect ratio undefined : {}", err);
            AspectRatio::UNDEFINED
        }
    }
}

fn bounding_rect_size(image: &RgbImage, crop: u32) -> Result<(f64, f64)> {
    let crop = crop_center(image, crop)?;
    let binary = otsu_binarize(&to_gray(&crop));
    let contours = find_contours::<i32>(&binary);
    let contour = most_points_contour(outer_contours(&contours))
        .ok_or(FeatureError::DegenerateGeometry("no external contour in the aspect ratio crop"))?;

    let rect = min_area_rect(&contour.points);
    Ok((rect.distance(0, 1), rect.distance(1, 2)))
}

/**
Circularity of the contour with the most points : `4pi * area / perimeter^2`.
Defined in [0, 1] for continuous shapes, pixel noise can push it slightly above 1.
 */
pub(crate) fn circularity(image: &RgbImage, config: &FeatureConfig) -> Result<f64> {
    let crop = crop_center(image, config.circularity_crop)?;
    let sharpened = subtract_log(&crop, config.log_sigma);
    let binary = otsu_binarize(&to_gray(&sharpened));
    let dilated = dilate(&binary, Norm::LInf, 1);

    let contours = find_contours::<i32>(&dilated);
    let contour = most_points_contour(&contours)
        .ok_or(FeatureError::DegenerateGeometry("no contour in the circularity crop"))?;

    // the pixel staircase inflates the perimeter of curved borders
    let polygon = approximate_polygon_dp(&contour.points, config.contour_epsilon, true);
    let area = polygon.moment_area();
    let perimeter = arc_length(&polygon, true);
    Ok(compacity(area, perimeter))
}

pub(crate) fn compacity(area: f64, perimeter: f64) -> f64 {
    4.0 * std::f64::consts::PI * area / (perimeter * perimeter + EPSILON)
}
