/*!
Color coherence vector.

Pixels are split per quantized color between coherent (belonging to a large connected region)
and incoherent (scattered) pixels. Two deviations from the textbook algorithm are kept so the
values match the reference outputs :
- the color of a component is read at the origin of its bounding box, not per pixel
- the three channel passes accumulate into the same vectors
 */
use image::{GrayImage, Luma, RgbImage};
use imageproc::{
    contrast::{threshold, ThresholdType},
    definitions::Image,
    region_labelling::{connected_components, Connectivity},
};

use crate::{error::Result, utils::crop_center};

use super::{filter::gaussian_blur_3x3, FeatureConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Ccv {
    pub coherent: Vec<f64>,
    pub incoherent: Vec<f64>,
}

impl Ccv {
    pub fn new(nb_colors: usize) -> Self {
        Self {
            coherent: vec![0.0; nb_colors],
            incoherent: vec![0.0; nb_colors],
        }
    }

    fn accumulate(&mut self, other: &Ccv) {
        self.coherent.iter_mut().zip(&other.coherent).for_each(|(a, b)| *a += b);
        self.incoherent.iter_mut().zip(&other.incoherent).for_each(|(a, b)| *a += b);
    }

    pub fn total(&self) -> f64 {
        self.coherent.iter().sum::<f64>() + self.incoherent.iter().sum::<f64>()
    }
}

/// Width of a quantization bin
pub(crate) fn bin_width(nb_colors: u32) -> u32 {
    256 / nb_colors
}

/// Every channel bucketed independently into `nb_colors` equal-width bins
pub(crate) fn quantize(image: &RgbImage, nb_colors: u32) -> RgbImage {
    let div = bin_width(nb_colors);
    let mut quantized = image.clone();
    quantized.pixels_mut()
        .flat_map(|p| p.0.iter_mut())
        .for_each(|v| *v = (*v as u32 / div * div) as u8);
    quantized
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ComponentStats {
    pub(crate) area: u32,
    pub(crate) left: u32,
    pub(crate) top: u32,
}

/// Area and bounding box origin of every label, label `l` at index `l - 1`
pub(crate) fn component_stats(labels: &Image<Luma<u32>>) -> Vec<ComponentStats> {
    let count = labels.pixels().map(|p| p[0]).max().unwrap_or(0) as usize;
    let mut stats = vec![ComponentStats { area: 0, left: u32::MAX, top: u32::MAX }; count];
    for (x, y, label) in labels.enumerate_pixels() {
        if label[0] == 0 {
            continue;
        }
        let s = &mut stats[label[0] as usize - 1];
        s.area += 1;
        s.left = s.left.min(x);
        s.top = s.top.min(y);
    }
    stats
}

/**
Coherent and incoherent pixel counts of a single quantized channel.
Only the foreground (above the binary threshold) is counted.
 */
pub(crate) fn channel_ccv(channel: &GrayImage, config: &FeatureConfig) -> Ccv {
    let div = bin_width(config.nb_colors);
    let mut ccv = Ccv::new(config.nb_colors as usize);

    let binary = threshold(channel, config.ccv_binary_threshold, ThresholdType::Binary);
    let labels = connected_components(&binary, Connectivity::Eight, Luma([0u8]));

    let (width, height) = channel.dimensions();
    for ComponentStats { area, left, top } in component_stats(&labels) {
        // components anchored outside the channel are skipped
        if left >= width || top >= height {
            continue;
        }
        let bin = (channel.get_pixel(left, top)[0] as u32 / div) as usize;
        if area >= config.coherence_threshold {
            ccv.coherent[bin] += area as f64;
        } else {
            ccv.incoherent[bin] += area as f64;
        }
    }
    ccv
}

pub(crate) fn ccv(image: &RgbImage, config: &FeatureConfig) -> Result<Ccv> {
    let crop = crop_center(image, config.ccv_crop)?;
    let quantized = quantize(&gaussian_blur_3x3(&crop), config.nb_colors);

    let mut ccv = Ccv::new(config.nb_colors as usize);
    for c in 0..3 {
        let channel = GrayImage::from_fn(quantized.width(), quantized.height(), |x, y| {
            Luma([quantized.get_pixel(x, y)[c]])
        });
        ccv.accumulate(&channel_ccv(&channel, config));
    }
    Ok(ccv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shape::tests::disk;
    use image::Rgb;

    fn config(nb_colors: u32) -> FeatureConfig {
        FeatureConfig { nb_colors, ..FeatureConfig::default() }
    }

    #[test]
    fn quantization_floors_to_bin_start() {
        let image = RgbImage::from_pixel(2, 2, Rgb([0, 131, 255]));
        assert_eq!(*quantize(&image, 64).get_pixel(0, 0), Rgb([0, 128, 252]));
        assert_eq!(*quantize(&image, 2).get_pixel(1, 1), Rgb([0, 128, 128]));
        assert_eq!(quantize(&image, 256), image);
    }

    #[test]
    fn stats_track_area_and_origin() {
        let mut labels = Image::<Luma<u32>>::new(5, 5);
        labels.put_pixel(3, 1, Luma([1]));
        labels.put_pixel(2, 2, Luma([1]));
        labels.put_pixel(4, 4, Luma([2]));
        assert_eq!(component_stats(&labels), vec![
            ComponentStats { area: 2, left: 2, top: 1 },
            ComponentStats { area: 1, left: 4, top: 4 },
        ]);
    }

    #[test]
    fn components_split_by_size() {
        let mut channel = GrayImage::new(60, 60);
        // 20x20 block : coherent
        for y in 5..25 {
            for x in 5..25 {
                channel.put_pixel(x, y, Luma([200]));
            }
        }
        // three 2x2 blocks : incoherent
        for (ox, oy) in [(40, 40), (50, 40), (40, 50)] {
            for y in oy..oy + 2 {
                for x in ox..ox + 2 {
                    channel.put_pixel(x, y, Luma([248]));
                }
            }
        }
        // below the binary threshold : ignored
        channel.put_pixel(55, 5, Luma([124]));

        let ccv = channel_ccv(&channel, &config(64));
        assert_eq!(ccv.coherent[50], 400.0);
        assert_eq!(ccv.incoherent[62], 12.0);
        assert_eq!(ccv.total(), 412.0);
    }

    #[test]
    fn vectors_have_one_entry_per_color() {
        let image = disk(424, 40.0, Rgb([200, 90, 255]));
        for nb_colors in [1, 8, 64, 256] {
            let ccv = ccv(&image, &config(nb_colors)).unwrap();
            assert_eq!(ccv.coherent.len(), nb_colors as usize);
            assert_eq!(ccv.incoherent.len(), nb_colors as usize);
        }
    }

    #[test]
    fn totals_match_foreground_per_channel() {
        let image = RgbImage::from_fn(424, 424, |x, y| {
            Rgb([((x * 7 + y * 3) % 256) as u8, ((x * y) % 251) as u8, ((x ^ y) % 256) as u8])
        });
        let config = config(64);
        let quantized = quantize(&gaussian_blur_3x3(&crop_center(&image, 160).unwrap()), 64);

        let mut expected = 0.0;
        for c in 0..3 {
            let channel = GrayImage::from_fn(160, 160, |x, y| Luma([quantized.get_pixel(x, y)[c]]));
            let foreground = channel.pixels().filter(|p| p[0] > 127).count() as f64;
            assert_eq!(channel_ccv(&channel, &config).total(), foreground);
            expected += foreground;
        }
        assert_eq!(ccv(&image, &config).unwrap().total(), expected);
    }

    #[test]
    fn white_disk_is_one_coherent_region() {
        let radius = 50.0;
        let image = disk(424, radius, Rgb([255, 255, 255]));
        let config = config(64);
        let quantized = quantize(&gaussian_blur_3x3(&crop_center(&image, 160).unwrap()), 64);
        let channel = GrayImage::from_fn(160, 160, |x, y| Luma([quantized.get_pixel(x, y)[0]]));

        let ccv = channel_ccv(&channel, &config);
        let area = std::f64::consts::PI * radius * radius;
        let filled = ccv.coherent.iter().filter(|v| **v > 0.0).count();
        assert_eq!(filled, 1);
        assert!(ccv.incoherent.iter().all(|v| *v == 0.0));
        assert!((ccv.total() - area).abs() < 2.0 * std::f64::consts::PI * radius);

        // the three channels see the same disk
        let full = super::ccv(&image, &config).unwrap();
        assert_eq!(full.total(), 3.0 * ccv.total());
    }

    #[test]
    fn black_image_has_empty_vectors() {
        let ccv = ccv(&RgbImage::new(424, 424), &config(64)).unwrap();
        assert_eq!(ccv, Ccv::new(64));
    }
}
