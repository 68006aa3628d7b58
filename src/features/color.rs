use image::RgbImage;
use imageproc::stats::histogram;

/**
Per channel intensity histograms of the whole image, in BGR order.
# Arguments
* `image` - RGB image
# Returns
[blue, green, red], 256 bins each
 */
pub fn color_histogram(image: &RgbImage) -> [Vec<f64>; 3] {
    let hist = histogram(image);
    let channel = |c: usize| hist.channels[c].iter().map(|v| *v as f64).collect::<Vec<_>>();
    [channel(2), channel(1), channel(0)]
}
