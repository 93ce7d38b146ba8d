use image::RgbaImage;
use rand::Rng;

use crate::{
    effects::raster::{blur_colors, enhance_contrast, rotate_bicubic, stretch_horizontal},
    foundation::error::ScrawlResult,
};

/// Horizontal stretch factor range.
pub const STRETCH_RANGE: std::ops::RangeInclusive<f64> = 0.98..=1.02;
/// Column period divisor of the baseline wave: `sin(x / JITTER_PERIOD)`.
pub const JITTER_PERIOD: f64 = 30.0;
/// Standard deviation of the scan blur, in pixels.
pub const SCAN_BLUR_SIGMA: f32 = 0.3;
/// Per-channel noise bound of the scan effect.
pub const SCAN_NOISE: i16 = 3;
/// Contrast factor of the scan effect.
pub const SCAN_CONTRAST: f32 = 1.05;

/// Rotate, stretch and wave-warp a rendered line.
///
/// The rotation angle is drawn from `[-rotation_range, rotation_range]` degrees and the stretch
/// factor from [`STRETCH_RANGE`]; the output width follows the stretch.
#[tracing::instrument(level = "trace", skip(img, rng), fields(w = img.width(), h = img.height()))]
pub fn apply_variation<R: Rng + ?Sized>(
    img: &RgbaImage,
    rotation_range: f64,
    jitter_range: f64,
    rng: &mut R,
) -> RgbaImage {
    let angle = if rotation_range > 0.0 {
        rng.gen_range(-rotation_range..=rotation_range)
    } else {
        0.0
    };
    let rotated = rotate_bicubic(img, angle);

    let factor = rng.gen_range(STRETCH_RANGE);
    let stretched = stretch_horizontal(&rotated, factor);

    jitter_warp(&stretched, jitter_range)
}

/// Vertical per-column displacement producing a wavy baseline.
///
/// Column `x` samples row `y + round(sin(x / 30) * jitter_range)`, clamped to the image. The
/// sample is written only when it is part of a stroke (alpha > 0); otherwise the pixel keeps
/// its original value.
pub fn jitter_warp(img: &RgbaImage, jitter_range: f64) -> RgbaImage {
    let (w, h) = img.dimensions();
    let mut out = img.clone();
    if h == 0 {
        return out;
    }
    let max_y = i64::from(h) - 1;

    for x in 0..w {
        let offset = ((f64::from(x) / JITTER_PERIOD).sin() * jitter_range).round();
        let offset = offset.clamp(-(max_y as f64) - 1.0, max_y as f64 + 1.0) as i64;
        if offset == 0 {
            continue;
        }
        for y in 0..h {
            let src_y = (i64::from(y) + offset).clamp(0, max_y) as u32;
            let sample = *img.get_pixel(x, src_y);
            if sample[3] > 0 {
                out.put_pixel(x, y, sample);
            }
        }
    }
    out
}

/// Blur, noise and contrast simulating a scanned page.
///
/// Dimensions and the alpha channel are preserved exactly; only colors of pixels with
/// non-zero alpha change.
#[tracing::instrument(level = "trace", skip(img, rng), fields(w = img.width(), h = img.height()))]
pub fn apply_scan_effects<R: Rng + ?Sized>(img: &RgbaImage, rng: &mut R) -> ScrawlResult<RgbaImage> {
    let mut out = blur_colors(img, SCAN_BLUR_SIGMA)?;
    add_pixel_noise(&mut out, rng);
    enhance_contrast(&mut out, SCAN_CONTRAST);
    Ok(out)
}

/// Add independent noise in `[-3, 3]` to each color channel of every non-transparent pixel.
pub fn add_pixel_noise<R: Rng + ?Sized>(img: &mut RgbaImage, rng: &mut R) {
    for p in img.pixels_mut().filter(|p| p[3] > 0) {
        for c in 0..3 {
            let noise = rng.gen_range(-SCAN_NOISE..=SCAN_NOISE);
            p[c] = (i16::from(p[c]) + noise).clamp(0, 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filters.rs"]
mod tests;
