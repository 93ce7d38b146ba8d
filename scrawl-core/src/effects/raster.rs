//! RGBA raster primitives used by the filter chain.
//!
//! Line images are straight-alpha [`RgbaImage`]s. Every resampling operation here works on a
//! premultiplied copy so the undefined color of transparent pixels never bleeds into strokes.

use image::{RgbaImage, imageops::FilterType};

use crate::{
    assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    foundation::{
        core::{Affine, Point},
        error::{ScrawlError, ScrawlResult},
        math::clamp_u8,
    },
};

/// Rotate counter-clockwise by `degrees` about the image center with bicubic resampling.
///
/// The canvas keeps its size; uncovered area becomes fully transparent.
pub fn rotate_bicubic(img: &RgbaImage, degrees: f64) -> RgbaImage {
    let (w, h) = img.dimensions();
    let mut src = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut src);

    let center = Point::new(f64::from(w) / 2.0, f64::from(h) / 2.0);
    // Image space is y-down, so a visually counter-clockwise turn is a negative angle.
    let forward = Affine::rotate_about(-degrees.to_radians(), center);
    let inverse = forward.inverse();

    let mut out = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let px = sample_bicubic_premul(&src, w, h, p.x - 0.5, p.y - 0.5);
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            out[idx..idx + 4].copy_from_slice(&px);
        }
    }

    unpremultiply_rgba8_in_place(&mut out);
    from_raw(w, h, out)
}

/// Catmull-Rom style cubic kernel (`a = -0.5`).
fn cubic_weight(t: f64) -> f64 {
    const A: f64 = -0.5;
    let t = t.abs();
    if t <= 1.0 {
        ((A + 2.0) * t - (A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((A * t - 5.0 * A) * t + 8.0 * A) * t - 4.0 * A
    } else {
        0.0
    }
}

fn sample_bicubic_premul(src: &[u8], w: u32, h: u32, fx: f64, fy: f64) -> [u8; 4] {
    let ix = fx.floor();
    let iy = fy.floor();
    let tx = fx - ix;
    let ty = fy - iy;
    let (ix, iy) = (ix as i64, iy as i64);

    let mut acc = [0f64; 4];
    for m in -1..=2i64 {
        let sy = iy + m;
        if sy < 0 || sy >= i64::from(h) {
            continue;
        }
        let wy = cubic_weight(ty - m as f64);
        if wy == 0.0 {
            continue;
        }
        for n in -1..=2i64 {
            let sx = ix + n;
            if sx < 0 || sx >= i64::from(w) {
                continue;
            }
            let wx = cubic_weight(tx - n as f64);
            if wx == 0.0 {
                continue;
            }
            let idx = ((sy as usize) * (w as usize) + (sx as usize)) * 4;
            let k = wx * wy;
            for c in 0..4 {
                acc[c] += k * f64::from(src[idx + c]);
            }
        }
    }

    let a = clamp_u8(acc[3] as f32);
    let mut out = [0u8; 4];
    for c in 0..3 {
        out[c] = clamp_u8(acc[c] as f32).min(a);
    }
    out[3] = a;
    out
}

/// Resize the width by `factor` (height unchanged) with a Lanczos3 filter.
pub fn stretch_horizontal(img: &RgbaImage, factor: f64) -> RgbaImage {
    let (w, h) = img.dimensions();
    let new_w = ((f64::from(w) * factor) as u32).max(1);

    let mut premul = img.clone();
    premultiply_rgba8_in_place(&mut premul);
    let resized = image::imageops::resize(&premul, new_w, h, FilterType::Lanczos3);

    let mut raw = resized.into_raw();
    for px in raw.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }
    unpremultiply_rgba8_in_place(&mut raw);
    from_raw(new_w, h, raw)
}

/// Gaussian-blur the colors of `img` while keeping its alpha channel bit-exact.
///
/// Blurring runs on premultiplied data; each stroke pixel then takes the blurred color under
/// its original alpha, and transparent pixels are left untouched. The kernel spans `3 * sigma`
/// on each side and edges clamp.
pub fn blur_colors(img: &RgbaImage, sigma: f32) -> ScrawlResult<RgbaImage> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(ScrawlError::validation("blur sigma must be finite and >= 0"));
    }
    let kernel = gaussian_kernel(sigma);
    let (w, h) = img.dimensions();
    if kernel.len() == 1 || w == 0 || h == 0 {
        return Ok(img.clone());
    }

    let mut premul = Vec::<f32>::with_capacity(img.as_raw().len());
    for p in img.pixels() {
        let a = f32::from(p[3]) / 255.0;
        premul.extend_from_slice(&[
            f32::from(p[0]) * a,
            f32::from(p[1]) * a,
            f32::from(p[2]) * a,
            a,
        ]);
    }
    let rows = convolve(&premul, w, h, &kernel, Axis::X);
    let blurred = convolve(&rows, w, h, &kernel, Axis::Y);

    let mut out = img.clone();
    for (dst, b) in out.pixels_mut().zip(blurred.chunks_exact(4)) {
        if dst[3] == 0 || b[3] <= f32::EPSILON {
            continue;
        }
        for c in 0..3 {
            dst[c] = clamp_u8(b[c] / b[3]);
        }
    }
    Ok(out)
}

/// Normalized Gaussian weights for offsets `-r..=r`, `r = ceil(3 * sigma)`.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil() as i32;
    if radius <= 0 {
        return vec![1.0];
    }
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for wt in &mut weights {
        *wt /= sum;
    }
    weights
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn convolve(src: &[f32], w: u32, h: u32, kernel: &[f32], axis: Axis) -> Vec<f32> {
    let (w, h) = (w as i64, h as i64);
    let radius = (kernel.len() / 2) as i64;
    let mut out = vec![0f32; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f32; 4];
            for (k, &wt) in kernel.iter().enumerate() {
                let d = k as i64 - radius;
                let (sx, sy) = match axis {
                    Axis::X => ((x + d).clamp(0, w - 1), y),
                    Axis::Y => (x, (y + d).clamp(0, h - 1)),
                };
                let idx = ((sy * w + sx) * 4) as usize;
                for c in 0..4 {
                    acc[c] += wt * src[idx + c];
                }
            }
            let idx = ((y * w + x) * 4) as usize;
            out[idx..idx + 4].copy_from_slice(&acc);
        }
    }
    out
}

/// Scale color distance from the mean stroke luminance by `factor`.
///
/// Only pixels with non-zero alpha take part, and alpha is never modified.
pub fn enhance_contrast(img: &mut RgbaImage, factor: f32) {
    let mut sum = 0f64;
    let mut count = 0u64;
    for p in img.pixels().filter(|p| p[3] > 0) {
        sum += f64::from(luma(p.0));
        count += 1;
    }
    if count == 0 {
        return;
    }
    let mean = (sum / count as f64) as f32;

    for p in img.pixels_mut().filter(|p| p[3] > 0) {
        for c in 0..3 {
            p[c] = clamp_u8(mean + (f32::from(p[c]) - mean) * factor);
        }
    }
}

fn luma(px: [u8; 4]) -> f32 {
    (299.0 * f32::from(px[0]) + 587.0 * f32::from(px[1]) + 114.0 * f32::from(px[2])) / 1000.0
}

fn from_raw(w: u32, h: u32, raw: Vec<u8>) -> RgbaImage {
    // Every caller sizes `raw` as w*h*4.
    RgbaImage::from_raw(w, h, raw).unwrap_or_else(|| RgbaImage::new(w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/raster.rs"]
mod tests;
