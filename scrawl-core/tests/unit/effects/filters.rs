use image::Rgba;
use rand::{SeedableRng, rngs::StdRng};

use super::*;
use crate::{render::glyph::GlyphStylizer, test_support::{block_book, small_config}};

fn rendered_line(seed: u64) -> RgbaImage {
    let book = block_book();
    let cfg = small_config();
    GlyphStylizer::new(&book, &cfg.handwriting)
        .render_line("the quick brown fox", "regular", &mut StdRng::seed_from_u64(seed))
        .unwrap()
}

fn alpha_mask(img: &RgbaImage) -> Vec<u8> {
    img.pixels().map(|p| p[3]).collect()
}

#[test]
fn scan_effects_preserve_dimensions_and_alpha() {
    for seed in 0..4 {
        let img = rendered_line(seed);
        let out = apply_scan_effects(&img, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert_eq!(out.dimensions(), img.dimensions());
        assert_eq!(alpha_mask(&out), alpha_mask(&img));
    }
}

#[test]
fn noise_stays_within_bound_and_skips_transparent_pixels() {
    let mut img = RgbaImage::new(30, 30);
    for y in 0..30 {
        for x in 0..15 {
            img.put_pixel(x, y, Rgba([0, 128, 255, if y % 2 == 0 { 255 } else { 90 }]));
        }
    }
    let before = img.clone();
    add_pixel_noise(&mut img, &mut StdRng::seed_from_u64(11));

    let mut changed = 0;
    for (a, b) in before.pixels().zip(img.pixels()) {
        assert_eq!(a[3], b[3]);
        if a[3] == 0 {
            assert_eq!(a, b);
            continue;
        }
        for c in 0..3 {
            let d = (i16::from(a[c]) - i16::from(b[c])).abs();
            assert!(d <= SCAN_NOISE, "{a:?} -> {b:?}");
            changed += usize::from(d != 0);
        }
    }
    assert!(changed > 0);
}

#[test]
fn jitter_warp_with_zero_range_is_identity() {
    let img = rendered_line(1);
    assert_eq!(jitter_warp(&img, 0.0), img);
}

#[test]
fn jitter_warp_clamps_huge_offsets() {
    let img = rendered_line(2);
    for range in [1e3, -1e3, 1e9, 48.0] {
        let out = jitter_warp(&img, range);
        assert_eq!(out.dimensions(), img.dimensions());
    }
}

#[test]
fn jitter_warp_tiny_images() {
    let img = RgbaImage::from_pixel(3, 1, Rgba([1, 2, 3, 255]));
    assert_eq!(jitter_warp(&img, 50.0), img);
    let empty = RgbaImage::new(0, 0);
    assert_eq!(jitter_warp(&empty, 5.0).dimensions(), (0, 0));
}

#[test]
fn jitter_warp_shifts_strokes_by_sine_offset() {
    // A single stroke pixel per column at row 10.
    let mut img = RgbaImage::new(100, 21);
    for x in 0..100 {
        img.put_pixel(x, 10, Rgba([0, 0, 0, 255]));
    }
    let out = jitter_warp(&img, 4.0);
    for x in 0..100u32 {
        let offset = ((f64::from(x) / JITTER_PERIOD).sin() * 4.0).round() as i64;
        let y = (10 - offset) as u32;
        assert_eq!(out.get_pixel(x, y)[3], 255, "x={x} offset={offset}");
    }
}

#[test]
fn jitter_warp_never_clears_strokes() {
    let img = rendered_line(3);
    let out = jitter_warp(&img, 3.0);
    for (a, b) in img.pixels().zip(out.pixels()) {
        if a[3] > 0 {
            assert!(b[3] > 0);
        }
    }
}

#[test]
fn variation_changes_width_within_stretch_range() {
    let img = rendered_line(4);
    for seed in 0..8 {
        let out = apply_variation(&img, 1.5, 2.0, &mut StdRng::seed_from_u64(seed));
        let w = f64::from(img.width());
        assert_eq!(out.height(), img.height());
        assert!(f64::from(out.width()) >= (w * 0.98).floor() - 1.0);
        assert!(f64::from(out.width()) <= w * 1.02);
        assert!(out.pixels().any(|p| p[3] > 0));
    }
}

#[test]
fn variation_keeps_transparent_border() {
    let img = rendered_line(5);
    let out = apply_variation(&img, 1.5, 2.0, &mut StdRng::seed_from_u64(5));
    for x in 0..out.width() {
        assert_eq!(out.get_pixel(x, 0)[3], 0);
    }
}
