use image::{Rgba, RgbaImage};
use rand::Rng;

use crate::{
    assets::fonts::{FontBook, GlyphSource},
    config::model::{GlyphVariation, HandwritingConfig},
    foundation::{core::Rgb8, error::ScrawlResult},
};

/// Left edge of the first glyph inside a line image.
const START_X: f32 = 10.0;
/// Extra width allocated on top of the text estimate, for rotation and stretch.
const WIDTH_SLACK: u32 = 100;
/// Line image height as a multiple of the font size.
const HEIGHT_FACTOR: f32 = 3.0;

const PRESSURE_MIN: f64 = 0.85;
const PRESSURE_MAX: f64 = 1.0;
const RG_NOISE: i32 = 5;
const BLUE_NOISE: i32 = 10;
const LIGHT_STROKE_PROBABILITY: f64 = 0.2;
const LIGHT_STROKE_ALPHA: std::ops::RangeInclusive<u8> = 180..=240;
const ADVANCE_JITTER: std::ops::RangeInclusive<i32> = -1..=2;

/// Draws one line of text into its own transparent RGBA image, one glyph at a time.
#[derive(Clone, Debug)]
pub struct GlyphStylizer<'a> {
    fonts: &'a FontBook,
    size_px: f32,
    ink: Rgb8,
    variation: GlyphVariation,
}

impl<'a> GlyphStylizer<'a> {
    /// Stylizer drawing with `fonts` at the configured size, ink and glyph variation.
    pub fn new(fonts: &'a FontBook, handwriting: &HandwritingConfig) -> Self {
        Self {
            fonts,
            size_px: handwriting.size,
            ink: handwriting.color,
            variation: handwriting.variation,
        }
    }

    /// Pixel size of the line image allocated for `text`.
    pub fn canvas_size(&self, text: &str) -> (u32, u32) {
        let chars = text.chars().count() as f32;
        let width = (chars * self.size_px / 2.0) as u32 + WIDTH_SLACK;
        let height = ((self.size_px * HEIGHT_FACTOR) as u32).max(1);
        (width, height)
    }

    /// Render `text` in `style` (unknown styles fall back, see [`FontBook::resolve`]).
    ///
    /// Pixels outside glyph strokes stay fully transparent.
    pub fn render_line<R: Rng + ?Sized>(
        &self,
        text: &str,
        style: &str,
        rng: &mut R,
    ) -> ScrawlResult<RgbaImage> {
        let face = self.fonts.resolve(style)?;
        let (width, height) = self.canvas_size(text);
        let mut img = RgbaImage::new(width, height);

        // Glyph cells are centered on the line's vertical middle.
        let mut x = START_X;
        let y = (height / 2) as f32 - face.ascent(self.size_px) / 2.0;
        for ch in text.chars() {
            let advance = face.advance(ch, self.size_px);
            if ch == ' ' {
                x += advance + rng.gen_range(ADVANCE_JITTER) as f32;
                continue;
            }

            let color = pen_color(self.ink, rng);
            let dy = symmetric(rng, self.variation.baseline);
            draw_glyph(&mut img, face.as_ref(), ch, self.size_px, (x, y + dy), color);

            let spread = symmetric(rng, self.variation.spacing) * advance;
            x += advance + spread + rng.gen_range(ADVANCE_JITTER) as f32;
        }
        Ok(img)
    }
}

/// Ink color for one glyph under the pressure model.
///
/// A pressure factor in `[0.85, 1.0]` darkens the anchor color, each channel then gets
/// independent noise (wider on blue, as with ballpoint ink), and a fifth of the glyphs are
/// drawn with a lighter stroke.
pub fn pen_color<R: Rng + ?Sized>(ink: Rgb8, rng: &mut R) -> Rgba<u8> {
    let pressure = rng.gen_range(PRESSURE_MIN..=PRESSURE_MAX);
    let press = |c: u8| ((f64::from(c) * pressure) as i32).min(255);

    let r = (press(ink.r) + rng.gen_range(-RG_NOISE..=RG_NOISE)).clamp(0, 255) as u8;
    let g = (press(ink.g) + rng.gen_range(-RG_NOISE..=RG_NOISE)).clamp(0, 255) as u8;
    let b = (press(ink.b) + rng.gen_range(-BLUE_NOISE..=BLUE_NOISE)).clamp(0, 255) as u8;

    let a = if rng.gen_bool(LIGHT_STROKE_PROBABILITY) {
        rng.gen_range(LIGHT_STROKE_ALPHA)
    } else {
        255
    };
    Rgba([r, g, b, a])
}

fn symmetric<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    if range > 0.0 {
        rng.gen_range(-range..=range)
    } else {
        0.0
    }
}

fn draw_glyph(
    img: &mut RgbaImage,
    face: &dyn GlyphSource,
    ch: char,
    size_px: f32,
    origin: (f32, f32),
    color: Rgba<u8>,
) {
    let (w, h) = (img.width() as i32, img.height() as i32);
    face.rasterize(ch, size_px, origin, &mut |x, y, coverage| {
        if x < 0 || y < 0 || x >= w || y >= h {
            return;
        }
        let px = img.get_pixel_mut(x as u32, y as u32);
        *px = over_straight(*px, color, coverage);
    });
}

/// Source-over for straight-alpha pixels, with `src` alpha scaled by `coverage`.
pub(crate) fn over_straight(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let sa = f32::from(src[3]) / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let a8 = (out_a * 255.0).round() as u8;
    if a8 == 0 {
        return dst;
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (f32::from(src[c]) * sa + f32::from(dst[c]) * da * (1.0 - sa)) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = a8;
    Rgba(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/glyph.rs"]
mod tests;
