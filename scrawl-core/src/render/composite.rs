use image::{RgbImage, RgbaImage};

use crate::{
    foundation::{core::Line, math::mul_div255_u8},
    page::template::PageTemplate,
};

/// A non-blank line paired with the page position it will be drawn at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinePlacement {
    /// The line to draw.
    pub line: Line,
    /// Baseline Y on the page.
    pub y: u32,
}

/// A processed line image ready for pasting.
#[derive(Clone, Debug)]
pub struct RenderedLine {
    /// Baseline Y on the page.
    pub y: u32,
    /// Straight-alpha line image.
    pub image: RgbaImage,
}

/// How the document's lines were distributed over the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementSummary {
    /// Lines in the processed document.
    pub lines_total: usize,
    /// Lines that will be stylized and pasted.
    pub lines_placed: usize,
    /// Blank lines within the page that only take up a position.
    pub lines_blank: usize,
    /// Lines past the last page position.
    pub lines_truncated: usize,
}

/// Pair lines with page positions in order.
///
/// Blank lines consume a position but are not placed. Lines beyond the last position are
/// dropped: the document is cut at one page.
pub fn plan_placements(lines: &[Line], positions: &[u32]) -> (Vec<LinePlacement>, PlacementSummary) {
    let mut summary = PlacementSummary {
        lines_total: lines.len(),
        lines_truncated: lines.len().saturating_sub(positions.len()),
        ..Default::default()
    };

    let mut placements = Vec::with_capacity(lines.len().min(positions.len()));
    for (line, &y) in lines.iter().zip(positions) {
        if line.is_blank() {
            summary.lines_blank += 1;
            continue;
        }
        placements.push(LinePlacement {
            line: line.clone(),
            y,
        });
    }
    summary.lines_placed = placements.len();
    (placements, summary)
}

/// Pastes line images onto a copy of the page template.
#[derive(Clone, Copy, Debug)]
pub struct PageCompositor {
    margin_left: u32,
}

impl PageCompositor {
    /// Compositor pasting every line at `margin_left`.
    pub fn new(margin_left: u32) -> Self {
        Self { margin_left }
    }

    /// Top edge of a line image of `height` anchored at baseline `y`: its vertical center sits
    /// roughly a third of its height above the baseline.
    pub fn paste_top(y: u32, height: u32) -> i64 {
        i64::from(y) - i64::from(height / 3)
    }

    /// Paste `lines` in order onto a copy of `template`.
    pub fn composite(&self, template: &PageTemplate, lines: &[RenderedLine]) -> RgbImage {
        let mut page = template.image.clone();
        for l in lines {
            let top = Self::paste_top(l.y, l.image.height());
            paste_masked(&mut page, &l.image, i64::from(self.margin_left), top);
        }
        page
    }
}

/// Blend `src` onto `dst` at `(x, y)` using the source alpha as mask; the part falling
/// outside `dst` is clipped.
pub fn paste_masked(dst: &mut RgbImage, src: &RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(dw);
    let y1 = (y + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for py in y0..y1 {
        for px in x0..x1 {
            let s = src.get_pixel((px - x) as u32, (py - y) as u32);
            let a = u16::from(s[3]);
            if a == 0 {
                continue;
            }
            let d = dst.get_pixel_mut(px as u32, py as u32);
            let inv = 255 - a;
            for c in 0..3 {
                let sc = mul_div255_u8(u16::from(s[c]), a);
                let dc = mul_div255_u8(u16::from(d[c]), inv);
                d[c] = sc.saturating_add(dc);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
