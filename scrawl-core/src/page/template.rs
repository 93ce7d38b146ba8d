use std::path::Path;

use image::{Rgb, RgbImage};

use crate::{
    assets::decode::decode_template,
    config::model::{Config, PaperConfig},
    foundation::{core::Rgb8, error::ScrawlResult},
};

/// Thickness of synthesized ruling lines, in pixels.
pub const RULE_WIDTH: u32 = 2;

/// Base page raster plus the baseline positions available for text.
#[derive(Clone, Debug)]
pub struct PageTemplate {
    /// Page pixels.
    pub image: RgbImage,
    /// Baseline Y of each text line, top to bottom.
    pub positions: Vec<u32>,
}

/// Y coordinates of the text lines on a page.
///
/// Starts at `margin_top` and steps by `line_height`; a position is kept only while its whole
/// line band ends at or before `height - margin_bottom`. The count is therefore
/// `floor((height - margin_top - margin_bottom) / line_height)`, or zero when the margins
/// consume the page.
pub fn line_positions(paper: &PaperConfig) -> Vec<u32> {
    let step = u64::from(paper.line_height);
    if step == 0 {
        return Vec::new();
    }
    let limit = u64::from(paper.height).saturating_sub(u64::from(paper.margin_bottom));

    let mut out = Vec::new();
    let mut y = u64::from(paper.margin_top);
    while y + step <= limit {
        out.push(y as u32);
        y += step;
    }
    out
}

impl PageTemplate {
    /// Load the configured template image, or synthesize a ruled page when it is absent or
    /// cannot be decoded.
    pub fn load_or_create(config: &Config, templates_dir: &Path) -> ScrawlResult<Self> {
        let positions = line_positions(&config.paper);

        if let Some(name) = config.paper.template.as_deref() {
            let path = templates_dir.join(name);
            match decode_template(&path) {
                Ok(image) => {
                    tracing::debug!(path = %path.display(), "loaded page template");
                    return Ok(Self { image, positions });
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "page template unavailable, synthesizing a ruled page"
                    );
                }
            }
        }

        Ok(Self::synthesize(&config.paper))
    }

    /// Build a blank page with a ruling line at every line position.
    pub fn synthesize(paper: &PaperConfig) -> Self {
        let positions = line_positions(paper);
        let image = ruled_page(
            paper.width,
            paper.height,
            &positions,
            paper.background,
            paper.rule_color,
        );
        Self { image, positions }
    }
}

fn ruled_page(width: u32, height: u32, positions: &[u32], bg: Rgb8, rule: Rgb8) -> RgbImage {
    let mut image = RgbImage::from_pixel(width, height, Rgb(bg.to_array()));
    let rule = Rgb(rule.to_array());
    for &y in positions {
        for row in y..(y + RULE_WIDTH).min(height) {
            for x in 0..width {
                image.put_pixel(x, row, rule);
            }
        }
    }
    image
}

#[cfg(test)]
#[path = "../../tests/unit/page/template.rs"]
mod tests;
