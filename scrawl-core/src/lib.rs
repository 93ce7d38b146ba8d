//! Scrawl turns plain text into a raster image that looks handwritten on a lined page.
//!
//! # Pipeline overview
//!
//! 1. **Layout**: text is wrapped to the page width and re-spaced with irregular letter and word
//!    gaps ([`wrap`], [`space_for_handwriting`])
//! 2. **Placement**: lines are paired with the page's line positions; the document is cut at one
//!    page ([`plan_placements`])
//! 3. **Stylize**: each line is drawn glyph by glyph into its own transparent RGBA buffer with a
//!    pen-pressure color model ([`GlyphStylizer`])
//! 4. **Filter**: rotation, stretch and a wavy baseline, then blur, noise and contrast
//!    ([`apply_variation`], [`apply_scan_effects`])
//! 5. **Composite**: line buffers are pasted onto a copy of the page template
//!    ([`PageCompositor`]) and written out ([`save_page`])
//!
//! All randomness flows through an explicit `rand::Rng`; pass a seed in [`RenderOpts`] for
//! reproducible pages.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Straight alpha**: line buffers hold non-premultiplied RGBA8, and every filter keeps
//!   fully transparent pixels transparent.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod effects;
mod encode;
mod foundation;
mod page;
mod render;
mod text;

pub use assets::builtin::BuiltinFont;
pub use assets::decode::{decode_template, decode_template_bytes};
pub use assets::fonts::{FALLBACK_STYLE, FontBook, GlyphSource, REGULAR_STYLE, TrueTypeFont};
pub use config::model::{
    Config, FontEntry, GlyphVariation, HandwritingConfig, OutputConfig, OutputFormat, PaperConfig,
    VariationParams,
};
pub use effects::filters::{
    JITTER_PERIOD, SCAN_BLUR_SIGMA, SCAN_CONTRAST, SCAN_NOISE, STRETCH_RANGE, add_pixel_noise,
    apply_scan_effects, apply_variation, jitter_warp,
};
pub use effects::raster::{blur_colors, enhance_contrast, rotate_bicubic, stretch_horizontal};
pub use encode::output::{dpi_to_ppm, ensure_parent_dir, save_page};
pub use foundation::core::{Line, Rgb8};
pub use foundation::error::{ScrawlError, ScrawlResult};
pub use foundation::math::derive_seed;
pub use foundation::rng::seeded_rng;
pub use page::template::{PageTemplate, RULE_WIDTH, line_positions};
pub use render::composite::{
    LinePlacement, PageCompositor, PlacementSummary, RenderedLine, paste_masked, plan_placements,
};
pub use render::glyph::{GlyphStylizer, pen_color};
pub use render::pipeline::{
    RenderOpts, RenderStats, RenderThreading, render_document, render_line_image,
};
pub use text::layout::{space_for_handwriting, wrap};

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;
