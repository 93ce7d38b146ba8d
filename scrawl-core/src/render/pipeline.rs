use image::{RgbImage, RgbaImage};
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::{
    assets::fonts::FontBook,
    config::model::Config,
    effects::filters::{apply_scan_effects, apply_variation},
    foundation::{
        error::{ScrawlError, ScrawlResult},
        math::derive_seed,
        rng::seeded_rng,
    },
    page::template::PageTemplate,
    render::{
        composite::{LinePlacement, PageCompositor, RenderedLine, plan_placements},
        glyph::GlyphStylizer,
    },
    text::layout::{space_for_handwriting, wrap},
};

/// How line images are produced.
///
/// Sequential rendering draws every random value from one source in document order. Parallel
/// rendering gives each line its own source derived from a base seed and the line index, so the
/// result does not depend on the number of worker threads.
#[derive(Clone, Debug, Default)]
pub struct RenderThreading {
    /// Render lines on a rayon pool.
    pub parallel: bool,
    /// Worker count for the pool; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Counters describing one document render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Lines after wrapping.
    pub lines_total: usize,
    /// Lines stylized and pasted.
    pub lines_placed: usize,
    /// Blank lines that only consumed a position.
    pub lines_blank: usize,
    /// Lines dropped past the end of the page.
    pub lines_truncated: usize,
}

/// Options for [`render_document`].
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Handwriting style name.
    pub style: String,
    /// Seed for reproducible output; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Sequential or parallel line rendering.
    pub threading: RenderThreading,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            style: crate::assets::fonts::REGULAR_STYLE.to_owned(),
            seed: None,
            threading: RenderThreading::default(),
        }
    }
}

/// Turn `text` into a handwritten page.
///
/// Pipeline:
/// 1. [`wrap`] to `max_chars_per_line`, then [`space_for_handwriting`]
/// 2. [`plan_placements`] against the template positions; truncated lines are never rendered
/// 3. per line: [`GlyphStylizer::render_line`], [`apply_variation`] (when enabled),
///    [`apply_scan_effects`]
/// 4. [`PageCompositor::composite`] in line order
#[tracing::instrument(skip_all, fields(style = %opts.style, parallel = opts.threading.parallel))]
pub fn render_document(
    config: &Config,
    fonts: &FontBook,
    template: &PageTemplate,
    text: &str,
    opts: &RenderOpts,
) -> ScrawlResult<(RgbImage, RenderStats)> {
    let mut rng = seeded_rng(opts.seed);

    let wrapped = wrap(text, config.paper.max_chars_per_line);
    let spaced = space_for_handwriting(&wrapped, &mut rng);
    let (placements, summary) = plan_placements(&spaced, &template.positions);

    if summary.lines_truncated > 0 {
        tracing::warn!(
            dropped = summary.lines_truncated,
            positions = template.positions.len(),
            "document does not fit on one page, truncating"
        );
    }

    let stylizer = GlyphStylizer::new(fonts, &config.handwriting);
    let rendered = if opts.threading.parallel {
        let base = rng.next_u64();
        let pool = build_thread_pool(opts.threading.threads)?;
        pool.install(|| {
            placements
                .par_iter()
                .map(|p| {
                    let mut line_rng = StdRng::seed_from_u64(derive_seed(base, p.line.index as u64));
                    render_placement(config, &stylizer, &opts.style, p, &mut line_rng)
                })
                .collect::<ScrawlResult<Vec<_>>>()
        })?
    } else {
        placements
            .iter()
            .map(|p| render_placement(config, &stylizer, &opts.style, p, &mut rng))
            .collect::<ScrawlResult<Vec<_>>>()?
    };

    let page = PageCompositor::new(config.paper.margin_left).composite(template, &rendered);

    let stats = RenderStats {
        lines_total: summary.lines_total,
        lines_placed: rendered.len(),
        lines_blank: summary.lines_blank,
        lines_truncated: summary.lines_truncated,
    };
    tracing::info!(
        lines = stats.lines_total,
        placed = stats.lines_placed,
        blank = stats.lines_blank,
        truncated = stats.lines_truncated,
        "rendered page"
    );
    Ok((page, stats))
}

/// Stylize and post-process a single line.
pub fn render_line_image<R: Rng + ?Sized>(
    config: &Config,
    stylizer: &GlyphStylizer<'_>,
    style: &str,
    text: &str,
    rng: &mut R,
) -> ScrawlResult<RgbaImage> {
    let img = stylizer.render_line(text, style, rng)?;
    let hw = &config.handwriting;
    let img = if hw.variations {
        apply_variation(
            &img,
            hw.variation_params.rotation,
            hw.variation_params.jitter,
            rng,
        )
    } else {
        img
    };
    apply_scan_effects(&img, rng)
}

fn render_placement<R: Rng + ?Sized>(
    config: &Config,
    stylizer: &GlyphStylizer<'_>,
    style: &str,
    placement: &LinePlacement,
    rng: &mut R,
) -> ScrawlResult<RenderedLine> {
    tracing::debug!(
        index = placement.line.index,
        y = placement.y,
        chars = placement.line.char_len(),
        "rendering line"
    );
    let image = render_line_image(config, stylizer, style, &placement.line.text, rng)?;
    Ok(RenderedLine {
        y: placement.y,
        image,
    })
}

fn build_thread_pool(threads: Option<usize>) -> ScrawlResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ScrawlError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ScrawlError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
