use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;
use rusttype::{Font, Scale, point};

use crate::{
    assets::builtin::BuiltinFont,
    config::model::Config,
    foundation::error::{ScrawlError, ScrawlResult},
};

/// Style name under which a fallback face is registered.
pub const FALLBACK_STYLE: &str = "default";

/// Style preferred when neither the requested nor the configured default style is loaded.
pub const REGULAR_STYLE: &str = "regular";

/// A source of glyph metrics and coverage at an arbitrary pixel size.
///
/// Coordinates passed to and produced by [`GlyphSource::rasterize`] are in target pixels with
/// `origin` at the top-left of the glyph cell (the ascender line), matching how text is
/// positioned on a line image.
pub trait GlyphSource: Send + Sync {
    /// Horizontal advance of `ch` at `size_px`.
    fn advance(&self, ch: char, size_px: f32) -> f32;

    /// Distance from the top of the glyph cell to the baseline at `size_px`.
    fn ascent(&self, size_px: f32) -> f32;

    /// Emit `(x, y, coverage)` for every pixel the glyph touches; coverage is in `0.0..=1.0`.
    fn rasterize(
        &self,
        ch: char,
        size_px: f32,
        origin: (f32, f32),
        sink: &mut dyn FnMut(i32, i32, f32),
    );
}

/// TrueType/OpenType face rasterized with `rusttype`.
pub struct TrueTypeFont {
    font: Font<'static>,
}

impl std::fmt::Debug for TrueTypeFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrueTypeFont")
            .field("glyph_count", &self.font.glyph_count())
            .finish()
    }
}

impl TrueTypeFont {
    /// Parse a face from owned font bytes (`index` selects a face inside collections).
    pub fn from_bytes(bytes: Vec<u8>, index: u32) -> ScrawlResult<Self> {
        let font = Font::try_from_vec_and_index(bytes, index)
            .ok_or_else(|| ScrawlError::font("font data could not be parsed"))?;
        Ok(Self { font })
    }

    /// Read and parse a font file.
    pub fn from_path(path: &Path) -> ScrawlResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes, 0)
            .map_err(|e| ScrawlError::font(format!("'{}': {e}", path.display())))
    }
}

impl GlyphSource for TrueTypeFont {
    fn advance(&self, ch: char, size_px: f32) -> f32 {
        self.font
            .glyph(ch)
            .scaled(Scale::uniform(size_px))
            .h_metrics()
            .advance_width
    }

    fn ascent(&self, size_px: f32) -> f32 {
        self.font.v_metrics(Scale::uniform(size_px)).ascent
    }

    fn rasterize(
        &self,
        ch: char,
        size_px: f32,
        origin: (f32, f32),
        sink: &mut dyn FnMut(i32, i32, f32),
    ) {
        let scale = Scale::uniform(size_px);
        let baseline = origin.1 + self.ascent(size_px);
        let glyph = self
            .font
            .glyph(ch)
            .scaled(scale)
            .positioned(point(origin.0, baseline));
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                sink(bb.min.x + gx as i32, bb.min.y + gy as i32, v);
            });
        }
    }
}

/// Loaded handwriting styles keyed by style name.
#[derive(Clone)]
pub struct FontBook {
    faces: HashMap<String, Arc<dyn GlyphSource>>,
    order: Vec<String>,
    default_style: Option<String>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("styles", &self.order)
            .field("default_style", &self.default_style)
            .finish()
    }
}

impl FontBook {
    /// Empty book; `default_style` names the style preferred as fallback.
    pub fn new(default_style: Option<String>) -> Self {
        Self {
            faces: HashMap::new(),
            order: Vec::new(),
            default_style,
        }
    }

    /// Register (or replace) a style. Registration order is the last-resort fallback order.
    pub fn insert(&mut self, style: impl Into<String>, source: Arc<dyn GlyphSource>) {
        let style = style.into();
        if !self.faces.contains_key(&style) {
            self.order.push(style.clone());
        }
        self.faces.insert(style, source);
    }

    /// Load every configured style from `fonts_dir`.
    ///
    /// Missing or unreadable files are skipped with a warning. When nothing loads, a system
    /// sans-serif face is used, and failing that the built-in bitmap face.
    pub fn load(config: &Config, fonts_dir: &Path) -> Self {
        let hw = &config.handwriting;
        let default_style = hw.default_font.as_deref().map(|d| {
            hw.fonts
                .iter()
                .find(|f| f.name == d || f.file == d)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| d.to_string())
        });

        let mut book = Self::new(default_style);
        for entry in &hw.fonts {
            let path = fonts_dir.join(&entry.file);
            match TrueTypeFont::from_path(&path) {
                Ok(font) => {
                    tracing::debug!(style = %entry.name, path = %path.display(), "loaded font");
                    book.insert(entry.name.clone(), Arc::new(font));
                }
                Err(e) => {
                    tracing::warn!(
                        style = %entry.name,
                        path = %path.display(),
                        error = %e,
                        "font file unavailable, style disabled"
                    );
                }
            }
        }

        if book.is_empty() {
            match system_font() {
                Some(font) => {
                    tracing::warn!("no configured fonts loaded, using a system sans-serif face");
                    book.insert(FALLBACK_STYLE, Arc::new(font));
                }
                None => {
                    tracing::warn!("no configured or system fonts available, using built-in face");
                    book.insert(FALLBACK_STYLE, Arc::new(BuiltinFont));
                }
            }
        }
        book
    }

    /// Whether no style is loaded.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Loaded style names in registration order.
    pub fn styles(&self) -> &[String] {
        &self.order
    }

    /// Resolve `style`, falling back to the default style, then `regular`, then the first
    /// registered style.
    pub fn resolve(&self, style: &str) -> ScrawlResult<&Arc<dyn GlyphSource>> {
        if let Some(face) = self.faces.get(style) {
            return Ok(face);
        }
        let fallback = self
            .default_style
            .as_deref()
            .and_then(|d| self.faces.get(d))
            .or_else(|| self.faces.get(REGULAR_STYLE))
            .or_else(|| self.order.first().and_then(|s| self.faces.get(s)));

        match fallback {
            Some(face) => {
                tracing::debug!(requested = style, "unknown style, using fallback face");
                Ok(face)
            }
            None => Err(ScrawlError::font("font book is empty")),
        }
    }
}

fn system_font() -> Option<TrueTypeFont> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let families = [
        usvg::fontdb::Family::SansSerif,
        usvg::fontdb::Family::Serif,
        usvg::fontdb::Family::Monospace,
    ];
    let query = usvg::fontdb::Query {
        families: &families,
        ..Default::default()
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    db.with_face_data(id, |data, index| {
        TrueTypeFont::from_bytes(data.to_vec(), index).ok()
    })
    .flatten()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
