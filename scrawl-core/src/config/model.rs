use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::{
    core::Rgb8,
    error::{ScrawlError, ScrawlResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Immutable render configuration.
///
/// Loaded once with [`Config::from_path`] (or deserialized directly and passed through
/// [`Config::validate`]) and then shared read-only by every pipeline stage.
pub struct Config {
    /// Page geometry and template.
    pub paper: PaperConfig,
    /// Font selection, ink color and variation parameters.
    pub handwriting: HandwritingConfig,
    /// Output encoding.
    #[serde(default)]
    pub output: OutputConfig,
    /// Root for `fonts/` and `templates/` lookups.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Page geometry in pixels.
pub struct PaperConfig {
    /// Page width.
    pub width: u32,
    /// Page height.
    pub height: u32,
    /// Distance from the top edge to the first line position.
    pub margin_top: u32,
    /// Reserved space at the bottom edge.
    pub margin_bottom: u32,
    /// Horizontal origin of every pasted line.
    pub margin_left: u32,
    /// Reserved space at the right edge.
    pub margin_right: u32,
    /// Vertical step between consecutive line positions.
    pub line_height: u32,
    /// Template image file name under `<assets_dir>/templates/`.
    #[serde(default)]
    pub template: Option<String>,
    /// Wrap width in characters.
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,
    /// Background of a synthesized page.
    #[serde(default = "default_background")]
    pub background: Rgb8,
    /// Ruling color of a synthesized page.
    #[serde(default = "default_rule_color")]
    pub rule_color: Rgb8,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One named handwriting style backed by a font file.
pub struct FontEntry {
    /// Style name (`regular`, `neat`, `messy`, ...).
    pub name: String,
    /// Font file name under `<assets_dir>/fonts/`.
    pub file: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Handwriting appearance.
pub struct HandwritingConfig {
    /// Base font size in pixels. Fixed for the whole render.
    pub size: f32,
    /// Anchor ink color for the pressure model.
    #[serde(default = "default_ink")]
    pub color: Rgb8,
    /// Available styles, in preference order.
    #[serde(default)]
    pub fonts: Vec<FontEntry>,
    /// Preferred fallback style, by style name or font file name.
    #[serde(default)]
    pub default_font: Option<String>,
    /// Enables the rotation/stretch/jitter stage.
    #[serde(default = "default_true")]
    pub variations: bool,
    /// Ranges for the rotation/stretch/jitter stage.
    #[serde(default)]
    pub variation_params: VariationParams,
    /// Per-glyph variation applied while drawing.
    #[serde(default)]
    pub variation: GlyphVariation,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Line-level geometric variation.
pub struct VariationParams {
    /// Maximum absolute rotation in degrees.
    #[serde(default = "default_rotation")]
    pub rotation: f64,
    /// Amplitude of the sinusoidal baseline warp in pixels.
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for VariationParams {
    fn default() -> Self {
        Self {
            rotation: default_rotation(),
            jitter: default_jitter(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Glyph-level variation. Zero disables each term.
pub struct GlyphVariation {
    /// Maximum vertical shift per glyph, in pixels.
    #[serde(default)]
    pub baseline: f32,
    /// Maximum extra advance per glyph, as a fraction of its advance.
    #[serde(default)]
    pub spacing: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Container format of the written page. Names are matched case-insensitively.
pub enum OutputFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// Lossy JPEG (`jpeg` or `jpg`).
    Jpeg,
}

impl TryFrom<String> for OutputFormat {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            _ => Err(format!("unknown output format '{s}', expected png or jpeg")),
        }
    }
}

impl From<OutputFormat> for String {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
        .to_owned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Output encoding settings.
pub struct OutputConfig {
    /// Container format.
    #[serde(default)]
    pub format: OutputFormat,
    /// Resolution stored in the image metadata.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    /// JPEG quality, 1..=100. Ignored for PNG.
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            dpi: default_dpi(),
            quality: default_quality(),
        }
    }
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_max_chars_per_line() -> usize {
    80
}

fn default_background() -> Rgb8 {
    Rgb8::new(255, 255, 255)
}

fn default_rule_color() -> Rgb8 {
    Rgb8::new(200, 200, 220)
}

fn default_ink() -> Rgb8 {
    Rgb8::new(0, 51, 153)
}

fn default_true() -> bool {
    true
}

fn default_rotation() -> f64 {
    1.5
}

fn default_jitter() -> f64 {
    2.0
}

fn default_dpi() -> u32 {
    300
}

fn default_quality() -> u8 {
    95
}

impl Config {
    /// Read, parse and validate a configuration file.
    ///
    /// `.json` files are parsed as JSON, everything else as YAML. A relative `assets_dir` is
    /// resolved against the directory holding the config file.
    pub fn from_path(path: &Path) -> ScrawlResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let mut cfg = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };

        if cfg.assets_dir.is_relative()
            && let Some(parent) = path.parent()
        {
            cfg.assets_dir = parent.join(&cfg.assets_dir);
        }
        Ok(cfg)
    }

    /// Parse and validate YAML configuration text.
    pub fn from_yaml_str(text: &str) -> ScrawlResult<Self> {
        let cfg: Self = serde_yaml::from_str(text)
            .map_err(|e| ScrawlError::config(format!("parse yaml: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate JSON configuration text.
    pub fn from_json_str(text: &str) -> ScrawlResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| ScrawlError::config(format!("parse json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Directory searched for style font files.
    pub fn fonts_dir(&self) -> PathBuf {
        self.assets_dir.join("fonts")
    }

    /// Directory searched for the page template.
    pub fn templates_dir(&self) -> PathBuf {
        self.assets_dir.join("templates")
    }

    /// Check every value the pipeline relies on; reports the first violation.
    pub fn validate(&self) -> ScrawlResult<()> {
        let p = &self.paper;
        if p.width == 0 {
            return Err(invalid("$.paper.width", "must be > 0"));
        }
        if p.height == 0 {
            return Err(invalid("$.paper.height", "must be > 0"));
        }
        if p.line_height == 0 {
            return Err(invalid("$.paper.line_height", "must be > 0"));
        }
        if p.max_chars_per_line == 0 {
            return Err(invalid("$.paper.max_chars_per_line", "must be > 0"));
        }
        if u64::from(p.margin_left) + u64::from(p.margin_right) >= u64::from(p.width) {
            return Err(invalid(
                "$.paper.margin_left",
                "left + right margins must leave room on the page",
            ));
        }

        let h = &self.handwriting;
        if !h.size.is_finite() || h.size <= 0.0 {
            return Err(invalid("$.handwriting.size", "must be finite and > 0"));
        }
        non_negative("$.handwriting.variation_params.rotation", h.variation_params.rotation)?;
        non_negative("$.handwriting.variation_params.jitter", h.variation_params.jitter)?;
        non_negative("$.handwriting.variation.baseline", f64::from(h.variation.baseline))?;
        non_negative("$.handwriting.variation.spacing", f64::from(h.variation.spacing))?;

        let mut seen = HashSet::new();
        for (i, f) in h.fonts.iter().enumerate() {
            if f.name.trim().is_empty() {
                return Err(invalid(
                    &format!("$.handwriting.fonts[{i}].name"),
                    "must be non-empty",
                ));
            }
            if f.file.trim().is_empty() {
                return Err(invalid(
                    &format!("$.handwriting.fonts[{i}].file"),
                    "must be non-empty",
                ));
            }
            if !seen.insert(f.name.as_str()) {
                return Err(invalid(
                    &format!("$.handwriting.fonts[{i}].name"),
                    format!("duplicate style '{}'", f.name),
                ));
            }
        }

        let o = &self.output;
        if o.dpi == 0 {
            return Err(invalid("$.output.dpi", "must be > 0"));
        }
        if !(1..=100).contains(&o.quality) {
            return Err(invalid("$.output.quality", "must be within 1..=100"));
        }
        Ok(())
    }
}

fn invalid(path: &str, msg: impl std::fmt::Display) -> ScrawlError {
    ScrawlError::config(format!("{path}: {msg}"))
}

fn non_negative(path: &str, v: f64) -> ScrawlResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(invalid(path, "must be finite and >= 0"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
