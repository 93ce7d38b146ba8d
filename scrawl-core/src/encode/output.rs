use std::path::Path;

use anyhow::Context as _;
use image::{
    ExtendedColorType, ImageEncoder, RgbImage,
    codecs::jpeg::{JpegEncoder, PixelDensity},
};

use crate::{
    config::model::{OutputConfig, OutputFormat},
    foundation::error::{ScrawlError, ScrawlResult},
};

const METERS_PER_INCH: f64 = 0.0254;

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> ScrawlResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Pixels per metre for a resolution in dots per inch.
pub fn dpi_to_ppm(dpi: u32) -> u32 {
    (f64::from(dpi) / METERS_PER_INCH).round() as u32
}

/// Write the finished page to `path` in the configured format, embedding the resolution.
///
/// The image is fully encoded before the file is created, so a failed encode leaves nothing
/// behind.
#[tracing::instrument(skip(page), fields(path = %path.display(), w = page.width(), h = page.height()))]
pub fn save_page(page: &RgbImage, path: &Path, output: &OutputConfig) -> ScrawlResult<()> {
    let mut bytes = Vec::new();
    match output.format {
        OutputFormat::Png => write_png(page, &mut bytes, output.dpi),
        OutputFormat::Jpeg => write_jpeg(page, &mut bytes, output.dpi, output.quality),
    }
    .map_err(|e| ScrawlError::encode(format!("encode '{}': {e:#}", path.display())))?;

    ensure_parent_dir(path)?;
    std::fs::write(path, &bytes).with_context(|| format!("write output '{}'", path.display()))?;

    tracing::debug!(format = ?output.format, dpi = output.dpi, bytes = bytes.len(), "saved page");
    Ok(())
}

fn write_png<W: std::io::Write>(page: &RgbImage, w: W, dpi: u32) -> anyhow::Result<()> {
    let mut encoder = png::Encoder::new(w, page.width(), page.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let ppm = dpi_to_ppm(dpi);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder.write_header().context("png header")?;
    writer
        .write_image_data(page.as_raw())
        .context("png image data")?;
    writer.finish().context("png finish")?;
    Ok(())
}

fn write_jpeg<W: std::io::Write>(page: &RgbImage, w: W, dpi: u32, quality: u8) -> anyhow::Result<()> {
    let mut encoder = JpegEncoder::new_with_quality(w, quality.clamp(1, 100));
    let density = u16::try_from(dpi).unwrap_or(u16::MAX);
    encoder.set_pixel_density(PixelDensity::dpi(density));
    encoder
        .write_image(
            page.as_raw(),
            page.width(),
            page.height(),
            ExtendedColorType::Rgb8,
        )
        .context("jpeg encode")?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/output.rs"]
mod tests;
