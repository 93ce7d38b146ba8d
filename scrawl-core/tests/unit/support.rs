//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::{
    assets::fonts::{FontBook, GlyphSource},
    config::model::Config,
};

/// Glyph double: every non-space character is a solid box, so tests need no font files.
pub(crate) struct BlockFont;

impl GlyphSource for BlockFont {
    fn advance(&self, _ch: char, size_px: f32) -> f32 {
        size_px / 2.0
    }

    fn ascent(&self, size_px: f32) -> f32 {
        size_px * 0.8
    }

    fn rasterize(
        &self,
        ch: char,
        size_px: f32,
        origin: (f32, f32),
        sink: &mut dyn FnMut(i32, i32, f32),
    ) {
        if ch.is_whitespace() {
            return;
        }
        let w = (size_px * 0.4).round() as i32;
        let h = (size_px * 0.8).round() as i32;
        let (ox, oy) = (origin.0.round() as i32, origin.1.round() as i32);
        for y in oy..oy + h {
            for x in ox..ox + w {
                sink(x, y, 1.0);
            }
        }
    }
}

pub(crate) fn block_book() -> FontBook {
    let mut book = FontBook::new(None);
    book.insert("regular", Arc::new(BlockFont));
    book
}

/// Small page: 10 line positions of 40px each, starting at y=40.
pub(crate) fn small_config() -> Config {
    Config::from_yaml_str(
        r#"
paper:
  width: 600
  height: 480
  margin_top: 40
  margin_bottom: 40
  margin_left: 20
  margin_right: 20
  line_height: 40
handwriting:
  size: 16
"#,
    )
    .unwrap()
}

/// Route `tracing` output through the test harness; safe to call from every test.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
