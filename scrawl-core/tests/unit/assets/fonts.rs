use super::*;

struct Marker(f32);

impl GlyphSource for Marker {
    fn advance(&self, _ch: char, _size_px: f32) -> f32 {
        self.0
    }

    fn ascent(&self, size_px: f32) -> f32 {
        size_px
    }

    fn rasterize(
        &self,
        _ch: char,
        _size_px: f32,
        _origin: (f32, f32),
        _sink: &mut dyn FnMut(i32, i32, f32),
    ) {
    }
}

fn advance_of(book: &FontBook, style: &str) -> f32 {
    book.resolve(style).unwrap().advance('a', 10.0)
}

#[test]
fn exact_style_wins() {
    let mut book = FontBook::new(None);
    book.insert("regular", Arc::new(Marker(1.0)));
    book.insert("neat", Arc::new(Marker(2.0)));
    assert_eq!(advance_of(&book, "neat"), 2.0);
    assert_eq!(book.styles(), &["regular".to_string(), "neat".to_string()]);
}

#[test]
fn unknown_style_prefers_configured_default() {
    let mut book = FontBook::new(Some("messy".to_string()));
    book.insert("regular", Arc::new(Marker(1.0)));
    book.insert("messy", Arc::new(Marker(3.0)));
    assert_eq!(advance_of(&book, "cursive"), 3.0);
}

#[test]
fn unknown_style_then_regular_then_first() {
    let mut book = FontBook::new(Some("missing".to_string()));
    book.insert("neat", Arc::new(Marker(2.0)));
    book.insert("regular", Arc::new(Marker(1.0)));
    assert_eq!(advance_of(&book, "cursive"), 1.0);

    let mut book = FontBook::new(None);
    book.insert("neat", Arc::new(Marker(2.0)));
    book.insert("messy", Arc::new(Marker(3.0)));
    assert_eq!(advance_of(&book, "cursive"), 2.0);
}

#[test]
fn empty_book_is_an_error() {
    let book = FontBook::new(None);
    assert!(book.is_empty());
    let err = book.resolve("regular").err().unwrap();
    assert!(err.to_string().contains("font error"));
}

#[test]
fn missing_font_files_degrade_to_a_fallback_face() {
    crate::test_support::init_tracing();
    let yaml = r#"
paper: { width: 100, height: 100, margin_top: 0, margin_bottom: 0,
         margin_left: 0, margin_right: 0, line_height: 10 }
handwriting:
  size: 20
  fonts:
    - { name: regular, file: nope_regular.ttf }
    - { name: neat, file: nope_neat.ttf }
"#;
    let cfg = Config::from_yaml_str(yaml).unwrap();
    let book = FontBook::load(&cfg, Path::new("does/not/exist"));
    assert_eq!(book.styles(), &[FALLBACK_STYLE.to_string()]);
    let face = book.resolve("neat").unwrap();
    assert!(face.advance('a', 20.0) > 0.0);
}

#[test]
fn default_font_may_name_a_file() {
    let yaml = r#"
paper: { width: 100, height: 100, margin_top: 0, margin_bottom: 0,
         margin_left: 0, margin_right: 0, line_height: 10 }
handwriting:
  size: 20
  default_font: neat.ttf
  fonts:
    - { name: regular, file: regular.ttf }
    - { name: neat, file: neat.ttf }
"#;
    let cfg = Config::from_yaml_str(yaml).unwrap();
    let book = FontBook::load(&cfg, Path::new("does/not/exist"));
    assert_eq!(book.default_style.as_deref(), Some("neat"));
}

#[test]
fn garbage_bytes_are_not_a_font() {
    let err = TrueTypeFont::from_bytes(b"nope".to_vec(), 0).unwrap_err();
    assert!(err.to_string().contains("font error"));
}
