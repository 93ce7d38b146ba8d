pub use kurbo::{Affine, Point};

/// Straight (non-premultiplied) RGB color, as written in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array, `[r, g, b]`.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        c.to_array()
    }
}

/// One line of processed document text.
///
/// `index` is the zero-based position in the processed output and is kept stable through
/// spacing, so it doubles as the line's slot on the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// Zero-based position in the processed document.
    pub index: usize,
    /// Line content; blank lines are empty strings.
    pub text: String,
}

impl Line {
    /// Build a line at `index`.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Whether the line has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Length in characters (Unicode scalar values), not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
