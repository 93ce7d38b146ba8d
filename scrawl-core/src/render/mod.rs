pub(crate) mod composite;
pub(crate) mod glyph;
pub(crate) mod pipeline;
