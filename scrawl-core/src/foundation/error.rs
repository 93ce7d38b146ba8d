/// Convenience result type used across Scrawl.
pub type ScrawlResult<T> = Result<T, ScrawlError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ScrawlError {
    /// Invalid user-provided parameters or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration could not be read, parsed or validated.
    #[error("config error: {0}")]
    Config(String),

    /// No usable glyph source could be resolved.
    #[error("font error: {0}")]
    Font(String),

    /// Errors while stylizing, filtering or compositing pixels.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while writing the final page image.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrawlError {
    /// Build a [`ScrawlError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrawlError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ScrawlError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`ScrawlError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScrawlError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
