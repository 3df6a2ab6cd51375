//! Error types for the non-pipeline parts of the crate.
//!
//! The chunking pipeline itself never fails: an empty article or a page
//! without placeholder slots is reported as a fallback value.  Errors only
//! come from configuration, feed decoding and the async loading layer.

use thiserror::Error;

/// Result type alias for article-chunker operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A [`ChunkOptions`][crate::ChunkOptions] or [`PageLayout`][crate::PageLayout]
    /// value that the pipeline cannot work with.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// JSON could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// The feed JSON decoded but does not have the expected shape.
    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    /// No article with the requested id.
    #[error("Article not found: {0}")]
    NotFound(String),

    /// The source did not answer within the configured fetch timeout.
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// Any other failure reported by an [`ArticleSource`][crate::ArticleSource].
    #[error("Source error: {0}")]
    Source(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
