//! Error types for the stream listing client

/// Result type alias for listing and catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or applying a stream listing
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Listing request returned HTTP status {0}")]
    HttpStatus(u16),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Listing document has an unexpected shape
    #[error("Invalid listing: {0}")]
    InvalidListing(String),

    /// No stream with this id in the catalog
    #[error("Stream not found: {0}")]
    StreamNotFound(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid listing error
    pub fn invalid_listing(msg: impl Into<String>) -> Self {
        Self::InvalidListing(msg.into())
    }
}
