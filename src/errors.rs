//! Error types for quakemap.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in quakemap operations.
#[derive(Error, Debug)]
pub enum QuakemapError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// API returned an error status
    #[error("USGS API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid response structure
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Event validation failed
    #[error("Invalid event data: {0}")]
    Validation(String),

    /// The feed could not be loaded; the map renders without markers
    #[error("earthquake feed unavailable ({url}): {source}")]
    FeedUnavailable {
        url: String,
        #[source]
        source: Box<QuakemapError>,
    },

    /// Tile service credential is absent
    #[error("missing tile service credential: set {0}")]
    MissingCredential(&'static str),
}

impl QuakemapError {
    /// Whether this error only degrades the view instead of aborting it.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::FeedUnavailable { .. })
    }
}
