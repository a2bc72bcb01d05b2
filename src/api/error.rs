//! Error types for the content API

use thiserror::Error;

/// Errors that can occur when talking to the content backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Backend requires a logged-in user
    #[error("Not logged in")]
    Unauthorized,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Chapter payload matched none of the accepted shapes
    #[error("Unexpected chapter response: {0}")]
    UnexpectedShape(String),

    /// Chapter payload held no verses
    #[error("No verses found for surah {0}")]
    EmptyChapter(u16),

    /// Response carried an embedded error marker
    #[error("Backend reported: {0}")]
    ErrorMarker(String),
}

impl ApiError {
    /// Check if this error means the user must log in first
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::ApiError { status: 401, .. })
    }
}
