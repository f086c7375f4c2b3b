//! Store client error types.

use std::sync::Arc;

/// Errors from the Firestore REST client.
#[derive(Debug, thiserror::Error)]
pub enum FirestoreError {
    /// Missing VODSITE_PROJECT_ID environment variable.
    #[error("missing project id: VODSITE_PROJECT_ID not set")]
    MissingProjectId,

    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Authentication or permission failure for the selected project.
    #[error("authentication failed: project not accessible")]
    AuthError,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FirestoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { FirestoreError::Timeout } else { FirestoreError::Network(Arc::new(err)) }
    }
}
