//! Price-list feed error types.

use crate::store::StoreError;

/// Errors that can occur when fetching a price list.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed returned an error status
    #[error("feed error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

/// Errors from one refresh attempt.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("fetch failed: {0}")]
    Feed(#[from] FeedError),

    #[error("ingestion failed: {0}")]
    Store(#[from] StoreError),
}
