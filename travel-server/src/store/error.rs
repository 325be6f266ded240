//! Store error types.

use std::path::PathBuf;

use crate::domain::DomainError;
use crate::planner::PlanError;

/// Errors from the price-list store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("failed to open database at {path}: {source}")]
    OpenDatabase {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("store path not configured")]
    MissingStore,

    #[error("no price list stored")]
    NoPriceList,

    #[error("invalid price list: {0}")]
    InvalidPriceList(#[from] DomainError),

    #[error("blocking task failed: {0}")]
    Task(String),

    #[error("corrupt {table} row: {message}")]
    CorruptRow {
        table: &'static str,
        message: String,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for PlanError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoPriceList => PlanError::NoPriceList,
            other => PlanError::Storage(other.to_string()),
        }
    }
}
