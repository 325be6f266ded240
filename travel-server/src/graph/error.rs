//! Route graph error types.

use std::path::PathBuf;

use crate::domain::InvalidLocationName;

/// Errors that can occur when loading a route graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Graph file could not be read
    #[error("failed to read route graph {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Graph file is not valid JSON for the expected shape
    #[error("invalid route graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A route names an invalid location
    #[error("invalid location {name:?} in route graph: {source}")]
    InvalidLocation {
        name: String,
        source: InvalidLocationName,
    },

    /// Graph has no routes at all
    #[error("route graph has no routes")]
    Empty,
}
