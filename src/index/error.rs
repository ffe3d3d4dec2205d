//! Index loading error types.

use std::path::PathBuf;

/// Errors that can occur while opening the index files.
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// Index file exists but could not be read.
    #[error("Failed to read index file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Index file is not valid JSON for its table.
    #[error("Failed to parse index file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}
