//! Error types for document and item ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop ingestion of a whole file.
///
/// Problems with individual item records are not errors; they are collected
/// as [`crate::RejectReason`] values on the pool.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON for the expected shape.
    #[error("failed to parse JSON {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// CSV reader failure (malformed quoting, unreadable header).
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Extension not recognized for an item source.
    #[error("unsupported item file format: {path} (expected .json or .csv)")]
    UnsupportedFormat { path: PathBuf },
}

impl IngestError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
