//! Error types for rust-schemascan

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while crawling, filtering, or persisting a catalog
#[derive(Error, Debug)]
pub enum SchemaScanError {
    #[error("Failed to crawl database metadata: {message}")]
    Crawl {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to retrieve {entity}: {message}")]
    Retrieval { entity: String, message: String },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Failed to read snapshot from {path}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to write snapshot to {path}")]
    SnapshotWrite {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Snapshot archive is missing the catalog entry: {path}")]
    SnapshotEntryMissing { path: PathBuf },

    #[error("Failed to resolve output resource: {message}")]
    OutputResource {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Command '{command}' failed: {message}")]
    CommandExecution { command: String, message: String },

    #[error("ZIP archive error: {message}")]
    Zip { message: String },
}

impl SchemaScanError {
    /// Fatal crawl error wrapping an underlying cause.
    pub fn crawl(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SchemaScanError::Crawl {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Per-entity retrieval error; absorbed (logged and skipped) by the crawler.
    pub fn retrieval(entity: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaScanError::Retrieval {
            entity: entity.into(),
            message: message.into(),
        }
    }
}

impl From<zip::result::ZipError> for SchemaScanError {
    fn from(err: zip::result::ZipError) -> Self {
        SchemaScanError::Zip {
            message: err.to_string(),
        }
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, SchemaScanError>;
