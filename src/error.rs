//! Error types for sync operations.

use std::io;
use thiserror::Error;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A required argument is missing, blank or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error during file operations.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// HTTP request error while probing or downloading.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// A `ListObjectsV2` page could not be fetched.
    #[error("Failed to list s3://{bucket}/{prefix}: {source}")]
    List {
        /// Bucket name.
        bucket: String,
        /// Key prefix.
        prefix: String,
        /// Underlying SDK error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An object key that does not map to a unique path inside the sync directory.
    #[error("Refusing to sync key '{0}': no unique local path inside the sync directory")]
    UnsafeKey(String),
}
