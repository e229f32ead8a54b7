//! Run configuration and bucket argument parsing.

use crate::error::SyncError;
use reqwest::Url;
use std::path::PathBuf;

/// Default local directory objects are mirrored into.
pub const DEFAULT_LOCAL_SYNC_DIR: &str = "./syncedFiles";

/// Splits a `bucket[/prefix]` argument on the first `/`.
///
/// Everything after the first separator, further `/` included, is returned as
/// the prefix unmodified. Without a separator the prefix is empty.
///
/// # Example
///
/// ```
/// use cdnsync::parse_bucket_arg;
///
/// assert_eq!(parse_bucket_arg("data/logs/2024"), ("data".to_string(), "logs/2024".to_string()));
/// assert_eq!(parse_bucket_arg("data"), ("data".to_string(), String::new()));
/// ```
pub fn parse_bucket_arg(bucket_arg: &str) -> (String, String) {
    match bucket_arg.split_once('/') {
        Some((bucket, prefix)) => (bucket.to_string(), prefix.to_string()),
        None => (bucket_arg.to_string(), String::new()),
    }
}

/// Configuration for one sync run.
///
/// Built once at startup and passed by reference to every step; nothing
/// mutates it afterwards.
///
/// # Example
///
/// ```
/// use cdnsync::SyncConfig;
///
/// let config = SyncConfig::new("my-bucket/data/logs", "https://cdn.example.com", "./syncedFiles")
///     .unwrap()
///     .with_progress(false);
/// assert_eq!(config.bucket, "my-bucket");
/// assert_eq!(config.prefix, "data/logs");
/// ```
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Bucket to list.
    pub bucket: String,
    /// Key prefix filter (may be empty).
    pub prefix: String,
    /// CDN base URL fronting the bucket (e.g., `<https://sub.domain.com>`)
    pub cdn_base: Url,
    /// Local directory objects are mirrored into.
    pub local_sync_dir: PathBuf,
    /// Draw a progress bar for each download (default: false).
    pub show_progress: bool,
}

impl SyncConfig {
    /// Validates the raw arguments and builds a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidArgument`] if the bucket name or CDN domain
    /// is blank, or if the CDN domain is not an absolute URL.
    pub fn new(
        bucket_arg: &str,
        cdn_domain: &str,
        local_sync_dir: impl Into<PathBuf>,
    ) -> Result<Self, SyncError> {
        let (bucket, prefix) = parse_bucket_arg(bucket_arg);

        if bucket.trim().is_empty() || cdn_domain.trim().is_empty() {
            return Err(SyncError::InvalidArgument(
                "bucketName and cloudFrontDomain are required".to_string(),
            ));
        }

        let cdn_base = Url::parse(cdn_domain.trim()).map_err(|e| {
            SyncError::InvalidArgument(format!(
                "cloudFrontDomain '{}' is not a valid URL: {}",
                cdn_domain, e
            ))
        })?;
        if cdn_base.cannot_be_a_base() {
            return Err(SyncError::InvalidArgument(format!(
                "cloudFrontDomain '{}' cannot be used as a base URL",
                cdn_domain
            )));
        }

        Ok(Self {
            bucket,
            prefix,
            cdn_base,
            local_sync_dir: local_sync_dir.into(),
            show_progress: false,
        })
    }

    /// Enables or disables per-download progress bars.
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}
