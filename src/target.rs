//! Mapping of object keys to local paths and CDN URLs.

use crate::config::SyncConfig;
use crate::error::SyncError;
use reqwest::Url;
use std::path::PathBuf;

/// One listed object mapped to where it lives locally and on the CDN.
///
/// The local path and the CDN URL are both derived from the same relative
/// path: the key with the configured prefix stripped, then the separator
/// following a prefix that does not end in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    /// Full object key as listed.
    pub key: String,
    /// Key relative to the prefix, `/`-separated.
    pub relative_path: String,
    /// Destination file under the sync directory.
    pub local_path: PathBuf,
    /// CDN URL serving the object.
    pub cdn_url: Url,
}

impl SyncTarget {
    /// Resolves a listed key against the configuration.
    ///
    /// Returns `Ok(None)` for directory placeholder keys, whose relative path
    /// is empty or ends with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnsafeKey`] if the relative path has an empty,
    /// `.` or `..` segment. Such keys would either escape the sync directory
    /// or share a local file with another key.
    pub fn resolve(config: &SyncConfig, key: &str) -> Result<Option<Self>, SyncError> {
        let prefix = config.prefix.as_str();
        let mut relative = key.strip_prefix(prefix).unwrap_or(key);
        if !prefix.is_empty() && !prefix.ends_with('/') {
            relative = relative.strip_prefix('/').unwrap_or(relative);
        }

        if relative.is_empty() || relative.ends_with('/') {
            return Ok(None);
        }

        let segments: Vec<&str> = relative.split('/').collect();
        if segments
            .iter()
            .any(|s| s.is_empty() || *s == "." || *s == "..")
        {
            return Err(SyncError::UnsafeKey(key.to_string()));
        }

        let local_path = segments
            .iter()
            .fold(config.local_sync_dir.clone(), |path, segment| path.join(segment));

        let mut cdn_url = config.cdn_base.clone();
        cdn_url
            .path_segments_mut()
            .map_err(|_| {
                SyncError::InvalidArgument(format!(
                    "cloudFrontDomain '{}' cannot be used as a base URL",
                    config.cdn_base
                ))
            })?
            .pop_if_empty()
            .extend(&segments);

        Ok(Some(Self {
            key: key.to_string(),
            relative_path: relative.to_string(),
            local_path,
            cdn_url,
        }))
    }
}
