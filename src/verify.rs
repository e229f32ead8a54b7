//! Staleness check: local file size against the CDN's reported size.

use crate::error::SyncError;
use crate::target::SyncTarget;
use crate::types::{DownloadReason, SyncDecision};
use reqwest::header::CONTENT_LENGTH;
use reqwest::Url;
use std::io;
use tracing::{debug, info};

/// Fetches the remote size of an object with a HEAD request.
///
/// The length is read from the raw `Content-Length` header; `None` means the
/// CDN did not report one.
///
/// # Errors
///
/// Returns [`SyncError::Http`] on connection failures or a non-success
/// status.
pub async fn head_remote_size(
    http: &reqwest::Client,
    url: &Url,
) -> Result<Option<u64>, SyncError> {
    let response = http.head(url.clone()).send().await?.error_for_status()?;

    let remote_size = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok());

    debug!("HEAD {} -> content-length {:?}", url, remote_size);
    Ok(remote_size)
}

/// Compares a local size against the remote one.
///
/// An unknown remote size never matches.
pub fn compare_sizes(local: u64, remote: Option<u64>) -> SyncDecision {
    if remote == Some(local) {
        SyncDecision::Skip
    } else {
        SyncDecision::Download(DownloadReason::SizeMismatch { local, remote })
    }
}

/// Decides whether the local copy of `target` is up to date.
///
/// This function performs the following checks:
/// 1. Checks if a local file exists; if not, the decision is to download
/// 2. Sends a HEAD request to get the remote size
/// 3. Compares sizes; equal sizes mean the file is skipped
///
/// A non-file entry at the local path counts as missing, so the download
/// step reports why it cannot be replaced.
///
/// # Returns
///
/// The decision, or an error if the local file could not be inspected or the
/// HEAD request failed. Either error only affects this object.
pub async fn decide(
    http: &reqwest::Client,
    target: &SyncTarget,
) -> Result<SyncDecision, SyncError> {
    let local_size = match tokio::fs::metadata(&target.local_path).await {
        Ok(m) if m.is_file() => m.len(),
        Ok(_) => return Ok(SyncDecision::Download(DownloadReason::Missing)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(SyncDecision::Download(DownloadReason::Missing));
        }
        Err(e) => return Err(e.into()),
    };

    let remote_size = head_remote_size(http, &target.cdn_url).await?;

    let decision = compare_sizes(local_size, remote_size);
    if decision == SyncDecision::Skip {
        info!(
            "No changes detected, skipping: {} ({} bytes)",
            target.local_path.display(),
            local_size
        );
    }
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_sizes_skip() {
        assert_eq!(compare_sizes(10, Some(10)), SyncDecision::Skip);
        assert_eq!(compare_sizes(0, Some(0)), SyncDecision::Skip);
    }

    #[test]
    fn test_different_sizes_download() {
        assert_eq!(
            compare_sizes(3, Some(10)),
            SyncDecision::Download(DownloadReason::SizeMismatch {
                local: 3,
                remote: Some(10)
            })
        );
    }

    #[test]
    fn test_unknown_remote_size_downloads() {
        assert_eq!(
            compare_sizes(0, None),
            SyncDecision::Download(DownloadReason::SizeMismatch {
                local: 0,
                remote: None
            })
        );
    }
}
