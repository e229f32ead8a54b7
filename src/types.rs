//! Data structures describing per-object sync results.

use std::fmt;

/// Why an object has to be (re-)downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadReason {
    /// No local copy exists yet.
    Missing,
    /// The local copy's size does not match the CDN's `Content-Length`.
    ///
    /// `remote` is `None` when the CDN did not report a usable length.
    SizeMismatch {
        /// Local file size in bytes.
        local: u64,
        /// Remote size in bytes, if known.
        remote: Option<u64>,
    },
}

impl fmt::Display for DownloadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "not present locally"),
            Self::SizeMismatch {
                local,
                remote: Some(remote),
            } => write!(f, "size mismatch: local={} bytes, remote={} bytes", local, remote),
            Self::SizeMismatch { local, remote: None } => {
                write!(f, "remote size unknown, local={} bytes", local)
            }
        }
    }
}

/// Decision for a single object: keep the local copy or fetch it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Local copy is up to date.
    Skip,
    /// Local copy is absent or stale.
    Download(DownloadReason),
}

/// What happened to a single listed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local copy already matched the remote size.
    Skipped,
    /// Object was downloaded; `bytes` is the number of bytes written.
    Downloaded {
        /// Bytes written to disk.
        bytes: u64,
    },
    /// Key is a directory placeholder (empty or `/`-terminated relative path).
    Ignored,
}

/// Counters accumulated over one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    /// Objects downloaded.
    pub downloaded: u64,
    /// Objects skipped because the local copy was up to date.
    pub skipped: u64,
    /// Directory placeholder keys.
    pub ignored: u64,
    /// Objects whose processing failed.
    pub failed: u64,
    /// Total bytes written across all downloads.
    pub bytes_downloaded: u64,
}

impl SyncStats {
    /// Records a successful outcome.
    pub fn record(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Skipped => self.skipped += 1,
            SyncOutcome::Downloaded { bytes } => {
                self.downloaded += 1;
                self.bytes_downloaded += bytes;
            }
            SyncOutcome::Ignored => self.ignored += 1,
        }
    }

    /// Records a per-key failure.
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Total number of keys processed.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.downloaded + self.skipped + self.ignored + self.failed
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded ({} bytes), {} skipped (unchanged), {} ignored, {} failed",
            self.downloaded, self.bytes_downloaded, self.skipped, self.ignored, self.failed
        )
    }
}
