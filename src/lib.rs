//! cdnsync - mirror an S3 bucket prefix to a local directory through its CDN
//!
//! Objects are listed with the S3 `ListObjectsV2` API, but their bytes are
//! fetched over plain HTTP from the CDN that fronts the bucket.
//!
//! # Features
//!
//! - **Size-based Skipping**: a local file whose size matches the CDN's
//!   `Content-Length` is left alone
//! - **Additive Sync**: objects are only ever added or replaced, never deleted
//! - **Progress Tracking**: a byte progress bar for every download
//! - **Best-effort**: a failing object is logged and the run moves on
//!
//! # Example
//!
//! ```no_run
//! use cdnsync::{sync_bucket, ListerOptions, S3Lister, SyncConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::new("my-bucket/logs", "https://cdn.example.com", "./syncedFiles")?;
//! let options = ListerOptions::default();
//! let mut lister = S3Lister::from_env(&config.bucket, &config.prefix, &options).await;
//!
//! sync_bucket(&config, &mut lister, &reqwest::Client::new()).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod download;
mod error;
mod listing;
mod orchestrator;
mod target;
mod types;
mod verify;

pub use config::{parse_bucket_arg, SyncConfig, DEFAULT_LOCAL_SYNC_DIR};
pub use download::download_file;
pub use error::SyncError;
pub use listing::{ListerOptions, ObjectLister, S3Lister};
pub use orchestrator::{sync_bucket, sync_object};
pub use target::SyncTarget;
pub use types::{DownloadReason, SyncDecision, SyncOutcome, SyncStats};
pub use verify::{compare_sizes, decide, head_remote_size};
