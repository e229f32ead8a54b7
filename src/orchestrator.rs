//! Main orchestration logic for a sync run.

use crate::config::SyncConfig;
use crate::download::download_file;
use crate::error::SyncError;
use crate::listing::ObjectLister;
use crate::target::SyncTarget;
use crate::types::{SyncDecision, SyncOutcome, SyncStats};
use crate::verify::decide;
use std::time::Instant;
use tracing::{debug, error, info};

/// Mirrors every listed object into the local sync directory.
///
/// This is the main entry point. It performs the following steps:
///
/// 1. Creates the local sync directory
/// 2. Pulls pages of keys from `lister` until it is exhausted
/// 3. For each key, decides whether the local copy is stale and downloads it
///    if so
///
/// Keys are processed one at a time. Failures while processing a key are
/// logged and counted, and the run moves on to the next key.
///
/// # Errors
///
/// Returns an error if the sync directory cannot be created or a listing page
/// cannot be fetched. Keys processed before a listing failure stay on disk.
///
/// # Example
///
/// ```no_run
/// use cdnsync::{sync_bucket, ListerOptions, S3Lister, SyncConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SyncConfig::new("my-bucket/logs", "https://cdn.example.com", "./syncedFiles")?;
/// let options = ListerOptions::default();
/// let mut lister = S3Lister::from_env(&config.bucket, &config.prefix, &options).await;
/// let stats = sync_bucket(&config, &mut lister, &reqwest::Client::new()).await?;
/// println!("{}", stats);
/// # Ok(())
/// # }
/// ```
pub async fn sync_bucket<L: ObjectLister + ?Sized>(
    config: &SyncConfig,
    lister: &mut L,
    http: &reqwest::Client,
) -> Result<SyncStats, SyncError> {
    let started = Instant::now();
    tokio::fs::create_dir_all(&config.local_sync_dir)
        .await
        .map_err(|e| {
            error!(
                "Failed to create local directory {}: {}",
                config.local_sync_dir.display(),
                e
            );
            SyncError::Io(e)
        })?;

    let mut stats = SyncStats::default();

    loop {
        let keys = match lister.next_page().await {
            Ok(Some(keys)) => keys,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to get page: {}", e);
                return Err(e);
            }
        };

        for key in keys {
            info!("Processing {}", key);
            match sync_object(config, http, &key).await {
                Ok(outcome) => stats.record(outcome),
                Err(e) => {
                    error!("Failed to sync {}: {}", key, e);
                    stats.record_failure();
                }
            }
        }
    }

    info!(
        "Sync finished in {}: {} keys, {}",
        humantime::format_duration(std::time::Duration::from_secs(
            started.elapsed().as_secs()
        )),
        stats.total(),
        stats
    );
    Ok(stats)
}

/// Runs decide-then-fetch for a single key.
///
/// Every error returned here is scoped to this key.
pub async fn sync_object(
    config: &SyncConfig,
    http: &reqwest::Client,
    key: &str,
) -> Result<SyncOutcome, SyncError> {
    let Some(target) = SyncTarget::resolve(config, key)? else {
        debug!("Ignoring directory placeholder {}", key);
        return Ok(SyncOutcome::Ignored);
    };

    if let Some(parent) = target.local_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    match decide(http, &target).await? {
        SyncDecision::Skip => Ok(SyncOutcome::Skipped),
        SyncDecision::Download(reason) => {
            debug!("{} needs download: {}", target.key, reason);
            let bytes = download_file(http, &target, config.show_progress).await?;
            Ok(SyncOutcome::Downloaded { bytes })
        }
    }
}
