//! Streaming object download with a byte progress bar.

use crate::error::SyncError;
use crate::target::SyncTarget;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{info, warn};

const BAR_TEMPLATE: &str =
    "{spinner:.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta}) {msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {bytes} ({bytes_per_sec}) {elapsed_precise} {msg}";

/// Builds the progress bar for one download.
///
/// With a known length this is a byte bar; otherwise a byte spinner. Returns a
/// hidden bar when progress display is off.
pub(crate) fn download_progress_bar(total: Option<u64>, show: bool, name: &str) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }

    let (pb, template) = match total {
        Some(len) => (ProgressBar::new(len), BAR_TEMPLATE),
        None => (ProgressBar::new_spinner(), SPINNER_TEMPLATE),
    };
    let style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    pb.set_style(style);
    pb.set_message(name.to_string());
    pb
}

/// Downloads `target` from the CDN, replacing any local content.
///
/// The request is issued before the destination is created, so a failed
/// request leaves an existing local file untouched. A failure while streaming
/// leaves the partially written file on disk.
///
/// # Returns
///
/// The number of bytes written on success.
pub async fn download_file(
    http: &reqwest::Client,
    target: &SyncTarget,
    show_progress: bool,
) -> Result<u64, SyncError> {
    info!("Downloading: {}", target.cdn_url);

    let response = http
        .get(target.cdn_url.clone())
        .send()
        .await?
        .error_for_status()?;
    let content_length = response.content_length();

    let mut file = BufWriter::new(tokio::fs::File::create(&target.local_path).await?);

    let pb = download_progress_bar(content_length, show_progress, &target.relative_path);
    let mut written: u64 = 0;
    let mut byte_stream = response.bytes_stream();

    while let Some(piece) = byte_stream.next().await {
        let chunk = match piece {
            Ok(chunk) => chunk,
            Err(e) => {
                pb.abandon_with_message("failed");
                return Err(e.into());
            }
        };
        if let Err(e) = file.write_all(&chunk).await {
            pb.abandon_with_message("failed");
            return Err(e.into());
        }
        written += chunk.len() as u64;
        pb.inc(chunk.len() as u64);
    }
    if let Err(e) = file.flush().await {
        pb.abandon_with_message("failed");
        return Err(e.into());
    }

    pb.finish();

    match content_length {
        Some(expected) if expected != written => warn!(
            "Content-Length for {} was {} bytes but {} bytes were received",
            target.cdn_url, expected, written
        ),
        None => warn!(
            "Content-Length header was not present for {}. Progress has no upper bound.",
            target.cdn_url
        ),
        _ => {}
    }

    info!(
        "Downloaded {} ({} bytes)",
        target.local_path.display(),
        written
    );
    Ok(written)
}
