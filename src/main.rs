use anyhow::Context;
use cdnsync::{
    sync_bucket, ListerOptions, S3Lister, SyncConfig, SyncError, DEFAULT_LOCAL_SYNC_DIR,
};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{error, info};

/// Long flag names that may be written with a single dash (`-bucketName x`).
const LONG_FLAGS: &[&str] = &[
    "bucketName",
    "cloudFrontDomain",
    "localSyncDir",
    "region",
    "endpointUrl",
    "noProgress",
    "verbose",
    "help",
    "version",
];

#[derive(Parser, Debug)]
#[command(name = "cdnsync")]
#[command(
    about = "Mirror an S3 bucket prefix to a local directory through its CDN",
    long_about = None
)]
#[command(version)]
struct Args {
    /// The S3 bucket and optional prefix in the format 'bucket-name/prefix-path'
    #[arg(long = "bucketName", value_name = "BUCKET[/PREFIX]")]
    bucket_name: String,

    /// The CDN domain mapping to the S3 bucket (e.g., 'https://sub.domain.com')
    #[arg(long = "cloudFrontDomain", value_name = "URL")]
    cloud_front_domain: String,

    /// Local directory to sync files to
    #[arg(long = "localSyncDir", default_value = DEFAULT_LOCAL_SYNC_DIR)]
    local_sync_dir: PathBuf,

    /// AWS region used for listing (defaults to the environment/profile)
    #[arg(long)]
    region: Option<String>,

    /// Custom endpoint for S3-compatible storage
    #[arg(long = "endpointUrl", value_name = "URL")]
    endpoint_url: Option<String>,

    /// Disable download progress bars
    #[arg(long = "noProgress")]
    no_progress: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Parses process arguments, accepting single-dash long flags.
    fn parse_normalized() -> Self {
        Self::parse_from(normalize_flags(std::env::args_os()))
    }

    /// Validates the arguments into a run configuration.
    fn sync_config(&self, show_progress: bool) -> Result<SyncConfig, SyncError> {
        Ok(SyncConfig::new(
            &self.bucket_name,
            &self.cloud_front_domain,
            self.local_sync_dir.clone(),
        )?
        .with_progress(show_progress && !self.no_progress))
    }

    /// Options for the listing client.
    fn lister_options(&self) -> ListerOptions {
        ListerOptions {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

/// Rewrites `-name` and `-name=value` into `--name` / `--name=value` for every
/// known long flag. Other arguments pass through untouched.
fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LONG_FLAGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_normalized();

    // Initialize tracing
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("cdnsync={}", log_level))
        .init();

    let show_progress = atty::is(atty::Stream::Stderr);
    let config = match args.sync_config(show_progress) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", Args::command().render_help());
            std::process::exit(1);
        }
    };

    info!("Bucket: {}", config.bucket);
    info!("Prefix: {:?}", config.prefix);
    info!("CDN: {}", config.cdn_base);
    info!("Local directory: {:?}", config.local_sync_dir);

    let mut lister =
        S3Lister::from_env(&config.bucket, &config.prefix, &args.lister_options()).await;
    let http = reqwest::Client::builder()
        .build()
        .context("unable to build HTTP client")?;

    match sync_bucket(&config, &mut lister, &http).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Sync aborted: {}", e);
            std::process::exit(1);
        }
    }
}
