//! Paginated object listing.

use crate::error::SyncError;
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use tracing::{debug, info};

/// Source of object keys, consumed one page at a time.
///
/// Returning `Ok(None)` means the listing is exhausted. An `Err` is fatal for
/// the whole run.
#[async_trait]
pub trait ObjectLister: Send {
    /// Fetches the next page of keys.
    async fn next_page(&mut self) -> Result<Option<Vec<String>>, SyncError>;
}

/// Options for building an [`S3Lister`] on top of the default AWS config chain.
#[derive(Debug, Clone, Default)]
pub struct ListerOptions {
    /// Region override. Falls back to the environment/profile, then `us-east-1`.
    pub region: Option<String>,
    /// Endpoint override for S3-compatible stores.
    pub endpoint_url: Option<String>,
}

/// [`ObjectLister`] backed by S3 `ListObjectsV2`.
pub struct S3Lister {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
    continuation_token: Option<String>,
    finished: bool,
}

impl S3Lister {
    /// Wraps an existing client.
    pub fn new(client: aws_sdk_s3::Client, bucket: &str, prefix: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            continuation_token: None,
            finished: false,
        }
    }

    /// Builds a client from the standard AWS environment and profile chain.
    pub async fn from_env(bucket: &str, prefix: &str, options: &ListerOptions) -> Self {
        let region_provider =
            RegionProviderChain::first_try(options.region.clone().map(Region::new))
                .or_default_provider()
                .or_else("us-east-1");

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
        if let Some(endpoint) = &options.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if options.endpoint_url.is_some() {
            s3_config = s3_config.force_path_style(true);
        }

        Self::new(
            aws_sdk_s3::Client::from_conf(s3_config.build()),
            bucket,
            prefix,
        )
    }
}

#[async_trait]
impl ObjectLister for S3Lister {
    async fn next_page(&mut self) -> Result<Option<Vec<String>>, SyncError> {
        if self.finished {
            return Ok(None);
        }

        let mut request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&self.prefix);
        if let Some(token) = &self.continuation_token {
            request = request.continuation_token(token);
        }

        let output = request.send().await.map_err(|e| SyncError::List {
            bucket: self.bucket.clone(),
            prefix: self.prefix.clone(),
            source: Box::new(e),
        })?;

        let keys: Vec<String> = output
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(String::from))
            .collect();

        if output.is_truncated() == Some(true) {
            self.continuation_token = output.next_continuation_token().map(String::from);
            // A truncated page without a token cannot be continued.
            self.finished = self.continuation_token.is_none();
        } else {
            self.finished = true;
        }

        debug!(
            "Listed {} keys from s3://{}/{} (more pages: {})",
            keys.len(),
            self.bucket,
            self.prefix,
            !self.finished
        );
        if self.finished {
            info!("Finished listing s3://{}/{}", self.bucket, self.prefix);
        }

        Ok(Some(keys))
    }
}
