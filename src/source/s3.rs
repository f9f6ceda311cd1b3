//! S3-compatible object store client (MinIO in deployment).

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;

use super::{RowSource, SourceError, decode_csv};
use crate::config::SourceSection;
use crate::models::SaleRecord;

// MinIO ignores the region but the SDK requires one to be set.
const DEFAULT_REGION: &str = "us-east-1";

/// Reads one CSV object per run from an S3-compatible store.
pub struct S3RowSource {
    client: aws_sdk_s3::Client,
    bucket: String,
    key: String,
}

impl S3RowSource {
    /// Build a client for the configured endpoint and credentials.
    ///
    /// MinIO does not serve virtual-hosted bucket URLs, so path-style
    /// addressing is forced.
    pub async fn new(config: &SourceSection) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "ingest-config",
        );
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(DEFAULT_REGION))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            key: config.csv_key.clone(),
        }
    }
}

#[async_trait]
impl RowSource for S3RowSource {
    async fn fetch_batch(&self) -> Result<Vec<SaleRecord>, SourceError> {
        tracing::info!("reading s3://{}/{}", self.bucket, self.key);

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .map_err(|e| {
                SourceError::Fetch(format!("s3://{}/{}: {}", self.bucket, self.key, e))
            })?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| SourceError::Fetch(format!("failed to read object body: {e}")))?;

        decode_csv(&body.into_bytes())
    }
}
