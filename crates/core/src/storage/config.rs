//! Remote backend configuration types.

use std::time::Duration;

use imgboard_shared::AwsConfig;

/// Static credentials for a remote client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
}

fn static_credentials(aws: &AwsConfig) -> Option<StaticCredentials> {
    aws.static_credentials()
        .map(|(key, secret)| StaticCredentials {
            access_key_id: key.to_string(),
            secret_access_key: secret.to_string(),
        })
}

/// Object store configuration.
#[derive(Debug, Clone)]
pub struct ObjectStoreConfig {
    /// Bucket name.
    pub bucket: String,
    /// Bucket region.
    pub region: String,
    /// Custom S3-compatible endpoint.
    pub endpoint: Option<String>,
    /// Static credentials; `None` uses the environment credential chain.
    pub credentials: Option<StaticCredentials>,
    /// Bound on every remote call.
    pub timeout: Duration,
}

impl ObjectStoreConfig {
    /// Build from application config. `None` when no bucket is configured.
    #[must_use]
    pub fn from_aws(aws: &AwsConfig) -> Option<Self> {
        let bucket = aws.bucket()?;
        Some(Self {
            bucket: bucket.to_string(),
            region: aws.region_or_default().to_string(),
            endpoint: aws.endpoint().map(String::from),
            credentials: static_credentials(aws),
            timeout: Duration::from_secs(aws.timeout_secs),
        })
    }
}

/// Metadata table configuration.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Table name.
    pub table: String,
    /// Table region.
    pub region: String,
    /// Custom endpoint, e.g. DynamoDB Local.
    pub endpoint: Option<String>,
    /// Static credentials; `None` uses the environment credential chain.
    pub credentials: Option<StaticCredentials>,
    /// Bound on every remote call.
    pub timeout: Duration,
}

impl TableConfig {
    /// Build from application config. `None` when no table is configured.
    #[must_use]
    pub fn from_aws(aws: &AwsConfig) -> Option<Self> {
        let table = aws.table()?;
        Some(Self {
            table: table.to_string(),
            region: aws.region_or_default().to_string(),
            endpoint: aws.endpoint().map(String::from),
            credentials: static_credentials(aws),
            timeout: Duration::from_secs(aws.timeout_secs),
        })
    }
}
