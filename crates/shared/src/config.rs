//! Application configuration management.

use serde::Deserialize;

/// Label reported for a backend that is served from process memory.
pub const LOCAL_STORAGE_LABEL: &str = "Local Storage";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload limits.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Remote storage configuration.
    #[serde(default)]
    pub aws: AwsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Whole-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// Upload limits.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted request body in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024 // 10MB
}

/// Remote storage configuration.
///
/// Every field is optional. A missing bucket or table name means that
/// backend is not configured and the service stores into memory instead.
#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
    /// AWS region.
    #[serde(default)]
    pub region: Option<String>,
    /// Object store bucket for image bytes.
    #[serde(default)]
    pub bucket_name: Option<String>,
    /// Key-value table for post metadata.
    #[serde(default)]
    pub table_name: Option<String>,
    /// Custom endpoint for S3-compatible stores or local emulators.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Static access key ID. Falls back to the default credential chain.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Static secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Upper bound for every remote call, in seconds.
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: None,
            bucket_name: None,
            table_name: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            timeout_secs: default_remote_timeout(),
        }
    }
}

fn default_remote_timeout() -> u64 {
    5
}

/// Treats blank strings the same as an unset value.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl AwsConfig {
    /// Default region when a backend is configured without one.
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    /// Configured bucket name, if any.
    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        non_blank(self.bucket_name.as_ref())
    }

    /// Configured table name, if any.
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        non_blank(self.table_name.as_ref())
    }

    /// Region to use for remote clients.
    #[must_use]
    pub fn region_or_default(&self) -> &str {
        non_blank(self.region.as_ref()).unwrap_or(Self::DEFAULT_REGION)
    }

    /// Custom endpoint, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        non_blank(self.endpoint.as_ref())
    }

    /// Static credentials when both halves are present.
    #[must_use]
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (
            non_blank(self.access_key_id.as_ref()),
            non_blank(self.secret_access_key.as_ref()),
        ) {
            (Some(key), Some(secret)) => Some((key, secret)),
            _ => None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("IMGBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_load_defaults_without_environment() {
        temp_env::with_vars_unset(
            [
                "IMGBOARD__AWS__BUCKET_NAME",
                "IMGBOARD__AWS__TABLE_NAME",
                "IMGBOARD__SERVER__PORT",
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.port, 8000);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
                assert_eq!(config.aws.timeout_secs, 5);
                assert!(config.aws.bucket().is_none());
                assert!(config.aws.table().is_none());
            },
        );
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("IMGBOARD__AWS__BUCKET_NAME", Some("photos")),
                ("IMGBOARD__AWS__TABLE_NAME", Some("posts")),
                ("IMGBOARD__AWS__REGION", Some("eu-west-1")),
                ("IMGBOARD__SERVER__PORT", Some("9000")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.port, 9000);
                assert_eq!(config.aws.bucket(), Some("photos"));
                assert_eq!(config.aws.table(), Some("posts"));
                assert_eq!(config.aws.region_or_default(), "eu-west-1");
            },
        );
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some("images"), Some("images"))]
    fn test_blank_bucket_is_unconfigured(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let aws = AwsConfig {
            bucket_name: raw.map(String::from),
            ..AwsConfig::default()
        };
        assert_eq!(aws.bucket(), expected);
    }

    #[test]
    fn test_region_defaults() {
        let aws = AwsConfig::default();
        assert_eq!(aws.region_or_default(), AwsConfig::DEFAULT_REGION);
    }

    #[test]
    fn test_static_credentials_need_both_halves() {
        let aws = AwsConfig {
            access_key_id: Some("key".into()),
            ..AwsConfig::default()
        };
        assert!(aws.static_credentials().is_none());

        let aws = AwsConfig {
            access_key_id: Some("key".into()),
            secret_access_key: Some("secret".into()),
            ..AwsConfig::default()
        };
        assert_eq!(aws.static_credentials(), Some(("key", "secret")));
    }
}
