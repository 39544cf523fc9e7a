//! Object store adapter for image bytes.

use async_trait::async_trait;
use opendal::{ErrorKind, Operator, services};

use super::config::ObjectStoreConfig;
use super::error::StorageError;
use crate::post::ImageBlob;

/// Byte-blob store keyed by path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lightweight reachability check.
    async fn check(&self) -> Result<(), StorageError>;

    /// Write a blob under `key`, replacing any previous value.
    async fn put(&self, key: &str, blob: ImageBlob) -> Result<(), StorageError>;

    /// Read a blob. `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<ImageBlob>, StorageError>;
}

/// [`ObjectStore`] backed by an OpenDAL operator.
#[derive(Debug, Clone)]
pub struct OpendalObjectStore {
    operator: Operator,
}

impl OpendalObjectStore {
    /// Create an S3 store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator cannot be built.
    pub fn from_config(config: &ObjectStoreConfig) -> Result<Self, StorageError> {
        let mut builder = services::S3::default()
            .bucket(&config.bucket)
            .region(&config.region);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint(endpoint);
        }
        if let Some(credentials) = &config.credentials {
            builder = builder
                .access_key_id(&credentials.access_key_id)
                .secret_access_key(&credentials.secret_access_key);
        }

        let operator = Operator::new(builder)
            .map_err(|e| StorageError::configuration(e.to_string()))?
            .finish();
        Ok(Self { operator })
    }

    /// Wrap an existing operator.
    #[must_use]
    pub fn from_operator(operator: Operator) -> Self {
        Self { operator }
    }

    fn supports_content_type(&self) -> bool {
        self.operator.info().full_capability().write_with_content_type
    }
}

#[async_trait]
impl ObjectStore for OpendalObjectStore {
    async fn check(&self) -> Result<(), StorageError> {
        self.operator.check().await.map_err(StorageError::from)
    }

    async fn put(&self, key: &str, blob: ImageBlob) -> Result<(), StorageError> {
        let written = if self.supports_content_type() {
            self.operator
                .write_with(key, blob.bytes)
                .content_type(&blob.content_type)
                .await
        } else {
            self.operator.write(key, blob.bytes).await
        };
        written.map(|_| ()).map_err(StorageError::from)
    }

    async fn get(&self, key: &str) -> Result<Option<ImageBlob>, StorageError> {
        // Both requests go out together; the read decides whether the key exists.
        let (meta, data) = tokio::join!(self.operator.stat(key), self.operator.read(key));

        let data = match data {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let content_type = meta
            .ok()
            .and_then(|meta| meta.content_type().map(str::to_owned));

        Ok(Some(ImageBlob::new(data.to_bytes(), content_type.as_deref())))
    }
}
