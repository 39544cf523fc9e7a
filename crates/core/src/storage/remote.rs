//! Configured remote backends with bounded calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::error::StorageError;
use super::object_store::ObjectStore;
use super::table::MetadataTable;
use super::{OBJECT_STORE_BACKEND, TABLE_BACKEND};
use crate::post::{ImageBlob, Post};

/// Run a remote call, failing with [`StorageError::Timeout`] past `limit`.
async fn bounded<T>(
    backend: &'static str,
    limit: Duration,
    call: impl Future<Output = Result<T, StorageError>>,
) -> Result<T, StorageError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StorageError::timeout(backend, limit))?
}

/// Object store paired with its bucket name.
#[derive(Clone)]
pub struct RemoteObjectStore {
    bucket: String,
    store: Arc<dyn ObjectStore>,
    timeout: Duration,
}

impl RemoteObjectStore {
    /// Wrap an adapter.
    #[must_use]
    pub fn new(bucket: impl Into<String>, store: Arc<dyn ObjectStore>, timeout: Duration) -> Self {
        Self {
            bucket: bucket.into(),
            store,
            timeout,
        }
    }

    /// Bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Storage key for a post's image.
    #[must_use]
    pub fn image_key(id: &str) -> String {
        format!("images/{id}")
    }

    pub(crate) async fn check(&self) -> Result<(), StorageError> {
        bounded(OBJECT_STORE_BACKEND, self.timeout, self.store.check()).await
    }

    pub(crate) async fn put_image(&self, id: &str, blob: ImageBlob) -> Result<(), StorageError> {
        let key = Self::image_key(id);
        bounded(OBJECT_STORE_BACKEND, self.timeout, self.store.put(&key, blob)).await
    }

    pub(crate) async fn get_image(&self, id: &str) -> Result<Option<ImageBlob>, StorageError> {
        let key = Self::image_key(id);
        bounded(OBJECT_STORE_BACKEND, self.timeout, self.store.get(&key)).await
    }
}

/// Metadata table paired with its table name.
#[derive(Clone)]
pub struct RemoteTable {
    table: String,
    store: Arc<dyn MetadataTable>,
    timeout: Duration,
}

impl RemoteTable {
    /// Wrap an adapter.
    #[must_use]
    pub fn new(table: impl Into<String>, store: Arc<dyn MetadataTable>, timeout: Duration) -> Self {
        Self {
            table: table.into(),
            store,
            timeout,
        }
    }

    /// Table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    pub(crate) async fn check(&self) -> Result<(), StorageError> {
        bounded(TABLE_BACKEND, self.timeout, self.store.check()).await
    }

    pub(crate) async fn put_post(&self, post: &Post) -> Result<(), StorageError> {
        bounded(TABLE_BACKEND, self.timeout, self.store.put(post)).await
    }

    pub(crate) async fn scan(&self) -> Result<Vec<Post>, StorageError> {
        bounded(TABLE_BACKEND, self.timeout, self.store.scan()).await
    }
}
