//! Injectable storage context and per-request backend resolution.

use std::sync::Arc;

use imgboard_shared::AwsConfig;
use tracing::info;

use super::config::{ObjectStoreConfig, TableConfig};
use super::error::StorageError;
use super::local::LocalFallbackStore;
use super::object_store::OpendalObjectStore;
use super::probe::{BackendAvailability, StorageStatusProbe};
use super::remote::{RemoteObjectStore, RemoteTable};
use super::table::DynamoTable;

/// Storage destination chosen for one concern of one request.
#[derive(Clone)]
pub enum Backend<R> {
    /// Use the remote adapter.
    Remote(R),
    /// Use the in-process fallback.
    Local,
}

impl<R> Backend<R> {
    /// True for [`Backend::Remote`].
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Backends resolved by a single probe.
pub struct ResolvedBackends {
    /// Probe result the choices were derived from.
    pub availability: BackendAvailability,
    /// Destination for image bytes.
    pub images: Backend<RemoteObjectStore>,
    /// Destination for post records.
    pub posts: Backend<RemoteTable>,
}

/// Storage shared by every request: optional remotes plus the local fallback.
///
/// Created once at process start. The local fallback lives as long as the
/// context does.
#[derive(Clone, Default)]
pub struct StorageContext {
    probe: StorageStatusProbe,
    local: Arc<LocalFallbackStore>,
}

impl StorageContext {
    /// Create a context over the given remotes.
    #[must_use]
    pub fn new(object_store: Option<RemoteObjectStore>, table: Option<RemoteTable>) -> Self {
        Self {
            probe: StorageStatusProbe::new(object_store, table),
            local: Arc::new(LocalFallbackStore::new()),
        }
    }

    /// Context with no remote backends.
    #[must_use]
    pub fn local_only() -> Self {
        Self::default()
    }

    /// Build the production adapters from application config.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured object store cannot be initialized.
    pub async fn from_config(aws: &AwsConfig) -> Result<Self, StorageError> {
        let object_store = match ObjectStoreConfig::from_aws(aws) {
            Some(config) => {
                let store = OpendalObjectStore::from_config(&config)?;
                info!(bucket = %config.bucket, region = %config.region, "Object store configured");
                Some(RemoteObjectStore::new(
                    config.bucket,
                    Arc::new(store),
                    config.timeout,
                ))
            }
            None => {
                info!("No bucket configured, images are kept in memory");
                None
            }
        };

        let table = match TableConfig::from_aws(aws) {
            Some(config) => {
                let table = DynamoTable::from_config(&config).await;
                info!(table = %config.table, region = %config.region, "Metadata table configured");
                Some(RemoteTable::new(config.table, Arc::new(table), config.timeout))
            }
            None => {
                info!("No table configured, posts are kept in memory");
                None
            }
        };

        Ok(Self::new(object_store, table))
    }

    /// Probe once and pick a backend for images and for posts.
    pub async fn resolve_backends(&self) -> ResolvedBackends {
        let availability = self.probe.probe().await;

        let images = match self.probe.object_store() {
            Some(store) if availability.s3_available => Backend::Remote(store.clone()),
            _ => Backend::Local,
        };
        let posts = match self.probe.table() {
            Some(table) if availability.dynamodb_available => Backend::Remote(table.clone()),
            _ => Backend::Local,
        };

        ResolvedBackends {
            availability,
            images,
            posts,
        }
    }

    /// Current availability without resolving backends.
    pub async fn availability(&self) -> BackendAvailability {
        self.probe.probe().await
    }

    /// In-process fallback store.
    #[must_use]
    pub fn local(&self) -> &LocalFallbackStore {
        &self.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MockMetadataTable, MockObjectStore};
    use std::time::Duration;

    #[tokio::test]
    async fn test_local_only_resolves_local() {
        let resolved = StorageContext::local_only().resolve_backends().await;
        assert!(!resolved.images.is_remote());
        assert!(!resolved.posts.is_remote());
    }

    #[tokio::test]
    async fn test_from_config_without_names_is_local_only() {
        let context = StorageContext::from_config(&AwsConfig::default())
            .await
            .expect("context should build");
        let availability = context.availability().await;
        assert!(!availability.visualizer_available);
    }

    #[tokio::test]
    async fn test_backends_resolved_independently() {
        let mut store = MockObjectStore::new();
        store.expect_check().returning(|| Ok(()));
        let mut table = MockMetadataTable::new();
        table
            .expect_check()
            .returning(|| Err(StorageError::unreachable("dynamodb", "no route")));

        let context = StorageContext::new(
            Some(RemoteObjectStore::new("photos", Arc::new(store), Duration::from_secs(1))),
            Some(RemoteTable::new("posts", Arc::new(table), Duration::from_secs(1))),
        );
        let resolved = context.resolve_backends().await;

        assert!(resolved.images.is_remote());
        assert!(!resolved.posts.is_remote());
    }
}
