//! Per-request availability probe for the remote backends.

use imgboard_shared::LOCAL_STORAGE_LABEL;
use serde::Serialize;
use tracing::warn;

use super::error::StorageError;
use super::remote::{RemoteObjectStore, RemoteTable};
use super::{OBJECT_STORE_BACKEND, TABLE_BACKEND};

/// Availability of one backend at probe time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    /// Configured and answered the check.
    Available,
    /// No name configured for the backend.
    NotConfigured,
    /// Configured but the check failed.
    Unreachable(StorageError),
}

impl BackendStatus {
    /// True for [`BackendStatus::Available`].
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    fn from_check(backend: &'static str, result: Option<Result<(), StorageError>>) -> Self {
        match result {
            None => Self::NotConfigured,
            Some(Ok(())) => Self::Available,
            Some(Err(e)) => {
                warn!(backend, error = %e, "Remote backend unavailable, using local storage");
                Self::Unreachable(e)
            }
        }
    }
}

/// Snapshot of backend availability for a single request.
#[derive(Debug, Clone, Serialize)]
pub struct BackendAvailability {
    /// Object store answered the check.
    pub s3_available: bool,
    /// Bucket name, or the local storage label.
    pub s3_bucket: String,
    /// Metadata table answered the check.
    pub dynamodb_available: bool,
    /// Table name, or the local storage label.
    pub dynamodb_table: String,
    /// Either remote backend is available.
    pub visualizer_available: bool,
    /// Typed object store status.
    #[serde(skip)]
    pub object_store: BackendStatus,
    /// Typed table status.
    #[serde(skip)]
    pub table: BackendStatus,
}

impl BackendAvailability {
    /// Build a snapshot from the two statuses and the configured names.
    #[must_use]
    pub fn new(
        object_store: BackendStatus,
        bucket: Option<&str>,
        table: BackendStatus,
        table_name: Option<&str>,
    ) -> Self {
        let label = |available: bool, name: Option<&str>| match name {
            Some(name) if available => name.to_string(),
            _ => LOCAL_STORAGE_LABEL.to_string(),
        };

        let s3_available = object_store.is_available();
        let dynamodb_available = table.is_available();

        Self {
            s3_available,
            s3_bucket: label(s3_available, bucket),
            dynamodb_available,
            dynamodb_table: label(dynamodb_available, table_name),
            visualizer_available: s3_available || dynamodb_available,
            object_store,
            table,
        }
    }

    /// Snapshot with both backends unconfigured.
    #[must_use]
    pub fn local_only() -> Self {
        Self::new(BackendStatus::NotConfigured, None, BackendStatus::NotConfigured, None)
    }
}

/// Checks the configured remote backends. Stateless; never caches.
#[derive(Clone, Default)]
pub struct StorageStatusProbe {
    object_store: Option<RemoteObjectStore>,
    table: Option<RemoteTable>,
}

impl StorageStatusProbe {
    /// Create a probe over the configured backends.
    #[must_use]
    pub fn new(object_store: Option<RemoteObjectStore>, table: Option<RemoteTable>) -> Self {
        Self {
            object_store,
            table,
        }
    }

    /// Configured object store, if any.
    #[must_use]
    pub fn object_store(&self) -> Option<&RemoteObjectStore> {
        self.object_store.as_ref()
    }

    /// Configured table, if any.
    #[must_use]
    pub fn table(&self) -> Option<&RemoteTable> {
        self.table.as_ref()
    }

    /// Check both backends concurrently. Failures never propagate.
    pub async fn probe(&self) -> BackendAvailability {
        let object_check = async {
            match &self.object_store {
                Some(store) => Some(store.check().await),
                None => None,
            }
        };
        let table_check = async {
            match &self.table {
                Some(table) => Some(table.check().await),
                None => None,
            }
        };

        let (object_result, table_result) = tokio::join!(object_check, table_check);

        BackendAvailability::new(
            BackendStatus::from_check(OBJECT_STORE_BACKEND, object_result),
            self.object_store.as_ref().map(RemoteObjectStore::bucket),
            BackendStatus::from_check(TABLE_BACKEND, table_result),
            self.table.as_ref().map(RemoteTable::table),
        )
    }
}
