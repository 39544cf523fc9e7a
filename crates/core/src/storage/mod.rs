//! Storage layer for images and post metadata.
//!
//! Images go to an S3-compatible object store through Apache OpenDAL and post
//! records go to a DynamoDB table. Either backend may be unconfigured or
//! unreachable; every request then falls back to the in-process
//! [`LocalFallbackStore`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                StorageContext::resolve_backends()             │
//! │                  (one probe per request)                      │
//! ├──────────────────────────────┬───────────────────────────────┤
//! │ images: Backend::Remote(s3)  │ posts: Backend::Remote(table) │
//! │         Backend::Local       │        Backend::Local         │
//! └──────────────────────────────┴───────────────────────────────┘
//! ```

mod config;
mod context;
mod error;
mod local;
mod object_store;
mod probe;
mod remote;
mod table;

pub use config::{ObjectStoreConfig, StaticCredentials, TableConfig};
pub use context::{Backend, ResolvedBackends, StorageContext};
pub use error::StorageError;
pub use local::LocalFallbackStore;
pub use object_store::{ObjectStore, OpendalObjectStore};
pub use probe::{BackendAvailability, BackendStatus, StorageStatusProbe};
pub use remote::{RemoteObjectStore, RemoteTable};
pub use table::{DynamoTable, MetadataTable};

#[cfg(test)]
pub use object_store::MockObjectStore;
#[cfg(test)]
pub use table::MockMetadataTable;

/// Backend name used in errors and logs for the object store.
pub const OBJECT_STORE_BACKEND: &str = "s3";

/// Backend name used in errors and logs for the metadata table.
pub const TABLE_BACKEND: &str = "dynamodb";
