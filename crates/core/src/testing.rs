//! In-memory fakes of the remote adapters for service tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::post::{ImageBlob, Post};
use crate::storage::{
    MetadataTable, ObjectStore, RemoteObjectStore, RemoteTable, StorageContext, StorageError,
};

/// Object store fake with switchable failures.
#[derive(Default)]
pub struct FakeObjectStore {
    blobs: Mutex<HashMap<String, ImageBlob>>,
    fail_writes: bool,
    fail_reads: bool,
    puts: AtomicUsize,
}

impl FakeObjectStore {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reachable, but every write fails.
    pub fn failing_writes() -> Arc<Self> {
        Arc::new(Self {
            fail_writes: true,
            ..Self::default()
        })
    }

    /// Reachable, but every read fails.
    pub fn failing_reads() -> Arc<Self> {
        Arc::new(Self {
            fail_reads: true,
            ..Self::default()
        })
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn stored(&self, key: &str) -> Option<ImageBlob> {
        self.blobs.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn check(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn put(&self, key: &str, blob: ImageBlob) -> Result<(), StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(StorageError::unreachable("s3", "write rejected"));
        }
        self.blobs.lock().unwrap().insert(key.to_string(), blob);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<ImageBlob>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::unreachable("s3", "read rejected"));
        }
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }
}

/// Metadata table fake with switchable failures.
#[derive(Default)]
pub struct FakeTable {
    posts: Mutex<Vec<Post>>,
    fail_writes: bool,
    fail_scans: bool,
    puts: AtomicUsize,
}

impl FakeTable {
    pub fn healthy() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reachable, but every write fails.
    pub fn failing_writes() -> Arc<Self> {
        Arc::new(Self {
            fail_writes: true,
            ..Self::default()
        })
    }

    /// Reachable, but every scan fails.
    pub fn failing_scans() -> Arc<Self> {
        Arc::new(Self {
            fail_scans: true,
            ..Self::default()
        })
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataTable for FakeTable {
    async fn check(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn put(&self, post: &Post) -> Result<(), StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(StorageError::unreachable("dynamodb", "write rejected"));
        }
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Post>, StorageError> {
        if self.fail_scans {
            return Err(StorageError::unreachable("dynamodb", "scan rejected"));
        }
        Ok(self.posts.lock().unwrap().clone())
    }
}

/// Context over the given fakes; `None` leaves that backend unconfigured.
pub fn context(
    store: Option<&Arc<FakeObjectStore>>,
    table: Option<&Arc<FakeTable>>,
) -> Arc<StorageContext> {
    let store = store.map(|fake| {
        let adapter: Arc<dyn ObjectStore> = fake.clone();
        RemoteObjectStore::new("photos", adapter, Duration::from_secs(1))
    });
    let table = table.map(|fake| {
        let adapter: Arc<dyn MetadataTable> = fake.clone();
        RemoteTable::new("posts", adapter, Duration::from_secs(1))
    });
    Arc::new(StorageContext::new(store, table))
}
