//! Image lookup across backends.

use std::sync::Arc;

use tracing::{debug, warn};

use super::error::PostError;
use super::types::ImageBlob;
use crate::storage::{Backend, StorageContext};

/// Finds a post's image in the object store or the local fallback.
#[derive(Clone)]
pub struct ImageRetrievalService {
    storage: Arc<StorageContext>,
}

impl ImageRetrievalService {
    /// Create a new retrieval service.
    #[must_use]
    pub fn new(storage: Arc<StorageContext>) -> Self {
        Self { storage }
    }

    /// Fetch image bytes by post id.
    ///
    /// A remote miss or failure falls through to the local store.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::NotFound`] when no backend has the image.
    pub async fn get(&self, id: &str) -> Result<ImageBlob, PostError> {
        let resolved = self.storage.resolve_backends().await;

        if let Backend::Remote(store) = &resolved.images {
            match store.get_image(id).await {
                Ok(Some(blob)) => return Ok(blob),
                Ok(None) => debug!(id = %id, "Image not in object store, checking local"),
                Err(e) => warn!(id = %id, error = %e, "Image read failed, checking local"),
            }
        }

        self.storage
            .local()
            .get_image(id)
            .ok_or_else(|| PostError::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ObjectStore, RemoteObjectStore};
    use crate::testing::{FakeObjectStore, context};

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let service = ImageRetrievalService::new(context(None, None));
        let err = service.get("never-uploaded").await.unwrap_err();
        assert_eq!(err, PostError::not_found("never-uploaded"));
    }

    #[tokio::test]
    async fn test_unknown_id_with_remote_is_not_found() {
        let store = FakeObjectStore::healthy();
        let service = ImageRetrievalService::new(context(Some(&store), None));
        assert!(matches!(
            service.get("never-uploaded").await,
            Err(PostError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_remote_hit() {
        let store = FakeObjectStore::healthy();
        store
            .put(
                &RemoteObjectStore::image_key("abc"),
                ImageBlob::new(vec![5u8, 6], Some("image/gif")),
            )
            .await
            .unwrap();

        let service = ImageRetrievalService::new(context(Some(&store), None));
        let blob = service.get("abc").await.expect("image should be found");
        assert_eq!(blob.bytes.as_ref(), &[5u8, 6]);
        assert_eq!(blob.content_type, "image/gif");
    }

    #[tokio::test]
    async fn test_remote_read_error_falls_back_to_local() {
        let store = FakeObjectStore::failing_reads();
        let storage = context(Some(&store), None);
        storage
            .local()
            .put_image("abc", ImageBlob::new(vec![1u8], None));

        let blob = ImageRetrievalService::new(storage)
            .get("abc")
            .await
            .expect("local copy should be served");
        assert_eq!(blob.bytes.as_ref(), &[1u8]);
        assert_eq!(blob.content_type, "image/jpeg");
    }
}
