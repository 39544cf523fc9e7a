//! Upload orchestration.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::PostError;
use super::types::{ImageBlob, NewPost, Post, StorageLocation, UploadReceipt};
use crate::storage::{Backend, StorageContext};

/// Stores a new post's image and metadata.
#[derive(Clone)]
pub struct UploadService {
    storage: Arc<StorageContext>,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(storage: Arc<StorageContext>) -> Self {
        Self { storage }
    }

    /// Upload a post.
    ///
    /// The image and the record are written independently. Each goes to its
    /// remote backend when available and to local storage when the backend
    /// is unavailable or the remote write fails.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::MissingField`] for a blank title. Image bytes
    /// are stored as given, including a zero-length image.
    pub async fn upload(&self, input: NewPost) -> Result<UploadReceipt, PostError> {
        if input.title.trim().is_empty() {
            return Err(PostError::MissingField("title"));
        }

        let id = Uuid::new_v4().to_string();
        let resolved = self.storage.resolve_backends().await;
        let local = self.storage.local();

        let blob = ImageBlob::new(input.image, input.content_type.as_deref());
        let image = match &resolved.images {
            Backend::Remote(store) => match store.put_image(&id, blob.clone()).await {
                Ok(()) => StorageLocation::Remote,
                Err(e) => {
                    warn!(id = %id, error = %e, "Image write failed, storing locally");
                    local.put_image(&id, blob);
                    StorageLocation::Local
                }
            },
            Backend::Local => {
                local.put_image(&id, blob);
                StorageLocation::Local
            }
        };

        let post = Post {
            id: id.clone(),
            title: input.title,
            note: input.note,
            created_at: Utc::now(),
        };
        let metadata = match &resolved.posts {
            Backend::Remote(table) => match table.put_post(&post).await {
                Ok(()) => StorageLocation::Remote,
                Err(e) => {
                    warn!(id = %id, error = %e, "Post write failed, storing locally");
                    local.put_post(post);
                    StorageLocation::Local
                }
            },
            Backend::Local => {
                local.put_post(post);
                StorageLocation::Local
            }
        };

        info!(id = %id, ?image, ?metadata, "Post uploaded");

        Ok(UploadReceipt {
            id,
            image,
            metadata,
        })
    }
}
