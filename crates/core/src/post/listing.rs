//! Read model for the landing page.

use std::sync::Arc;

use tracing::warn;

use super::types::Post;
use crate::storage::{Backend, BackendAvailability, StorageContext};

/// Posts and backend availability from a single probe.
#[derive(Debug, Clone)]
pub struct LandingSnapshot {
    /// Posts, newest first.
    pub posts: Vec<Post>,
    /// Availability the listing was served under.
    pub availability: BackendAvailability,
}

/// Lists posts from the metadata table and the local fallback.
#[derive(Clone)]
pub struct PostListing {
    storage: Arc<StorageContext>,
}

impl PostListing {
    /// Create a new listing service.
    #[must_use]
    pub fn new(storage: Arc<StorageContext>) -> Self {
        Self { storage }
    }

    /// All posts, newest first.
    pub async fn list_posts(&self) -> Vec<Post> {
        self.snapshot().await.posts
    }

    /// Posts plus the availability they were read under.
    ///
    /// With the table available this is a full, unpaginated scan merged with
    /// any records that fell back to local storage. A failed scan degrades to
    /// the local records alone.
    pub async fn snapshot(&self) -> LandingSnapshot {
        let resolved = self.storage.resolve_backends().await;
        let local = self.storage.local().posts_newest_first();

        let mut posts = match &resolved.posts {
            Backend::Remote(table) => match table.scan().await {
                Ok(mut remote) => {
                    remote.extend(local);
                    remote
                }
                Err(e) => {
                    warn!(error = %e, "Post scan failed, listing local posts");
                    local
                }
            },
            Backend::Local => local,
        };

        // Stable sort keeps reverse-insertion order for equal timestamps.
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        LandingSnapshot {
            posts,
            availability: resolved.availability,
        }
    }
}
