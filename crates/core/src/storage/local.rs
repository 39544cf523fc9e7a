//! In-process fallback storage.

use std::sync::{PoisonError, RwLock};

use dashmap::DashMap;

use crate::post::{ImageBlob, Post};

/// Process-lifetime store used when a remote backend is unavailable.
///
/// Safe to share between concurrent requests. Nothing is ever evicted.
#[derive(Debug, Default)]
pub struct LocalFallbackStore {
    images: DashMap<String, ImageBlob>,
    posts: RwLock<Vec<Post>>,
}

impl LocalFallbackStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store image bytes under a post id.
    pub fn put_image(&self, id: &str, blob: ImageBlob) {
        self.images.insert(id.to_string(), blob);
    }

    /// Look up image bytes by post id.
    #[must_use]
    pub fn get_image(&self, id: &str) -> Option<ImageBlob> {
        self.images.get(id).map(|entry| entry.value().clone())
    }

    /// Append a post record.
    pub fn put_post(&self, post: Post) {
        self.posts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(post);
    }

    /// All post records, most recently inserted first.
    #[must_use]
    pub fn posts_newest_first(&self) -> Vec<Post> {
        self.posts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .cloned()
            .collect()
    }

    /// Number of stored images.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Number of stored post records.
    #[must_use]
    pub fn post_count(&self) -> usize {
        self.posts.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
