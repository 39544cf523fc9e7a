//! Post types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type assumed when an upload does not declare an allowed one.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Image types served back as declared. Anything else is served as
/// [`DEFAULT_CONTENT_TYPE`].
const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Match a declared content type against [`ALLOWED_CONTENT_TYPES`].
///
/// Parameters such as `; charset=...` are ignored and case does not matter.
fn allowed_content_type(declared: &str) -> Option<&'static str> {
    let essence = declared.split(';').next().unwrap_or_default().trim();
    ALLOWED_CONTENT_TYPES
        .into_iter()
        .find(|allowed| allowed.eq_ignore_ascii_case(essence))
}

/// Metadata for one uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier, shared with the image blob.
    pub id: String,
    /// Post title.
    pub title: String,
    /// Free-form note, may be empty.
    pub note: String,
    /// When the post was uploaded.
    pub created_at: DateTime<Utc>,
}

/// Raw image bytes with their content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    /// Image bytes.
    pub bytes: Bytes,
    /// MIME type served back to clients.
    pub content_type: String,
}

impl ImageBlob {
    /// Create a blob. Content types other than JPEG, PNG, GIF and WebP
    /// become [`DEFAULT_CONTENT_TYPE`].
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        let content_type = content_type
            .and_then(allowed_content_type)
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        Self {
            bytes: bytes.into(),
            content_type: content_type.to_string(),
        }
    }
}

/// Input for uploading a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Post note.
    pub note: String,
    /// Uploaded image bytes.
    pub image: Bytes,
    /// Content type declared by the client.
    pub content_type: Option<String>,
}

/// Where a piece of an upload was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageLocation {
    /// The remote object store or table.
    Remote,
    /// The in-process fallback.
    Local,
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    /// Generated identifier.
    pub id: String,
    /// Where the image bytes landed.
    pub image: StorageLocation,
    /// Where the post record landed.
    pub metadata: StorageLocation,
}
