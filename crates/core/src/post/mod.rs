//! Post services: upload, image retrieval, and listing.
//!
//! Every operation resolves its backends once through
//! [`StorageContext`](crate::storage::StorageContext) and falls back to local
//! storage on any remote failure. Image and metadata writes are independent:
//! one may land remotely while the other lands locally, and neither is
//! rolled back.

mod error;
mod listing;
mod retrieval;
mod types;
mod upload;

pub use error::PostError;
pub use listing::{LandingSnapshot, PostListing};
pub use retrieval::ImageRetrievalService;
pub use types::{
    DEFAULT_CONTENT_TYPE, ImageBlob, NewPost, Post, StorageLocation, UploadReceipt,
};
pub use upload::UploadService;
