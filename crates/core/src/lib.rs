//! Core logic for imgboard.
//!
//! This crate contains the storage layer and the post services with ZERO web
//! dependencies. The HTTP layer only wires requests into these services.
//!
//! # Modules
//!
//! - `storage` - Remote adapters, availability probe, and in-memory fallback
//! - `post` - Upload, image retrieval, and post listing

pub mod post;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
