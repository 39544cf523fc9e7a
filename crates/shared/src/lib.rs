//! Shared errors and configuration for imgboard.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, AwsConfig, LOCAL_STORAGE_LABEL, ServerConfig, UploadConfig};
pub use error::AppError;
