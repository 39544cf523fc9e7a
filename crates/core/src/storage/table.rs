//! Metadata table adapter for post records.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::{
    Client,
    config::Credentials,
    error::DisplayErrorContext,
    types::AttributeValue,
};
use chrono::{DateTime, Utc};

use super::TABLE_BACKEND;
use super::config::TableConfig;
use super::error::StorageError;
use crate::post::Post;

/// Store of post records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataTable: Send + Sync {
    /// Lightweight reachability check.
    async fn check(&self) -> Result<(), StorageError>;

    /// Write one post record.
    async fn put(&self, post: &Post) -> Result<(), StorageError>;

    /// Read every record in the table, in no particular order.
    async fn scan(&self) -> Result<Vec<Post>, StorageError>;
}

/// [`MetadataTable`] backed by DynamoDB.
#[derive(Debug, Clone)]
pub struct DynamoTable {
    client: Client,
    table: String,
}

impl DynamoTable {
    /// Create a table client from configuration.
    ///
    /// Credentials come from the config when both halves are present and
    /// from the default AWS provider chain otherwise.
    pub async fn from_config(config: &TableConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        if let Some(credentials) = &config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                None,
                None,
                "imgboard-config",
            ));
        }

        let sdk_config = loader.load().await;
        Self {
            client: Client::new(&sdk_config),
            table: config.table.clone(),
        }
    }
}

#[async_trait]
impl MetadataTable for DynamoTable {
    async fn check(&self) -> Result<(), StorageError> {
        self.client
            .describe_table()
            .table_name(&self.table)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| StorageError::unreachable(TABLE_BACKEND, DisplayErrorContext(&e)))
    }

    async fn put(&self, post: &Post) -> Result<(), StorageError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(post_to_item(post)))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| StorageError::unreachable(TABLE_BACKEND, DisplayErrorContext(&e)))
    }

    async fn scan(&self) -> Result<Vec<Post>, StorageError> {
        let mut posts = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| StorageError::unreachable(TABLE_BACKEND, DisplayErrorContext(&e)))?;

            for item in output.items() {
                match post_from_item(item) {
                    Ok(post) => posts.push(post),
                    Err(e) => tracing::warn!(error = %e, "Skipping malformed post record"),
                }
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(posts)
    }
}

/// Encode a post as a DynamoDB item.
fn post_to_item(post: &Post) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(post.id.clone())),
        ("title".to_string(), AttributeValue::S(post.title.clone())),
        ("note".to_string(), AttributeValue::S(post.note.clone())),
        (
            "created_at".to_string(),
            AttributeValue::S(post.created_at.to_rfc3339()),
        ),
    ])
}

/// Decode a DynamoDB item.
///
/// Records written before `created_at` existed sort as the oldest.
fn post_from_item(item: &HashMap<String, AttributeValue>) -> Result<Post, StorageError> {
    let text = |name: &str| -> Option<String> {
        item.get(name).and_then(|v| v.as_s().ok()).cloned()
    };

    let id = text("id").ok_or_else(|| StorageError::MalformedRecord("missing id".into()))?;
    let created_at = text("created_at")
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |dt| dt.with_timezone(&Utc));

    Ok(Post {
        id,
        title: text("title").unwrap_or_default(),
        note: text("note").unwrap_or_default(),
        created_at,
    })
}
