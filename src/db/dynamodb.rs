//! DynamoDB client wrapper
//!
//! Pairs the AWS SDK client with the table names from settings.

use aws_sdk_dynamodb::Client as DynamoDbSdkClient;
use crate::config::Settings;
use std::sync::Arc;

/// DynamoDB client wrapper shared by the repositories.
#[derive(Clone)]
pub struct DynamoDbClient {
    settings: Arc<Settings>,
    client: DynamoDbSdkClient,
}

impl DynamoDbClient {
    pub fn new(settings: Arc<Settings>, client: DynamoDbSdkClient) -> Self {
        Self { settings, client }
    }

    /// Get a reference to the underlying AWS SDK client
    pub fn client(&self) -> &DynamoDbSdkClient {
        &self.client
    }

    /// Songs table, keyed by `id`
    pub fn songs_table(&self) -> &str {
        &self.settings.songs_table
    }

    /// Song artists table, keyed by (`songId`, `artistName`)
    pub fn song_artists_table(&self) -> &str {
        &self.settings.song_artists_table
    }

    /// Local secondary index ordering a song's artists by `stageName`
    pub fn stage_name_index(&self) -> &str {
        &self.settings.stage_name_index
    }

    /// Check if the DynamoDB connection is healthy
    ///
    /// Performs a simple list_tables operation to verify connectivity.
    pub async fn health_check(&self) -> bool {
        match self.client.list_tables().limit(1).send().await {
            Ok(_) => {
                tracing::debug!("DynamoDB health check passed");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "DynamoDB health check failed");
                false
            }
        }
    }
}
