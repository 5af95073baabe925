//! Song artist repository
//!
//! Artist lookups go through the `stageNameIx` local secondary index so
//! results come back ordered by stage name.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use std::sync::Arc;

use crate::db::models::SongArtist;
use crate::db::repositories::song::dynamodb_error;
use crate::db::store::{ArtistQuery, SongArtistStore, StoreError};
use crate::db::DynamoDbClient;

/// Repository for song artist credits
#[derive(Clone)]
pub struct DynamoSongArtistRepository {
    client: Arc<DynamoDbClient>,
}

impl DynamoSongArtistRepository {
    pub fn new(client: Arc<DynamoDbClient>) -> Self {
        Self { client }
    }
}

/// Key condition for an artist query; the stage name is the index sort key
fn key_condition(query: &ArtistQuery) -> String {
    let mut condition = "songId = :song_id".to_string();
    if query.stage_name.is_some() {
        condition.push_str(" AND stageName = :stage_name");
    }
    condition
}

#[async_trait]
impl SongArtistStore for DynamoSongArtistRepository {
    async fn artists_by_song(&self, query: &ArtistQuery) -> Result<Vec<SongArtist>, StoreError> {
        let mut request = self
            .client
            .client()
            .query()
            .table_name(self.client.song_artists_table())
            .index_name(self.client.stage_name_index())
            .key_condition_expression(key_condition(query))
            .expression_attribute_values(":song_id", AttributeValue::N(query.song_id.to_string()))
            .scan_index_forward(true);

        if let Some(ref stage_name) = query.stage_name {
            request = request.expression_attribute_values(":stage_name", AttributeValue::S(stage_name.clone()));
        }

        if let Some(ref artist_name) = query.artist_name {
            request = request
                .filter_expression("artistName = :artist_name")
                .expression_attribute_values(":artist_name", AttributeValue::S(artist_name.clone()));
        }

        let mut artists = Vec::new();
        let mut start_key = None;

        loop {
            let result = request
                .clone()
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(dynamodb_error)?;

            artists.extend(
                result
                    .items
                    .unwrap_or_default()
                    .iter()
                    .filter_map(SongArtist::from_dynamodb),
            );

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(
            song_id = query.song_id,
            count = artists.len(),
            "Queried song artists"
        );

        Ok(artists)
    }

    async fn put_artist(&self, artist: &SongArtist) -> Result<(), StoreError> {
        self.client
            .client()
            .put_item()
            .table_name(self.client.song_artists_table())
            .set_item(Some(artist.to_dynamodb()))
            .send()
            .await
            .map_err(dynamodb_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_condition() {
        let query = ArtistQuery::for_song(3);
        assert_eq!(key_condition(&query), "songId = :song_id");

        let query = ArtistQuery {
            stage_name: Some("Drake".to_string()),
            ..ArtistQuery::for_song(3)
        };
        assert_eq!(key_condition(&query), "songId = :song_id AND stageName = :stage_name");
    }
}
