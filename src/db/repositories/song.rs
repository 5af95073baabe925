//! Song repository
//!
//! DynamoDB access for the songs table.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_smithy_types::error::display::DisplayErrorContext;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::models::{
    genre_ids_to_dynamodb, translation_cache_to_dynamodb, Song, SongAttributes, TranslationCache,
};
use crate::db::store::{SongStore, StoreError};
use crate::db::DynamoDbClient;

/// Replaces every updatable attribute in one write. `language` and
/// `duration` are reserved words and must go through name placeholders.
const UPDATE_SONG_EXPRESSION: &str = "SET title = :title, artist = :artist, album = :album, \
     genre_ids = :genre_ids, release_date = :release_date, #lang = :language, \
     #dur = :duration, explicit = :explicit";

/// Repository for song records
#[derive(Clone)]
pub struct DynamoSongRepository {
    client: Arc<DynamoDbClient>,
}

impl DynamoSongRepository {
    pub fn new(client: Arc<DynamoDbClient>) -> Self {
        Self { client }
    }

    fn key(id: i64) -> AttributeValue {
        AttributeValue::N(id.to_string())
    }
}

pub(crate) fn dynamodb_error<E>(error: E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::DynamoDb(DisplayErrorContext(&error).to_string())
}

fn parse_song(item: &HashMap<String, AttributeValue>) -> Result<Song, StoreError> {
    Song::from_dynamodb(item).ok_or_else(|| StoreError::ParseError("Failed to parse song".to_string()))
}

#[async_trait]
impl SongStore for DynamoSongRepository {
    async fn get(&self, id: i64) -> Result<Option<Song>, StoreError> {
        let result = self
            .client
            .client()
            .get_item()
            .table_name(self.client.songs_table())
            .key("id", Self::key(id))
            .send()
            .await
            .map_err(dynamodb_error)?;

        result.item.as_ref().map(parse_song).transpose()
    }

    async fn list(&self) -> Result<Vec<Song>, StoreError> {
        let mut songs = Vec::new();
        let mut start_key = None;

        loop {
            let result = self
                .client
                .client()
                .scan()
                .table_name(self.client.songs_table())
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(dynamodb_error)?;

            for item in result.items.unwrap_or_default() {
                match Song::from_dynamodb(&item) {
                    Some(song) => songs.push(song),
                    None => tracing::warn!(item = ?item.get("id"), "Skipping unparseable song item"),
                }
            }

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(count = songs.len(), "Scanned songs table");

        Ok(songs)
    }

    async fn put(&self, song: &Song) -> Result<(), StoreError> {
        self.client
            .client()
            .put_item()
            .table_name(self.client.songs_table())
            .set_item(Some(song.to_dynamodb()))
            .send()
            .await
            .map_err(dynamodb_error)?;

        tracing::debug!(song_id = song.id, "Stored song");

        Ok(())
    }

    async fn update(&self, id: i64, attributes: &SongAttributes) -> Result<Song, StoreError> {
        let result = self
            .client
            .client()
            .update_item()
            .table_name(self.client.songs_table())
            .key("id", Self::key(id))
            .update_expression(UPDATE_SONG_EXPRESSION)
            .expression_attribute_names("#lang", "language")
            .expression_attribute_names("#dur", "duration")
            .expression_attribute_values(":title", AttributeValue::S(attributes.title.clone()))
            .expression_attribute_values(":artist", AttributeValue::S(attributes.artist.clone()))
            .expression_attribute_values(":album", AttributeValue::S(attributes.album.clone()))
            .expression_attribute_values(":genre_ids", genre_ids_to_dynamodb(&attributes.genre_ids))
            .expression_attribute_values(
                ":release_date",
                AttributeValue::S(attributes.release_date.clone()),
            )
            .expression_attribute_values(":language", AttributeValue::S(attributes.language.clone()))
            .expression_attribute_values(":duration", AttributeValue::N(attributes.duration.to_string()))
            .expression_attribute_values(":explicit", AttributeValue::Bool(attributes.explicit))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(dynamodb_error)?;

        let item = result
            .attributes
            .ok_or_else(|| StoreError::ParseError("Update returned no attributes".to_string()))?;

        parse_song(&item)
    }

    async fn set_translation_cache(
        &self,
        id: i64,
        cache: &TranslationCache,
    ) -> Result<(), StoreError> {
        self.client
            .client()
            .update_item()
            .table_name(self.client.songs_table())
            .key("id", Self::key(id))
            .update_expression("SET translationCache = :translations")
            .expression_attribute_values(":translations", translation_cache_to_dynamodb(cache))
            .send()
            .await
            .map_err(dynamodb_error)?;

        tracing::debug!(song_id = id, languages = cache.len(), "Stored translation cache");

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.client
            .client()
            .delete_item()
            .table_name(self.client.songs_table())
            .key("id", Self::key(id))
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
    fn test_update_expression_aliases_reserved_words() {
        assert!(UPDATE_SONG_EXPRESSION.contains("#lang = :language"));
        assert!(UPDATE_SONG_EXPRESSION.contains("#dur = :duration"));
        assert!(!UPDATE_SONG_EXPRESSION.contains("translationCache"));
    }

    #[test]
    fn test_parse_song_error() {
        let item = HashMap::new();
        assert!(matches!(parse_song(&item), Err(StoreError::ParseError(_))));
    }

    #[test]
    fn test_parse_song_without_duration_is_error() {
        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::N("1".to_string()));
        item.insert("title".to_string(), AttributeValue::S("Test".to_string()));
        item.insert("artist".to_string(), AttributeValue::S("A".to_string()));
        item.insert("album".to_string(), AttributeValue::S("B".to_string()));
        item.insert("genre_ids".to_string(), AttributeValue::L(vec![]));
        item.insert("release_date".to_string(), AttributeValue::S("2020-01-01".to_string()));
        item.insert("language".to_string(), AttributeValue::S("en".to_string()));
        item.insert("explicit".to_string(), AttributeValue::Bool(false));
        assert!(matches!(parse_song(&item), Err(StoreError::ParseError(_))));

        item.insert("duration".to_string(), AttributeValue::N("200.5".to_string()));
        assert_eq!(parse_song(&item).unwrap().duration, 200.5);
    }
}
