//! Storage traits
//!
//! Handlers and services talk to these traits; the DynamoDB repositories and
//! the in-memory store implement them.

use async_trait::async_trait;

use crate::db::models::{Song, SongArtist, SongAttributes, TranslationCache};

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Filter for looking up a song's credited artists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistQuery {
    pub song_id: i64,
    /// Only the artist with this name
    pub artist_name: Option<String>,
    /// Only artists performing under this stage name
    pub stage_name: Option<String>,
}

impl ArtistQuery {
    pub fn for_song(song_id: i64) -> Self {
        Self {
            song_id,
            ..Self::default()
        }
    }

    /// Whether an artist satisfies the optional name filters
    pub fn matches(&self, artist: &SongArtist) -> bool {
        artist.song_id == self.song_id
            && self
                .artist_name
                .as_deref()
                .map_or(true, |name| artist.artist_name == name)
            && self
                .stage_name
                .as_deref()
                .map_or(true, |name| artist.stage_name == name)
    }
}

/// Song records keyed by integer id
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Fetch one song
    async fn get(&self, id: i64) -> Result<Option<Song>, StoreError>;

    /// Every song, in no particular order
    async fn list(&self) -> Result<Vec<Song>, StoreError>;

    /// Unconditionally write a song, replacing any existing record
    async fn put(&self, song: &Song) -> Result<(), StoreError>;

    /// Replace the updatable attributes in a single write and return the
    /// record as stored afterwards. The translation cache is not touched.
    async fn update(&self, id: i64, attributes: &SongAttributes) -> Result<Song, StoreError>;

    /// Replace only the translation cache attribute
    async fn set_translation_cache(
        &self,
        id: i64,
        cache: &TranslationCache,
    ) -> Result<(), StoreError>;

    /// Delete a song. Deleting a missing id is not an error.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Artists credited on songs
#[async_trait]
pub trait SongArtistStore: Send + Sync {
    /// Artists for a song, ordered by stage name ascending
    async fn artists_by_song(&self, query: &ArtistQuery) -> Result<Vec<SongArtist>, StoreError>;

    /// Write an artist credit, replacing any existing one with the same key
    async fn put_artist(&self, artist: &SongArtist) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_query_matches() {
        let artist = SongArtist {
            song_id: 1,
            artist_name: "Stefani Germanotta".to_string(),
            stage_name: "Lady Gaga".to_string(),
        };

        assert!(ArtistQuery::for_song(1).matches(&artist));
        assert!(!ArtistQuery::for_song(2).matches(&artist));

        let by_stage = ArtistQuery {
            stage_name: Some("Lady Gaga".to_string()),
            ..ArtistQuery::for_song(1)
        };
        assert!(by_stage.matches(&artist));

        let by_name = ArtistQuery {
            artist_name: Some("Someone Else".to_string()),
            ..ArtistQuery::for_song(1)
        };
        assert!(!by_name.matches(&artist));
    }
}
