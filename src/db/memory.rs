//! In-memory store
//!
//! Implements both storage traits over ordered maps so the service can run
//! without AWS. Semantics follow the DynamoDB repositories: puts overwrite,
//! updates create missing records, deletes are idempotent.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::db::models::{Song, SongArtist, SongAttributes, TranslationCache};
use crate::db::store::{ArtistQuery, SongArtistStore, SongStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    songs: RwLock<BTreeMap<i64, Song>>,
    /// Keyed like the table: (songId, artistName)
    artists: RwLock<BTreeMap<(i64, String), SongArtist>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store preloaded with seed records
    pub fn with_records(songs: Vec<Song>, artists: Vec<SongArtist>) -> Self {
        Self {
            songs: RwLock::new(songs.into_iter().map(|song| (song.id, song)).collect()),
            artists: RwLock::new(
                artists
                    .into_iter()
                    .map(|artist| ((artist.song_id, artist.artist_name.clone()), artist))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn get(&self, id: i64) -> Result<Option<Song>, StoreError> {
        Ok(self.songs.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Song>, StoreError> {
        Ok(self.songs.read().await.values().cloned().collect())
    }

    async fn put(&self, song: &Song) -> Result<(), StoreError> {
        self.songs.write().await.insert(song.id, song.clone());
        Ok(())
    }

    async fn update(&self, id: i64, attributes: &SongAttributes) -> Result<Song, StoreError> {
        let mut songs = self.songs.write().await;
        let song = songs
            .entry(id)
            .or_insert_with(|| attributes.clone().into_song(id));
        song.apply(attributes);
        Ok(song.clone())
    }

    async fn set_translation_cache(
        &self,
        id: i64,
        cache: &TranslationCache,
    ) -> Result<(), StoreError> {
        match self.songs.write().await.get_mut(&id) {
            Some(song) => {
                song.translation_cache = Some(cache.clone());
                Ok(())
            }
            // DynamoDB would create a key-only item here, which no reader could parse
            None => Err(StoreError::ParseError(format!(
                "Cannot cache translations for missing song {}",
                id
            ))),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.songs.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SongArtistStore for MemoryStore {
    async fn artists_by_song(&self, query: &ArtistQuery) -> Result<Vec<SongArtist>, StoreError> {
        let mut artists: Vec<SongArtist> = self
            .artists
            .read()
            .await
            .values()
            .filter(|artist| query.matches(artist))
            .cloned()
            .collect();

        artists.sort_by(|a, b| a.stage_name.cmp(&b.stage_name));

        Ok(artists)
    }

    async fn put_artist(&self, artist: &SongArtist) -> Result<(), StoreError> {
        self.artists
            .write()
            .await
            .insert((artist.song_id, artist.artist_name.clone()), artist.clone());
        Ok(())
    }
}
