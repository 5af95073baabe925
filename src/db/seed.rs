//! Seed data loading
//!
//! Reads `songs.json` and `song_artists.json` from a directory and turns
//! records into `BatchWriteItem` put requests.

use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::db::models::{Song, SongArtist};

/// Maximum number of put requests DynamoDB accepts in one batch write
pub const BATCH_WRITE_LIMIT: usize = 25;

pub const SONGS_FILE: &str = "songs.json";
pub const SONG_ARTISTS_FILE: &str = "song_artists.json";

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Records loaded from a seed directory
#[derive(Debug, Default)]
pub struct SeedData {
    pub songs: Vec<Song>,
    pub artists: Vec<SongArtist>,
}

impl SeedData {
    /// Load seed files from `dir`. The songs file is required, the artists
    /// file is optional.
    pub fn load(dir: &Path) -> Result<Self, SeedError> {
        let songs = read_json(&dir.join(SONGS_FILE))?;

        let artists_path = dir.join(SONG_ARTISTS_FILE);
        let artists = if artists_path.exists() {
            read_json(&artists_path)?
        } else {
            Vec::new()
        };

        Ok(Self { songs, artists })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| SeedError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Group items into batches of put requests no larger than `BATCH_WRITE_LIMIT`
pub fn put_request_batches<I>(items: I) -> Result<Vec<Vec<WriteRequest>>, BuildError>
where
    I: IntoIterator<Item = HashMap<String, AttributeValue>>,
{
    let requests = items
        .into_iter()
        .map(|item| {
            let put = PutRequest::builder().set_item(Some(item)).build()?;
            Ok(WriteRequest::builder().put_request(put).build())
        })
        .collect::<Result<Vec<_>, BuildError>>()?;

    Ok(requests
        .chunks(BATCH_WRITE_LIMIT)
        .map(|chunk| chunk.to_vec())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SONGS_JSON: &str = r#"[
        {"id": 1, "title": "Test", "artist": "A", "album": "B", "genre_ids": [1],
         "release_date": "2020-01-01", "language": "en", "duration": 200, "explicit": false}
    ]"#;

    #[test]
    fn test_load_seed_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SONGS_FILE), SONGS_JSON).unwrap();
        fs::write(
            dir.path().join(SONG_ARTISTS_FILE),
            r#"[{"songId": 1, "artistName": "Aubrey Graham", "stageName": "Drake"}]"#,
        )
        .unwrap();

        let seed = SeedData::load(dir.path()).unwrap();
        assert_eq!(seed.songs.len(), 1);
        assert_eq!(seed.songs[0].title, "Test");
        assert_eq!(seed.artists[0].stage_name, "Drake");
    }

    #[test]
    fn test_load_seed_dir_without_artists() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SONGS_FILE), SONGS_JSON).unwrap();

        let seed = SeedData::load(dir.path()).unwrap();
        assert_eq!(seed.songs.len(), 1);
        assert!(seed.artists.is_empty());
    }

    #[test]
    fn test_load_seed_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(SeedData::load(dir.path()), Err(SeedError::Io { .. })));

        fs::write(dir.path().join(SONGS_FILE), "[{\"id\": \"one\"}]").unwrap();
        assert!(matches!(SeedData::load(dir.path()), Err(SeedError::Json { .. })));
    }

    #[test]
    fn test_put_request_batches_chunking() {
        let items = (0..60).map(|id| {
            let mut item = HashMap::new();
            item.insert("id".to_string(), AttributeValue::N(id.to_string()));
            item
        });

        let batches = put_request_batches(items).unwrap();
        let sizes: Vec<_> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![25, 25, 10]);
        assert!(batches[0][0].put_request().is_some());
    }
}
