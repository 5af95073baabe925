//! Song catalog data models
//!
//! Records are stored as flat DynamoDB items whose attribute names match the
//! JSON field names exactly.

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Per-song cache of translated titles, keyed by language code
pub type TranslationCache = BTreeMap<String, CachedTranslation>;

/// A previously computed translation of a song's title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTranslation {
    pub title: String,
}

/// Song record.
///
/// Stored in the songs table with `id` as partition key. The id is
/// assigned by the client and never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre_ids: Vec<i64>,
    pub release_date: String,
    pub language: String,
    /// Length in seconds
    #[serde(serialize_with = "serialize_seconds")]
    pub duration: f64,
    pub explicit: bool,

    #[serde(
        rename = "translationCache",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub translation_cache: Option<TranslationCache>,
}

/// The attributes replaced by an update. Everything but the key and the
/// translation cache.
#[derive(Debug, Clone, PartialEq)]
pub struct SongAttributes {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre_ids: Vec<i64>,
    pub release_date: String,
    pub language: String,
    pub duration: f64,
    pub explicit: bool,
}

impl SongAttributes {
    /// Build a full song record with these attributes and no cached translations
    pub fn into_song(self, id: i64) -> Song {
        Song {
            id,
            title: self.title,
            artist: self.artist,
            album: self.album,
            genre_ids: self.genre_ids,
            release_date: self.release_date,
            language: self.language,
            duration: self.duration,
            explicit: self.explicit,
            translation_cache: None,
        }
    }
}

impl Song {
    /// Overwrite the updatable attributes, keeping id and translation cache
    pub fn apply(&mut self, attributes: &SongAttributes) {
        self.title = attributes.title.clone();
        self.artist = attributes.artist.clone();
        self.album = attributes.album.clone();
        self.genre_ids = attributes.genre_ids.clone();
        self.release_date = attributes.release_date.clone();
        self.language = attributes.language.clone();
        self.duration = attributes.duration;
        self.explicit = attributes.explicit;
    }

    /// Cached translation for a language, if one was stored
    pub fn cached_translation(&self, language: &str) -> Option<&CachedTranslation> {
        self.translation_cache.as_ref()?.get(language)
    }

    /// Convert to DynamoDB item
    pub fn to_dynamodb(&self) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::N(self.id.to_string()));
        item.insert("title".to_string(), AttributeValue::S(self.title.clone()));
        item.insert("artist".to_string(), AttributeValue::S(self.artist.clone()));
        item.insert("album".to_string(), AttributeValue::S(self.album.clone()));
        item.insert("genre_ids".to_string(), genre_ids_to_dynamodb(&self.genre_ids));
        item.insert("release_date".to_string(), AttributeValue::S(self.release_date.clone()));
        item.insert("language".to_string(), AttributeValue::S(self.language.clone()));
        item.insert("duration".to_string(), AttributeValue::N(self.duration.to_string()));
        item.insert("explicit".to_string(), AttributeValue::Bool(self.explicit));

        if let Some(ref cache) = self.translation_cache {
            item.insert("translationCache".to_string(), translation_cache_to_dynamodb(cache));
        }

        item
    }

    /// Parse from DynamoDB item.
    ///
    /// Every song attribute must be present with its stored type; only the
    /// translation cache is optional.
    pub fn from_dynamodb(item: &HashMap<String, AttributeValue>) -> Option<Self> {
        Some(Self {
            id: get_number(item, "id")?,
            title: get_string(item, "title")?,
            artist: get_string(item, "artist")?,
            album: get_string(item, "album")?,
            genre_ids: get_number_list(item, "genre_ids")?,
            release_date: get_string(item, "release_date")?,
            language: get_string(item, "language")?,
            duration: get_number(item, "duration")?,
            explicit: get_bool(item, "explicit")?,
            translation_cache: item.get("translationCache").and_then(translation_cache_from_dynamodb),
        })
    }
}

/// An artist credited on a song.
///
/// Stored in the song artists table with `songId` as partition key and
/// `artistName` as sort key; the `stageNameIx` local secondary index
/// orders a song's artists by `stageName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongArtist {
    pub song_id: i64,
    pub artist_name: String,
    pub stage_name: String,
}

impl SongArtist {
    /// Convert to DynamoDB item
    pub fn to_dynamodb(&self) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();
        item.insert("songId".to_string(), AttributeValue::N(self.song_id.to_string()));
        item.insert("artistName".to_string(), AttributeValue::S(self.artist_name.clone()));
        item.insert("stageName".to_string(), AttributeValue::S(self.stage_name.clone()));
        item
    }

    /// Parse from DynamoDB item
    pub fn from_dynamodb(item: &HashMap<String, AttributeValue>) -> Option<Self> {
        Some(Self {
            song_id: get_number(item, "songId")?,
            artist_name: get_string(item, "artistName")?,
            stage_name: get_string(item, "stageName")?,
        })
    }
}

pub(crate) fn genre_ids_to_dynamodb(genre_ids: &[i64]) -> AttributeValue {
    AttributeValue::L(
        genre_ids
            .iter()
            .map(|id| AttributeValue::N(id.to_string()))
            .collect(),
    )
}

pub(crate) fn translation_cache_to_dynamodb(cache: &TranslationCache) -> AttributeValue {
    AttributeValue::M(
        cache
            .iter()
            .map(|(language, entry)| {
                let mut value = HashMap::new();
                value.insert("title".to_string(), AttributeValue::S(entry.title.clone()));
                (language.clone(), AttributeValue::M(value))
            })
            .collect(),
    )
}

fn translation_cache_from_dynamodb(value: &AttributeValue) -> Option<TranslationCache> {
    let map = value.as_m().ok()?;
    Some(
        map.iter()
            .filter_map(|(language, entry)| {
                let title = get_string(entry.as_m().ok()?, "title").unwrap_or_default();
                Some((language.clone(), CachedTranslation { title }))
            })
            .collect(),
    )
}

// Helper functions for parsing DynamoDB items

fn get_string(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

fn get_number<T: std::str::FromStr>(item: &HashMap<String, AttributeValue>, key: &str) -> Option<T> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
}

fn get_bool(item: &HashMap<String, AttributeValue>, key: &str) -> Option<bool> {
    item.get(key).and_then(|v| v.as_bool().ok()).copied()
}

/// Numbers written by the document client land as a list; a number set is accepted too.
/// One unparseable element fails the whole list.
fn get_number_list(item: &HashMap<String, AttributeValue>, key: &str) -> Option<Vec<i64>> {
    match item.get(key)? {
        AttributeValue::L(values) => values
            .iter()
            .map(|v| v.as_n().ok()?.parse().ok())
            .collect(),
        AttributeValue::Ns(values) => values.iter().map(|n| n.parse().ok()).collect(),
        _ => None,
    }
}

/// Whole durations go out as JSON integers so a stored `200` reads back as `200`
fn serialize_seconds<S: Serializer>(seconds: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if seconds.fract() == 0.0 && seconds.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*seconds as i64)
    } else {
        serializer.serialize_f64(*seconds)
    }
}
