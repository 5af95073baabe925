//! Song request/response schemas

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::{Validate, ValidationError};

use crate::db::models::{Song, SongAttributes};

/// Release dates are calendar dates
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Request Types
// ============================================================================

/// Body of a create or update request.
///
/// Every song attribute is required. `id` is only read on create; updates
/// take the id from the path. Fields that are not part of the schema, such
/// as a `translationCache` echoed back from a GET, are ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SongBody {
    #[serde(default)]
    pub id: Option<i64>,

    pub title: String,

    pub artist: String,

    pub album: String,

    pub genre_ids: Vec<i64>,

    #[validate(custom(function = "validate_release_date"))]
    pub release_date: String,

    pub language: String,

    /// Seconds; fractional values are allowed
    pub duration: f64,

    pub explicit: bool,
}

impl SongBody {
    /// The attributes an update replaces
    pub fn attributes(&self) -> SongAttributes {
        SongAttributes {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            genre_ids: self.genre_ids.clone(),
            release_date: self.release_date.clone(),
            language: self.language.clone(),
            duration: self.duration,
            explicit: self.explicit,
        }
    }
}

fn validate_release_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| ValidationError::new("release_date_format"))
}

/// Query parameters for GET /songs/{songId}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongQuery {
    /// Target language code for the title
    pub language: Option<String>,
}

/// Query parameters for GET /songs/artist
///
/// Kept as raw strings so a malformed `songId` is reported as a bad request
/// instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistParams {
    pub song_id: Option<String>,
    pub artist_name: Option<String>,
    pub stage_name: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub data: Song,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
    pub message: String,
    pub updated_attributes: Song,
}

// ============================================================================
// JSON Schema
// ============================================================================

/// JSON Schema for song bodies, returned to clients whose body does not match
pub fn song_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "Song",
        "type": "object",
        "properties": {
            "id": { "type": "number" },
            "title": { "type": "string" },
            "artist": { "type": "string" },
            "album": { "type": "string" },
            "genre_ids": { "type": "array", "items": { "type": "number" } },
            "release_date": { "type": "string", "format": "date" },
            "language": { "type": "string" },
            "duration": { "type": "number" },
            "explicit": { "type": "boolean" }
        },
        "required": [
            "title",
            "artist",
            "album",
            "genre_ids",
            "release_date",
            "language",
            "duration",
            "explicit"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> Value {
        json!({
            "id": 1,
            "title": "Test",
            "artist": "A",
            "album": "B",
            "genre_ids": [1],
            "release_date": "2020-01-01",
            "language": "en",
            "duration": 200,
            "explicit": false
        })
    }

    #[test]
    fn test_valid_body() {
        let song: SongBody = serde_json::from_value(body()).unwrap();
        assert!(song.validate().is_ok());
        assert_eq!(song.id, Some(1));
        assert_eq!(song.attributes().into_song(1).title, "Test");
    }

    #[test]
    fn test_release_date_must_be_a_date() {
        let mut value = body();
        value["release_date"] = json!("01/01/2020");
        let song: SongBody = serde_json::from_value(value).unwrap();
        assert!(song.validate().is_err());

        let mut value = body();
        value["release_date"] = json!("2020-02-30");
        let song: SongBody = serde_json::from_value(value).unwrap();
        assert!(song.validate().is_err());
    }

    #[test]
    fn test_empty_strings_accepted() {
        let mut value = body();
        value["title"] = json!("");
        value["language"] = json!("");
        let song: SongBody = serde_json::from_value(value).unwrap();
        assert!(song.validate().is_ok());
        assert_eq!(song.attributes().title, "");
    }

    #[test]
    fn test_fractional_duration_accepted() {
        let mut value = body();
        value["duration"] = json!(200.5);
        let song: SongBody = serde_json::from_value(value).unwrap();
        assert!(song.validate().is_ok());
        assert_eq!(song.attributes().duration, 200.5);
    }

    #[test]
    fn test_schema_lists_every_attribute() {
        let schema = song_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 8);
        for field in required {
            assert!(schema["properties"].get(field.as_str().unwrap()).is_some());
        }
    }

    #[test]
    fn test_updated_response_field_name() {
        let song: SongBody = serde_json::from_value(body()).unwrap();
        let response = UpdatedResponse {
            message: "ok".to_string(),
            updated_attributes: song.attributes().into_song(1),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["updatedAttributes"]["id"], 1);
    }
}
