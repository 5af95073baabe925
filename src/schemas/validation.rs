//! Request body validation
//!
//! Create and update bodies must match the song schema in full; nothing is
//! partially accepted.

use validator::Validate;

use crate::error::ApiError;
use crate::schemas::song::{song_schema, SongBody};

pub const SCHEMA_MISMATCH_MESSAGE: &str = "Incorrect type. Must match Song schema";

/// Parse and validate a song body
pub fn parse_song_body(body: &[u8]) -> Result<SongBody, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("Missing request body".to_string()));
    }

    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {}", e)))?;

    if value.is_null() {
        return Err(ApiError::BadRequest("Missing request body".to_string()));
    }

    let song: SongBody = serde_json::from_value(value).map_err(|e| schema_violation(e.to_string()))?;
    song.validate().map_err(|e| schema_violation(e.to_string()))?;

    Ok(song)
}

fn schema_violation(detail: String) -> ApiError {
    tracing::debug!(detail = %detail, "Song body failed schema validation");
    ApiError::SchemaViolation {
        message: format!("{} ({})", SCHEMA_MISMATCH_MESSAGE, detail),
        schema: song_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"id":1,"title":"Test","artist":"A","album":"B","genre_ids":[1],
        "release_date":"2020-01-01","language":"en","duration":200,"explicit":false}"#;

    #[test]
    fn test_valid_body() {
        let song = parse_song_body(VALID.as_bytes()).unwrap();
        assert_eq!(song.title, "Test");
        assert_eq!(song.genre_ids, vec![1]);
    }

    #[test]
    fn test_missing_body() {
        for body in ["", "   ", "null"] {
            match parse_song_body(body.as_bytes()) {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "Missing request body"),
                other => panic!("unexpected result for {:?}: {:?}", body, other),
            }
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_song_body(b"{\"title\":"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_wrong_types_are_schema_violations() {
        let cases = [
            r#"{"title":"Test"}"#,
            r#"{"title":"T","artist":"A","album":"B","genre_ids":"1","release_date":"2020-01-01","language":"en","duration":200,"explicit":false}"#,
            r#"{"title":"T","artist":"A","album":"B","genre_ids":[1],"release_date":"2020-01-01","language":"en","duration":"200","explicit":false}"#,
            r#"{"title":"T","artist":"A","album":"B","genre_ids":[1],"release_date":"2020-01-01","language":"en","duration":200,"explicit":"no"}"#,
            r#"[1, 2, 3]"#,
        ];

        for body in cases {
            match parse_song_body(body.as_bytes()) {
                Err(ApiError::SchemaViolation { message, schema }) => {
                    assert!(message.starts_with(SCHEMA_MISMATCH_MESSAGE));
                    assert_eq!(schema["title"], "Song");
                }
                other => panic!("unexpected result for {}: {:?}", body, other),
            }
        }
    }

    #[test]
    fn test_semantic_rules_are_schema_violations() {
        let body = VALID.replace("2020-01-01", "yesterday");
        assert!(matches!(
            parse_song_body(body.as_bytes()),
            Err(ApiError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_fractional_duration_and_empty_title() {
        let body = VALID
            .replace("\"duration\":200", "\"duration\":200.5")
            .replace("\"title\":\"Test\"", "\"title\":\"\"");
        let song = parse_song_body(body.as_bytes()).unwrap();
        assert_eq!(song.duration, 200.5);
        assert_eq!(song.title, "");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let body = VALID.replace(
            "\"explicit\":false",
            "\"explicit\":false,\"translationCache\":{\"fr\":{\"title\":\"Essai\"}}",
        );
        assert!(parse_song_body(body.as_bytes()).is_ok());
    }
}
