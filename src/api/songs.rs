//! Song endpoints
//!
//! CRUD over song records plus title translation on GET.

use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::db::Song;
use crate::error::ApiError;
use crate::schemas::{
    parse_song_body, CreatedResponse, DataResponse, MessageResponse, SongQuery, UpdatedResponse,
};
use crate::server::state::AppState;

const MISSING_ID_MESSAGE: &str = "Missing song ID in path parameters";

/// Parse the `{songId}` path segment
pub fn parse_song_id(raw: &str) -> Result<i64, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::BadRequest(MISSING_ID_MESSAGE.to_string()));
    }

    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid song ID in path: {}", raw)))
}

/// GET /songs
pub async fn list_songs(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Song>>>, ApiError> {
    let songs = state.songs.list().await?;

    tracing::debug!(count = songs.len(), "Listing songs");

    Ok(Json(DataResponse { data: songs }))
}

/// GET /songs/{songId}[?language=xx]
///
/// Without `language` the stored record is returned; with it the title is
/// translated through the song's translation cache.
pub async fn get_song(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
    Query(query): Query<SongQuery>,
) -> Result<Json<DataResponse<Song>>, ApiError> {
    let id = parse_song_id(&song_id)?;

    let song = state
        .translations
        .translate_song(id, query.language.as_deref())
        .await?;

    Ok(Json(DataResponse { data: song }))
}

/// POST /songs
pub async fn create_song(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let body = parse_song_body(&body)?;
    let id = body
        .id
        .ok_or_else(|| ApiError::BadRequest("Song id is required".to_string()))?;

    let song = body.attributes().into_song(id);
    state.songs.put(&song).await?;

    tracing::info!(song_id = id, "Song added");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Song added".to_string(),
            data: song,
        }),
    ))
}

/// PUT /songs/{songId}
pub async fn update_song(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
    body: Bytes,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let id = parse_song_id(&song_id)?;
    let body = parse_song_body(&body)?;

    let updated = state.songs.update(id, &body.attributes()).await?;

    tracing::info!(song_id = id, "Song updated");

    Ok(Json(UpdatedResponse {
        message: format!("Song with ID {} updated successfully", id),
        updated_attributes: updated,
    }))
}

/// PUT /songs
pub async fn update_song_without_id() -> ApiError {
    ApiError::BadRequest(MISSING_ID_MESSAGE.to_string())
}

/// DELETE /songs/{songId}
///
/// A missing or malformed id answers 500 rather than 400. Existing clients
/// of the delete endpoint depend on that status.
pub async fn delete_song(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_song_id(&song_id).map_err(|e| ApiError::Internal(anyhow!(e.to_string())))?;

    state.songs.delete(id).await?;

    tracing::info!(song_id = id, "Song deleted");

    Ok(Json(MessageResponse {
        message: format!("Song with ID {} deleted successfully", id),
    }))
}

/// DELETE /songs
pub async fn delete_song_without_id() -> ApiError {
    ApiError::Internal(anyhow!("Missing song ID in path"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_song_id() {
        assert_eq!(parse_song_id("42").unwrap(), 42);
        assert_eq!(parse_song_id(" 7 ").unwrap(), 7);

        match parse_song_id("") {
            Err(ApiError::BadRequest(msg)) => assert_eq!(msg, MISSING_ID_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(parse_song_id("abc"), Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_without_id_is_server_error() {
        let error = delete_song_without_id().await;
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_update_without_id_is_bad_request() {
        let error = update_song_without_id().await;
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
