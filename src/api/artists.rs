//! Song artist lookup endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::db::{ArtistQuery, SongArtist};
use crate::error::ApiError;
use crate::schemas::{ArtistParams, DataResponse};
use crate::server::state::AppState;

/// Turn raw query parameters into a store query
fn artist_query(params: ArtistParams) -> Result<ArtistQuery, ApiError> {
    let song_id = params
        .song_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing songId query parameter".to_string()))?;

    let song_id = song_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid songId: {}", song_id)))?;

    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    Ok(ArtistQuery {
        song_id,
        artist_name: non_empty(params.artist_name),
        stage_name: non_empty(params.stage_name),
    })
}

/// GET /songs/artist?songId=..&artistName=..&stageName=..
///
/// Artists credited on a song, ordered by stage name.
pub async fn get_song_artists(
    State(state): State<AppState>,
    Query(params): Query<ArtistParams>,
) -> Result<Json<DataResponse<Vec<SongArtist>>>, ApiError> {
    let query = artist_query(params)?;
    let artists = state.artists.artists_by_song(&query).await?;

    tracing::debug!(song_id = query.song_id, count = artists.len(), "Listing song artists");

    Ok(Json(DataResponse { data: artists }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_query_requires_song_id() {
        assert!(matches!(
            artist_query(ArtistParams::default()),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            artist_query(ArtistParams {
                song_id: Some("one".to_string()),
                ..ArtistParams::default()
            }),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_artist_query_drops_empty_filters() {
        let query = artist_query(ArtistParams {
            song_id: Some("3".to_string()),
            artist_name: Some("".to_string()),
            stage_name: Some("Drake".to_string()),
        })
        .unwrap();

        assert_eq!(query.song_id, 3);
        assert_eq!(query.artist_name, None);
        assert_eq!(query.stage_name.as_deref(), Some("Drake"));
    }
}
