//! Application routing
//!
//! Reads are open; writes to the catalog go through session authorization.

use axum::{
    http::HeaderName,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{artists, health, songs};
use crate::middleware::{
    auth::{require_session, AuthState},
    logging::{log_request, REQUEST_ID_HEADER, TRACE_ID_HEADER},
};
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .route("/liveness", get(health::liveness));

    let read_routes = Router::new()
        .route("/songs", get(songs::list_songs))
        .route("/songs/artist", get(artists::get_song_artists))
        .route("/songs/:song_id", get(songs::get_song));

    // route_layer keeps the session check on the methods registered here only,
    // so merging with the read routes leaves GET on the same paths open.
    let auth_state = AuthState::new(state.settings.clone());
    let write_routes = Router::new()
        .route(
            "/songs",
            post(songs::create_song)
                .put(songs::update_song_without_id)
                .delete(songs::delete_song_without_id),
        )
        .route(
            "/songs/:song_id",
            put(songs::update_song).delete(songs::delete_song),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, require_session));

    // Layer order: last added = outermost = runs first
    Router::new()
        .merge(read_routes)
        .merge(write_routes)
        .merge(health_routes)
        .layer(create_cors_layer())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Create CORS layer with permissive settings
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(TRACE_ID_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}
