//! Schema module
//!
//! Request/response types for the songs API and body validation.

pub mod song;
pub mod validation;

pub use song::{
    song_schema, ArtistParams, CreatedResponse, DataResponse, MessageResponse, SongBody, SongQuery,
    UpdatedResponse,
};
pub use validation::parse_song_body;
