//! Repository layer
//!
//! DynamoDB implementations of the storage traits.

pub mod song;
pub mod song_artist;

pub use song::DynamoSongRepository;
pub use song_artist::DynamoSongArtistRepository;
