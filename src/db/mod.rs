//! Database module
//!
//! Storage traits, their DynamoDB and in-memory implementations, and seed
//! data loading.

pub mod dynamodb;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod store;

pub use dynamodb::DynamoDbClient;
pub use memory::MemoryStore;
pub use models::{CachedTranslation, Song, SongArtist, SongAttributes, TranslationCache};
pub use repositories::{DynamoSongArtistRepository, DynamoSongRepository};
pub use seed::{SeedData, SeedError};
pub use store::{ArtistQuery, SongArtistStore, SongStore, StoreError};
