//! Application state container
//!
//! Holds the process-wide clients shared by every request. Clients are
//! built once at startup; handlers keep no state of their own.

use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{create_dynamodb_client, create_translate_client, Settings, StorageBackend};
use crate::db::{
    DynamoDbClient, DynamoSongArtistRepository, DynamoSongRepository, MemoryStore, SeedData,
    SongArtistStore, SongStore,
};
use crate::services::{AwsTranslator, TranslationMerger, Translator};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,

    /// Song records
    pub songs: Arc<dyn SongStore>,

    /// Artist credits
    pub artists: Arc<dyn SongArtistStore>,

    /// Translation cache merger over `songs`
    pub translations: Arc<TranslationMerger>,

    /// DynamoDB client, when that backend is in use (for readiness checks)
    pub dynamodb: Option<Arc<DynamoDbClient>>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Build the state for the configured storage backend
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let settings = Arc::new(settings);

        tracing::debug!(
            region = %settings.aws_region,
            backend = %settings.storage_backend,
            dynamodb_endpoint = ?settings.dynamodb_endpoint_url,
            translate_endpoint = ?settings.translate_endpoint_url,
            "Initializing AWS SDK clients"
        );

        let translator: Arc<dyn Translator> =
            Arc::new(AwsTranslator::new(create_translate_client(&settings).await));

        let state = match settings.storage_backend {
            StorageBackend::DynamoDb => {
                let sdk_client = create_dynamodb_client(&settings).await;
                let dynamodb = Arc::new(DynamoDbClient::new(settings.clone(), sdk_client));

                let mut state = Self::with_stores(
                    settings.clone(),
                    Arc::new(DynamoSongRepository::new(dynamodb.clone())),
                    Arc::new(DynamoSongArtistRepository::new(dynamodb.clone())),
                    translator,
                );
                state.dynamodb = Some(dynamodb);
                state
            }
            StorageBackend::Memory => {
                let store = match settings.seed_dir {
                    Some(ref dir) => {
                        let seed = SeedData::load(dir)
                            .with_context(|| format!("Failed to load seed data from {}", dir.display()))?;
                        tracing::info!(
                            songs = seed.songs.len(),
                            artists = seed.artists.len(),
                            "Loaded seed data into memory store"
                        );
                        MemoryStore::with_records(seed.songs, seed.artists)
                    }
                    None => MemoryStore::new(),
                };
                let store = Arc::new(store);

                Self::with_stores(settings.clone(), store.clone(), store, translator)
            }
        };

        tracing::info!(backend = %settings.storage_backend, "Application state initialized successfully");

        Ok(state)
    }

    /// Assemble state from already-built stores and translator
    pub fn with_stores(
        settings: Arc<Settings>,
        songs: Arc<dyn SongStore>,
        artists: Arc<dyn SongArtistStore>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let translations = Arc::new(TranslationMerger::new(
            songs.clone(),
            translator,
            settings.translation.source_language.clone(),
        ));

        Self {
            settings,
            songs,
            artists,
            translations,
            dynamodb: None,
            start_time: Instant::now(),
        }
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Whether the record store is reachable
    pub async fn store_healthy(&self) -> bool {
        match self.dynamodb {
            Some(ref dynamodb) => dynamodb.health_check().await,
            None => true,
        }
    }
}
