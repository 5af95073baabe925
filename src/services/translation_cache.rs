//! Cached title translation
//!
//! Resolves a song's title in a requested language, consulting the song's
//! `translationCache` attribute before calling the translation backend and
//! writing new translations back onto the record.
//!
//! Two requests that miss the cache for the same song and language at the
//! same time will both call the backend and both write the cache; the last
//! write wins.

use std::sync::Arc;

use crate::db::models::{CachedTranslation, Song};
use crate::db::store::{SongStore, StoreError};
use crate::services::translation::{TranslateError, Translator};

/// Errors from resolving a translated song
#[derive(Debug, thiserror::Error)]
pub enum TranslationMergeError {
    #[error("Song {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// Translation cache merger
#[derive(Clone)]
pub struct TranslationMerger {
    store: Arc<dyn SongStore>,
    translator: Arc<dyn Translator>,
    source_language: String,
}

impl TranslationMerger {
    pub fn new(
        store: Arc<dyn SongStore>,
        translator: Arc<dyn Translator>,
        source_language: impl Into<String>,
    ) -> Self {
        Self {
            store,
            translator,
            source_language: source_language.into(),
        }
    }

    /// Fetch a song with its title resolved in `language`.
    ///
    /// With no language (or an empty one) the stored record is returned as
    /// is. Otherwise the cached translation is used, or a fresh one is
    /// requested and merged into the persisted cache first.
    pub async fn translate_song(
        &self,
        id: i64,
        language: Option<&str>,
    ) -> Result<Song, TranslationMergeError> {
        let mut song = self
            .store
            .get(id)
            .await?
            .ok_or(TranslationMergeError::NotFound(id))?;

        let Some(language) = language.filter(|l| !l.is_empty()) else {
            return Ok(song);
        };

        let translated = match song.cached_translation(language) {
            Some(cached) => {
                tracing::debug!(song_id = id, language = %language, "Translation cache hit");
                cached.title.clone()
            }
            None => {
                tracing::debug!(song_id = id, language = %language, "Translation cache miss");
                let title = self
                    .translator
                    .translate(&song.title, &self.source_language, language)
                    .await?;

                let mut cache = song.translation_cache.take().unwrap_or_default();
                cache.insert(language.to_string(), CachedTranslation { title: title.clone() });
                self.store.set_translation_cache(id, &cache).await?;
                song.translation_cache = Some(cache);

                tracing::info!(song_id = id, language = %language, "Cached new title translation");
                title
            }
        };

        // An empty translation is cached but never shown
        if !translated.is_empty() {
            song.title = translated;
        }

        Ok(song)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Translator that records its calls and answers from a fixed response
    struct RecordingTranslator {
        calls: AtomicUsize,
        last_request: Mutex<Option<(String, String, String)>>,
        response: Result<String, String>,
    }

    impl RecordingTranslator {
        fn answering(response: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                response: Ok(response.to_string()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                response: Err(message.to_string()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Translator for RecordingTranslator {
        async fn translate(
            &self,
            text: &str,
            source_language: &str,
            target_language: &str,
        ) -> Result<String, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some((
                text.to_string(),
                source_language.to_string(),
                target_language.to_string(),
            ));
            self.response.clone().map_err(TranslateError::Service)
        }
    }

    fn song() -> Song {
        Song {
            id: 1,
            title: "Test".to_string(),
            artist: "A".to_string(),
            album: "B".to_string(),
            genre_ids: vec![1],
            release_date: "2020-01-01".to_string(),
            language: "en".to_string(),
            duration: 200.0,
            explicit: false,
            translation_cache: None,
        }
    }

    fn setup(translator: RecordingTranslator) -> (Arc<MemoryStore>, Arc<RecordingTranslator>, TranslationMerger) {
        let store = Arc::new(MemoryStore::with_records(vec![song()], vec![]));
        let translator = Arc::new(translator);
        let cache = TranslationMerger::new(store.clone(), translator.clone(), "en");
        (store, translator, cache)
    }

    #[tokio::test]
    async fn test_no_language_returns_stored_song() {
        let (_, translator, cache) = setup(RecordingTranslator::answering("Essai"));

        assert_eq!(cache.translate_song(1, None).await.unwrap(), song());
        assert_eq!(cache.translate_song(1, Some("")).await.unwrap(), song());
        assert_eq!(translator.calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_translates_once_and_caches() {
        let (store, translator, cache) = setup(RecordingTranslator::answering("Essai"));

        let translated = cache.translate_song(1, Some("fr")).await.unwrap();
        assert_eq!(translated.title, "Essai");
        assert_eq!(translator.calls(), 1);
        assert_eq!(
            translator.last_request.lock().unwrap().clone(),
            Some(("Test".to_string(), "en".to_string(), "fr".to_string()))
        );

        let stored = store.get(1).await.unwrap().unwrap();
        assert_eq!(stored.title, "Test");
        assert_eq!(stored.cached_translation("fr").unwrap().title, "Essai");

        let again = cache.translate_song(1, Some("fr")).await.unwrap();
        assert_eq!(again.title, "Essai");
        assert_eq!(translator.calls(), 1);
    }

    #[tokio::test]
    async fn test_new_language_keeps_existing_entries() {
        let (store, _, cache) = setup(RecordingTranslator::answering("Prueba"));
        let mut seeded = song();
        seeded.translation_cache = Some(
            [("fr".to_string(), CachedTranslation { title: "Essai".to_string() })]
                .into_iter()
                .collect(),
        );
        store.put(&seeded).await.unwrap();

        let translated = cache.translate_song(1, Some("es")).await.unwrap();
        assert_eq!(translated.title, "Prueba");

        let stored = store.get(1).await.unwrap().unwrap();
        let languages: Vec<_> = stored.translation_cache.unwrap().into_keys().collect();
        assert_eq!(languages, vec!["es".to_string(), "fr".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_translation_cached_without_retry() {
        let (store, translator, cache) = setup(RecordingTranslator::answering(""));

        let first = cache.translate_song(1, Some("ja")).await.unwrap();
        assert_eq!(first.title, "Test");
        assert_eq!(store.get(1).await.unwrap().unwrap().cached_translation("ja").unwrap().title, "");

        let second = cache.translate_song(1, Some("ja")).await.unwrap();
        assert_eq!(second.title, "Test");
        assert_eq!(translator.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_song_is_not_found() {
        let (_, translator, cache) = setup(RecordingTranslator::answering("x"));

        assert!(matches!(
            cache.translate_song(42, Some("fr")).await,
            Err(TranslationMergeError::NotFound(42))
        ));
        assert!(matches!(
            cache.translate_song(42, None).await,
            Err(TranslationMergeError::NotFound(42))
        ));
        assert_eq!(translator.calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_leaves_cache_untouched() {
        let (store, _, cache) = setup(RecordingTranslator::failing("unsupported language pair"));

        let result = cache.translate_song(1, Some("xx")).await;
        assert!(matches!(result, Err(TranslationMergeError::Translate(_))));
        assert!(store.get(1).await.unwrap().unwrap().translation_cache.is_none());
    }
}
