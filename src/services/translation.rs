//! Translation backend
//!
//! The `Translator` trait is what the cache merger calls on a miss;
//! `AwsTranslator` implements it with Amazon Translate.

use async_trait::async_trait;
use aws_sdk_translate::Client as TranslateSdkClient;
use aws_smithy_types::error::display::DisplayErrorContext;

/// Errors returned by a translation backend
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Translate error: {0}")]
    Service(String),
}

/// A machine translation backend
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_language` into `target_language`.
    /// An empty string is a valid result.
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslateError>;
}

/// Amazon Translate backend
#[derive(Clone)]
pub struct AwsTranslator {
    client: TranslateSdkClient,
}

impl AwsTranslator {
    pub fn new(client: TranslateSdkClient) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying AWS SDK client
    pub fn client(&self) -> &TranslateSdkClient {
        &self.client
    }
}

#[async_trait]
impl Translator for AwsTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslateError> {
        tracing::debug!(
            source = %source_language,
            target = %target_language,
            "Calling Translate TranslateText"
        );

        let output = self
            .client
            .translate_text()
            .text(text)
            .source_language_code(source_language)
            .target_language_code(target_language)
            .send()
            .await
            .map_err(|e| TranslateError::Service(DisplayErrorContext(&e).to_string()))?;

        Ok(output.translated_text().to_string())
    }
}
