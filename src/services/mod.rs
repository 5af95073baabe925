//! Services module
//!
//! Business logic and external service integrations.

pub mod translation;
pub mod translation_cache;

pub use translation::{AwsTranslator, TranslateError, Translator};
pub use translation_cache::{TranslationMergeError, TranslationMerger};
