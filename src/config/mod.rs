//! Configuration management module
//!
//! Loads and validates application configuration from environment
//! variables and .env files.

pub mod aws;
pub mod settings;

pub use aws::{create_dynamodb_client, create_translate_client, AwsConfigBuilder};
pub use settings::{AuthConfig, Environment, Settings, StorageBackend, TranslationConfig};
